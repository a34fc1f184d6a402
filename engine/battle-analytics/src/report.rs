//! # Report Facade
//!
//! [`BattleAnalytics`] wires every engine to one validated configuration and
//! a role directory snapshot.

use crate::aggregation::{
    Aggregator, CharacterFinance, CharacterUsage, MapGroupStats, MapStats, OverallSummary,
};
use crate::battle::Battle;
use crate::behavior::{BehaviorDetector, BehaviorTrend};
use crate::config::AnalyticsConfig;
use crate::environment::{EnvironmentClassifier, EnvironmentReport};
use crate::error::Result;
use crate::harvest::{harvest_summary, HarvestSummary};
use crate::performance::PerformanceScoreEngine;
use crate::profitability::{ProfitabilityEngine, ProfitabilityTrend};
use crate::quality::QualityScoreEngine;
use crate::trend::ScoreTrend;
use game_registry::RoleDirectory;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Every report over one battle set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FullReport {
    pub summary: OverallSummary,
    pub quality: ScoreTrend,
    pub performance: ScoreTrend,
    pub profitability: ProfitabilityTrend,
    pub behavior: BehaviorTrend,
    pub map_stats: MapStats,
    pub map_groups: Vec<MapGroupStats>,
    pub character_usage: Vec<CharacterUsage>,
    pub character_finance: CharacterFinance,
    pub environment: EnvironmentReport,
    pub harvest: HarvestSummary,
}

/// Battle analytics facade
#[derive(Debug, Clone)]
pub struct BattleAnalytics {
    config: AnalyticsConfig,
    roles: RoleDirectory,
    quality: QualityScoreEngine,
    performance: PerformanceScoreEngine,
    profitability: ProfitabilityEngine,
    behavior: BehaviorDetector,
    aggregator: Aggregator,
    environment: EnvironmentClassifier,
}

impl Default for BattleAnalytics {
    fn default() -> Self {
        Self::build(AnalyticsConfig::default(), RoleDirectory::new())
    }
}

impl BattleAnalytics {
    /// Create the facade from a configuration, rejecting invalid parameters
    pub fn new(config: AnalyticsConfig) -> Result<Self> {
        config.validate()?;
        info!("Initializing battle analytics");
        Ok(Self::build(config, RoleDirectory::new()))
    }

    fn build(config: AnalyticsConfig, roles: RoleDirectory) -> Self {
        Self {
            quality: QualityScoreEngine::new(
                config.score.clone(),
                config.quality.clone(),
                config.trend.clone(),
            ),
            performance: PerformanceScoreEngine::new(
                config.score.clone(),
                config.performance.clone(),
                config.trend.clone(),
            ),
            profitability: ProfitabilityEngine::new(),
            behavior: BehaviorDetector::new(config.behavior.clone()),
            aggregator: Aggregator::new(config.finance.clone()),
            environment: EnvironmentClassifier::new(config.environment.clone()),
            config,
            roles,
        }
    }

    /// Replace the role directory snapshot
    pub fn with_roles(mut self, roles: RoleDirectory) -> Self {
        info!("Using role directory with {} roles", roles.len());
        self.roles = roles;
        self
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    pub fn roles(&self) -> &RoleDirectory {
        &self.roles
    }

    pub fn quality_trend(&self, battles: &[Battle]) -> ScoreTrend {
        self.quality.calculate(battles)
    }

    pub fn performance_trend(&self, battles: &[Battle]) -> ScoreTrend {
        self.performance.calculate(battles)
    }

    pub fn profitability_trend(&self, battles: &[Battle]) -> ProfitabilityTrend {
        self.profitability.calculate(battles)
    }

    pub fn behavior_trend(&self, battles: &[Battle]) -> BehaviorTrend {
        self.behavior.calculate(battles)
    }

    pub fn map_stats(&self, battles: &[Battle]) -> MapStats {
        self.aggregator.map_stats(battles)
    }

    pub fn map_group_stats(&self, battles: &[Battle]) -> Vec<MapGroupStats> {
        self.aggregator.map_group_stats(battles)
    }

    pub fn character_usage(&self, battles: &[Battle]) -> Vec<CharacterUsage> {
        self.aggregator.character_usage(battles, &self.roles)
    }

    pub fn character_finance(&self, battles: &[Battle]) -> CharacterFinance {
        self.aggregator.character_finance(battles, &self.roles)
    }

    pub fn environment(&self, battles: &[Battle]) -> EnvironmentReport {
        self.environment
            .classify(battles, &self.performance, &self.quality)
    }

    pub fn summary(&self, battles: &[Battle]) -> OverallSummary {
        self.aggregator.overall_summary(battles)
    }

    pub fn harvest(&self, battles: &[Battle]) -> HarvestSummary {
        harvest_summary(battles)
    }

    /// Run every report over the same battles
    pub fn full_report(&self, battles: &[Battle]) -> FullReport {
        info!("Building full report over {} battles", battles.len());

        let quality = self.quality_trend(battles);
        let performance = self.performance_trend(battles);
        let environment = self
            .environment
            .classify_scores(performance.current_trend_score, quality.current_trend_score);

        FullReport {
            summary: self.summary(battles),
            quality,
            performance,
            profitability: self.profitability_trend(battles),
            behavior: self.behavior_trend(battles),
            map_stats: self.map_stats(battles),
            map_groups: self.map_group_stats(battles),
            character_usage: self.character_usage(battles),
            character_finance: self.character_finance(battles),
            environment,
            harvest: self.harvest(battles),
        }
    }
}
