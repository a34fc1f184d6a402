//! # Player Performance Score

use crate::battle::Battle;
use crate::config::{PerformanceConfig, ScoreConfig, TrendConfig};
use crate::score::ScoreModel;
use crate::trend::{score_trend, ScoreTrend};
use tracing::debug;

/// Performance score engine: the unclamped base score with an extra failure penalty
#[derive(Debug, Clone, Default)]
pub struct PerformanceScoreEngine {
    model: ScoreModel,
    performance: PerformanceConfig,
    trend: TrendConfig,
}

impl PerformanceScoreEngine {
    /// Create a new performance engine
    pub fn new(score: ScoreConfig, performance: PerformanceConfig, trend: TrendConfig) -> Self {
        Self {
            model: ScoreModel::new(score),
            performance,
            trend,
        }
    }

    /// Performance score of a single battle
    pub fn performance_score(&self, battle: &Battle) -> i64 {
        let base = self.model.base_score(battle);
        if battle.is_success() {
            base
        } else {
            base.saturating_sub(self.performance.failure_penalty)
        }
    }

    /// Performance score series and trend over the scoreable battles, oldest first
    pub fn calculate(&self, battles: &[Battle]) -> ScoreTrend {
        let report = score_trend(battles, &self.trend, |b| self.performance_score(b));

        debug!(
            "Calculated performance trend over {} of {} battles (avg: {:.1}, current: {})",
            report.len(),
            battles.len(),
            report.average,
            report.current_trend_score
        );

        report
    }
}
