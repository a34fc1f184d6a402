//! # Environment Classification
//!
//! Compares the current performance trend against the current quality trend
//! and buckets the gap into a pressure level.

use crate::battle::Battle;
use crate::config::EnvironmentConfig;
use crate::performance::PerformanceScoreEngine;
use crate::quality::QualityScoreEngine;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Pressure level of the recent environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvironmentLevel {
    LowPressure,
    Normal,
    HighPressure,
    ExtremePressure,
}

impl fmt::Display for EnvironmentLevel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EnvironmentLevel::LowPressure => write!(f, "low pressure"),
            EnvironmentLevel::Normal => write!(f, "normal"),
            EnvironmentLevel::HighPressure => write!(f, "high pressure"),
            EnvironmentLevel::ExtremePressure => write!(f, "extreme pressure"),
        }
    }
}

/// Classification result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentReport {
    pub level: EnvironmentLevel,
    /// `performance_score - quality_score`
    pub difference: i64,
    /// Current performance trend score
    pub performance_score: i64,
    /// Current quality trend score
    pub quality_score: i64,
}

/// Environment classifier
#[derive(Debug, Clone, Default)]
pub struct EnvironmentClassifier {
    config: EnvironmentConfig,
}

impl EnvironmentClassifier {
    /// Create a new classifier
    pub fn new(config: EnvironmentConfig) -> Self {
        Self { config }
    }

    /// Bucket a performance/quality difference
    pub fn level_for(&self, difference: i64) -> EnvironmentLevel {
        if difference > self.config.low_pressure_above {
            EnvironmentLevel::LowPressure
        } else if difference > self.config.normal_above {
            EnvironmentLevel::Normal
        } else if difference > self.config.high_pressure_above {
            EnvironmentLevel::HighPressure
        } else {
            EnvironmentLevel::ExtremePressure
        }
    }

    /// Classify from two current trend scores
    pub fn classify_scores(&self, performance_score: i64, quality_score: i64) -> EnvironmentReport {
        let difference = performance_score.saturating_sub(quality_score);
        EnvironmentReport {
            level: self.level_for(difference),
            difference,
            performance_score,
            quality_score,
        }
    }

    /// Run both trend engines over the battles and classify their current scores
    pub fn classify(
        &self,
        battles: &[Battle],
        performance: &PerformanceScoreEngine,
        quality: &QualityScoreEngine,
    ) -> EnvironmentReport {
        let performance_score = performance.calculate(battles).current_trend_score;
        let quality_score = quality.calculate(battles).current_trend_score;
        let report = self.classify_scores(performance_score, quality_score);

        debug!(
            "Environment: {} (performance {} - quality {} = {})",
            report.level, performance_score, quality_score, report.difference
        );

        report
    }
}
