//! # Match Quality Score
//!
//! Rescales the base score into a bounded "match quality" score. Failed
//! extractions map onto a higher band than successful ones.

use crate::battle::Battle;
use crate::config::{QualityConfig, ScoreConfig, TrendConfig};
use crate::numbers::round_half_up;
use crate::score::ScoreModel;
use crate::trend::{score_trend, ScoreTrend};
use tracing::debug;

/// Quality score engine
#[derive(Debug, Clone, Default)]
pub struct QualityScoreEngine {
    model: ScoreModel,
    quality: QualityConfig,
    trend: TrendConfig,
}

impl QualityScoreEngine {
    /// Create a new quality engine
    pub fn new(score: ScoreConfig, quality: QualityConfig, trend: TrendConfig) -> Self {
        Self {
            model: ScoreModel::new(score),
            quality,
            trend,
        }
    }

    /// Quality score of a single battle
    pub fn adjusted_score(&self, battle: &Battle) -> i64 {
        let base = self.model.base_score(battle) as f64;
        let mapping = if battle.is_success() {
            &self.quality.success
        } else {
            &self.quality.failure
        };
        round_half_up(mapping.apply(base))
    }

    /// Quality score series and trend over the scoreable battles, oldest first
    pub fn calculate(&self, battles: &[Battle]) -> ScoreTrend {
        let report = score_trend(battles, &self.trend, |b| self.adjusted_score(b));

        debug!(
            "Calculated quality trend over {} of {} battles (avg: {:.1}, current: {})",
            report.len(),
            battles.len(),
            report.average,
            report.current_trend_score
        );

        report
    }
}
