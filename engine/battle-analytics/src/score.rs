//! # Score Model
//!
//! Base score of a single battle from its combat and economic fields.

use crate::battle::Battle;
use crate::config::ScoreConfig;
use crate::numbers::round_half_up;

/// Computes the base score every rescaled score starts from
#[derive(Debug, Clone, Default)]
pub struct ScoreModel {
    config: ScoreConfig,
}

impl ScoreModel {
    /// Create a new score model
    pub fn new(config: ScoreConfig) -> Self {
        Self { config }
    }

    /// Base score of a battle; total over any input, missing counters count as 0
    ///
    /// Counter terms saturate, so absurd coerced counts pin the score
    /// instead of overflowing.
    pub fn base_score(&self, battle: &Battle) -> i64 {
        let c = &self.config;
        let weighted = [
            (battle.kill_cnt, c.kill_weight),
            (battle.head_shot_cnt, c.headshot_weight),
            (battle.kill_player, c.player_kill_weight),
            (battle.double_kill, c.double_kill_weight),
            (battle.triple_kill, c.triple_kill_weight),
            (battle.quad_kill, c.quad_kill_weight),
            (battle.penta_kill, c.penta_kill_weight),
        ];

        let mut score = weighted.iter().fold(c.base, |score, (count, weight)| {
            score.saturating_add(count.unwrap_or(0).saturating_mul(*weight))
        });

        let outcome = if battle.is_success() {
            c.success_bonus
        } else {
            c.failure_penalty.saturating_neg()
        };
        score = score.saturating_add(outcome);
        score = score.saturating_add(self.duration_adjustment(battle.game_time()));

        let profit_ratio = (battle.profit_loss() as f64 / c.profit_divisor)
            .max(c.profit_min)
            .min(c.profit_max);

        round_half_up(score as f64 + profit_ratio)
    }

    fn duration_adjustment(&self, game_time: i64) -> i64 {
        let c = &self.config;
        if game_time < c.duration_min_secs {
            -c.short_match_penalty
        } else if game_time > c.duration_max_secs {
            -c.long_match_penalty
        } else {
            c.duration_bonus
        }
    }
}
