//! # Causal Trend Smoothing
//!
//! The recency-weighted, exponentially smoothed trend shared by the quality
//! and performance engines. Each step only sees the scores pushed so far, so a
//! trend value never depends on later battles.

use crate::battle::{sorted_by, Battle};
use crate::config::TrendConfig;
use crate::numbers::{mean, round_half_up};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Streaming trend state: a capped window of recent scores and the last trend value
#[derive(Debug, Clone)]
pub struct TrendSmoother {
    weights: Vec<f64>,
    smoothing: f64,
    /// Most recent score first
    window: VecDeque<i64>,
    previous: Option<i64>,
}

impl TrendSmoother {
    /// Create a smoother with an empty window
    pub fn new(config: &TrendConfig) -> Self {
        Self {
            weights: config.weights.clone(),
            smoothing: config.smoothing,
            window: VecDeque::with_capacity(config.weights.len()),
            previous: None,
        }
    }

    /// Feed the next score in time order and return the rounded trend value
    pub fn push(&mut self, score: i64) -> i64 {
        self.window.push_front(score);
        self.window.truncate(self.weights.len().max(1));

        let (weighted_sum, weight_used) = self
            .window
            .iter()
            .zip(&self.weights)
            .fold((0.0, 0.0), |(sum, used), (s, w)| {
                (sum + *s as f64 * w, used + w)
            });

        // Normalized by the weights actually used while the window is filling
        let windowed = if weight_used > 0.0 {
            weighted_sum / weight_used
        } else {
            score as f64
        };

        let trend = match self.previous {
            Some(previous) => windowed * self.smoothing + previous as f64 * (1.0 - self.smoothing),
            None => windowed,
        };

        let rounded = round_half_up(trend);
        self.previous = Some(rounded);
        rounded
    }

    /// The last trend value, if any score has been pushed
    pub fn current(&self) -> Option<i64> {
        self.previous
    }
}

/// A per-battle score series with its smoothed trend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreTrend {
    /// "M/D H:MM" label of each battle, oldest first
    pub labels: Vec<String>,
    /// Per-battle score
    pub scores: Vec<i64>,
    /// Smoothed trend after each battle
    pub trend: Vec<i64>,
    /// Arithmetic mean of `scores`, 0 when empty
    pub average: f64,
    /// Trend value after the most recent battle, 0 when empty
    pub current_trend_score: i64,
}

impl ScoreTrend {
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

/// Score every scoreable battle in time order and smooth the series
pub(crate) fn score_trend<F>(battles: &[Battle], config: &TrendConfig, score: F) -> ScoreTrend
where
    F: Fn(&Battle) -> i64,
{
    let ordered = sorted_by(battles, Battle::is_scoreable, |b| b.event_time);
    let mut smoother = TrendSmoother::new(config);

    let mut report = ScoreTrend {
        labels: Vec::with_capacity(ordered.len()),
        scores: Vec::with_capacity(ordered.len()),
        trend: Vec::with_capacity(ordered.len()),
        ..Default::default()
    };

    for battle in ordered {
        let value = score(battle);
        report.labels.push(battle.time_label());
        report.scores.push(value);
        report.trend.push(smoother.push(value));
    }

    report.average = mean(report.scores.iter().map(|s| *s as f64));
    report.current_trend_score = smoother.current().unwrap_or(0);
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn smoother() -> TrendSmoother {
        TrendSmoother::new(&TrendConfig::default())
    }

    #[test]
    fn test_first_value_passes_through() {
        let mut smoother = smoother();
        assert_eq!(smoother.current(), None);
        assert_eq!(smoother.push(1477), 1477);
        assert_eq!(smoother.current(), Some(1477));
    }

    #[test]
    fn test_partial_window_and_smoothing() {
        let mut smoother = smoother();
        smoother.push(1000);

        // window [2000, 1000]: (800 + 300) / 0.7 = 1571.43; 0.8 * 1571.43 + 0.2 * 1000 = 1457.14
        assert_eq!(smoother.push(2000), 1457);
    }

    #[test]
    fn test_window_is_capped_at_weight_count() {
        let mut smoother = smoother();
        for _ in 0..5 {
            smoother.push(0);
        }
        // A constant window of 1000s after enough steps must converge to 1000
        let mut last = 0;
        for _ in 0..40 {
            last = smoother.push(1000);
        }
        assert_eq!(last, 1000);
        assert_eq!(smoother.window.len(), 5);
    }

    #[test]
    fn test_constant_series_is_flat() {
        let mut smoother = smoother();
        let trend: Vec<i64> = (0..8).map(|_| smoother.push(2000)).collect();
        assert!(trend.iter().all(|t| *t == 2000));
    }

    #[test]
    fn test_trend_is_causal() {
        let scores = [1500, 2200, 1800, 2600, 1400, 1900, 2100];
        let mut full = smoother();
        let full_trend: Vec<i64> = scores.iter().map(|s| full.push(*s)).collect();

        for k in 0..scores.len() {
            let mut prefix = smoother();
            let last = scores[..=k].iter().map(|s| prefix.push(*s)).last();
            assert_eq!(last, Some(full_trend[k]));
        }
    }

    #[test]
    fn test_empty_score_trend() {
        let report = score_trend(&[], &TrendConfig::default(), |_| 0);
        assert!(report.is_empty());
        assert_eq!(report.average, 0.0);
        assert_eq!(report.current_trend_score, 0);
    }
}
