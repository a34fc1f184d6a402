//! # Behavior Changepoint Detection
//!
//! Normalizes behavioral metrics across the whole battle set, folds them into
//! two composite indices, averages the composites over a sliding window and
//! flags large relative jumps between consecutive windows.

use crate::battle::{sorted_by, Battle};
use crate::config::BehaviorConfig;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Metrics that are min-max normalized across the battle set; discriminants index `Metric::ALL`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Metric {
    EquipmentPrice,
    KillAi,
    KillPlayer,
    DoubleKill,
    TripleKill,
    QuadKill,
    PentaKill,
    IsLeave,
}

impl Metric {
    const ALL: [Metric; 8] = [
        Metric::EquipmentPrice,
        Metric::KillAi,
        Metric::KillPlayer,
        Metric::DoubleKill,
        Metric::TripleKill,
        Metric::QuadKill,
        Metric::PentaKill,
        Metric::IsLeave,
    ];

    fn field(self, battle: &Battle) -> Option<i64> {
        match self {
            Metric::EquipmentPrice => battle.equipment_price,
            Metric::KillAi => battle.kill_ai,
            Metric::KillPlayer => battle.kill_player,
            Metric::DoubleKill => battle.double_kill,
            Metric::TripleKill => battle.triple_kill,
            Metric::QuadKill => battle.quad_kill,
            Metric::PentaKill => battle.penta_kill,
            Metric::IsLeave => battle.is_leave,
        }
    }

    fn value(self, battle: &Battle) -> f64 {
        self.field(battle).unwrap_or(0) as f64
    }
}

/// Observed range of one metric
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricRange {
    pub min: f64,
    pub max: f64,
}

impl MetricRange {
    fn observe<I: IntoIterator<Item = f64>>(values: I) -> Self {
        let empty = MetricRange {
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        };
        values.into_iter().fold(empty, |range, v| MetricRange {
            min: range.min.min(v),
            max: range.max.max(v),
        })
    }

    /// `(v - min) / (max - min + epsilon)`
    pub fn normalize(&self, value: f64, epsilon: f64) -> f64 {
        (value - self.min) / (self.max - self.min + epsilon)
    }
}

/// A windowed mean whose relative change from the previous window crossed the threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignificantChange {
    /// Index of the window (0-based) in the windowed series
    pub index: usize,
    /// The windowed mean at `index`
    pub value: f64,
    /// `(value - previous) / previous`
    pub change_rate: f64,
}

/// Windowed composite series and their flagged changes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BehaviorTrend {
    /// "Window N", 1-based
    pub labels: Vec<String>,
    pub battle_effectiveness: Vec<f64>,
    pub resource_survival: Vec<f64>,
    pub effectiveness_changes: Vec<SignificantChange>,
    pub resource_changes: Vec<SignificantChange>,
}

/// Per-battle composite indices before windowing
#[derive(Debug, Clone, Copy, PartialEq)]
struct Composite {
    effectiveness: f64,
    resource_survival: f64,
}

/// Behavior changepoint detector
#[derive(Debug, Clone, Default)]
pub struct BehaviorDetector {
    config: BehaviorConfig,
}

impl BehaviorDetector {
    /// Create a new detector
    pub fn new(config: BehaviorConfig) -> Self {
        Self { config }
    }

    /// Battles carrying every field the detector reads
    pub fn is_complete(battle: &Battle) -> bool {
        battle.start_time.is_some()
            && battle.game_result.is_some()
            && Metric::ALL.iter().all(|m| m.field(battle).is_some())
    }

    /// Detect behavior changes over the complete battles, ordered by start time
    pub fn calculate(&self, battles: &[Battle]) -> BehaviorTrend {
        let ordered = sorted_by(battles, Self::is_complete, |b| b.start_time);
        if ordered.is_empty() {
            debug!(
                "No complete battles for behavior detection ({} supplied)",
                battles.len()
            );
            return BehaviorTrend::default();
        }

        let composites = self.composites(&ordered);
        let window = self.config.max_window.max(1).min(composites.len());

        let mut report = BehaviorTrend::default();
        for slice in composites.windows(window) {
            let n = slice.len() as f64;
            let effectiveness: f64 = slice.iter().map(|c| c.effectiveness).sum();
            let resource_survival: f64 = slice.iter().map(|c| c.resource_survival).sum();
            report.battle_effectiveness.push(effectiveness / n);
            report.resource_survival.push(resource_survival / n);
        }

        report.labels = (1..=report.battle_effectiveness.len())
            .map(|i| format!("Window {i}"))
            .collect();
        report.effectiveness_changes = significant_changes(
            &report.battle_effectiveness,
            self.config.effectiveness_threshold,
        );
        report.resource_changes =
            significant_changes(&report.resource_survival, self.config.resource_threshold);

        debug!(
            "Behavior detection over {} battles: {} windows of {}, {} and {} changes",
            ordered.len(),
            report.labels.len(),
            window,
            report.effectiveness_changes.len(),
            report.resource_changes.len()
        );

        report
    }

    /// Observed range of every metric over the given battles
    fn ranges(battles: &[&Battle]) -> [MetricRange; 8] {
        Metric::ALL.map(|metric| {
            let values = battles.iter().map(|b| metric.value(b));
            MetricRange::observe(values)
        })
    }

    fn composites(&self, battles: &[&Battle]) -> Vec<Composite> {
        let ranges = Self::ranges(battles);
        let epsilon = self.config.epsilon;

        battles
            .iter()
            .map(|battle| {
                let norm = |metric: Metric| {
                    let value = metric.value(battle);
                    ranges[metric as usize].normalize(value, epsilon)
                };
                let stayed = 1.0 - norm(Metric::IsLeave);
                let result_score = if battle.is_success() { 1.0 } else { 0.0 };

                Composite {
                    effectiveness: 0.25 * norm(Metric::KillPlayer)
                        + 0.25 * norm(Metric::KillAi)
                        + 0.15 * norm(Metric::DoubleKill)
                        + 0.15 * norm(Metric::TripleKill)
                        + 0.1 * norm(Metric::QuadKill)
                        + 0.1 * norm(Metric::PentaKill),
                    resource_survival: 0.4 * norm(Metric::EquipmentPrice)
                        + 0.3 * result_score
                        + 0.3 * stayed,
                }
            })
            .collect()
    }
}

/// Flag consecutive pairs whose relative change reaches `threshold`.
/// A zero previous value is skipped.
fn significant_changes(series: &[f64], threshold: f64) -> Vec<SignificantChange> {
    series
        .windows(2)
        .enumerate()
        .filter(|(_, pair)| pair[0] != 0.0)
        .filter_map(|(i, pair)| {
            let change_rate = (pair[1] - pair[0]) / pair[0];
            (change_rate.abs() >= threshold).then_some(SignificantChange {
                index: i + 1,
                value: pair[1],
                change_rate,
            })
        })
        .collect()
}
