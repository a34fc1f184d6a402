//! # Profitability Trend
//!
//! Final asset value and profit rate per battle over time.

use crate::battle::{sorted_by, Battle};
use crate::numbers::{mean, round_to_tenth};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Per-battle profitability series, oldest first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfitabilityTrend {
    pub labels: Vec<String>,
    /// Equipment price + profit/loss
    pub final_asset_values: Vec<i64>,
    /// Profit/loss as a percentage of equipment price, one decimal
    pub profit_rates: Vec<f64>,
    pub average_final_asset_value: f64,
    /// Mean of the rounded profit rates
    pub average_profit_rate: f64,
    /// The battles that made it into the series, in series order
    pub battles: Vec<Battle>,
}

/// Profitability trend engine
#[derive(Debug, Clone, Copy, Default)]
pub struct ProfitabilityEngine;

impl ProfitabilityEngine {
    pub fn new() -> Self {
        Self
    }

    /// Battles with a timestamp, a positive equipment price and a known profit/loss
    pub fn is_profit_tracked(battle: &Battle) -> bool {
        battle.event_time.is_some() && battle.profit_loss.is_some() && battle.equipment_price() > 0
    }

    /// Compute the profitability series
    pub fn calculate(&self, battles: &[Battle]) -> ProfitabilityTrend {
        let ordered = sorted_by(battles, Self::is_profit_tracked, |b| b.event_time);
        let mut report = ProfitabilityTrend::default();

        for battle in ordered {
            let equipment_price = battle.equipment_price();
            let profit_loss = battle.profit_loss();

            report.labels.push(battle.time_label());
            let final_asset = equipment_price.saturating_add(profit_loss);
            report.final_asset_values.push(final_asset);
            let rate = profit_loss as f64 / equipment_price as f64 * 100.0;
            report.profit_rates.push(round_to_tenth(rate));
            report.battles.push(battle.clone());
        }

        report.average_final_asset_value =
            mean(report.final_asset_values.iter().map(|v| *v as f64));
        report.average_profit_rate = mean(report.profit_rates.iter().copied());

        debug!(
            "Calculated profitability over {} of {} battles (avg rate: {:.1}%)",
            report.battles.len(),
            battles.len(),
            report.average_profit_rate
        );

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lenient::parse_timestamp;

    fn battle(time: &str, equipment: Option<i64>, profit: Option<i64>) -> Battle {
        Battle {
            event_time: parse_timestamp(time),
            equipment_price: equipment,
            profit_loss: profit,
            ..Default::default()
        }
    }

    #[test]
    fn test_zero_equipment_is_excluded() {
        let battles = vec![
            battle("2025-03-04 10:00:00", Some(100_000), Some(50_000)),
            battle("2025-03-04 11:00:00", Some(0), Some(20_000)),
        ];

        let report = ProfitabilityEngine::new().calculate(&battles);
        assert_eq!(report.final_asset_values, vec![150_000]);
        assert_eq!(report.profit_rates, vec![50.0]);
        assert_eq!(report.battles.len(), 1);
    }

    #[test]
    fn test_series_and_means() {
        let battles = vec![
            battle("2025-03-05 10:00:00", Some(300_000), Some(-100_000)),
            battle("2025-03-04 10:00:00", Some(300_000), Some(100_000)),
            battle("2025-03-06 10:00:00", Some(200_000), None),
            battle("2025-03-06 11:00:00", None, Some(5_000)),
        ];

        let report = ProfitabilityEngine::new().calculate(&battles);
        assert_eq!(report.labels, ["3/4 10:00", "3/5 10:00"]);
        assert_eq!(report.final_asset_values, vec![400_000, 200_000]);
        assert_eq!(report.profit_rates, vec![33.3, -33.3]);
        assert_eq!(report.average_final_asset_value, 300_000.0);
        assert!(report.average_profit_rate.abs() < 1e-9);
    }

    #[test]
    fn test_empty_input() {
        let report = ProfitabilityEngine::new().calculate(&[]);
        assert!(report.labels.is_empty());
        assert_eq!(report.average_final_asset_value, 0.0);
        assert_eq!(report.average_profit_rate, 0.0);
    }

    #[test]
    fn test_extreme_values_saturate() {
        let extreme = battle("2025-03-04 10:00:00", Some(i64::MAX), Some(i64::MAX));

        let report = ProfitabilityEngine::new().calculate(&[extreme]);
        assert_eq!(report.final_asset_values, vec![i64::MAX]);
        assert_eq!(report.profit_rates, vec![100.0]);
    }
}
