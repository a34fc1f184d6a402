//! # Configuration Management
//!
//! Tunable parameters of every engine. `Default` reproduces the production
//! constants; a TOML file may override any subset of them.

use crate::error::{AnalyticsError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable naming a TOML configuration file
pub const CONFIG_PATH_ENV: &str = "BATTLE_ANALYTICS_CONFIG";

/// Main configuration for the analytics engines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Base score model
    pub score: ScoreConfig,
    /// Match quality rescaling
    pub quality: QualityConfig,
    /// Player performance rescaling
    pub performance: PerformanceConfig,
    /// Causal trend smoothing shared by quality and performance
    pub trend: TrendConfig,
    /// Behavior changepoint detection
    pub behavior: BehaviorConfig,
    /// Character finance leaderboard
    pub finance: FinanceConfig,
    /// Environment classification thresholds
    pub environment: EnvironmentConfig,
}

/// Base score model weights
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreConfig {
    /// Starting score of every battle
    pub base: i64,
    pub kill_weight: i64,
    pub headshot_weight: i64,
    pub player_kill_weight: i64,
    pub double_kill_weight: i64,
    pub triple_kill_weight: i64,
    pub quad_kill_weight: i64,
    pub penta_kill_weight: i64,
    /// Added on successful extraction
    pub success_bonus: i64,
    /// Subtracted on failed extraction
    pub failure_penalty: i64,
    /// Shortest game time (seconds) that earns the duration bonus
    pub duration_min_secs: i64,
    /// Longest game time (seconds) that earns the duration bonus
    pub duration_max_secs: i64,
    pub duration_bonus: i64,
    /// Subtracted when the match is shorter than `duration_min_secs`
    pub short_match_penalty: i64,
    /// Subtracted when the match is longer than `duration_max_secs`
    pub long_match_penalty: i64,
    /// Profit/loss is divided by this before clamping
    pub profit_divisor: f64,
    pub profit_min: f64,
    pub profit_max: f64,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            base: 1500,
            kill_weight: 20,
            headshot_weight: 30,
            player_kill_weight: 40,
            double_kill_weight: 50,
            triple_kill_weight: 100,
            quad_kill_weight: 200,
            penta_kill_weight: 400,
            success_bonus: 100,
            failure_penalty: 50,
            duration_min_secs: 200,
            duration_max_secs: 1200,
            duration_bonus: 60,
            short_match_penalty: 40,
            long_match_penalty: 20,
            profit_divisor: 10000.0,
            profit_min: -50.0,
            profit_max: 100.0,
        }
    }
}

/// `clamp(value × scale + offset, min, max)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearClamp {
    pub scale: f64,
    pub offset: f64,
    pub min: f64,
    pub max: f64,
}

impl LinearClamp {
    /// Apply the mapping
    pub fn apply(&self, value: f64) -> f64 {
        let mapped = value * self.scale + self.offset;
        mapped.max(self.min).min(self.max)
    }
}

/// Match quality rescaling per outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityConfig {
    pub success: LinearClamp,
    pub failure: LinearClamp,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            success: LinearClamp {
                scale: 0.7,
                offset: 300.0,
                min: 1350.0,
                max: 2400.0,
            },
            failure: LinearClamp {
                scale: 0.7,
                offset: 1000.0,
                min: 1950.0,
                max: 3100.0,
            },
        }
    }
}

/// Player performance rescaling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceConfig {
    /// Extra penalty applied once to failed extractions
    pub failure_penalty: i64,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            failure_penalty: 50,
        }
    }
}

/// Causal trend smoothing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendConfig {
    /// Positional weights, most recent battle first; the length is the window size
    pub weights: Vec<f64>,
    /// Weight of the current windowed average against the previous trend value
    pub smoothing: f64,
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            weights: vec![0.4, 0.3, 0.15, 0.1, 0.05],
            smoothing: 0.8,
        }
    }
}

/// Behavior changepoint detection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Upper bound on the sliding window size
    pub max_window: usize,
    /// Added to every min-max range
    pub epsilon: f64,
    /// Minimum |relative change| of battle effectiveness to flag
    pub effectiveness_threshold: f64,
    /// Minimum |relative change| of resource survival to flag
    pub resource_threshold: f64,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            max_window: 10,
            epsilon: 1e-6,
            effectiveness_threshold: 0.30,
            resource_threshold: 0.40,
        }
    }
}

/// Character finance leaderboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinanceConfig {
    /// Entries kept per direction
    pub leaderboard_size: usize,
}

impl Default for FinanceConfig {
    fn default() -> Self {
        Self {
            leaderboard_size: 8,
        }
    }
}

/// Environment classification thresholds on `performance - quality`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    pub low_pressure_above: i64,
    pub normal_above: i64,
    pub high_pressure_above: i64,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            low_pressure_above: 300,
            normal_above: -100,
            high_pressure_above: -400,
        }
    }
}

impl AnalyticsConfig {
    /// Load configuration from a TOML file and validate it
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: AnalyticsConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load from the file named by `BATTLE_ANALYTICS_CONFIG`, or use defaults
    pub fn from_env() -> Result<Self> {
        match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) if !path.trim().is_empty() => {
                tracing::info!("Loading analytics configuration from {}", path);
                Self::load_from_file(path.trim())
            }
            _ => Ok(Self::default()),
        }
    }

    /// Reject parameter sets the engines cannot compute with
    pub fn validate(&self) -> Result<()> {
        let trend = &self.trend;
        if trend.weights.is_empty() {
            return invalid("trend.weights must not be empty");
        }
        if trend.weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return invalid("trend.weights must be finite and non-negative");
        }
        if trend.weights[0] <= 0.0 {
            return invalid("trend.weights[0] must be positive");
        }
        if !(0.0..=1.0).contains(&trend.smoothing) {
            return invalid("trend.smoothing must be within [0, 1]");
        }

        let mappings = [
            ("quality.success", &self.quality.success),
            ("quality.failure", &self.quality.failure),
        ];
        for (name, mapping) in mappings {
            if mapping.min > mapping.max {
                return invalid(&format!("{name}: min exceeds max"));
            }
        }

        let score = &self.score;
        if score.profit_divisor == 0.0 || !score.profit_divisor.is_finite() {
            return invalid("score.profit_divisor must be finite and non-zero");
        }
        if score.profit_min > score.profit_max {
            return invalid("score.profit_min exceeds score.profit_max");
        }
        if score.duration_min_secs > score.duration_max_secs {
            return invalid("score.duration_min_secs exceeds score.duration_max_secs");
        }

        let behavior = &self.behavior;
        if behavior.max_window == 0 {
            return invalid("behavior.max_window must be at least 1");
        }
        if behavior.epsilon <= 0.0 {
            return invalid("behavior.epsilon must be positive");
        }

        let env = &self.environment;
        let decreasing = env.low_pressure_above > env.normal_above
            && env.normal_above > env.high_pressure_above;
        if !decreasing {
            return invalid("environment thresholds must be strictly decreasing");
        }

        Ok(())
    }
}

fn invalid(message: &str) -> Result<()> {
    Err(AnalyticsError::InvalidConfig(message.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AnalyticsConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.trend.weights.len(), 5);
        assert_eq!(config.finance.leaderboard_size, 8);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: AnalyticsConfig = toml::from_str(
            r#"
            [behavior]
            max_window = 5

            [trend]
            smoothing = 0.5
            "#,
        )
        .unwrap();

        assert_eq!(config.behavior.max_window, 5);
        assert_eq!(config.behavior.epsilon, 1e-6);
        assert_eq!(config.trend.smoothing, 0.5);
        assert_eq!(config.trend.weights, vec![0.4, 0.3, 0.15, 0.1, 0.05]);
        assert_eq!(config.score, ScoreConfig::default());
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = AnalyticsConfig::default();
        config.trend.weights.clear();
        let rejected = config.validate();
        assert!(matches!(rejected, Err(AnalyticsError::InvalidConfig(_))));

        let mut config = AnalyticsConfig::default();
        config.environment.normal_above = 500;
        assert!(config.validate().is_err());

        let mut config = AnalyticsConfig::default();
        config.quality.failure.min = 4000.0;
        assert!(config.validate().is_err());

        let mut config = AnalyticsConfig::default();
        config.behavior.max_window = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("analytics.toml");

        let mut config = AnalyticsConfig::default();
        config.finance.leaderboard_size = 3;
        config.save_to_file(&path).unwrap();

        let loaded = AnalyticsConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[trend]\nsmoothing = 3.0\n").unwrap();

        assert!(matches!(
            AnalyticsConfig::load_from_file(&path),
            Err(AnalyticsError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_linear_clamp() {
        let mapping = QualityConfig::default().success;
        assert_eq!(mapping.apply(1682.0).round(), 1477.0);
        assert_eq!(mapping.apply(0.0), 1350.0);
        assert_eq!(mapping.apply(10_000.0), 2400.0);
    }
}
