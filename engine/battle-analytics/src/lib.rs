//! # Battle Analytics
//!
//! Scoring, trend and aggregate analytics over the battle records of an
//! extraction shooter.
//!
//! Every engine is a pure, total function of a battle slice: malformed or
//! incomplete records are coerced or filtered out, never rejected. File
//! access, configuration and the role directory are supplied from outside
//! through the [`ingestion`], [`config`] and `game_registry` layers.

pub mod aggregation;
pub mod battle;
pub mod behavior;
pub mod config;
pub mod environment;
pub mod error;
pub mod export;
pub mod filters;
pub mod harvest;
pub mod ingestion;
pub mod performance;
pub mod profitability;
pub mod quality;
pub mod report;
pub mod score;
pub mod trend;
pub mod cli;

mod lenient;
mod numbers;

// Re-export main types for easy usage
pub use aggregation::{Aggregator, CharacterFinance, CharacterUsage, MapStats, OverallSummary};
pub use battle::{Battle, CollectionItem, GameResult};
pub use behavior::{BehaviorDetector, BehaviorTrend};
pub use config::AnalyticsConfig;
pub use environment::{EnvironmentClassifier, EnvironmentLevel, EnvironmentReport};
pub use error::{AnalyticsError, Result};
pub use export::{ExportData, ExportRow};
pub use filters::{BattleFilter, BattleSort, DateRange, ResultFilter, SortField, SortOrder};
pub use harvest::HarvestSummary;
pub use ingestion::{load_battles, parse_battles};
pub use lenient::parse_timestamp;
pub use numbers::round_half_up;
pub use performance::PerformanceScoreEngine;
pub use profitability::{ProfitabilityEngine, ProfitabilityTrend};
pub use quality::QualityScoreEngine;
pub use report::{BattleAnalytics, FullReport};
pub use score::ScoreModel;
pub use trend::{ScoreTrend, TrendSmoother};

pub use game_registry::{MapDirectory, RoleDirectory};
