//! Error types for the ambient layers (configuration, ingestion and export).
//!
//! Engine operations themselves are total and never return these.

use thiserror::Error;

/// Result type for configuration and ingestion operations
pub type Result<T> = std::result::Result<T, AnalyticsError>;

/// Errors raised while loading configuration or battle data
#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Configuration serialization error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Battle data is not a list: {0}")]
    NotABattleList(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Registry error: {0}")]
    Registry(#[from] game_registry::RegistryError),
}
