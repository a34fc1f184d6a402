use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A playable role (operator) as shown to the player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleEntry {
    /// Numeric role id as reported in `armedForceId`
    pub id: i64,

    /// Display name (e.g., "Vyron")
    pub name: String,
}

impl RoleEntry {
    /// Create a new role entry
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Placeholder label used when a role id is not in the directory
    pub fn placeholder_name(id: i64) -> String {
        format!("Unknown role ({id})")
    }
}

/// A map with all of its mode variants
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MapGroup {
    /// Stable key (e.g., "zero-dam")
    pub key: &'static str,

    /// Display name of the map
    pub name: &'static str,

    /// Every `mapId` that belongs to this map
    pub ids: &'static [i64],
}

impl MapGroup {
    /// Check whether a map id belongs to this group
    pub fn contains(&self, map_id: i64) -> bool {
        self.ids.contains(&map_id)
    }
}

/// Errors that can occur while loading a directory
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid directory JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid role id key: {0}")]
    InvalidRoleId(String),
}
