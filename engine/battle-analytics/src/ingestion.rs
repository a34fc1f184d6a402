//! # Battle Ingestion
//!
//! Turns a raw battle-list document into [`Battle`] records. Accepts a bare
//! JSON array or an object wrapping the array under `sols` or `battles`.
//! Malformed elements are skipped, never fatal.

use crate::battle::Battle;
use crate::error::{AnalyticsError, Result};
use serde_json::Value;
use std::path::Path;
use tracing::{info, warn};

/// Keys under which a wrapped battle list may appear
const LIST_KEYS: &[&str] = &["sols", "battles"];

/// Largest tolerated gap between `startTime` and `dtEventTime`, in seconds
const MAX_CLOCK_SKEW_SECS: i64 = 24 * 60 * 60;

/// Parse a battle-list document
pub fn parse_battles(json: &str) -> Result<Vec<Battle>> {
    let document: Value = serde_json::from_str(json)?;
    battles_from_value(document)
}

/// Extract battles from an already parsed document
pub fn battles_from_value(document: Value) -> Result<Vec<Battle>> {
    let elements = match document {
        Value::Array(elements) => elements,
        Value::Object(mut map) => LIST_KEYS
            .iter()
            .find_map(|key| match map.remove(*key) {
                Some(Value::Array(elements)) => Some(elements),
                _ => None,
            })
            .ok_or_else(|| {
                let message = format!("object without a list under {:?}", LIST_KEYS);
                AnalyticsError::NotABattleList(message)
            })?,
        other => {
            let message = format!("found {}", kind(&other));
            return Err(AnalyticsError::NotABattleList(message));
        }
    };

    let total = elements.len();
    let mut battles = Vec::with_capacity(total);
    for (index, element) in elements.into_iter().enumerate() {
        if !element.is_object() {
            warn!(
                "Skipping battle #{}: expected an object, found {}",
                index,
                kind(&element)
            );
            continue;
        }
        match serde_json::from_value::<Battle>(element) {
            Ok(battle) => {
                check_clock_skew(index, &battle);
                battles.push(battle);
            }
            Err(e) => warn!("Skipping battle #{}: {}", index, e),
        }
    }

    info!("Ingested {} of {} battle records", battles.len(), total);
    Ok(battles)
}

/// Read and parse a battle-list file
pub async fn load_battles<P: AsRef<Path>>(path: P) -> Result<Vec<Battle>> {
    info!("Loading battles from: {:?}", path.as_ref());
    let content = tokio::fs::read_to_string(path).await?;
    parse_battles(&content)
}

/// `startTime` and `dtEventTime` are separate clocks; a large disagreement is reported, not repaired
fn check_clock_skew(index: usize, battle: &Battle) {
    if let (Some(start), Some(event)) = (battle.start_time, battle.event_time) {
        let skew = event
            .and_utc()
            .timestamp()
            .saturating_sub(start)
            .saturating_abs();
        if skew > MAX_CLOCK_SKEW_SECS {
            warn!(
                "Battle #{}: startTime and dtEventTime disagree by {}s",
                index, skew
            );
        }
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_array() {
        let json = r#"[{"gameResult": 0, "killPlayer": "2"}, 42, null, {"gameResult": "1"}]"#;
        let battles = parse_battles(json).unwrap();
        assert_eq!(battles.len(), 2);
        assert!(battles[0].is_success());
        assert_eq!(battles[0].kill_player, Some(2));
        assert!(!battles[1].is_success());
    }

    #[test]
    fn test_wrapped_lists() {
        let sols = parse_battles(r#"{"sols": [{"mapId": 2212}], "total": 1}"#).unwrap();
        assert_eq!(sols[0].map_id, Some(2212));

        let battles = parse_battles(r#"{"battles": [{}, {}]}"#).unwrap();
        assert_eq!(battles.len(), 2);
    }

    #[test]
    fn test_not_a_list() {
        for input in [r#"{"data": []}"#, r#"{"sols": "nope"}"#, "17"] {
            let result = parse_battles(input);
            assert!(matches!(result, Err(AnalyticsError::NotABattleList(_))));
        }
        let result = parse_battles("{not json");
        assert!(matches!(result, Err(AnalyticsError::Json(_))));
    }

    #[test]
    fn test_empty_list() {
        assert!(parse_battles("[]").unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("battles.json");
        let json = r#"{"sols": [{"dtEventTime": "2025-03-04 21:07:00", "gameResult": 0}]}"#;
        tokio::fs::write(&path, json).await.unwrap();

        let battles = load_battles(&path).await.unwrap();
        assert_eq!(battles.len(), 1);
        assert!(battles[0].is_scoreable());

        let missing = load_battles(dir.path().join("missing.json")).await;
        assert!(matches!(missing, Err(AnalyticsError::Io(_))));
    }
}
