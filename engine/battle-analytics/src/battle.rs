//! # Battle Records
//!
//! The per-match telemetry record supplied by the ingestion layer. Wire names
//! follow the game's web API; every numeric field is decoded leniently.

use crate::lenient;
use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Collection grade of a gold-tier item
pub const GRADE_GOLD: i64 = 5;

/// Collection grade of a red-tier item
pub const GRADE_RED: i64 = 6;

/// Outcome of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameResult {
    /// Extraction succeeded (wire value 0)
    Success,
    /// Extraction failed (wire value 1, or anything other than 0)
    Failure,
}

impl GameResult {
    /// Wire value of the outcome
    pub fn code(self) -> i64 {
        match self {
            GameResult::Success => 0,
            GameResult::Failure => 1,
        }
    }
}

impl Serialize for GameResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.code())
    }
}

impl<'de> Deserialize<'de> for GameResult {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let result = lenient::game_result(deserializer)?;
        Ok(result.unwrap_or(GameResult::Failure))
    }
}

/// An item extracted during a match
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionItem {
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: Option<String>,

    /// 0..=6; 5 is gold-tier, 6 is red-tier
    #[serde(default, deserialize_with = "lenient::int_or_zero")]
    pub grade: i64,

    #[serde(default, deserialize_with = "lenient::int_or_zero")]
    pub price: i64,

    #[serde(default, deserialize_with = "lenient::int", alias = "num")]
    pub quantity: Option<i64>,
}

impl CollectionItem {
    /// Quantity with an absent or zero count treated as a single item
    pub fn effective_quantity(&self) -> i64 {
        match self.quantity {
            Some(q) if q != 0 => q,
            _ => 1,
        }
    }
}

/// One completed match
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Battle {
    /// Match timestamp; the ordering key of every trend
    #[serde(
        rename = "dtEventTime",
        alias = "eventTime",
        default,
        deserialize_with = "lenient::timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub event_time: Option<NaiveDateTime>,

    /// Epoch seconds; ordering key of the behavior detector only
    #[serde(
        rename = "startTime",
        default,
        deserialize_with = "lenient::int",
        skip_serializing_if = "Option::is_none"
    )]
    pub start_time: Option<i64>,

    #[serde(
        rename = "gameResult",
        default,
        deserialize_with = "lenient::game_result",
        skip_serializing_if = "Option::is_none"
    )]
    pub game_result: Option<GameResult>,

    #[serde(
        rename = "isLeave",
        default,
        deserialize_with = "lenient::int",
        skip_serializing_if = "Option::is_none"
    )]
    pub is_leave: Option<i64>,

    #[serde(
        rename = "killCnt",
        default,
        deserialize_with = "lenient::int",
        skip_serializing_if = "Option::is_none"
    )]
    pub kill_cnt: Option<i64>,

    #[serde(
        rename = "headShotCnt",
        default,
        deserialize_with = "lenient::int",
        skip_serializing_if = "Option::is_none"
    )]
    pub head_shot_cnt: Option<i64>,

    #[serde(
        rename = "killPlayer",
        default,
        deserialize_with = "lenient::int",
        skip_serializing_if = "Option::is_none"
    )]
    pub kill_player: Option<i64>,

    #[serde(
        rename = "killAi",
        default,
        deserialize_with = "lenient::int",
        skip_serializing_if = "Option::is_none"
    )]
    pub kill_ai: Option<i64>,

    #[serde(
        rename = "doubleKill",
        default,
        deserialize_with = "lenient::int",
        skip_serializing_if = "Option::is_none"
    )]
    pub double_kill: Option<i64>,

    #[serde(
        rename = "tripleKill",
        default,
        deserialize_with = "lenient::int",
        skip_serializing_if = "Option::is_none"
    )]
    pub triple_kill: Option<i64>,

    #[serde(
        rename = "quadKill",
        default,
        deserialize_with = "lenient::int",
        skip_serializing_if = "Option::is_none"
    )]
    pub quad_kill: Option<i64>,

    #[serde(
        rename = "pentaKill",
        default,
        deserialize_with = "lenient::int",
        skip_serializing_if = "Option::is_none"
    )]
    pub penta_kill: Option<i64>,

    #[serde(
        rename = "ProfitLoss",
        default,
        deserialize_with = "lenient::int",
        skip_serializing_if = "Option::is_none"
    )]
    pub profit_loss: Option<i64>,

    /// Value of the equipment brought into the match
    #[serde(
        rename = "originalEquipmentPriceWithoutKeyChain",
        default,
        deserialize_with = "lenient::int",
        skip_serializing_if = "Option::is_none"
    )]
    pub equipment_price: Option<i64>,

    #[serde(
        rename = "gainedPrice",
        default,
        deserialize_with = "lenient::int",
        skip_serializing_if = "Option::is_none"
    )]
    pub gained_price: Option<i64>,

    #[serde(
        rename = "collectionPrice",
        default,
        deserialize_with = "lenient::int",
        skip_serializing_if = "Option::is_none"
    )]
    pub collection_price: Option<i64>,

    /// Match duration in seconds
    #[serde(
        rename = "gameTime",
        default,
        deserialize_with = "lenient::int",
        skip_serializing_if = "Option::is_none"
    )]
    pub game_time: Option<i64>,

    /// Role played; a garbage id decodes as absent
    #[serde(
        rename = "armedForceId",
        default,
        deserialize_with = "lenient::id",
        skip_serializing_if = "Option::is_none"
    )]
    pub armed_force_id: Option<i64>,

    #[serde(
        rename = "mapId",
        default,
        deserialize_with = "lenient::id",
        skip_serializing_if = "Option::is_none"
    )]
    pub map_id: Option<i64>,

    #[serde(default, deserialize_with = "lenient::collections")]
    pub collections: Vec<CollectionItem>,

    #[serde(
        rename = "roomId",
        default,
        deserialize_with = "lenient::text",
        skip_serializing_if = "Option::is_none"
    )]
    pub room_id: Option<String>,
}

impl Battle {
    /// Whether extraction succeeded; an absent result counts as failure
    pub fn is_success(&self) -> bool {
        self.game_result == Some(GameResult::Success)
    }

    /// Whether the player left the match early
    pub fn left_early(&self) -> bool {
        self.is_leave == Some(1)
    }

    /// Timestamp present, result present, and not an early leave
    pub fn is_scoreable(&self) -> bool {
        self.event_time.is_some() && self.game_result.is_some() && !self.left_early()
    }

    pub fn profit_loss(&self) -> i64 {
        self.profit_loss.unwrap_or(0)
    }

    pub fn equipment_price(&self) -> i64 {
        self.equipment_price.unwrap_or(0)
    }

    pub fn game_time(&self) -> i64 {
        self.game_time.unwrap_or(0)
    }

    /// Chart label of the match time, e.g. "3/4 9:05"
    pub fn time_label(&self) -> String {
        self.event_time.map(|t| time_label(&t)).unwrap_or_default()
    }
}

/// Format a timestamp as "M/D H:MM"
pub fn time_label(time: &NaiveDateTime) -> String {
    format!(
        "{}/{} {}:{:02}",
        time.month(),
        time.day(),
        time.hour(),
        time.minute()
    )
}

/// Keep the battles matching `predicate` and order them by `key`, oldest first
///
/// The sort is stable, so battles sharing a key keep their input order.
pub(crate) fn sorted_by<'a, K, P, F>(battles: &'a [Battle], predicate: P, key: F) -> Vec<&'a Battle>
where
    K: Ord,
    P: Fn(&Battle) -> bool,
    F: Fn(&Battle) -> K,
{
    let mut selected: Vec<&Battle> = battles.iter().filter(|b| predicate(*b)).collect();
    selected.sort_by_key(|b| key(*b));
    selected
}
