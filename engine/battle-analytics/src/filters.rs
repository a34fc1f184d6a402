//! # Battle Filters
//!
//! Narrow a battle list by outcome, map, recency and keyword before it is
//! handed to the engines, and order it for listing and export.

use crate::battle::{Battle, GameResult};
use chrono::{Duration, NaiveDateTime};
use clap::ValueEnum;
use game_registry::MapDirectory;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Outcome filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ResultFilter {
    Success,
    Failure,
}

impl ResultFilter {
    fn accepts(self, battle: &Battle) -> bool {
        match self {
            ResultFilter::Success => battle.game_result == Some(GameResult::Success),
            ResultFilter::Failure => battle.game_result == Some(GameResult::Failure),
        }
    }
}

/// Recency window measured back from a reference time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum DateRange {
    #[default]
    All,
    Day,
    Week,
    Month,
    ThreeMonths,
    HalfYear,
}

impl DateRange {
    /// Length of the window in days; `None` for [`DateRange::All`]
    pub fn days(self) -> Option<i64> {
        match self {
            DateRange::All => None,
            DateRange::Day => Some(1),
            DateRange::Week => Some(7),
            DateRange::Month => Some(30),
            DateRange::ThreeMonths => Some(90),
            DateRange::HalfYear => Some(180),
        }
    }

    /// Earliest accepted timestamp for the given reference time
    pub fn cutoff(self, now: NaiveDateTime) -> Option<NaiveDateTime> {
        self.days().map(|days| {
            let cutoff = now.checked_sub_signed(Duration::days(days));
            cutoff.unwrap_or(NaiveDateTime::MIN)
        })
    }
}

/// Combined battle filter; every criterion left unset accepts everything
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BattleFilter {
    pub result: Option<ResultFilter>,
    pub map_id: Option<i64>,
    pub range: DateRange,
    /// Case-insensitive substring of the map display name or room id
    pub keyword: Option<String>,
}

impl BattleFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_result(mut self, result: ResultFilter) -> Self {
        self.result = Some(result);
        self
    }

    pub fn with_map(mut self, map_id: i64) -> Self {
        self.map_id = Some(map_id);
        self
    }

    pub fn with_range(mut self, range: DateRange) -> Self {
        self.range = range;
        self
    }

    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    /// Whether no criterion is set
    pub fn is_empty(&self) -> bool {
        self.result.is_none()
            && self.map_id.is_none()
            && self.range == DateRange::All
            && self.normalized_keyword().is_none()
    }

    fn normalized_keyword(&self) -> Option<String> {
        self.keyword
            .as_deref()
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
    }

    /// Battles passing every criterion, in input order
    ///
    /// A date range other than `All` drops undated battles.
    pub fn apply(&self, battles: &[Battle], now: NaiveDateTime) -> Vec<Battle> {
        let cutoff = self.range.cutoff(now);
        let keyword = self.normalized_keyword();
        let maps = MapDirectory::new();

        battles
            .iter()
            .filter(|b| self.result.map_or(true, |r| r.accepts(b)))
            .filter(|b| self.map_id.map_or(true, |id| b.map_id == Some(id)))
            .filter(|b| {
                cutoff.map_or(true, |cutoff| b.event_time.is_some_and(|t| t >= cutoff))
            })
            .filter(|b| {
                keyword.as_deref().map_or(true, |keyword| {
                    let contains = |text: &str| text.to_lowercase().contains(keyword);
                    let map_match = b.map_id.is_some_and(|id| contains(&maps.display_name(id)));
                    let room_match = b.room_id.as_deref().is_some_and(contains);
                    map_match || room_match
                })
            })
            .cloned()
            .collect()
    }
}

/// Battle field to order a listing by
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    /// `dtEventTime`
    #[default]
    Time,
    /// `gameTime`
    GameTime,
    /// `ProfitLoss`
    ProfitLoss,
    /// `killPlayer`
    Kills,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    fn arrange(self, ordering: Ordering) -> Ordering {
        match self {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

/// Listing order; newest first by default
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BattleSort {
    pub field: SortField,
    pub order: SortOrder,
}

impl BattleSort {
    pub fn new(field: SortField, order: SortOrder) -> Self {
        Self { field, order }
    }

    /// Sorted copy of the battles
    ///
    /// Stable in both directions. Missing counters sort as 0 and undated
    /// battles go last whatever the order.
    pub fn apply(&self, battles: &[Battle]) -> Vec<Battle> {
        let mut sorted = battles.to_vec();
        let count: fn(&Battle) -> i64 = match self.field {
            SortField::Time => {
                sorted.sort_by(|a, b| match (a.event_time, b.event_time) {
                    (Some(a), Some(b)) => self.order.arrange(a.cmp(&b)),
                    (Some(_), None) => Ordering::Less,
                    (None, Some(_)) => Ordering::Greater,
                    (None, None) => Ordering::Equal,
                });
                return sorted;
            }
            SortField::GameTime => Battle::game_time,
            SortField::ProfitLoss => Battle::profit_loss,
            SortField::Kills => |b| b.kill_player.unwrap_or(0),
        };
        sorted.sort_by(|a, b| self.order.arrange(count(a).cmp(&count(b))));
        sorted
    }
}
