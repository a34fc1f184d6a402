//! # Harvest Summary
//!
//! Items extracted during the last week of play, merged by name.

use crate::battle::{Battle, GRADE_GOLD, GRADE_RED};
use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::HashMap;
use tracing::debug;

/// Days before the latest battle that still count towards the harvest
pub const HARVEST_WINDOW_DAYS: i64 = 7;

/// One merged item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HarvestItem {
    pub name: Option<String>,
    /// Highest grade seen under this name
    pub grade: i64,
    /// Unit price of the most recent sighting
    pub price: i64,
    pub quantity: i64,
    /// Time of the most recent battle that yielded the item
    pub last_seen: Option<NaiveDateTime>,
}

/// Harvest over the recent window
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HarvestSummary {
    /// Grade descending, then price descending
    pub items: Vec<HarvestItem>,
    /// Σ price × quantity
    pub total_earnings: i64,
    pub red_item_count: i64,
    pub gold_item_count: i64,
    pub battles_considered: usize,
    pub window_start: Option<NaiveDateTime>,
    pub latest_battle: Option<NaiveDateTime>,
}

/// Summarize the collections of the battles within a week of the latest dated battle
pub fn harvest_summary(battles: &[Battle]) -> HarvestSummary {
    let mut recent: Vec<(&Battle, NaiveDateTime)> = battles
        .iter()
        .filter_map(|b| b.event_time.map(|t| (b, t)))
        .collect();
    recent.sort_by_key(|(_, t)| Reverse(*t));

    let Some(&(_, latest)) = recent.first() else {
        return HarvestSummary::default();
    };
    let window_start = latest
        .checked_sub_signed(Duration::days(HARVEST_WINDOW_DAYS))
        .unwrap_or(NaiveDateTime::MIN);
    recent.retain(|(_, t)| *t >= window_start);

    let mut items: Vec<HarvestItem> = Vec::new();
    let mut index_by_name: HashMap<Option<String>, usize> = HashMap::new();

    for (battle, time) in &recent {
        for item in &battle.collections {
            let quantity = item.effective_quantity();
            match index_by_name.get(&item.name) {
                Some(&index) => {
                    let merged = &mut items[index];
                    merged.quantity = merged.quantity.saturating_add(quantity);
                    merged.grade = merged.grade.max(item.grade);
                }
                None => {
                    index_by_name.insert(item.name.clone(), items.len());
                    items.push(HarvestItem {
                        name: item.name.clone(),
                        grade: item.grade,
                        price: item.price,
                        quantity,
                        last_seen: Some(*time),
                    });
                }
            }
        }
    }

    items.sort_by_key(|item| Reverse((item.grade, item.price)));

    let mut summary = HarvestSummary {
        battles_considered: recent.len(),
        window_start: Some(window_start),
        latest_battle: Some(latest),
        ..Default::default()
    };
    for item in &items {
        let earnings = item.price.saturating_mul(item.quantity);
        summary.total_earnings = summary.total_earnings.saturating_add(earnings);
        let count = match item.grade {
            GRADE_RED => &mut summary.red_item_count,
            GRADE_GOLD => &mut summary.gold_item_count,
            _ => continue,
        };
        *count = count.saturating_add(item.quantity);
    }
    summary.items = items;

    debug!(
        "Harvest over {} battles: {} distinct items, earnings {}",
        summary.battles_considered,
        summary.items.len(),
        summary.total_earnings
    );

    summary
}
