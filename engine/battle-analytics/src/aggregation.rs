//! # Aggregate Reporters
//!
//! Order-independent summaries over a battle set: per-map statistics,
//! character usage and the character finance leaderboards.

use crate::battle::{Battle, GRADE_GOLD, GRADE_RED};
use crate::config::FinanceConfig;
use crate::numbers::{percentage, round_half_up, round_to_tenth, saturating_sum};
use game_registry::{MapDirectory, RoleDirectory};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Statistics over an arbitrary battle set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapStats {
    pub total_matches: usize,
    pub successful_evacuations: usize,
    pub total_profit_loss: i64,
    /// Grade-5 collection entries
    pub gold_items_found: usize,
    /// Grade-6 collection entries
    pub red_items_found: usize,
    /// Percent of matches extracted successfully
    pub evacuation_rate: f64,
    /// Gold entries per match, as a percentage
    pub gold_item_rate: f64,
    /// Red entries per match, as a percentage
    pub red_item_rate: f64,
}

/// Map statistics for one map group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapGroupStats {
    pub key: String,
    pub name: String,
    pub stats: MapStats,
}

/// How often one role was played
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterUsage {
    pub role_id: i64,
    pub name: String,
    pub count: usize,
    /// Share of battles with a role, one decimal
    pub percentage: f64,
}

/// One leaderboard row of the character finance report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinanceEntry {
    pub role_id: i64,
    pub name: String,
    /// Total profit, or total loss as a magnitude
    pub total: i64,
    /// `total` over the contributing battles, rounded
    pub average: i64,
    /// Battles that contributed to `total`
    pub battles: usize,
}

/// Profit and loss leaderboards per role
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CharacterFinance {
    pub profit_stats: Vec<FinanceEntry>,
    pub loss_stats: Vec<FinanceEntry>,
}

/// Headline numbers across every battle
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverallSummary {
    pub total_battles: usize,
    pub wins: usize,
    /// One decimal
    pub win_rate: f64,
    pub total_profit_loss: i64,
    /// Seconds, rounded, over battles with a non-zero game time
    pub average_game_time: i64,
    pub total_player_kills: i64,
}

#[derive(Debug, Default)]
struct FinanceAccumulator {
    profit: i64,
    profit_count: usize,
    loss: i64,
    loss_count: usize,
}

/// Aggregate reporter
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    finance: FinanceConfig,
    maps: MapDirectory,
}

impl Aggregator {
    /// Create a new aggregator
    pub fn new(finance: FinanceConfig) -> Self {
        Self {
            finance,
            maps: MapDirectory::new(),
        }
    }

    /// Statistics over the given battles, unfiltered
    pub fn map_stats<'a, I>(&self, battles: I) -> MapStats
    where
        I: IntoIterator<Item = &'a Battle>,
    {
        let mut stats = MapStats::default();

        for battle in battles {
            stats.total_matches += 1;
            if battle.is_success() {
                stats.successful_evacuations += 1;
            }
            stats.total_profit_loss = stats.total_profit_loss.saturating_add(battle.profit_loss());

            for item in &battle.collections {
                match item.grade {
                    GRADE_GOLD => stats.gold_items_found += 1,
                    GRADE_RED => stats.red_items_found += 1,
                    _ => {}
                }
            }
        }

        stats.evacuation_rate = percentage(stats.successful_evacuations, stats.total_matches);
        stats.gold_item_rate = percentage(stats.gold_items_found, stats.total_matches);
        stats.red_item_rate = percentage(stats.red_items_found, stats.total_matches);
        stats
    }

    /// Map statistics for every known map group, in directory order
    pub fn map_group_stats(&self, battles: &[Battle]) -> Vec<MapGroupStats> {
        self.maps
            .groups()
            .iter()
            .map(|group| {
                let members = battles
                    .iter()
                    .filter(|b| b.map_id.is_some_and(|id| group.contains(id)));
                MapGroupStats {
                    key: group.key.to_string(),
                    name: group.name.to_string(),
                    stats: self.map_stats(members),
                }
            })
            .collect()
    }

    /// Play count per role, most played first
    pub fn character_usage(
        &self,
        battles: &[Battle],
        roles: &RoleDirectory,
    ) -> Vec<CharacterUsage> {
        let mut counts: BTreeMap<i64, usize> = BTreeMap::new();
        for role_id in battles.iter().filter_map(|b| b.armed_force_id) {
            *counts.entry(role_id).or_default() += 1;
        }
        let total: usize = counts.values().sum();

        let mut usage: Vec<CharacterUsage> = counts
            .into_iter()
            .map(|(role_id, count)| CharacterUsage {
                role_id,
                name: roles.display_name(role_id),
                count,
                percentage: round_to_tenth(percentage(count, total)),
            })
            .collect();
        usage.sort_by(|a, b| b.count.cmp(&a.count));

        debug!(
            "Character usage: {} roles over {} battles",
            usage.len(),
            total
        );
        usage
    }

    /// Profit and loss leaderboards per role
    pub fn character_finance(
        &self,
        battles: &[Battle],
        roles: &RoleDirectory,
    ) -> CharacterFinance {
        let mut accumulators: BTreeMap<i64, FinanceAccumulator> = BTreeMap::new();

        for battle in battles {
            let Some(role_id) = battle.armed_force_id else {
                continue;
            };
            let entry = accumulators.entry(role_id).or_default();
            let profit_loss = battle.profit_loss();
            if profit_loss > 0 {
                entry.profit = entry.profit.saturating_add(profit_loss);
                entry.profit_count += 1;
            } else if profit_loss < 0 {
                entry.loss = entry.loss.saturating_add(profit_loss.saturating_abs());
                entry.loss_count += 1;
            }
        }

        let mut finance = CharacterFinance::default();
        for (role_id, acc) in &accumulators {
            if acc.profit > 0 {
                let entry = finance_entry(*role_id, roles, acc.profit, acc.profit_count);
                finance.profit_stats.push(entry);
            }
            if acc.loss > 0 {
                let entry = finance_entry(*role_id, roles, acc.loss, acc.loss_count);
                finance.loss_stats.push(entry);
            }
        }

        for stats in [&mut finance.profit_stats, &mut finance.loss_stats] {
            stats.sort_by(|a, b| b.total.cmp(&a.total));
            stats.truncate(self.finance.leaderboard_size);
        }

        debug!(
            "Character finance: {} profitable and {} losing roles",
            finance.profit_stats.len(),
            finance.loss_stats.len()
        );
        finance
    }

    /// Headline numbers across every battle
    pub fn overall_summary(&self, battles: &[Battle]) -> OverallSummary {
        let wins = battles.iter().filter(|b| b.is_success()).count();
        let timed: Vec<i64> = battles
            .iter()
            .map(Battle::game_time)
            .filter(|t| *t != 0)
            .collect();
        let average_game_time = if timed.is_empty() {
            0
        } else {
            let total = saturating_sum(timed.iter().copied());
            round_half_up(total as f64 / timed.len() as f64)
        };
        let player_kills = battles.iter().map(|b| b.kill_player.unwrap_or(0));

        OverallSummary {
            total_battles: battles.len(),
            wins,
            win_rate: round_to_tenth(percentage(wins, battles.len())),
            total_profit_loss: saturating_sum(battles.iter().map(Battle::profit_loss)),
            average_game_time,
            total_player_kills: saturating_sum(player_kills),
        }
    }
}

fn finance_entry(
    role_id: i64,
    roles: &RoleDirectory,
    total: i64,
    battles: usize,
) -> FinanceEntry {
    let average = if battles == 0 {
        0
    } else {
        round_half_up(total as f64 / battles as f64)
    };

    FinanceEntry {
        role_id,
        name: roles.display_name(role_id),
        total,
        average,
        battles,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::{CollectionItem, GameResult};
    use game_registry::RoleEntry;

    fn battle(role: Option<i64>, result: GameResult, profit: i64) -> Battle {
        Battle {
            armed_force_id: role,
            game_result: Some(result),
            profit_loss: Some(profit),
            ..Default::default()
        }
    }

    fn on_map(map_id: i64, result: GameResult, profit: i64) -> Battle {
        Battle {
            map_id: Some(map_id),
            ..battle(None, result, profit)
        }
    }

    fn item(grade: i64) -> CollectionItem {
        CollectionItem {
            name: Some("item".to_string()),
            grade,
            price: 1000,
            quantity: Some(3),
        }
    }

    fn roles() -> RoleDirectory {
        RoleDirectory::from_entries(vec![
            RoleEntry::new(10007, "Vyron"),
            RoleEntry::new(10010, "Hackclaw"),
        ])
    }

    #[test]
    fn test_empty_map_stats_are_zero() {
        let stats = Aggregator::default().map_stats(&[] as &[Battle]);
        assert_eq!(stats, MapStats::default());
        assert_eq!(stats.evacuation_rate, 0.0);
        assert_eq!(stats.gold_item_rate, 0.0);
    }

    #[test]
    fn test_map_stats_counts_entries() {
        let battles = vec![
            Battle {
                collections: vec![item(5), item(6), item(6), item(4)],
                ..battle(None, GameResult::Success, 5000)
            },
            Battle {
                equipment_price: Some(0),
                ..battle(None, GameResult::Failure, -2000)
            },
        ];

        let stats = Aggregator::default().map_stats(&battles);
        assert_eq!(stats.total_matches, 2);
        assert_eq!(stats.successful_evacuations, 1);
        assert_eq!(stats.total_profit_loss, 3000);
        assert_eq!(stats.gold_items_found, 1);
        assert_eq!(stats.red_items_found, 2);
        assert_eq!(stats.evacuation_rate, 50.0);
        assert_eq!(stats.gold_item_rate, 50.0);
        assert_eq!(stats.red_item_rate, 100.0);
    }

    #[test]
    fn test_map_group_stats() {
        let battles = vec![
            on_map(2212, GameResult::Success, 100),
            on_map(2201, GameResult::Failure, -50),
            on_map(8803, GameResult::Success, 10),
            on_map(4242, GameResult::Success, 10),
            battle(None, GameResult::Success, 10),
        ];

        let groups = Aggregator::default().map_group_stats(&battles);
        let keys: Vec<&str> = groups.iter().map(|g| g.key.as_str()).collect();
        let expected = vec![
            "bakeshi",
            "zero-dam",
            "longbow-valley",
            "space-city",
            "tide-prison",
        ];
        assert_eq!(keys, expected);

        assert_eq!(groups[0].stats.total_matches, 0);
        assert_eq!(groups[1].stats.total_matches, 2);
        assert_eq!(groups[1].stats.total_profit_loss, 50);
        assert_eq!(groups[4].stats.total_matches, 1);
    }

    #[test]
    fn test_character_usage() {
        let battles = vec![
            battle(Some(10010), GameResult::Success, 0),
            battle(Some(10007), GameResult::Success, 0),
            battle(Some(10010), GameResult::Failure, 0),
            battle(Some(99), GameResult::Failure, 0),
            battle(None, GameResult::Failure, 0),
            battle(Some(10007), GameResult::Failure, 0),
            battle(Some(10007), GameResult::Failure, 0),
        ];

        let usage = Aggregator::default().character_usage(&battles, &roles());
        let names: Vec<&str> = usage.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, vec!["Vyron", "Hackclaw", "Unknown role (99)"]);
        assert_eq!(usage[0].count, 3);
        assert_eq!(usage[0].percentage, 50.0);
        assert_eq!(usage[1].percentage, 33.3);
        assert_eq!(usage[2].percentage, 16.7);

        let total: f64 = usage.iter().map(|u| u.percentage).sum();
        assert!((total - 100.0).abs() < 0.5);
    }

    #[test]
    fn test_character_usage_ties_by_id() {
        let battles = vec![
            battle(Some(30), GameResult::Success, 0),
            battle(Some(20), GameResult::Success, 0),
        ];
        let usage = Aggregator::default().character_usage(&battles, &RoleDirectory::new());
        let ids: Vec<i64> = usage.iter().map(|u| u.role_id).collect();
        assert_eq!(ids, vec![20, 30]);
    }

    #[test]
    fn test_character_finance() {
        let battles = vec![
            battle(Some(10007), GameResult::Success, 100_000),
            battle(Some(10007), GameResult::Success, 51_001),
            battle(Some(10007), GameResult::Failure, -30_000),
            battle(Some(10007), GameResult::Failure, 0),
            battle(Some(10010), GameResult::Failure, -90_000),
            battle(None, GameResult::Success, 1_000_000),
        ];

        let finance = Aggregator::default().character_finance(&battles, &roles());

        assert_eq!(finance.profit_stats.len(), 1);
        let profit = &finance.profit_stats[0];
        assert_eq!(profit.name, "Vyron");
        assert_eq!(profit.total, 151_001);
        assert_eq!(profit.average, 75_501);
        assert_eq!(profit.battles, 2);

        let losses: Vec<(i64, i64)> = finance
            .loss_stats
            .iter()
            .map(|e| (e.role_id, e.total))
            .collect();
        assert_eq!(losses, vec![(10010, 90_000), (10007, 30_000)]);
    }

    #[test]
    fn test_finance_leaderboard_is_truncated() {
        let battles: Vec<Battle> = (1..=12)
            .map(|id| battle(Some(id), GameResult::Success, id * 100))
            .collect();

        let aggregator = Aggregator::new(FinanceConfig {
            leaderboard_size: 8,
        });
        let finance = aggregator.character_finance(&battles, &RoleDirectory::new());
        assert_eq!(finance.profit_stats.len(), 8);
        assert_eq!(finance.profit_stats[0].role_id, 12);
        assert_eq!(finance.profit_stats[7].role_id, 5);
        assert!(finance.loss_stats.is_empty());
    }

    #[test]
    fn test_overall_summary() {
        let battles = vec![
            Battle {
                game_time: Some(601),
                kill_player: Some(2),
                ..battle(None, GameResult::Success, 20_000)
            },
            Battle {
                game_time: Some(0),
                kill_player: Some(1),
                ..battle(None, GameResult::Failure, -5_000)
            },
            Battle {
                game_time: Some(900),
                ..battle(None, GameResult::Success, 0)
            },
        ];

        let summary = Aggregator::default().overall_summary(&battles);
        assert_eq!(summary.total_battles, 3);
        assert_eq!(summary.wins, 2);
        assert_eq!(summary.win_rate, 66.7);
        assert_eq!(summary.total_profit_loss, 15_000);
        assert_eq!(summary.average_game_time, 751);
        assert_eq!(summary.total_player_kills, 3);

        let empty = Aggregator::default().overall_summary(&[]);
        assert_eq!(empty, OverallSummary::default());
    }

    #[test]
    fn test_extreme_profits_saturate() {
        let battles = vec![
            battle(Some(10007), GameResult::Success, i64::MAX),
            battle(Some(10007), GameResult::Success, i64::MAX),
            battle(Some(10010), GameResult::Failure, i64::MIN),
            battle(Some(10010), GameResult::Failure, -1),
        ];
        let aggregator = Aggregator::default();

        let stats = aggregator.map_stats(&battles[..2]);
        assert_eq!(stats.total_profit_loss, i64::MAX);

        let finance = aggregator.character_finance(&battles, &roles());
        assert_eq!(finance.profit_stats[0].total, i64::MAX);
        assert_eq!(finance.loss_stats[0].total, i64::MAX);
        assert_eq!(finance.loss_stats[0].battles, 2);

        let summary = aggregator.overall_summary(&battles[2..]);
        assert_eq!(summary.total_profit_loss, i64::MIN);
    }
}
