//! End-to-end tests: JSON in, reports out.

use battle_analytics::{
    parse_timestamp, AnalyticsConfig, BattleAnalytics, BattleFilter, DateRange, EnvironmentLevel,
    ResultFilter, RoleDirectory,
};

const SOLS: &str = r#"{
    "sols": [
        {
            "dtEventTime": "2025-03-04 21:07:00",
            "startTime": "1741093620",
            "gameResult": "0",
            "isLeave": 0,
            "gameTime": 600,
            "killPlayer": 2,
            "killAi": 5,
            "doubleKill": 0, "tripleKill": 0, "quadKill": 0, "pentaKill": 0,
            "ProfitLoss": 20000,
            "originalEquipmentPriceWithoutKeyChain": 100000,
            "armedForceId": 10007,
            "mapId": 2212,
            "roomId": "5550001",
            "collections": [{"name": "Gold Watch", "grade": 5, "price": 80000, "quantity": 2}]
        },
        {
            "dtEventTime": "2025-03-05 20:00:00",
            "startTime": 1741176000,
            "gameResult": 1,
            "isLeave": 0,
            "gameTime": 300,
            "killPlayer": 0,
            "killAi": 1,
            "doubleKill": 0, "tripleKill": 0, "quadKill": 0, "pentaKill": 0,
            "ProfitLoss": -40000,
            "originalEquipmentPriceWithoutKeyChain": 0,
            "armedForceId": 10010,
            "mapId": 8803,
            "roomId": "5550002"
        },
        {
            "dtEventTime": "2025-03-05 22:00:00",
            "gameResult": 1,
            "isLeave": 1,
            "ProfitLoss": "-90000",
            "originalEquipmentPriceWithoutKeyChain": "200000",
            "armedForceId": 10010
        },
        "garbage",
        {"gameResult": 0}
    ]
}"#;

fn analytics() -> BattleAnalytics {
    let roles = r#"{"10007": "Vyron", "10010": "Hackclaw"}"#;
    let roles = RoleDirectory::from_json_str(roles).unwrap();
    let analytics = BattleAnalytics::new(AnalyticsConfig::default()).unwrap();
    analytics.with_roles(roles)
}

#[test]
fn test_full_report_from_json() {
    let battles = battle_analytics::parse_battles(SOLS).unwrap();
    assert_eq!(battles.len(), 4);

    let report = analytics().full_report(&battles);

    // the early leave and the undated battle are not scored
    assert_eq!(report.quality.scores, vec![1519, 2054]);
    assert_eq!(report.performance.scores, vec![1742, 1456]);
    assert_eq!(report.quality.labels, ["3/4 21:07", "3/5 20:00"]);

    // zero equipment excluded; the early leave still has a profit record
    let profitability = &report.profitability;
    assert_eq!(profitability.final_asset_values, vec![120_000, 110_000]);
    assert_eq!(profitability.profit_rates, vec![20.0, -45.0]);

    // two battles carry every behavior field
    assert_eq!(report.behavior.labels, ["Window 1"]);

    assert_eq!(report.map_stats.total_matches, 4);
    assert_eq!(report.map_stats.gold_items_found, 1);
    assert_eq!(report.summary.wins, 2);

    let usage: Vec<(&str, usize)> = report
        .character_usage
        .iter()
        .map(|u| (u.name.as_str(), u.count))
        .collect();
    assert_eq!(usage, vec![("Hackclaw", 2), ("Vyron", 1)]);

    assert_eq!(report.character_finance.loss_stats[0].name, "Hackclaw");
    assert_eq!(report.character_finance.loss_stats[0].total, 130_000);
    assert_eq!(report.character_finance.loss_stats[0].average, 65_000);

    assert_eq!(report.harvest.gold_item_count, 2);
    assert_eq!(report.harvest.total_earnings, 160_000);

    assert_eq!(report.environment.level, EnvironmentLevel::HighPressure);
}

#[test]
fn test_trend_is_causal() {
    let battles = battle_analytics::parse_battles(SOLS).unwrap();
    let analytics = analytics();

    let first_only: Vec<_> = battles.iter().take(1).cloned().collect();
    let full = analytics.quality_trend(&battles);
    let prefix = analytics.quality_trend(&first_only);
    assert_eq!(full.trend[0], prefix.trend[0]);
}

#[test]
fn test_filtered_reports() {
    let battles = battle_analytics::parse_battles(SOLS).unwrap();
    let now = parse_timestamp("2025-03-05 23:00:00").unwrap();

    let losses = BattleFilter::new()
        .with_result(ResultFilter::Failure)
        .apply(&battles, now);
    assert_eq!(losses.len(), 2);

    let today = BattleFilter::new()
        .with_range(DateRange::Day)
        .apply(&battles, now);
    assert_eq!(today.len(), 2);

    let tide = BattleFilter::new()
        .with_keyword("tide prison")
        .apply(&battles, now);
    let summary = analytics().summary(&tide);
    assert_eq!(summary.total_battles, 1);
    assert_eq!(summary.total_profit_loss, -40_000);
}

#[test]
fn test_absurd_counters_do_not_overflow() {
    let battles = battle_analytics::parse_battles(
        r#"[
            {"dtEventTime": "2025-03-04 21:07:00", "gameResult": 0, "gameTime": 600, "pentaKill": 1e300},
            {"dtEventTime": "2025-03-04 22:07:00", "gameResult": 1, "ProfitLoss": "9223372036854775807",
             "originalEquipmentPriceWithoutKeyChain": "9223372036854775807", "armedForceId": 10010},
            {"dtEventTime": "2025-03-04 23:07:00", "gameResult": 0, "ProfitLoss": "9223372036854775807",
             "originalEquipmentPriceWithoutKeyChain": 100000, "armedForceId": 10010}
        ]"#,
    )
    .unwrap();

    let report = analytics().full_report(&battles);

    // the success mapping clamps the pinned base score
    assert_eq!(report.quality.scores[0], 2400);
    assert_eq!(report.performance.scores[0], i64::MAX);

    assert_eq!(report.map_stats.total_profit_loss, i64::MAX);
    assert_eq!(report.summary.total_profit_loss, i64::MAX);
    let final_assets = &report.profitability.final_asset_values;
    assert_eq!(final_assets, &vec![i64::MAX, i64::MAX]);
    assert_eq!(report.character_finance.profit_stats[0].total, i64::MAX);
}

#[test]
fn test_garbage_role_id_is_not_bucketed() {
    let battles = battle_analytics::parse_battles(
        r#"[
            {"gameResult": 0, "ProfitLoss": 5000, "armedForceId": "abc"},
            {"gameResult": 1, "ProfitLoss": -5000, "armedForceId": "10007"}
        ]"#,
    )
    .unwrap();
    let analytics = analytics();

    let usage = analytics.character_usage(&battles);
    assert_eq!(usage.len(), 1);
    assert_eq!(usage[0].name, "Vyron");
    assert_eq!(usage[0].percentage, 100.0);

    let finance = analytics.character_finance(&battles);
    assert!(finance.profit_stats.is_empty());
    assert_eq!(finance.loss_stats[0].role_id, 10007);
}
