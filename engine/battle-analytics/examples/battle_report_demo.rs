//! # Battle Report Demo
//!
//! Builds a synthetic season of battles and prints the headline reports.

use battle_analytics::{parse_battles, AnalyticsConfig, BattleAnalytics, RoleDirectory};
use serde_json::json;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    println!("🚀 Starting Battle Analytics Demo");

    let roles = r#"{"10007": "Vyron", "10010": "Hackclaw", "10011": "Stinger"}"#;
    let roles = RoleDirectory::from_json_str(roles)?;
    let config = AnalyticsConfig::default();
    let analytics = BattleAnalytics::new(config)?.with_roles(roles);

    let battles = parse_battles(&generate_sample_battles().to_string())?;
    println!("📊 Generated {} sample battles", battles.len());

    let report = analytics.full_report(&battles);

    println!("\n🎯 Quality trend: {:?}", report.quality.trend);
    println!("⚡ Performance trend: {:?}", report.performance.trend);
    println!(
        "🌡️ Environment: {} (difference {})",
        report.environment.level, report.environment.difference
    );
    println!(
        "💰 Win rate {:.1}%, total profit/loss {}",
        report.summary.win_rate, report.summary.total_profit_loss
    );
    for usage in &report.character_usage {
        println!(
            "🧑 {:<10} {:>3} battles ({:.1}%)",
            usage.name, usage.count, usage.percentage
        );
    }
    for change in &report.behavior.effectiveness_changes {
        let window = change.index + 1;
        let percent = change.change_rate * 100.0;
        println!(
            "⚠️  Effectiveness shift in window {}: {:+.1}%",
            window, percent
        );
    }

    println!("\n✅ Demo completed successfully!");
    Ok(())
}

fn generate_sample_battles() -> serde_json::Value {
    let roles = [10007, 10010, 10011];
    let maps = [2201, 2212, 8101, 1901, 3901];

    let battles: Vec<serde_json::Value> = (0..24i64)
        .map(|i| {
            let success = i % 3 != 0;
            let kills = if i >= 16 { 4 + i % 3 } else { i % 2 };
            let profit_loss = if success { 40_000 + i * 5_000 } else { -(120_000 + i * 2_000) };
            let collections = if i % 4 == 0 {
                json!([{"name": "Server Blade", "grade": 5, "price": 150_000}])
            } else {
                json!([])
            };
            json!({
                "dtEventTime": format!("2025-03-{:02} {:02}:15:00", 1 + i / 2, 18 + i % 2 * 3),
                "startTime": 1_740_823_200 + i * 43_200,
                "gameResult": i64::from(!success),
                "isLeave": 0,
                "gameTime": 420 + i * 25,
                "killPlayer": kills,
                "killAi": 3 + i % 5,
                "doubleKill": i64::from(kills >= 4),
                "tripleKill": 0,
                "quadKill": 0,
                "pentaKill": 0,
                "ProfitLoss": profit_loss,
                "originalEquipmentPriceWithoutKeyChain": 150_000 + i * 10_000,
                "armedForceId": roles[(i % 3) as usize],
                "mapId": maps[(i % 5) as usize],
                "roomId": format!("{}", 880_000 + i),
                "collections": collections
            })
        })
        .collect();

    json!({ "sols": battles })
}
