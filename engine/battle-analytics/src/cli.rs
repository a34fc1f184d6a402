//! # Command Line Interface
//!
//! CLI for running the battle reports over an exported battle list.

use crate::battle::Battle;
use crate::config::AnalyticsConfig;
use crate::export::{ExportData, ExportRow};
use crate::filters::{BattleFilter, BattleSort, DateRange, ResultFilter, SortField, SortOrder};
use crate::ingestion::load_battles;
use crate::lenient::parse_timestamp;
use crate::report::BattleAnalytics;
use crate::trend::ScoreTrend;
use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};
use clap::{Args, Parser, Subcommand, ValueEnum};
use game_registry::RoleDirectory;
use serde::Serialize;
use std::fmt::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Battle analytics CLI
#[derive(Parser)]
#[command(name = "battle-analytics-cli")]
#[command(about = "Scores, trends and aggregates over exported battle records")]
pub struct Cli {
    /// Battle list: a JSON array, or an object with a `sols` or `battles` array
    #[arg(short, long)]
    pub battles: PathBuf,

    /// Role directory: a JSON object of role id to name
    #[arg(short, long)]
    pub roles: Option<PathBuf>,

    /// TOML configuration (falls back to $BATTLE_ANALYTICS_CONFIG, then defaults)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Emit logs as JSON
    #[arg(long)]
    pub json_logs: bool,

    #[command(flatten)]
    pub filter: FilterArgs,

    #[command(flatten)]
    pub sort: SortArgs,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Battle selection applied before any report
#[derive(Debug, Clone, Default, Args)]
pub struct FilterArgs {
    /// Keep only successful or failed extractions
    #[arg(long, value_enum)]
    pub result: Option<ResultFilter>,

    /// Keep only battles on this map id
    #[arg(long)]
    pub map: Option<i64>,

    /// Keep only recent battles
    #[arg(long, value_enum, default_value_t = DateRange::All)]
    pub range: DateRange,

    /// Case-insensitive match against the map name or room id
    #[arg(long)]
    pub search: Option<String>,

    /// Reference time for --range (defaults to the local clock)
    #[arg(long, value_parser = parse_reference_time)]
    pub now: Option<NaiveDateTime>,
}

impl FilterArgs {
    pub fn to_filter(&self) -> BattleFilter {
        BattleFilter {
            result: self.result,
            map_id: self.map,
            range: self.range,
            keyword: self.search.clone(),
        }
    }
}

/// Listing order for `list` and `export`
#[derive(Debug, Clone, Default, Args)]
pub struct SortArgs {
    /// Field to order battles by
    #[arg(long, value_enum, default_value_t = SortField::Time)]
    pub sort: SortField,

    /// Sort direction
    #[arg(long, value_enum, default_value_t = SortOrder::Desc)]
    pub order: SortOrder,
}

impl SortArgs {
    pub fn to_sort(&self) -> BattleSort {
        BattleSort::new(self.sort, self.order)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
}

fn parse_reference_time(raw: &str) -> std::result::Result<NaiveDateTime, String> {
    parse_timestamp(raw).ok_or_else(|| format!("unrecognized timestamp: {raw}"))
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Commands {
    /// Match quality scores and trend
    Quality,
    /// Player performance scores and trend
    Performance,
    /// Final asset value and profit rate per battle
    Profit,
    /// Windowed behavior indices and flagged changes
    Behavior,
    /// Statistics overall and per map group
    Maps,
    /// Role usage counts
    Characters,
    /// Profit and loss leaderboards per role
    Finance,
    /// Pressure level from the performance/quality gap
    Environment,
    /// Headline totals
    Summary,
    /// Items extracted during the last week
    Harvest,
    /// Every report
    All,
    /// The selected battles in listing order
    List,
    /// Summary and per-battle rows as CSV or JSON
    Export {
        /// Export format
        #[arg(long, value_enum, default_value_t = ExportFormat::Csv)]
        to: ExportFormat,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

impl Commands {
    /// File an export is written to, if any
    pub fn output_path(&self) -> Option<&Path> {
        match self {
            Commands::Export { output, .. } => output.as_deref(),
            _ => None,
        }
    }
}

/// CLI handler
pub struct CliHandler {
    analytics: BattleAnalytics,
    battles: Vec<Battle>,
    format: OutputFormat,
    sort: BattleSort,
    now: NaiveDateTime,
}

impl CliHandler {
    /// Load configuration, roles and battles named on the command line
    pub async fn new(cli: &Cli) -> Result<Self> {
        let config = match &cli.config {
            Some(path) => AnalyticsConfig::load_from_file(path)
                .with_context(|| format!("invalid configuration file {}", path.display()))?,
            None => AnalyticsConfig::from_env()?,
        };

        let roles = match &cli.roles {
            Some(path) => RoleDirectory::load_from_file(path)
                .await
                .with_context(|| format!("failed to load roles from {}", path.display()))?,
            None => RoleDirectory::new(),
        };

        let path = &cli.battles;
        let battles = load_battles(path)
            .await
            .with_context(|| format!("cannot load battles from {}", path.display()))?;

        let now = cli.filter.now.unwrap_or_else(|| Local::now().naive_local());
        let filter = cli.filter.to_filter();
        let battles = if filter.is_empty() {
            battles
        } else {
            let kept = filter.apply(&battles, now);
            info!("Filter kept {} of {} battles", kept.len(), battles.len());
            kept
        };

        let analytics = BattleAnalytics::new(config)?.with_roles(roles);
        let handler = Self::from_parts(analytics, battles, cli.format)
            .with_sort(cli.sort.to_sort())
            .with_now(now);
        Ok(handler)
    }

    /// Build a handler over already loaded battles
    pub fn from_parts(
        analytics: BattleAnalytics,
        battles: Vec<Battle>,
        format: OutputFormat,
    ) -> Self {
        Self {
            analytics,
            battles,
            format,
            sort: BattleSort::default(),
            now: Local::now().naive_local(),
        }
    }

    /// Listing order for `list` and `export`
    pub fn with_sort(mut self, sort: BattleSort) -> Self {
        self.sort = sort;
        self
    }

    /// Reference time stamped on exports
    pub fn with_now(mut self, now: NaiveDateTime) -> Self {
        self.now = now;
        self
    }

    /// Handle CLI commands
    pub async fn handle_command(&self, command: Commands) -> Result<()> {
        let rendered = self.render(&command)?;
        match command.output_path() {
            Some(path) => {
                tokio::fs::write(path, rendered)
                    .await
                    .with_context(|| format!("cannot write export to {}", path.display()))?;
                info!(
                    "Exported {} battles to {}",
                    self.battles.len(),
                    path.display()
                );
            }
            None => print!("{rendered}"),
        }
        Ok(())
    }

    /// Render a command's report in the configured format
    pub fn render(&self, command: &Commands) -> Result<String> {
        if let Commands::Export { to, .. } = command {
            return self.render_export(*to);
        }
        match self.format {
            OutputFormat::Json => self.render_json(command),
            OutputFormat::Text => self.render_text(command),
        }
    }

    fn listed(&self) -> Vec<Battle> {
        self.sort.apply(&self.battles)
    }

    fn render_export(&self, to: ExportFormat) -> Result<String> {
        let listed = self.listed();
        let data = ExportData::new(&listed, self.analytics.summary(&listed), self.now);
        match to {
            ExportFormat::Csv => Ok(data.to_csv()?),
            ExportFormat::Json => Ok(to_json(&data)? + "\n"),
        }
    }

    fn render_json(&self, command: &Commands) -> Result<String> {
        let a = &self.analytics;
        let b = &self.battles;
        let mut out = match command {
            Commands::Quality => to_json(&a.quality_trend(b))?,
            Commands::Performance => to_json(&a.performance_trend(b))?,
            Commands::Profit => to_json(&a.profitability_trend(b))?,
            Commands::Behavior => to_json(&a.behavior_trend(b))?,
            Commands::Maps => to_json(&serde_json::json!({
                "overall": a.map_stats(b),
                "groups": a.map_group_stats(b),
            }))?,
            Commands::Characters => to_json(&a.character_usage(b))?,
            Commands::Finance => to_json(&a.character_finance(b))?,
            Commands::Environment => to_json(&a.environment(b))?,
            Commands::Summary => to_json(&a.summary(b))?,
            Commands::Harvest => to_json(&a.harvest(b))?,
            Commands::All => to_json(&a.full_report(b))?,
            Commands::List => to_json(&self.listed())?,
            Commands::Export { to, .. } => return self.render_export(*to),
        };
        out.push('\n');
        Ok(out)
    }

    fn render_text(&self, command: &Commands) -> Result<String> {
        let mut out = String::new();
        match command {
            Commands::Quality => self.show_quality(&mut out)?,
            Commands::Performance => self.show_performance(&mut out)?,
            Commands::Profit => self.show_profit(&mut out)?,
            Commands::Behavior => self.show_behavior(&mut out)?,
            Commands::Maps => self.show_maps(&mut out)?,
            Commands::Characters => self.show_characters(&mut out)?,
            Commands::Finance => self.show_finance(&mut out)?,
            Commands::Environment => self.show_environment(&mut out)?,
            Commands::Summary => self.show_summary(&mut out)?,
            Commands::Harvest => self.show_harvest(&mut out)?,
            Commands::All => {
                self.show_summary(&mut out)?;
                self.show_quality(&mut out)?;
                self.show_performance(&mut out)?;
                self.show_environment(&mut out)?;
                self.show_profit(&mut out)?;
                self.show_behavior(&mut out)?;
                self.show_maps(&mut out)?;
                self.show_characters(&mut out)?;
                self.show_finance(&mut out)?;
                self.show_harvest(&mut out)?;
            }
            Commands::List => self.show_list(&mut out)?,
            Commands::Export { to, .. } => return self.render_export(*to),
        }
        Ok(out)
    }

    fn show_list(&self, out: &mut String) -> Result<()> {
        header(out, "📋 Battles")?;
        let listed = self.listed();
        if listed.is_empty() {
            return no_data(out);
        }
        let maps = game_registry::MapDirectory::new();
        for row in listed.iter().map(|b| ExportRow::from_battle(b, &maps)) {
            writeln!(
                out,
                "{:<19}  {:<28} {:<9} {:>5}s  kills {:>2}/{:<3} P/L {:>10}",
                row.time, row.map_name, row.result, row.game_time, row.kill_player, row.kill_ai,
                row.profit_loss
            )?;
        }
        Ok(())
    }

    fn show_summary(&self, out: &mut String) -> Result<()> {
        header(out, "📈 Battle Summary")?;
        let s = self.analytics.summary(&self.battles);
        writeln!(out, "Battles:           {}", s.total_battles)?;
        writeln!(out, "Extractions:       {} ({:.1}%)", s.wins, s.win_rate)?;
        writeln!(out, "Total profit/loss: {}", s.total_profit_loss)?;
        writeln!(out, "Avg game time:     {}s", s.average_game_time)?;
        writeln!(out, "Player kills:      {}", s.total_player_kills)?;
        Ok(())
    }

    fn show_quality(&self, out: &mut String) -> Result<()> {
        header(out, "🎯 Match Quality")?;
        let report = self.analytics.quality_trend(&self.battles);
        show_trend(out, &report)
    }

    fn show_performance(&self, out: &mut String) -> Result<()> {
        header(out, "⚡ Player Performance")?;
        let report = self.analytics.performance_trend(&self.battles);
        show_trend(out, &report)
    }

    fn show_environment(&self, out: &mut String) -> Result<()> {
        header(out, "🌡️ Environment")?;
        let report = self.analytics.environment(&self.battles);
        writeln!(out, "Level:       {}", report.level)?;
        writeln!(
            out,
            "Difference:  {} (performance {} - quality {})",
            report.difference, report.performance_score, report.quality_score
        )?;
        Ok(())
    }

    fn show_profit(&self, out: &mut String) -> Result<()> {
        header(out, "💰 Profitability")?;
        let report = self.analytics.profitability_trend(&self.battles);
        if report.labels.is_empty() {
            return no_data(out);
        }
        let rows = report
            .labels
            .iter()
            .zip(&report.final_asset_values)
            .zip(&report.profit_rates);
        for ((label, asset), rate) in rows {
            writeln!(
                out,
                "{:<12} final asset {:>12}  rate {:>7.1}%",
                label, asset, rate
            )?;
        }
        writeln!(
            out,
            "Average final asset: {:.0}  Average rate: {:.1}%",
            report.average_final_asset_value, report.average_profit_rate
        )?;
        Ok(())
    }

    fn show_behavior(&self, out: &mut String) -> Result<()> {
        header(out, "🧭 Behavior Changes")?;
        let report = self.analytics.behavior_trend(&self.battles);
        if report.labels.is_empty() {
            return no_data(out);
        }
        let rows = report
            .labels
            .iter()
            .zip(&report.battle_effectiveness)
            .zip(&report.resource_survival);
        for ((label, effectiveness), resource) in rows {
            writeln!(
                out,
                "{:<10} effectiveness {:.3}  resource/survival {:.3}",
                label, effectiveness, resource
            )?;
        }
        let flagged = [
            ("effectiveness", &report.effectiveness_changes),
            ("resource/survival", &report.resource_changes),
        ];
        for (name, changes) in flagged {
            for change in changes {
                let label = report.labels.get(change.index).map_or("?", String::as_str);
                writeln!(
                    out,
                    "⚠️  {} shift at {}: {:.3} ({:+.1}%)",
                    name,
                    label,
                    change.value,
                    change.change_rate * 100.0
                )?;
            }
        }
        Ok(())
    }

    fn show_maps(&self, out: &mut String) -> Result<()> {
        header(out, "🗺️ Map Statistics")?;
        let overall = self.analytics.map_stats(&self.battles);
        let groups = self.analytics.map_group_stats(&self.battles);
        let rows = groups.into_iter().map(|g| (g.name, g.stats));
        let all = ("All maps".to_string(), overall);
        for (name, stats) in std::iter::once(all).chain(rows) {
            writeln!(
                out,
                "{:<16} matches {:>4}  extracted {:>5.1}%  P/L {:>12}",
                name, stats.total_matches, stats.evacuation_rate, stats.total_profit_loss
            )?;
            writeln!(
                out,
                "{:<16} gold {:>3} ({:.1}%)  red {:>3} ({:.1}%)",
                "", stats.gold_items_found, stats.gold_item_rate, stats.red_items_found,
                stats.red_item_rate
            )?;
        }
        Ok(())
    }

    fn show_characters(&self, out: &mut String) -> Result<()> {
        header(out, "🧑 Character Usage")?;
        let usage = self.analytics.character_usage(&self.battles);
        if usage.is_empty() {
            return no_data(out);
        }
        for entry in usage {
            writeln!(
                out,
                "{:<24} {:>4}  {:>5.1}%",
                entry.name, entry.count, entry.percentage
            )?;
        }
        Ok(())
    }

    fn show_finance(&self, out: &mut String) -> Result<()> {
        header(out, "📊 Character Finance")?;
        let finance = self.analytics.character_finance(&self.battles);
        let boards = [
            ("Top profit", &finance.profit_stats),
            ("Top loss", &finance.loss_stats),
        ];
        for (title, entries) in boards {
            writeln!(out, "{title}:")?;
            if entries.is_empty() {
                writeln!(out, "  none")?;
            }
            for entry in entries {
                writeln!(
                    out,
                    "  {:<24} total {:>12}  avg {:>10}  ({} battles)",
                    entry.name, entry.total, entry.average, entry.battles
                )?;
            }
        }
        Ok(())
    }

    fn show_harvest(&self, out: &mut String) -> Result<()> {
        header(out, "🎒 Harvest (last 7 days)")?;
        let harvest = self.analytics.harvest(&self.battles);
        if harvest.items.is_empty() {
            return no_data(out);
        }
        for item in &harvest.items {
            writeln!(
                out,
                "{:<28} grade {}  x{:<4} @ {}",
                item.name.as_deref().unwrap_or("(unnamed)"),
                item.grade,
                item.quantity,
                item.price
            )?;
        }
        writeln!(
            out,
            "Earnings: {}  Red items: {}  Gold items: {}",
            harvest.total_earnings, harvest.red_item_count, harvest.gold_item_count
        )?;
        Ok(())
    }
}

fn header(out: &mut String, title: &str) -> Result<()> {
    if !out.is_empty() {
        writeln!(out)?;
    }
    writeln!(out, "{title}")?;
    writeln!(out, "{}", "=".repeat(50))?;
    Ok(())
}

fn show_trend(out: &mut String, report: &ScoreTrend) -> Result<()> {
    if report.is_empty() {
        return no_data(out);
    }
    let rows = report.labels.iter().zip(&report.scores).zip(&report.trend);
    for ((label, score), trend) in rows {
        writeln!(
            out,
            "{:<12} score {:>5}  trend {:>5}",
            label, score, trend
        )?;
    }
    writeln!(
        out,
        "Average: {:.1}  Current trend: {}",
        report.average, report.current_trend_score
    )?;
    Ok(())
}

fn no_data(out: &mut String) -> Result<()> {
    writeln!(out, "No data found")?;
    Ok(())
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}
