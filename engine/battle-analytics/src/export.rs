//! # Battle Export
//!
//! Flattens a battle list into display rows plus a summary block, for JSON
//! or CSV export.

use crate::aggregation::OverallSummary;
use crate::battle::Battle;
use crate::error::Result;
use chrono::NaiveDateTime;
use game_registry::MapDirectory;
use serde::{Deserialize, Serialize};
use std::io::Write;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const CSV_HEADERS: [&str; 9] = [
    "Time",
    "Map",
    "Result",
    "Duration",
    "Player kills",
    "AI kills",
    "Profit/loss",
    "Gained value",
    "Collection value",
];

/// One exported battle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRow {
    /// Empty for undated battles
    pub time: String,
    pub map_id: Option<i64>,
    pub map_name: String,
    pub result: String,
    pub game_time: i64,
    pub kill_player: i64,
    pub kill_ai: i64,
    pub profit_loss: i64,
    pub gained_price: i64,
    pub collection_price: i64,
}

impl ExportRow {
    pub fn from_battle(battle: &Battle, maps: &MapDirectory) -> Self {
        let time = battle.event_time.map(|t| t.format(TIME_FORMAT));
        let map_name = battle.map_id.map(|id| maps.display_name(id));
        let result = if battle.is_success() {
            "Extracted"
        } else {
            "Failed"
        };

        Self {
            time: time.map(|t| t.to_string()).unwrap_or_default(),
            map_id: battle.map_id,
            map_name: map_name.unwrap_or_default(),
            result: result.to_string(),
            game_time: battle.game_time(),
            kill_player: battle.kill_player.unwrap_or(0),
            kill_ai: battle.kill_ai.unwrap_or(0),
            profit_loss: battle.profit_loss(),
            gained_price: battle.gained_price.unwrap_or(0),
            collection_price: battle.collection_price.unwrap_or(0),
        }
    }

    fn csv_record(&self) -> [String; 9] {
        [
            self.time.clone(),
            self.map_name.clone(),
            self.result.clone(),
            self.game_time.to_string(),
            self.kill_player.to_string(),
            self.kill_ai.to_string(),
            self.profit_loss.to_string(),
            self.gained_price.to_string(),
            self.collection_price.to_string(),
        ]
    }
}

/// Export document: summary block plus one row per battle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportData {
    pub exported_at: NaiveDateTime,
    pub summary: OverallSummary,
    pub battles: Vec<ExportRow>,
}

impl ExportData {
    /// Rows keep the order of `battles`
    pub fn new(battles: &[Battle], summary: OverallSummary, exported_at: NaiveDateTime) -> Self {
        let maps = MapDirectory::new();
        Self {
            exported_at,
            summary,
            battles: battles
                .iter()
                .map(|b| ExportRow::from_battle(b, &maps))
                .collect(),
        }
    }

    /// Write the rows as CSV with a header line, every cell quoted
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv = csv::WriterBuilder::new()
            .quote_style(csv::QuoteStyle::Always)
            .from_writer(writer);
        csv.write_record(CSV_HEADERS)?;
        for row in &self.battles {
            csv.write_record(row.csv_record())?;
        }
        csv.flush()?;
        Ok(())
    }

    /// CSV rendering as a string
    pub fn to_csv(&self) -> Result<String> {
        let mut buffer = Vec::new();
        self.write_csv(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregation::Aggregator;
    use crate::battle::GameResult;
    use crate::lenient::parse_timestamp;

    fn battles() -> Vec<Battle> {
        vec![
            Battle {
                event_time: parse_timestamp("2025-03-04 21:07:00"),
                game_result: Some(GameResult::Success),
                map_id: Some(2212),
                game_time: Some(600),
                kill_player: Some(2),
                profit_loss: Some(20_000),
                gained_price: Some(150_000),
                collection_price: Some(80_000),
                ..Default::default()
            },
            Battle {
                game_result: Some(GameResult::Failure),
                map_id: Some(4242),
                ..Default::default()
            },
        ]
    }

    fn export() -> ExportData {
        let battles = battles();
        let summary = Aggregator::default().overall_summary(&battles);
        let exported_at = parse_timestamp("2025-03-05 08:00:00").unwrap();
        ExportData::new(&battles, summary, exported_at)
    }

    #[test]
    fn test_rows_follow_battles() {
        let data = export();
        assert_eq!(data.summary.total_battles, 2);
        assert_eq!(data.summary.win_rate, 50.0);

        let first = &data.battles[0];
        assert_eq!(first.time, "2025-03-04 21:07:00");
        assert_eq!(first.map_name, "Zero Dam - Lab");
        assert_eq!(first.result, "Extracted");
        assert_eq!(first.collection_price, 80_000);

        let second = &data.battles[1];
        assert_eq!(second.time, "");
        assert_eq!(second.map_name, "Map 4242");
        assert_eq!(second.result, "Failed");
        assert_eq!(second.profit_loss, 0);
    }

    #[test]
    fn test_csv_quotes_every_cell() {
        let csv = export().to_csv().unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with(r#""Time","Map","Result""#));
        assert_eq!(
            lines[1],
            r#""2025-03-04 21:07:00","Zero Dam - Lab","Extracted","600","2","0","20000","150000","80000""#
        );
        let undated = r#""","Map 4242","Failed","0","0","0","0","0","0""#;
        assert_eq!(lines[2], undated);
    }

    #[test]
    fn test_empty_export_has_header_only() {
        let exported_at = parse_timestamp("2025-03-05 08:00:00").unwrap();
        let data = ExportData::new(&[], OverallSummary::default(), exported_at);
        assert_eq!(data.to_csv().unwrap().lines().count(), 1);
    }
}
