use crate::error::PublishError;
use crate::leaderboard::LeaderboardRow;
use crate::scoring::SeasonScoreTable;
use crate::summary::SeasonSummaryRow;
use crate::Season;
use parse_display::Display;
use std::collections::HashMap;
use std::path::PathBuf;

pub const LEADERBOARD_SHEET: &str = "League Records";

#[derive(Copy, Clone, Debug, PartialEq, Eq, Display)]
#[display("{0} Season - Weekly Points")]
pub struct SeasonSheetName(pub Season);

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
}

impl Cell {
    pub fn render(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(text) => text.clone(),
            Cell::Number(number) => number.to_string(),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Cell::Empty => serde_json::Value::String(String::new()),
            Cell::Text(text) => serde_json::Value::from(text.as_str()),
            Cell::Number(number) => serde_json::Value::from(*number),
        }
    }
}

impl From<&str> for Cell {
    fn from(text: &str) -> Self {
        Cell::Text(text.to_string())
    }
}

impl From<String> for Cell {
    fn from(text: String) -> Self {
        Cell::Text(text)
    }
}

impl From<f64> for Cell {
    fn from(number: f64) -> Self {
        Cell::Number(number)
    }
}

impl From<Option<f64>> for Cell {
    fn from(number: Option<f64>) -> Self {
        number.map_or(Cell::Empty, Cell::Number)
    }
}

/// A named rectangular table, written as a header line followed by rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub name: String,
    pub header: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(name: impl Into<String>, header: Vec<String>) -> Self {
        Self {
            name: name.into(),
            header,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<Cell>) {
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Header and rows together, as the Sheets values API expects them.
    pub fn values(&self) -> Vec<Vec<serde_json::Value>> {
        let header: Vec<serde_json::Value> = self
            .header
            .iter()
            .map(|title| serde_json::Value::from(title.as_str()))
            .collect();
        std::iter::once(header)
            .chain(
                self.rows
                    .iter()
                    .map(|row| row.iter().map(Cell::to_json).collect::<Vec<_>>()),
            )
            .collect()
    }
}

/// Destination that writes (and overwrites) a named table.
pub trait SheetPublisher {
    fn publish(&self, table: &Table) -> Result<(), PublishError>;
}

/// The per-season sheet: one line per summarized user, in summary order,
/// with a column for every week. Weeks without a score stay blank.
pub fn season_sheet(
    season: Season,
    table: &SeasonScoreTable,
    summary: &[SeasonSummaryRow],
    weeks: u32,
) -> Table {
    let last_week = table.weeks().last().copied().unwrap_or(0).max(weeks);
    let points: HashMap<(&str, u32), f64> = table
        .iter()
        .map(|row| ((row.user_id.as_str(), row.week), row.points))
        .collect();

    let header = ["User ID", "Display Name"]
        .into_iter()
        .map(str::to_string)
        .chain((1..=last_week).map(|week| format!("Week {}", week)))
        .chain(std::iter::once("Season Total".to_string()))
        .collect();

    let mut sheet = Table::new(SeasonSheetName(season).to_string(), header);
    for user in summary {
        let row = [
            Cell::from(user.user_id.as_str()),
            Cell::from(user.display_name.as_str()),
        ]
        .into_iter()
        .chain((1..=last_week).map(|week| {
            Cell::from(points.get(&(user.user_id.as_str(), week)).copied())
        }))
        .chain(std::iter::once(Cell::from(user.season_total)))
        .collect();
        sheet.push_row(row);
    }
    sheet
}

pub fn leaderboard_sheet(board: &[LeaderboardRow]) -> Table {
    let header = ["Scope", "Season", "User ID", "Display Name", "Season Total"]
        .into_iter()
        .map(str::to_string)
        .collect();

    let mut sheet = Table::new(LEADERBOARD_SHEET, header);
    for row in board {
        sheet.push_row(vec![
            Cell::from(row.scope.to_string()),
            Cell::from(row.season.to_string()),
            Cell::from(row.user_id.as_str()),
            Cell::from(row.display_name.as_str()),
            Cell::from(row.total),
        ]);
    }
    sheet
}

/// Writes each table to `<dir>/<name>.csv`, replacing any previous file.
pub struct CsvDirectory {
    dir: PathBuf,
}

impl CsvDirectory {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, table: &Table) -> PathBuf {
        self.dir.join(format!("{}.csv", table.name))
    }
}

impl SheetPublisher for CsvDirectory {
    fn publish(&self, table: &Table) -> Result<(), PublishError> {
        let sheet = || table.name.clone();
        std::fs::create_dir_all(&self.dir)
            .map_err(|source| PublishError::Io { sheet: sheet(), source })?;

        let path = self.path_for(table);
        let mut writer = csv::Writer::from_path(&path)
            .map_err(|source| PublishError::Csv { sheet: sheet(), source })?;
        writer
            .write_record(&table.header)
            .map_err(|source| PublishError::Csv { sheet: sheet(), source })?;
        for row in &table.rows {
            writer
                .write_record(row.iter().map(Cell::render))
                .map_err(|source| PublishError::Csv { sheet: sheet(), source })?;
        }
        writer
            .flush()
            .map_err(|source| PublishError::Io { sheet: sheet(), source })?;

        log::info!("Wrote {} rows to {}", table.rows.len(), path.display());
        Ok(())
    }
}
