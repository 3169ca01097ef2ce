// Schedule conversion: one game record per accepted row.

use crate::normalize::{normalize_cell, normalize_text, TeamAliases};
use crate::table::{Cell, Table};
use serde::Serialize;
use tracing::debug;

pub const HOME_TEAM_COLUMN: &str = "Home Team";
pub const AWAY_TEAM_COLUMN: &str = "Away Team";
pub const EVENT_NAME_COLUMN: &str = "Event Name";
pub const DATE_COLUMN: &str = "Date";
pub const START_TIME_COLUMN: &str = "Start Time";
pub const WEEK_COLUMN: &str = "Week";
pub const SEASON_COLUMN: &str = "Season";

pub const DEFAULT_SEASON: &str = "Fall 2025";

/// Separator of hierarchical team labels such as `League > Division > Team`.
const LABEL_SEPARATOR: &str = " > ";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub id: String,
    pub date: String,
    pub time: String,
    pub home_team: String,
    pub away_team: String,
    pub location: String,
    pub season: String,
    pub week: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleOptions {
    /// Season written when the row has none.
    pub default_season: String,
}

impl Default for ScheduleOptions {
    fn default() -> Self {
        Self {
            default_season: DEFAULT_SEASON.to_string(),
        }
    }
}

/// Team name from a possibly hierarchical label: the last `" > "` segment,
/// normalized and alias-resolved.
fn team_from_label(cell: &Cell, aliases: &TeamAliases) -> String {
    let label = cell.to_string();
    let last = label.rsplit(LABEL_SEPARATOR).next().unwrap_or_default();
    aliases.resolve(normalize_text(last))
}

fn date_text(cell: &Cell) -> String {
    match cell.as_datetime() {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => normalize_cell(cell),
    }
}

/// Build the game list. Rows where either team resolves to empty are skipped
/// and do not consume a game id.
pub fn convert_schedule(table: &Table, aliases: &TeamAliases, options: &ScheduleOptions) -> Vec<Game> {
    let home_col = table.column(HOME_TEAM_COLUMN);
    let away_col = table.column(AWAY_TEAM_COLUMN);
    let event_col = table.column(EVENT_NAME_COLUMN);
    let date_col = table.column(DATE_COLUMN);
    let time_col = table.column(START_TIME_COLUMN);
    let week_col = table.column(WEEK_COLUMN);
    let season_col = table.column(SEASON_COLUMN);

    let mut games = Vec::new();

    for row in table.rows() {
        let home_team = team_from_label(row.cell(home_col), aliases);
        let away_team = team_from_label(row.cell(away_col), aliases);
        if home_team.is_empty() || away_team.is_empty() {
            debug!(
                "skipping schedule row {}: home {:?}, away {:?}",
                row.index(),
                home_team,
                away_team
            );
            continue;
        }

        let event_name = normalize_cell(row.cell(event_col));
        let location = if event_name.is_empty() {
            format!("{away_team} at {home_team}")
        } else {
            event_name
        };

        let season = match normalize_cell(row.cell(season_col)) {
            s if s.is_empty() => options.default_season.clone(),
            s => s,
        };

        games.push(Game {
            id: format!("game_{}", games.len() + 1),
            date: date_text(row.cell(date_col)),
            time: normalize_cell(row.cell(time_col)),
            home_team,
            away_team,
            location,
            season,
            week: normalize_cell(row.cell(week_col)),
        });
    }

    games
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
