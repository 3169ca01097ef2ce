// Roster conversion: player rows grouped by team.

use crate::normalize::{normalize_cell, slugify, TeamAliases};
use crate::table::{Cell, Row, Table};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use tracing::{debug, warn};

pub const TEAM_COLUMN: &str = "Team";
pub const NAME_COLUMN: &str = "Name";
pub const NUMBER_COLUMN: &str = "Number";
pub const POSITION_COLUMN: &str = "Position";
pub const DIVISION_COLUMN: &str = "Division";

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Player {
    pub id: String,
    pub name: String,
    pub number: i64,
    pub position: String,
    pub division: String,
    pub team: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamRoster {
    pub team: String,
    pub players: Vec<Player>,
}

/// Team name -> players, kept in the order teams were first accepted.
/// Serializes as a JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rosters {
    teams: Vec<TeamRoster>,
}

impl Rosters {
    /// Set the players of `team`. An existing entry keeps its position and
    /// has its players replaced; a new team goes at the end.
    pub fn insert(&mut self, team: &str, players: Vec<Player>) {
        match self.teams.iter_mut().find(|t| t.team == team) {
            Some(entry) => entry.players = players,
            None => self.teams.push(TeamRoster {
                team: team.to_string(),
                players,
            }),
        }
    }

    pub fn get(&self, team: &str) -> Option<&[Player]> {
        self.teams
            .iter()
            .find(|t| t.team == team)
            .map(|t| t.players.as_slice())
    }

    pub fn teams(&self) -> impl Iterator<Item = &TeamRoster> {
        self.teams.iter()
    }

    /// Number of teams.
    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    pub fn player_count(&self) -> usize {
        self.teams.iter().map(|t| t.players.len()).sum()
    }
}

impl Serialize for Rosters {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.teams.len()))?;
        for entry in &self.teams {
            map.serialize_entry(&entry.team, &entry.players)?;
        }
        map.end()
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error("row {row}: jersey number {value:?} is not an integer")]
    InvalidNumber { row: usize, value: String },
}

// ---------------------------------------------------------------------------
// Conversion
// ---------------------------------------------------------------------------

/// Finite and inside `i64` once truncated. `i64::MAX as f64` rounds up to
/// 2^63, hence the strict upper bound.
fn in_i64_range(x: f64) -> bool {
    x.is_finite() && x.trunc() >= i64::MIN as f64 && x.trunc() < i64::MAX as f64
}

/// Jersey number from the `Number` cell, defaulting to `row_index + 1`.
fn jersey_number(row: &Row<'_>, column: Option<usize>) -> Result<i64, RosterError> {
    let fallback = row.index() as i64 + 1;
    let invalid = |cell: &Cell| RosterError::InvalidNumber {
        row: row.index(),
        value: cell.to_string(),
    };
    let cell = row.cell(column);
    match cell {
        Cell::Missing => Ok(fallback),
        Cell::Int(n) => Ok(*n),
        Cell::Float(x) if in_i64_range(*x) => Ok(x.trunc() as i64),
        Cell::Bool(b) => Ok(i64::from(*b)),
        Cell::Text(s) if s.trim().is_empty() => Ok(fallback),
        Cell::Text(s) => s.trim().parse().map_err(|_| invalid(cell)),
        _ => Err(invalid(cell)),
    }
}

/// Group player rows by team.
///
/// Teams are visited in order of first appearance of their raw `Team` value;
/// all rows carrying that exact raw value are then taken in source order.
/// Rows with a blank team or name are skipped. When several raw values resolve
/// to the same team, the last group with accepted players replaces the
/// earlier ones and the team keeps its first position. A table without `Team`
/// and `Name` columns yields an empty collection.
pub fn convert_rosters(table: &Table, aliases: &TeamAliases) -> Result<Rosters, RosterError> {
    let mut rosters = Rosters::default();

    let (Some(team_col), Some(name_col)) = (table.column(TEAM_COLUMN), table.column(NAME_COLUMN))
    else {
        warn!(
            "roster input lacks '{}' or '{}' column; producing empty rosters",
            TEAM_COLUMN, NAME_COLUMN
        );
        return Ok(rosters);
    };
    let number_col = table.column(NUMBER_COLUMN);
    let position_col = table.column(POSITION_COLUMN);
    let division_col = table.column(DIVISION_COLUMN);

    let mut raw_teams: Vec<&Cell> = Vec::new();
    for row in table.rows() {
        let raw = row.cell(Some(team_col));
        if !raw.is_missing() && !raw_teams.contains(&raw) {
            raw_teams.push(raw);
        }
    }

    for raw_team in raw_teams {
        let team = aliases.canonical_team(raw_team);
        if team.is_empty() {
            debug!("skipping blank team value {:?}", raw_team);
            continue;
        }
        let team_slug = slugify(&team);
        let mut players = Vec::new();

        for row in table.rows().filter(|r| r.cell(Some(team_col)) == raw_team) {
            let name = normalize_cell(row.cell(Some(name_col)));
            if name.is_empty() {
                debug!("skipping row {} of team '{}': blank name", row.index(), team);
                continue;
            }

            let player = Player {
                id: format!("{}_{}_{}", team_slug, slugify(&name), row.index()),
                number: jersey_number(&row, number_col)?,
                position: normalize_cell(row.cell(position_col)),
                division: normalize_cell(row.cell(division_col)),
                team: team.clone(),
                name,
            };
            players.push(player);
        }

        if !players.is_empty() {
            if rosters.get(&team).is_some() {
                debug!("raw team {:?} replaces earlier players of '{}'", raw_team, team);
            }
            rosters.insert(&team, players);
        }
    }

    Ok(rosters)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
