// File-to-file conversions.
//
// Each input has two entry points: `try_convert_*_file` returns an explicit
// result, and `convert_*_file` logs any failure and falls back to an empty
// collection. Nothing is written when a conversion fails.

use crate::emit::{self, EmitError};
use crate::normalize::TeamAliases;
use crate::roster::{self, RosterError, Rosters};
use crate::schedule::{self, Game, ScheduleOptions};
use crate::table::{self, Table, TableError};
use std::path::Path;
use tracing::{error, info};

/// Rows shown in the diagnostic preview of each input.
const PREVIEW_ROWS: usize = 5;

#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error(transparent)]
    Table(#[from] TableError),

    #[error(transparent)]
    Roster(#[from] RosterError),

    #[error(transparent)]
    Emit(#[from] EmitError),
}

fn load_with_preview(kind: &str, input: &Path) -> Result<Table, TableError> {
    let table = table::load_table(input)?;
    info!("{} columns: {:?}", kind, table.columns());
    info!("First few rows:\n{}", table.preview(PREVIEW_ROWS));
    Ok(table)
}

pub fn try_convert_rosters_file(
    input: &Path,
    output: &Path,
    aliases: &TeamAliases,
) -> Result<Rosters, ConvertError> {
    let table = load_with_preview("Roster", input)?;
    let rosters = roster::convert_rosters(&table, aliases)?;
    emit::write_json(output, &rosters)?;
    info!(
        "Rosters converted and saved to {} ({} teams, {} players)",
        output.display(),
        rosters.len(),
        rosters.player_count()
    );
    Ok(rosters)
}

/// Convert the roster spreadsheet at `input` into `output`. Failures are
/// logged and yield an empty collection, so an empty result can mean either
/// an empty roster or a failed conversion.
pub fn convert_rosters_file(input: &Path, output: &Path, aliases: &TeamAliases) -> Rosters {
    match try_convert_rosters_file(input, output, aliases) {
        Ok(rosters) => rosters,
        Err(e) => {
            error!("Error converting rosters: {}", e);
            Rosters::default()
        }
    }
}

pub fn try_convert_schedule_file(
    input: &Path,
    output: &Path,
    aliases: &TeamAliases,
    options: &ScheduleOptions,
) -> Result<Vec<Game>, ConvertError> {
    let table = load_with_preview("Schedule", input)?;
    let games = schedule::convert_schedule(&table, aliases, options);
    emit::write_json(output, &games)?;
    info!(
        "Schedule converted and saved to {} ({} games)",
        output.display(),
        games.len()
    );
    Ok(games)
}

/// Schedule counterpart of [`convert_rosters_file`].
pub fn convert_schedule_file(
    input: &Path,
    output: &Path,
    aliases: &TeamAliases,
    options: &ScheduleOptions,
) -> Vec<Game> {
    match try_convert_schedule_file(input, output, aliases, options) {
        Ok(games) => games,
        Err(e) => {
            error!("Error converting schedule: {}", e);
            Vec::new()
        }
    }
}

/// Check every path holds valid JSON. Returns how many did not.
pub fn validate_outputs<P: AsRef<Path>>(paths: &[P]) -> usize {
    let mut invalid = 0;
    for path in paths {
        let path = path.as_ref();
        match emit::validate_json_file(path) {
            Ok(()) => info!("{} is valid JSON", path.display()),
            Err(e) => {
                error!("{}", e);
                invalid += 1;
            }
        }
    }
    invalid
}
