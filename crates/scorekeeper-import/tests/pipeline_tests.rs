// Integration tests for the file-to-file conversions.
//
// These run the public pipeline against the CSV fixtures in tests/fixtures
// and inspect the JSON files it writes.

use std::fs;
use std::path::{Path, PathBuf};

use scorekeeper_import::normalize::TeamAliases;
use scorekeeper_import::pipeline::{
    convert_rosters_file, convert_schedule_file, try_convert_rosters_file,
    try_convert_schedule_file, validate_outputs, ConvertError,
};
use scorekeeper_import::roster::RosterError;
use scorekeeper_import::schedule::ScheduleOptions;
use scorekeeper_import::table::TableError;
use serde_json::{json, Value};

// ===========================================================================
// Test helpers
// ===========================================================================

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// Fresh scratch directory per test so tests can run in parallel.
fn scratch_dir(test: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("scorekeeper_import_it_{test}"));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

// ===========================================================================
// Rosters
// ===========================================================================

#[test]
fn rosters_fixture_converts_end_to_end() {
    let dir = scratch_dir("rosters_e2e");
    let output = dir.join("rosters.json");

    let rosters = convert_rosters_file(&fixture("rosters.csv"), &output, &TeamAliases::builtin());
    assert_eq!(rosters.len(), 3);
    assert_eq!(rosters.player_count(), 4);

    let expected = json!({
        "Sharks": [
            {"id": "sharks_ann_lee_0", "name": "Ann Lee", "number": 31,
             "position": "Goalie", "division": "A", "team": "Sharks"}
        ],
        "Tigers": [
            {"id": "tigers_cy_young_1", "name": "Cy Young", "number": 2,
             "position": "Defense", "division": "B", "team": "Tigers"},
            {"id": "tigers_di_ross_6", "name": "Di Ross", "number": 44,
             "position": "Forward", "division": "B", "team": "Tigers"}
        ],
        // The curly-apostrophe group comes later and replaces Jane Doe's.
        "Slappy Gilmore's": [
            {"id": "slappy_gilmore_s_bo_kim_4", "name": "Bo Kim", "number": 9,
             "position": "Center", "division": "B", "team": "Slappy Gilmore's"}
        ]
    });
    assert_eq!(read_json(&output), expected);

    // Keys come out in first-appearance order.
    let text = fs::read_to_string(&output).unwrap();
    let sharks = text.find("\"Sharks\"").unwrap();
    let tigers = text.find("\"Tigers\"").unwrap();
    let slappy = text.find("\"Slappy Gilmore's\"").unwrap();
    assert!(sharks < tigers && tigers < slappy);
}

#[test]
fn rosters_output_is_deterministic() {
    let dir = scratch_dir("rosters_determinism");
    let first = dir.join("first.json");
    let second = dir.join("second.json");

    convert_rosters_file(&fixture("rosters.csv"), &first, &TeamAliases::builtin());
    convert_rosters_file(&fixture("rosters.csv"), &second, &TeamAliases::builtin());

    assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());
}

#[test]
fn rosters_missing_columns_write_empty_object() {
    let dir = scratch_dir("rosters_wrong_columns");
    let output = dir.join("rosters.json");

    let rosters = try_convert_rosters_file(
        &fixture("rosters_wrong_columns.csv"),
        &output,
        &TeamAliases::builtin(),
    )
    .unwrap();
    assert!(rosters.is_empty());
    assert_eq!(fs::read_to_string(&output).unwrap(), "{}");
}

#[test]
fn rosters_bad_number_fails_without_writing() {
    let dir = scratch_dir("rosters_bad_number");
    let output = dir.join("rosters.json");

    let err = try_convert_rosters_file(
        &fixture("rosters_bad_number.csv"),
        &output,
        &TeamAliases::builtin(),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        ConvertError::Roster(RosterError::InvalidNumber { row: 1, .. })
    ));
    assert!(!output.exists());

    // The catch-all entry point swallows the same failure.
    let rosters = convert_rosters_file(
        &fixture("rosters_bad_number.csv"),
        &output,
        &TeamAliases::builtin(),
    );
    assert!(rosters.is_empty());
    assert!(!output.exists());
}

#[test]
fn rosters_missing_input_returns_empty() {
    let dir = scratch_dir("rosters_missing_input");
    let output = dir.join("rosters.json");
    let input = dir.join("nope.csv");

    let err = try_convert_rosters_file(&input, &output, &TeamAliases::builtin()).unwrap_err();
    assert!(matches!(err, ConvertError::Table(TableError::Io { .. })));

    let rosters = convert_rosters_file(&input, &output, &TeamAliases::builtin());
    assert!(rosters.is_empty());
    assert!(!output.exists());
}

#[test]
fn configured_alias_reaches_output() {
    let dir = scratch_dir("rosters_configured_alias");
    let output = dir.join("rosters.json");
    let aliases = TeamAliases::with_overrides([("Tigers", "Tiger Sharks")]);

    let rosters = convert_rosters_file(&fixture("rosters.csv"), &output, &aliases);
    assert!(rosters.get("Tigers").is_none());
    let players = rosters.get("Tiger Sharks").unwrap();
    assert_eq!(players[0].id, "tiger_sharks_cy_young_1");
    assert_eq!(players[0].team, "Tiger Sharks");
}

// ===========================================================================
// Schedule
// ===========================================================================

#[test]
fn schedule_fixture_converts_end_to_end() {
    let dir = scratch_dir("schedule_e2e");
    let output = dir.join("schedule.json");

    let games = convert_schedule_file(
        &fixture("schedule.csv"),
        &output,
        &TeamAliases::builtin(),
        &ScheduleOptions::default(),
    );
    assert_eq!(games.len(), 3);

    let expected = json!([
        {"id": "game_1", "date": "2025-09-10", "time": "6:00 PM",
         "homeTeam": "Sharks", "awayTeam": "Tigers", "location": "Tigers at Sharks",
         "season": "Fall 2025", "week": "1"},
        {"id": "game_2", "date": "2025-09-17", "time": "7:30 PM",
         "homeTeam": "Slappy Gilmore's", "awayTeam": "Sharks", "location": "Rivalry Night",
         "season": "Fall 2025", "week": "2"},
        {"id": "game_3", "date": "2025-09-24", "time": "6:00 PM",
         "homeTeam": "Tigers", "awayTeam": "Slappy Gilmore's",
         "location": "Slappy Gilmore's at Tigers",
         "season": "Fall 2025 Playoffs", "week": "3"}
    ]);
    assert_eq!(read_json(&output), expected);
}

#[test]
fn schedule_output_is_deterministic() {
    let dir = scratch_dir("schedule_determinism");
    let first = dir.join("first.json");
    let second = dir.join("second.json");
    let options = ScheduleOptions::default();

    convert_schedule_file(&fixture("schedule.csv"), &first, &TeamAliases::builtin(), &options);
    convert_schedule_file(&fixture("schedule.csv"), &second, &TeamAliases::builtin(), &options);

    assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());
}

#[test]
fn schedule_overwrites_previous_output() {
    let dir = scratch_dir("schedule_overwrite");
    let output = dir.join("schedule.json");
    fs::write(&output, "stale").unwrap();

    try_convert_schedule_file(
        &fixture("rosters.csv"),
        &output,
        &TeamAliases::builtin(),
        &ScheduleOptions::default(),
    )
    .unwrap();
    assert_eq!(fs::read_to_string(&output).unwrap(), "[]");
}

#[test]
fn schedule_unreadable_workbook_returns_empty() {
    let dir = scratch_dir("schedule_bad_workbook");
    let input = dir.join("schedule.xlsx");
    fs::write(&input, "not a zip archive").unwrap();
    let output = dir.join("schedule.json");

    let err = try_convert_schedule_file(
        &input,
        &output,
        &TeamAliases::builtin(),
        &ScheduleOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, ConvertError::Table(TableError::Workbook { .. })));

    let games = convert_schedule_file(
        &input,
        &output,
        &TeamAliases::builtin(),
        &ScheduleOptions::default(),
    );
    assert!(games.is_empty());
    assert!(!output.exists());
}

// ===========================================================================
// Validation
// ===========================================================================

#[test]
fn validate_outputs_counts_invalid_files() {
    let dir = scratch_dir("validate_outputs");
    let rosters = dir.join("rosters.json");
    let schedule = dir.join("schedule.json");

    convert_rosters_file(&fixture("rosters.csv"), &rosters, &TeamAliases::builtin());
    fs::write(&schedule, "[{\"id\": ").unwrap();

    assert_eq!(validate_outputs(&[&rosters]), 0);
    assert_eq!(validate_outputs(&[&rosters, &schedule]), 1);
}
