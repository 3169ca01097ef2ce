// Configuration loading (config/import.toml). The file is optional and every
// key in it falls back to a built-in default.

use crate::normalize::{normalize_text, TeamAliases};
use crate::schedule::{ScheduleOptions, DEFAULT_SEASON};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Location of the config file relative to the base directory.
pub const CONFIG_FILE: &str = "config/import.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },
}

// ---------------------------------------------------------------------------
// Config structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub inputs: InputPaths,
    pub outputs: OutputPaths,
    pub schedule: ScheduleSection,
    /// Extra team aliases, merged over the built-in table.
    pub aliases: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct InputPaths {
    pub rosters: String,
    pub schedule: String,
}

impl Default for InputPaths {
    fn default() -> Self {
        Self {
            rosters: "data/fall_2025_rosters.xlsx".into(),
            schedule: "data/fall_2025_schedule.xlsx".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OutputPaths {
    pub rosters: String,
    pub schedule: String,
}

impl Default for OutputPaths {
    fn default() -> Self {
        Self {
            rosters: "scorekeeper_lite/data/rosters.json".into(),
            schedule: "scorekeeper_lite/data/schedule.json".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ScheduleSection {
    pub default_season: String,
}

impl Default for ScheduleSection {
    fn default() -> Self {
        Self {
            default_season: DEFAULT_SEASON.into(),
        }
    }
}

impl Config {
    /// Built-in aliases plus the configured ones.
    pub fn team_aliases(&self) -> TeamAliases {
        TeamAliases::with_overrides(&self.aliases)
    }

    pub fn schedule_options(&self) -> ScheduleOptions {
        ScheduleOptions {
            default_season: normalize_text(&self.schedule.default_season),
        }
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Parse and validate config text.
pub fn parse_config(text: &str, path: &Path) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;
    validate(&config)?;
    Ok(config)
}

/// Load `config/import.toml` under `base_dir`, or the defaults when the file
/// does not exist.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(Config::default());
    }
    let text = std::fs::read_to_string(&path).map_err(|e| ConfigError::Read {
        path: path.clone(),
        source: e,
    })?;
    parse_config(&text, &path)
}

/// Convenience wrapper: loads config relative to the current working directory.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|e| ConfigError::Read {
        path: PathBuf::from("."),
        source: e,
    })?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    let path_fields: &[(&str, &str)] = &[
        ("inputs.rosters", config.inputs.rosters.as_str()),
        ("inputs.schedule", config.inputs.schedule.as_str()),
        ("outputs.rosters", config.outputs.rosters.as_str()),
        ("outputs.schedule", config.outputs.schedule.as_str()),
    ];
    for (name, val) in path_fields {
        if val.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: "must not be empty".into(),
            });
        }
    }

    if normalize_text(&config.schedule.default_season).is_empty() {
        return Err(ConfigError::ValidationError {
            field: "schedule.default_season".into(),
            message: "must not be empty".into(),
        });
    }

    for (key, value) in &config.aliases {
        if normalize_text(key).is_empty() {
            return Err(ConfigError::ValidationError {
                field: format!("aliases.{key:?}"),
                message: "alias key is empty after normalization".into(),
            });
        }
        if normalize_text(value).is_empty() {
            return Err(ConfigError::ValidationError {
                field: format!("aliases.{key:?}"),
                message: format!("alias value {value:?} is empty after normalization"),
            });
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn parse(text: &str) -> Result<Config, ConfigError> {
        parse_config(text, Path::new("import.toml"))
    }

    #[test]
    fn empty_file_gives_defaults() {
        let config = parse("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.schedule.default_season, "Fall 2025");
        assert_eq!(config.outputs.rosters, "scorekeeper_lite/data/rosters.json");
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = parse(
            r#"
[inputs]
rosters = "in/rosters.csv"

[schedule]
default_season = "Winter 2026"
"#,
        )
        .unwrap();
        assert_eq!(config.inputs.rosters, "in/rosters.csv");
        assert_eq!(config.inputs.schedule, "data/fall_2025_schedule.xlsx");
        assert_eq!(config.schedule_options().default_season, "Winter 2026");
    }

    #[test]
    fn aliases_merge_over_builtin() {
        let config = parse(
            r#"
[aliases]
"Ice Dgos" = "Ice Dogs"
"#,
        )
        .unwrap();
        let aliases = config.team_aliases();
        assert_eq!(aliases.resolve("Ice Dgos".into()), "Ice Dogs");
        assert_eq!(aliases.resolve("Slappy Gilmores".into()), "Slappy Gilmore's");
    }

    #[test]
    fn empty_path_rejected() {
        let err = parse("[outputs]\nschedule = \"  \"").unwrap_err();
        match err {
            ConfigError::ValidationError { field, .. } => assert_eq!(field, "outputs.schedule"),
            other => panic!("expected ValidationError, got: {other:?}"),
        }
    }

    #[test]
    fn blank_default_season_rejected() {
        let err = parse("[schedule]\ndefault_season = \"\u{2603}\"").unwrap_err();
        match err {
            ConfigError::ValidationError { field, .. } => {
                assert_eq!(field, "schedule.default_season")
            }
            other => panic!("expected ValidationError, got: {other:?}"),
        }
    }

    #[test]
    fn blank_alias_value_rejected() {
        let err = parse("[aliases]\n\"Sharks\" = \" \"").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { .. }));
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let err = parse("[inputs\nrosters = 1").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn wrong_type_is_parse_error() {
        let err = parse("[inputs]\nrosters = 42").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn missing_file_gives_defaults() {
        let tmp = std::env::temp_dir().join("scorekeeper_config_test_missing");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&tmp).unwrap();

        let config = load_config_from(&tmp).unwrap();
        assert_eq!(config, Config::default());

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn file_in_config_dir_is_loaded() {
        let tmp = std::env::temp_dir().join("scorekeeper_config_test_present");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();
        fs::write(
            tmp.join(CONFIG_FILE),
            "[outputs]\nrosters = \"out/rosters.json\"\n",
        )
        .unwrap();

        let config = load_config_from(&tmp).unwrap();
        assert_eq!(config.outputs.rosters, "out/rosters.json");

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn shipped_defaults_match_builtin() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("defaults/import.toml");
        let text = fs::read_to_string(&path).expect("defaults/import.toml should exist");
        let config = parse_config(&text, &path).unwrap();
        let mut expected = Config::default();
        expected
            .aliases
            .insert("Slappy Gilmores".into(), "Slappy Gilmore's".into());
        assert_eq!(config, expected);
    }
}
