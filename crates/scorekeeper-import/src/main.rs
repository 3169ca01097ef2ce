// Scorekeeper import entry point.
//
// Startup sequence:
// 1. Initialize tracing (stderr)
// 2. Load config (optional config/import.toml)
// 3. Build the team alias table
// 4. Convert rosters
// 5. Convert schedule
// 6. Validate the written JSON files

use scorekeeper_import::config;
use scorekeeper_import::pipeline;

use anyhow::Context;
use std::path::Path;
use tracing::info;

fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing
    init_tracing()?;

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;

    // 3. Alias table, built once and shared read-only by both conversions
    let aliases = config.team_aliases();
    let schedule_options = config.schedule_options();
    info!(
        "Config loaded: {} team aliases, default season '{}'",
        aliases.len(),
        schedule_options.default_season
    );

    // 4. Rosters
    info!("Converting rosters...");
    let rosters = pipeline::convert_rosters_file(
        Path::new(&config.inputs.rosters),
        Path::new(&config.outputs.rosters),
        &aliases,
    );

    // 5. Schedule
    info!("Converting schedule...");
    let games = pipeline::convert_schedule_file(
        Path::new(&config.inputs.schedule),
        Path::new(&config.outputs.schedule),
        &aliases,
        &schedule_options,
    );

    // 6. Validate outputs on disk. A failed conversion writes nothing, so
    // absent files are left to the error already logged above.
    let outputs: Vec<&str> = [
        config.outputs.rosters.as_str(),
        config.outputs.schedule.as_str(),
    ]
    .into_iter()
    .filter(|p| Path::new(p).exists())
    .collect();
    let invalid = pipeline::validate_outputs(&outputs);
    if invalid > 0 {
        anyhow::bail!("{invalid} output file(s) failed JSON validation");
    }

    info!(
        "Conversion complete! {} teams, {} games",
        rosters.len(),
        games.len()
    );
    Ok(())
}

/// Initialize tracing to stderr. `RUST_LOG` overrides the default filter.
fn init_tracing() -> anyhow::Result<()> {
    use std::io::IsTerminal;
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("scorekeeper_import=info,warn")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
