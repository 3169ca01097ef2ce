// JSON output: pretty-printed files for the scorekeeper app, plus a read-back
// check that a written file still parses.

use serde::Serialize;
use std::io::Write;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum EmitError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },
}

/// Serialize `value` as 2-space indented JSON, replacing any existing file.
/// The parent directory is created if needed. The write is not atomic.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), EmitError> {
    let io_err = |e: std::io::Error| EmitError::Io {
        path: path.display().to_string(),
        source: e,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }

    let file = std::fs::File::create(path).map_err(io_err)?;
    let mut writer = std::io::BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value).map_err(|e| EmitError::Json {
        path: path.display().to_string(),
        source: e,
    })?;
    writer.flush().map_err(io_err)?;
    Ok(())
}

/// Read a file back and check it holds valid JSON.
pub fn validate_json_file(path: &Path) -> Result<(), EmitError> {
    let content = std::fs::read_to_string(path).map_err(|e| EmitError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    serde_json::from_str::<serde_json::Value>(&content).map_err(|e| EmitError::Json {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(())
}
