pub mod aggr;
pub mod chart;
pub mod config;
pub mod dashboard;
pub mod history;
pub mod range;
pub mod record;
pub mod util;

pub use config::state::{State, WindowSpec};
pub use config::theme::Theme;
pub use config::timezone::UserTimezone;

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

pub const SAVED_STATE_PATH: &str = "saved-state.json";
pub const RECORDS_PATH: &str = "records.json";
pub const DATA_DIR_ENV: &str = "DAIRY_LEDGER_DATA_PATH";

#[derive(thiserror::Error, Debug, Clone)]
pub enum InternalError {
    #[error("State file error: {0}")]
    State(String),
    #[error("Could not open {0}: {1}")]
    Open(String, String),
}

/// Root data directory, or a file inside it.
///
/// `DAIRY_LEDGER_DATA_PATH` takes precedence over the platform data dir.
pub fn data_path(path_name: Option<&str>) -> PathBuf {
    let base = std::env::var_os(DATA_DIR_ENV)
        .map(PathBuf::from)
        .or_else(|| dirs_next::data_dir().map(|dir| dir.join("dairy-ledger")))
        .unwrap_or_else(|| PathBuf::from("."));

    match path_name {
        Some(name) => base.join(name),
        None => base,
    }
}

pub fn write_json_to_file(json: &str, file_name: &str) -> std::io::Result<()> {
    write_json_at(&data_path(Some(file_name)), json)
}

fn write_json_at(path: &Path, json: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.exists()
    {
        fs::create_dir_all(parent)?;
    }

    let mut file = File::create(path)?;
    file.write_all(json.as_bytes())?;
    Ok(())
}

/// Loads the saved state, falling back to defaults when it is missing or unreadable.
pub fn read_state(file_name: &str) -> State {
    match read_state_at(&data_path(Some(file_name))) {
        Ok(state) => state,
        Err(err) => {
            log::warn!("Using default state: {err}");
            State::default()
        }
    }
}

fn read_state_at(path: &Path) -> Result<State, InternalError> {
    let mut contents = String::new();
    File::open(path)
        .and_then(|mut file| file.read_to_string(&mut contents))
        .map_err(|e| InternalError::State(format!("{}: {e}", path.display())))?;

    serde_json::from_str(&contents).map_err(|e| InternalError::State(e.to_string()))
}

pub fn save_state(state: &State, file_name: &str) -> Result<(), InternalError> {
    let json = serde_json::to_string_pretty(state)
        .map_err(|e| InternalError::State(format!("Failed to serialize state: {e}")))?;

    write_json_to_file(&json, file_name)
        .map_err(|e| InternalError::State(format!("Failed to write state file: {e}")))
}

pub fn open_data_folder() -> Result<(), InternalError> {
    let path = data_path(None);
    let open_err = |e: std::io::Error| InternalError::Open(path.display().to_string(), e.to_string());

    if !path.exists() {
        fs::create_dir_all(&path).map_err(open_err)?;
    }

    open::that(&path).map_err(open_err)?;
    log::info!("Opened data folder: {}", path.display());

    Ok(())
}
