//! Flat-file record of the survey ids seen by the last successful run.

use crate::error::StateError;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::io::{ErrorKind, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(default)]
    pub last_survey_ids: BTreeSet<String>,
    #[serde(default)]
    pub last_check: Option<NaiveDateTime>,
    /// Keys this program does not manage; written back untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Reads the state file. A missing file is a first run and yields the default
/// state; an unreadable or corrupt file is an error so that history is never
/// silently forgotten.
pub fn load(path: &Path) -> Result<PersistedState, StateError> {
    let data = match std::fs::read_to_string(path) {
        Ok(data) => data,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "no state file, starting fresh");
            return Ok(PersistedState::default());
        }
        Err(source) => {
            return Err(StateError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    serde_json::from_str(&data).map_err(|source| StateError::Corrupt {
        path: path.to_path_buf(),
        source,
    })
}

/// Overwrites the state file wholesale. The document is written to a sibling
/// temp file and renamed into place.
pub fn save(path: &Path, state: &PersistedState) -> Result<(), StateError> {
    let write_err = |source: std::io::Error| StateError::Write {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(write_err)?;

    let mut json = serde_json::to_string_pretty(state)?;
    json.push('\n');

    let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(json.as_bytes()).map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;

    debug!(path = %path.display(), ids = state.last_survey_ids.len(), "saved state");
    Ok(())
}
