use std::{
    fs,
    path::{Path, PathBuf},
    sync::Mutex,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::utils;

/// Run bookkeeping persisted in `config/state.json`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct State {
    pub last_run: Option<String>,
}

impl State {
    pub fn last_run_at(&self) -> Option<DateTime<Utc>> {
        self.last_run
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// Owns the persisted [`State`]; every update is written through to disk.
pub struct StateStore {
    path: PathBuf,
    data: Mutex<State>,
}

impl StateStore {
    /// Loads the state file. Missing or unreadable state reads as "never run".
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let data = match read_state(&path) {
            Ok(state) => state,
            Err(err) => {
                log::warn!("ignoring unreadable state {}: {err}", path.display());
                State::default()
            }
        };
        Self {
            path,
            data: Mutex::new(data),
        }
    }

    pub fn read(&self) -> State {
        match self.data.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn update<F>(&self, transform: F) -> AppResult<State>
    where
        F: FnOnce(&mut State),
    {
        let mut guard = self
            .data
            .lock()
            .map_err(|_| AppError::state("state mutex poisoned"))?;
        transform(&mut guard);
        write_state(&self.path, &guard)?;
        Ok(guard.clone())
    }

    pub fn record_run(&self, at: DateTime<Utc>) -> AppResult<State> {
        self.update(|state| state.last_run = Some(at.to_rfc3339()))
    }
}

fn read_state(path: &Path) -> AppResult<State> {
    if !path.exists() {
        return Ok(State::default());
    }
    let contents = fs::read_to_string(path).map_err(|err| AppError::io(path, err))?;
    Ok(serde_json::from_str(&contents)?)
}

fn write_state(path: &Path, state: &State) -> AppResult<()> {
    utils::ensure_parent(path);
    let contents = serde_json::to_string_pretty(state)?;
    fs::write(path, contents).map_err(|err| AppError::io(path, err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::tempdir;

    #[test]
    fn missing_file_is_never_run() {
        let dir = tempdir().expect("tempdir");
        let store = StateStore::load(dir.path().join("state.json"));
        assert_eq!(store.read(), State::default());
    }

    #[test]
    fn corrupt_file_is_never_run() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("state.json");
        fs::write(&path, "{not json").expect("write");
        assert_eq!(StateStore::load(&path).read().last_run, None);
    }

    #[test]
    fn record_run_persists() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("state.json");
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 8, 30, 0).unwrap();

        StateStore::load(&path).record_run(at).expect("record run");

        let reloaded = StateStore::load(&path).read();
        assert_eq!(reloaded.last_run_at(), Some(at));
        let raw = fs::read_to_string(&path).expect("read back");
        assert!(raw.contains("\"lastRun\""));
    }
}
