use std::{fs, path::Path};

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};

use crate::error::{AppError, AppResult};
use crate::models::{Event, FilteredData, FilteredEvent, ScrapedData};
use crate::utils::{self, Paths};

/// JSON files holding the latest scrape and the latest ranking. Each save
/// replaces the previous run's output.
pub struct Store {
    paths: Paths,
}

impl Store {
    pub fn new(paths: Paths) -> Self {
        Self { paths }
    }

    pub fn save_scraped(&self, events: &[Event], at: DateTime<Utc>) -> AppResult<ScrapedData> {
        let data = ScrapedData {
            scraped_at: at.to_rfc3339(),
            events: events.to_vec(),
        };
        let path = self.paths.scraped_events_path();
        write_json(&path, &data)?;
        log::info!("saved {} events to {}", data.events.len(), path.display());
        Ok(data)
    }

    pub fn load_scraped(&self) -> AppResult<ScrapedData> {
        let path = self.paths.scraped_events_path();
        if !path.exists() {
            return Err(AppError::config(format!(
                "events file not found: {}. Run the scraper first.",
                path.display()
            )));
        }
        read_json(&path)
    }

    pub fn save_filtered(
        &self,
        filter_text: &str,
        events: &[FilteredEvent],
        at: DateTime<Utc>,
    ) -> AppResult<FilteredData> {
        let data = FilteredData {
            filtered_at: at.to_rfc3339(),
            filter_text: filter_text.to_string(),
            events: events.to_vec(),
        };
        let path = self.paths.filtered_events_path();
        write_json(&path, &data)?;
        log::info!(
            "saved {} ranked events to {}",
            data.events.len(),
            path.display()
        );
        Ok(data)
    }

    /// `None` until a ranking has been saved.
    pub fn load_filtered(&self) -> AppResult<Option<FilteredData>> {
        let path = self.paths.filtered_events_path();
        if !path.exists() {
            return Ok(None);
        }
        read_json(&path).map(Some)
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> AppResult<T> {
    let contents = fs::read_to_string(path).map_err(|err| AppError::io(path, err))?;
    Ok(serde_json::from_str(&contents)?)
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> AppResult<()> {
    utils::ensure_parent(path);
    let contents = serde_json::to_string_pretty(value)?;
    fs::write(path, contents).map_err(|err| AppError::io(path, err))
}
