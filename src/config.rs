use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

pub const DEFAULT_DAYS_AHEAD: u32 = 14;

/// User settings read from `config/config.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    /// Calendar pages to scrape, in priority order.
    #[serde(default)]
    pub urls: Vec<String>,
    /// Free-text interest profile handed to the ranker.
    #[serde(default)]
    pub filter_text: String,
    #[serde(default = "default_days_ahead")]
    pub days_ahead: u32,
}

fn default_days_ahead() -> u32 {
    DEFAULT_DAYS_AHEAD
}

impl AppConfig {
    /// Reads and validates the config file. A missing file is an error.
    pub fn load(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Err(AppError::config(format!(
                "config file not found: {}",
                path.display()
            )));
        }
        let contents = fs::read_to_string(path).map_err(|err| AppError::io(path, err))?;
        let config: AppConfig = serde_json::from_str(&contents)
            .map_err(|err| AppError::config(format!("invalid {}: {err}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.days_ahead == 0 {
            return Err(AppError::config("daysAhead must be a positive integer"));
        }
        if self.urls.is_empty() {
            log::warn!("no urls configured; nothing will be scraped");
        }
        if self.filter_text.trim().is_empty() {
            log::warn!("filterText is empty; ranking will have no interests to match");
        }
        Ok(())
    }
}
