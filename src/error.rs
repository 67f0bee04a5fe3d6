use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Page extraction failed: {0}")]
    Extract(String),

    #[error("Scrape failed: {0}")]
    Scrape(String),

    #[error("Ranking failed: {0}")]
    Rank(String),

    #[error("State error: {0}")]
    State(String),

    #[error("Error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

impl AppError {
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn extract<S: Into<String>>(msg: S) -> Self {
        Self::Extract(msg.into())
    }

    pub fn scrape<S: Into<String>>(msg: S) -> Self {
        Self::Scrape(msg.into())
    }

    pub fn rank<S: Into<String>>(msg: S) -> Self {
        Self::Rank(msg.into())
    }

    pub fn state<S: Into<String>>(msg: S) -> Self {
        Self::State(msg.into())
    }
}

pub type AppResult<T> = Result<T, AppError>;
