use dirs::data_dir;
use once_cell::sync::Lazy;
use std::{
    fs,
    path::{Path, PathBuf},
};

pub const HOME_ENV: &str = "LUMA_SCRAPE_HOME";

static DATA_ROOT: Lazy<PathBuf> = Lazy::new(|| {
    let root = std::env::var_os(HOME_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            let base = data_dir()
                .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));
            base.join("luma-scrape")
        });
    if let Err(err) = fs::create_dir_all(&root) {
        eprintln!("failed to create data root {:?}: {err}", root);
    }
    root
});

pub fn data_root() -> PathBuf {
    DATA_ROOT.clone()
}

/// File locations below one application home.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    root: PathBuf,
}

impl Paths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn from_env() -> Self {
        Self::new(data_root())
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join("config").join("config.json")
    }

    pub fn state_path(&self) -> PathBuf {
        self.root.join("config").join("state.json")
    }

    pub fn scraped_events_path(&self) -> PathBuf {
        self.root.join("data").join("all-events.json")
    }

    pub fn filtered_events_path(&self) -> PathBuf {
        self.root.join("data").join("filtered-events.json")
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.root.join("logs")
    }
}

pub fn ensure_parent(path: &Path) {
    if let Some(parent) = path.parent() {
        if let Err(err) = fs::create_dir_all(parent) {
            log::warn!("failed to create parent {:?}: {err}", parent);
        }
    }
}

/// Truncates to at most `max_chars` characters without splitting a code point.
pub fn truncate_chars(input: &str, max_chars: usize) -> &str {
    match input.char_indices().nth(max_chars) {
        Some((idx, _)) => &input[..idx],
        None => input,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_under_root() {
        let paths = Paths::new("/tmp/home");
        assert_eq!(
            paths.config_path(),
            PathBuf::from("/tmp/home/config/config.json")
        );
        assert_eq!(
            paths.state_path(),
            PathBuf::from("/tmp/home/config/state.json")
        );
        assert_eq!(
            paths.scraped_events_path(),
            PathBuf::from("/tmp/home/data/all-events.json")
        );
        assert_eq!(
            paths.filtered_events_path(),
            PathBuf::from("/tmp/home/data/filtered-events.json")
        );
        assert_eq!(paths.logs_dir(), PathBuf::from("/tmp/home/logs"));
    }

    #[test]
    fn truncates_on_char_boundary() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("", 3), "");
    }
}
