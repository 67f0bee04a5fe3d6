use std::env;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, Utc};
use env_logger::{Builder, Target};
use log::LevelFilter;

pub fn level_from_str(value: &str) -> LevelFilter {
    match value.to_lowercase().as_str() {
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        "off" => LevelFilter::Off,
        _ => LevelFilter::Info,
    }
}

pub fn log_file_path(logs_dir: &Path, day: NaiveDate) -> PathBuf {
    logs_dir.join(format!("{}.log", day.format("%Y-%m-%d")))
}

/// Writes every log line to stdout and, when available, to the day's file.
struct TeeWriter {
    file: Option<File>,
}

impl Write for TeeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stdout().write_all(buf)?;
        if let Some(file) = self.file.as_mut() {
            if file.write_all(buf).is_err() {
                self.file = None;
            }
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stdout().flush()?;
        if let Some(file) = self.file.as_mut() {
            file.flush()?;
        }
        Ok(())
    }
}

fn open_log_file(logs_dir: &Path) -> Option<File> {
    if let Err(err) = fs::create_dir_all(logs_dir) {
        eprintln!("failed to create logs dir {:?}: {err}", logs_dir);
        return None;
    }
    let path = log_file_path(logs_dir, Utc::now().date_naive());
    match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(file) => Some(file),
        Err(err) => {
            eprintln!("failed to open log file {:?}: {err}", path);
            None
        }
    }
}

/// Installs the global logger. `RUST_LOG` picks the level (default `info`).
/// Calling it twice is harmless; the second call is ignored.
pub fn init_logging(logs_dir: &Path) {
    let level = level_from_str(&env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()));

    let mut builder = Builder::new();
    builder.format(|buf, record| {
        writeln!(
            buf,
            "[{}] [{}] {}",
            Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            record.level(),
            record.args()
        )
    });

    builder
        .filter_level(level)
        .filter_module("reqwest", LevelFilter::Warn)
        .filter_module("hyper", LevelFilter::Warn)
        .filter_module("html5ever", LevelFilter::Warn)
        .filter_module("selectors", LevelFilter::Warn)
        .target(Target::Pipe(Box::new(TeeWriter {
            file: open_log_file(logs_dir),
        })));

    if builder.try_init().is_err() {
        log::debug!("logger already initialized");
    }
}

pub fn log_error_with_context(error: &anyhow::Error, context: &str) {
    log::error!("[{}] {}", context, error);

    for cause in error.chain().skip(1) {
        log::error!("  Caused by: {}", cause);
    }
}
