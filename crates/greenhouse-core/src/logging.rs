//! File-based logger with size-based rotation.
//!
//! Logs are written to `~/.greenhouse/logs/greenhouse.log`. When the
//! file exceeds the configured max size, it is rotated to
//! `greenhouse.log.1` (one backup kept). The logger plugs into the `log`
//! facade, so the rest of the workspace just uses `log::info!` and
//! friends.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use log::{LevelFilter, Log, Metadata, Record};
use serde::{Deserialize, Serialize};

const LOG_FILE_NAME: &str = "greenhouse.log";
const BACKUP_FILE_NAME: &str = "greenhouse.log.1";

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Whether file logging is enabled. Defaults to `false`.
    pub enabled: bool,
    /// Minimum log level: "debug", "info", "warn", or "error".
    pub level: String,
    /// Maximum log file size in megabytes before rotation.
    pub max_file_mb: u64,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            level: "info".into(),
            max_file_mb: 10,
        }
    }
}

impl LogConfig {
    /// Configured level, `Info` when unrecognised.
    pub fn level_filter(&self) -> LevelFilter {
        LevelFilter::from_str(self.level.trim()).unwrap_or(LevelFilter::Info)
    }
}

/// A rotating log file.
pub struct FileLogger {
    min_level: LevelFilter,
    state: Mutex<State>,
}

struct State {
    file: File,
    path: PathBuf,
    max_bytes: u64,
    written: u64,
}

impl FileLogger {
    /// Opens (or creates) `greenhouse.log` in `dir` for appending.
    pub fn open(dir: &Path, min_level: LevelFilter, max_bytes: u64) -> std::io::Result<Self> {
        fs::create_dir_all(dir)?;
        let path = dir.join(LOG_FILE_NAME);
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let written = file.metadata().map(|m| m.len()).unwrap_or(0);

        Ok(Self {
            min_level,
            state: Mutex::new(State {
                file,
                path,
                max_bytes,
                written,
            }),
        })
    }
}

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.min_level
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let Ok(mut state) = self.state.lock() else {
            return;
        };
        let line = format!(
            "{now} [{lvl}] {args}\n",
            now = timestamp(),
            lvl = record.level(),
            args = record.args()
        );

        let _ = state.file.write_all(line.as_bytes());
        state.written += line.len() as u64;

        if state.max_bytes > 0 && state.written >= state.max_bytes {
            state.rotate();
        }
    }

    fn flush(&self) {
        if let Ok(mut state) = self.state.lock() {
            let _ = state.file.flush();
        }
    }
}

impl State {
    fn rotate(&mut self) {
        let backup = self.path.with_file_name(BACKUP_FILE_NAME);
        let _ = fs::rename(&self.path, &backup);
        if let Ok(f) = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
        {
            self.file = f;
        }
        self.written = 0;
    }
}

/// Installs the file logger as the global `log` backend.
///
/// Does nothing if `config.enabled` is `false` or the log directory
/// cannot be opened. Only the first call has any effect.
pub fn init(config: &LogConfig) {
    if !config.enabled {
        return;
    }
    let Ok(dir) = crate::config::log_dir() else {
        return;
    };
    let level = config.level_filter();
    let Ok(logger) = FileLogger::open(&dir, level, config.max_file_mb * 1024 * 1024) else {
        return;
    };
    if log::set_boxed_logger(Box::new(logger)).is_ok() {
        log::set_max_level(level);
    }
}

fn timestamp() -> String {
    let dur = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    let secs = dur.as_secs();
    let (h, m, s) = (secs / 3600 % 24, secs / 60 % 60, secs % 60);
    format!("{h:02}:{m:02}:{s:02}.{ms:03}", ms = dur.subsec_millis())
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Level;

    fn read(dir: &Path, name: &str) -> String {
        fs::read_to_string(dir.join(name)).unwrap_or_default()
    }

    #[test]
    fn unknown_level_falls_back_to_info() {
        // Arrange
        let config = LogConfig {
            level: "chatty".into(),
            ..Default::default()
        };

        // Assert
        assert_eq!(config.level_filter(), LevelFilter::Info);
        assert_eq!(
            LogConfig {
                level: "DEBUG".into(),
                ..Default::default()
            }
            .level_filter(),
            LevelFilter::Debug
        );
    }

    #[test]
    fn records_below_min_level_are_dropped() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let logger = FileLogger::open(dir.path(), LevelFilter::Warn, 0).unwrap();

        // Act
        logger.log(&Record::builder().level(Level::Info).args(format_args!("quiet")).build());
        logger.log(&Record::builder().level(Level::Error).args(format_args!("loud")).build());
        logger.flush();

        // Assert
        let content = read(dir.path(), LOG_FILE_NAME);
        assert!(!content.contains("quiet"));
        assert!(content.contains("[ERROR] loud"));
    }

    #[test]
    fn oversized_log_rotates_to_single_backup() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let logger = FileLogger::open(dir.path(), LevelFilter::Info, 32).unwrap();

        // Act
        for i in 0..3 {
            logger.log(
                &Record::builder()
                    .level(Level::Info)
                    .args(format_args!("line {i} padded to cross the rotation limit"))
                    .build(),
            );
        }
        logger.flush();

        // Assert
        assert!(read(dir.path(), BACKUP_FILE_NAME).contains("line 2"));
        assert!(read(dir.path(), LOG_FILE_NAME).is_empty());
        assert!(!dir.path().join("greenhouse.log.2").exists());
    }
}
