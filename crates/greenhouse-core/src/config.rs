//! User configuration and on-disk locations.
//!
//! Everything lives under `~/.greenhouse/`: `config.toml`, the saved
//! positions document and the `logs/` directory.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::logging::LogConfig;
use crate::matcher::TieBreak;

const DATA_DIR_NAME: &str = ".greenhouse";
const CONFIG_FILE_NAME: &str = "config.toml";
const POSITIONS_FILE_NAME: &str = "saved_positions.json";

/// Top-level configuration.
///
/// Missing sections fall back to defaults thanks to `#[serde(default)]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub logging: LogConfig,
    pub topology: TopologyConfig,
    pub restore: RestoreConfig,
    pub highlight: HighlightConfig,
    pub matching: MatchingConfig,
}

/// Monitor count polling.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TopologyConfig {
    /// Delay between monitor count samples.
    pub poll_interval_ms: u64,
    /// How long shutdown waits for the polling thread.
    pub stop_timeout_ms: u64,
}

/// Restore behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RestoreConfig {
    /// Pause between the two moves of a cross-monitor restore.
    pub settle_ms: u64,
    /// Restore a saved window as soon as it is relinked after reappearing.
    pub restore_returning_windows: bool,
}

/// Highlight overlay settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    /// Quiet period before a highlight toggle takes effect.
    pub debounce_ms: u64,
    /// Overlay opacity, 0 (invisible) to 255 (opaque).
    pub alpha: u8,
    /// Overlay fill as `#RRGGBB`.
    pub color: String,
}

/// Identity matching.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    pub tie_break: TieBreak,
}

impl Default for TopologyConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 2000,
            stop_timeout_ms: 1000,
        }
    }
}

impl Default for RestoreConfig {
    fn default() -> Self {
        Self {
            settle_ms: 100,
            restore_returning_windows: false,
        }
    }
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 200,
            alpha: 64,
            color: "#00ff00".into(),
        }
    }
}

impl TopologyConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn stop_timeout(&self) -> Duration {
        Duration::from_millis(self.stop_timeout_ms)
    }
}

impl RestoreConfig {
    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }
}

impl HighlightConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Parsed fill colour, green if the configured value is malformed.
    pub fn rgb(&self) -> Color {
        Color::from_hex(&self.color).unwrap_or(Color::GREEN)
    }
}

impl Config {
    /// Clamps values to ranges the rest of the program can rely on.
    pub fn validate(&mut self) {
        self.topology.poll_interval_ms = self.topology.poll_interval_ms.clamp(100, 60_000);
        self.topology.stop_timeout_ms = self.topology.stop_timeout_ms.clamp(0, 30_000);
        self.restore.settle_ms = self.restore.settle_ms.clamp(0, 5_000);
        self.highlight.debounce_ms = self.highlight.debounce_ms.clamp(0, 5_000);
        if Color::from_hex(&self.highlight.color).is_none() {
            log::warn!(
                "invalid highlight color {:?}, using #00ff00",
                self.highlight.color
            );
            self.highlight.color = HighlightConfig::default().color;
        }
    }

    /// Parses a config document and validates it.
    pub fn from_toml(content: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(content)?;
        config.validate();
        Ok(config)
    }
}

/// An RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const GREEN: Color = Color { r: 0, g: 255, b: 0 };

    /// Parses `#RRGGBB` (the `#` is optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        Some(Self {
            r: u8::from_str_radix(&hex[0..2], 16).ok()?,
            g: u8::from_str_radix(&hex[2..4], 16).ok()?,
            b: u8::from_str_radix(&hex[4..6], 16).ok()?,
        })
    }
}

/// Returns the data directory: `~/.greenhouse/`.
pub fn data_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|h| h.join(DATA_DIR_NAME))
        .ok_or(Error::NoHomeDir)
}

/// Returns the config file path: `~/.greenhouse/config.toml`.
pub fn config_path() -> Result<PathBuf> {
    data_dir().map(|d| d.join(CONFIG_FILE_NAME))
}

/// Returns the saved positions path: `~/.greenhouse/saved_positions.json`.
pub fn positions_path() -> Result<PathBuf> {
    data_dir().map(|d| d.join(POSITIONS_FILE_NAME))
}

/// Returns the log directory: `~/.greenhouse/logs/`.
pub fn log_dir() -> Result<PathBuf> {
    data_dir().map(|d| d.join("logs"))
}

/// Tries to load and parse the config file at `path`.
pub fn try_load_from(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)?;
    Config::from_toml(&content)
}

/// Tries to load and parse `~/.greenhouse/config.toml`.
pub fn try_load() -> Result<Config> {
    try_load_from(&config_path()?)
}

/// Loads the configuration, falling back to defaults.
///
/// A missing file silently yields defaults; any other failure is logged.
pub fn load() -> Config {
    match try_load() {
        Ok(config) => config,
        Err(Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Config::default(),
        Err(e) => {
            log::warn!("failed to load config, using defaults: {e}");
            Config::default()
        }
    }
}
