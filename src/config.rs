//! Configuration management for ytloop
//!
//! The config lives at `$YTLOOP_CONFIG` or `<config_dir>/ytloop/config.toml`.
//! Every section is optional; missing fields take their defaults so an old
//! file keeps working after an upgrade. `ytloop config migrate` writes the
//! missing fields back while preserving comments and formatting.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use toml_edit::{DocumentMut, Item, Table};

use crate::backend::{BackendKind, MpvConfig};

/// Environment variable that overrides the config file location.
pub const CONFIG_ENV: &str = "YTLOOP_CONFIG";

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default)]
    pub playback: PlaybackConfig,
    #[serde(default)]
    pub link: LinkConfig,
}

/// Which player to drive and how to launch it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub backend: BackendKind,
    /// mpv executable, looked up on PATH unless absolute
    pub mpv_path: String,
    /// Extra arguments for mpv (e.g. `--ytdl-format=...`)
    pub mpv_args: Vec<String>,
    /// Pause as soon as the video is ready instead of autoplaying
    pub pause_on_ready: bool,
    /// Length of the video the simulated backend pretends to play
    pub simulated_duration_secs: f64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Mpv,
            mpv_path: "mpv".to_string(),
            mpv_args: Vec::new(),
            pause_on_ready: true,
            simulated_duration_secs: 212.0,
        }
    }
}

impl PlayerConfig {
    /// Launch settings for the mpv backend.
    pub fn mpv_config(&self) -> MpvConfig {
        MpvConfig {
            program: self.mpv_path.clone(),
            extra_args: self.mpv_args.clone(),
            ..MpvConfig::default()
        }
    }
}

/// Looping behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Video opened when no input is given
    pub default_video: String,
    pub default_speed: f64,
    /// How often the progress display is refreshed while playing
    pub progress_interval_ms: u64,
    /// How often the loop end is checked while playing
    pub loop_interval_ms: u64,
    /// Slider granularity and minimum loop length
    pub range_step_secs: f64,
    /// Arrow key seek distance
    pub seek_step_secs: f64,
    /// Whether looping is on at startup
    pub repeat: bool,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            default_video: "dQw4w9WgXcQ".to_string(),
            default_speed: 1.0,
            progress_interval_ms: 50,
            loop_interval_ms: 16,
            range_step_secs: 1.0,
            seek_step_secs: 5.0,
            repeat: true,
        }
    }
}

impl PlaybackConfig {
    pub fn progress_interval(&self) -> Duration {
        Duration::from_millis(self.progress_interval_ms.max(1))
    }

    pub fn loop_interval(&self) -> Duration {
        Duration::from_millis(self.loop_interval_ms.max(1))
    }
}

/// How loop links are rendered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    /// URL the query string is appended to; empty prints `?videoId=...`
    pub base_url: String,
}

impl Config {
    /// Load config from file, or return default if not exists
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config file: {:?}", config_path))?;
            let config: Config = toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", config_path))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

        Ok(())
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
            return Ok(PathBuf::from(path));
        }
        let config_dir = dirs::config_dir().context("Could not determine config directory")?;
        Ok(config_dir.join("ytloop").join("config.toml"))
    }
}

/// Result of adding missing fields to a config file.
#[derive(Debug, Clone, Default)]
pub struct MigrateResult {
    /// The migrated TOML document
    pub content: String,
    /// Added fields as `section.key`
    pub added_fields: Vec<String>,
    /// Sections that did not exist before
    pub sections_added: Vec<String>,
}

impl MigrateResult {
    pub fn has_changes(&self) -> bool {
        !self.added_fields.is_empty()
    }
}

/// Add every field of the default config that `content` lacks.
///
/// Existing values, unknown keys and comments are kept as they are.
pub fn migrate_config(content: &str) -> Result<MigrateResult> {
    let mut doc: DocumentMut = content.parse().context("Failed to parse config as TOML")?;
    let defaults: DocumentMut = toml::to_string_pretty(&Config::default())
        .context("Failed to serialize default config")?
        .parse()
        .context("Failed to parse default config")?;

    let mut result = MigrateResult::default();

    for (section, default_item) in defaults.iter() {
        let Some(default_table) = default_item.as_table() else {
            continue;
        };

        if !doc.contains_key(section) {
            doc.insert(section, Item::Table(Table::new()));
            result.sections_added.push(section.to_string());
        }
        let table = doc[section]
            .as_table_mut()
            .with_context(|| format!("Config section [{}] is not a table", section))?;

        for (key, value) in default_table.iter() {
            if !table.contains_key(key) {
                table.insert(key, value.clone());
                result.added_fields.push(format!("{}.{}", section, key));
            }
        }
    }

    result.content = doc.to_string();
    Ok(result)
}
