use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use vpet_core::{CharacterId, SimConfig};
use vpet_platform::PlatformConfig;

pub const DEFAULT_CONFIG_PATH: &str = "assets/pet.json";

#[derive(Debug, Deserialize, Clone)]
pub struct PetConfig {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_window_size")]
    pub width: u32,
    #[serde(default = "default_window_size")]
    pub height: u32,
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    #[serde(default = "default_max_queued_steps")]
    pub max_queued_steps: u8,
    /// RGB565 color behind the farthest layer.
    #[serde(default)]
    pub clear_color: u16,
    #[serde(default)]
    pub starting_character: CharacterId,
    /// Relative paths resolve against the config file's directory.
    #[serde(default = "default_manifest_path")]
    pub manifest: PathBuf,
    #[serde(default)]
    pub show_overlay: bool,
}

impl Default for PetConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            width: default_window_size(),
            height: default_window_size(),
            tick_interval_ms: default_tick_interval_ms(),
            max_queued_steps: default_max_queued_steps(),
            clear_color: 0,
            starting_character: CharacterId::default(),
            manifest: default_manifest_path(),
            show_overlay: false,
        }
    }
}

impl PetConfig {
    pub fn platform_config(&self) -> PlatformConfig {
        PlatformConfig {
            title: self.title.clone(),
            width: self.width,
            height: self.height,
            ..PlatformConfig::default()
        }
    }

    pub fn sim_config(&self) -> SimConfig {
        SimConfig {
            starting_character: self.starting_character,
            max_queued_steps: self.max_queued_steps,
        }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

pub fn load_config_from_path(path: &Path) -> Result<PetConfig, String> {
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config file {}: {e}", path.display()))?;
    let mut config: PetConfig = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse config JSON {}: {e}", path.display()))?;
    validate_config(&config)?;
    if config.manifest.is_relative() {
        if let Some(dir) = path.parent() {
            config.manifest = dir.join(&config.manifest);
        }
    }
    Ok(config)
}

/// Load `path` if it exists, otherwise fall back to defaults.
pub fn load_config_or_default(path: &Path) -> Result<PetConfig, String> {
    if !path.exists() {
        log::info!("No config at {}, using defaults", path.display());
        return Ok(PetConfig::default());
    }
    load_config_from_path(path)
}

pub fn validate_config(config: &PetConfig) -> Result<(), String> {
    if config.width == 0 || config.height == 0 {
        return Err("Config validation failed: width/height must be > 0".to_string());
    }
    if config.width > i32::MAX as u32 || config.height > i32::MAX as u32 {
        return Err("Config validation failed: width/height out of range".to_string());
    }
    if config.tick_interval_ms == 0 {
        return Err("Config validation failed: tick_interval_ms must be > 0".to_string());
    }
    if config.max_queued_steps == 0 {
        return Err("Config validation failed: max_queued_steps must be >= 1".to_string());
    }
    Ok(())
}

fn default_title() -> String {
    "Virtual Pet".to_string()
}

const fn default_window_size() -> u32 {
    466
}

const fn default_tick_interval_ms() -> u64 {
    16
}

const fn default_max_queued_steps() -> u8 {
    vpet_core::behavior::DEFAULT_MAX_QUEUED_STEPS
}

fn default_manifest_path() -> PathBuf {
    PathBuf::from("manifest.json")
}
