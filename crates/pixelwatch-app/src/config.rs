use anyhow::{Context, Result};
use log::info;
use pixelwatch_core::serial_service::FIRMATA_BAUD_RATE;
use pixelwatch_core::strip::DEFAULT_STRIP_LENGTH;
use pixelwatch_core::{NamedColor, Packing, SerialConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialSettings {
    pub port_name: String,
    pub baud_rate: u32,
}

impl Default for SerialSettings {
    fn default() -> Self {
        Self {
            port_name: String::new(),
            baud_rate: FIRMATA_BAUD_RATE,
        }
    }
}

impl SerialSettings {
    pub fn to_serial_config(&self) -> SerialConfig {
        SerialConfig {
            port_name: self.port_name.clone(),
            baud_rate: self.baud_rate,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub serial: SerialSettings,
    pub strip_length: usize,
    pub color: NamedColor,
    /// Blink period in 100 ms steps.
    pub blink_steps: u32,
    pub packing: Packing,
    /// Stop after this many ticks; 0 runs until the port closes.
    pub ticks: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            serial: SerialSettings::default(),
            strip_length: DEFAULT_STRIP_LENGTH,
            color: NamedColor::Blue,
            blink_steps: 1,
            packing: Packing::Raw,
            ticks: 0,
        }
    }
}

impl AppConfig {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("pixelwatch").join("config.json"))
    }

    /// Reads `path` if given, otherwise the per-user config file if it exists,
    /// otherwise falls back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Some(path) if path.exists() => path,
                _ => {
                    info!("no config file found, using defaults");
                    return Ok(Self::default());
                }
            },
        };
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config = Self::from_json(&text).with_context(|| format!("parsing {}", path.display()))?;
        info!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}
