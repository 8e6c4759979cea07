use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::registers::RANGE_4G;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("dynamic range must be non-zero")]
    ZeroRange,
    #[error("resolution must be non-zero")]
    ZeroResolution,
    #[error("alert threshold {0} is not a finite number")]
    InvalidThreshold(f64),
}

/// Sensor range and alert policy.
///
/// `dynamic_range_g` is the full span of the configured range, so +-4G is 8.
/// Raw counts are divided by `resolution / dynamic_range_g` to get G.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccelConfig {
    /// Written to DATA_FORMAT by `configure`.
    pub range_code: u8,
    pub dynamic_range_g: u16,
    pub resolution: u16,
    /// Z readings strictly below this raise an alert.
    pub alert_threshold_g: f64,
}

impl Default for AccelConfig {
    fn default() -> Self {
        Self {
            range_code: RANGE_4G,
            dynamic_range_g: 8,
            resolution: 1024,
            alert_threshold_g: 0.5,
        }
    }
}

impl AccelConfig {
    pub fn units_per_g(&self) -> f64 {
        f64::from(self.resolution) / f64::from(self.dynamic_range_g)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dynamic_range_g == 0 {
            return Err(ConfigError::ZeroRange);
        }
        if self.resolution == 0 {
            return Err(ConfigError::ZeroResolution);
        }
        if !self.alert_threshold_g.is_finite() {
            return Err(ConfigError::InvalidThreshold(self.alert_threshold_g));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub interval_ms: u64,
    pub accel: AccelConfig,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            interval_ms: 100,
            accel: AccelConfig::default(),
        }
    }
}

impl MonitorConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}
