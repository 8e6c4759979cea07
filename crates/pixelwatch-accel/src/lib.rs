//! ADXL345-class accelerometer sampling over SPI.

pub mod config;
pub mod monitor;
pub mod reader;
pub mod registers;

pub use config::{AccelConfig, ConfigError, MonitorConfig};
pub use monitor::{Monitor, MonitorEvent, StartError, EVENT_QUEUE_LEN};
pub use reader::{Acceleration, AccelerometerReader, DeviceError, RawAxisSample, ReaderState};
