use embedded_hal::spi::SpiDevice;
use log::{debug, error, info};
use thiserror::Error;

use crate::config::{AccelConfig, ConfigError};
use crate::registers::{
    burst_read, AXIS_DATA_LEN, DATAX0, DATA_FORMAT, POWER_CTL, POWER_CTL_MEASURE,
};

#[derive(Debug, Error)]
pub enum DeviceError<E> {
    #[error("spi bus error: {0:?}")]
    Bus(E),
    #[error("accelerometer has not been configured")]
    NotConfigured,
    #[error("accelerometer configuration failed; reader must be rebuilt")]
    Unusable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderState {
    Uninitialized,
    Configured,
    Failed,
}

/// Raw counts for the three axes as the sensor reports them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawAxisSample {
    pub x: i16,
    pub y: i16,
    pub z: i16,
}

impl RawAxisSample {
    /// Combines the six data registers, low byte first per axis.
    ///
    /// `from_le_bytes` fixes the byte order regardless of the host, so a
    /// big-endian host needs no separate swap.
    pub fn from_le_bytes(data: [u8; AXIS_DATA_LEN]) -> Self {
        Self {
            x: i16::from_le_bytes([data[0], data[1]]),
            y: i16::from_le_bytes([data[2], data[3]]),
            z: i16::from_le_bytes([data[4], data[5]]),
        }
    }

    pub fn to_acceleration(self, units_per_g: f64) -> Acceleration {
        Acceleration {
            x: f64::from(self.x) / units_per_g,
            y: f64::from(self.y) / units_per_g,
            z: f64::from(self.z) / units_per_g,
        }
    }
}

/// Acceleration in G.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Acceleration {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Reads a 3-axis accelerometer through a full-duplex SPI device.
///
/// The reader must be configured once before sampling. A failed
/// configuration is terminal: later calls fail without touching the bus.
pub struct AccelerometerReader<SPI> {
    spi: SPI,
    config: AccelConfig,
    state: ReaderState,
}

impl<SPI: SpiDevice> AccelerometerReader<SPI> {
    pub fn new(spi: SPI, config: AccelConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            spi,
            config,
            state: ReaderState::Uninitialized,
        })
    }

    pub fn state(&self) -> ReaderState {
        self.state
    }

    pub fn config(&self) -> &AccelConfig {
        &self.config
    }

    /// Sets the measurement range, then switches the part into measure mode.
    pub fn configure(&mut self) -> Result<(), DeviceError<SPI::Error>> {
        if self.state == ReaderState::Failed {
            return Err(DeviceError::Unusable);
        }

        let result = self
            .spi
            .write(&[DATA_FORMAT, self.config.range_code])
            .and_then(|()| self.spi.write(&[POWER_CTL, POWER_CTL_MEASURE]));

        match result {
            Ok(()) => {
                info!(
                    "accelerometer configured: range code {:#04X}, {} units/G",
                    self.config.range_code,
                    self.config.units_per_g()
                );
                self.state = ReaderState::Configured;
                Ok(())
            }
            Err(e) => {
                error!("accelerometer configuration failed: {e:?}");
                self.state = ReaderState::Failed;
                Err(DeviceError::Bus(e))
            }
        }
    }

    /// Burst-reads X, Y and Z in a single duplex transfer.
    pub fn read_sample(&mut self) -> Result<Acceleration, DeviceError<SPI::Error>> {
        match self.state {
            ReaderState::Uninitialized => return Err(DeviceError::NotConfigured),
            ReaderState::Failed => return Err(DeviceError::Unusable),
            ReaderState::Configured => {}
        }

        let mut write_buf = [0u8; AXIS_DATA_LEN + 1];
        write_buf[0] = burst_read(DATAX0);
        let mut read_buf = [0u8; AXIS_DATA_LEN + 1];
        self.spi
            .transfer(&mut read_buf, &write_buf)
            .map_err(DeviceError::Bus)?;

        // The byte clocked in alongside the address is not data.
        let [_, data @ ..] = read_buf;
        let raw = RawAxisSample::from_le_bytes(data);
        let acceleration = raw.to_acceleration(self.config.units_per_g());
        debug!("raw {:?} -> {:?}", raw, acceleration);
        Ok(acceleration)
    }

    pub fn is_alert_condition(&self, acceleration: Acceleration) -> bool {
        acceleration.z < self.config.alert_threshold_g
    }

    /// Hands the bus back to the caller.
    pub fn release(self) -> SPI {
        self.spi
    }
}
