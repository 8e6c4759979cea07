//! ADXL345 register map and bus settings.

use embedded_hal::spi::{Mode, MODE_3};

pub const POWER_CTL: u8 = 0x2D;
pub const DATA_FORMAT: u8 = 0x31;
pub const DATAX0: u8 = 0x32;
pub const DATAY0: u8 = 0x34;
pub const DATAZ0: u8 = 0x36;

/// Set on the address byte to read instead of write.
pub const READ_BIT: u8 = 0x80;
/// Set on the address byte to auto-increment across registers.
pub const MULTI_BYTE_BIT: u8 = 0x40;

/// POWER_CTL value that enters measurement mode.
pub const POWER_CTL_MEASURE: u8 = 0x08;
/// DATA_FORMAT range code for +-4G.
pub const RANGE_4G: u8 = 0x01;

/// Two bytes for each of X, Y and Z.
pub const AXIS_DATA_LEN: usize = 6;

/// Rated clock of the part.
pub const SPI_CLOCK_HZ: u32 = 5_000_000;
/// Idle-high clock, sample on the trailing edge.
pub const SPI_MODE: Mode = MODE_3;

/// Address byte of a burst read starting at `reg`.
pub const fn burst_read(reg: u8) -> u8 {
    reg | READ_BIT | MULTI_BYTE_BIT
}
