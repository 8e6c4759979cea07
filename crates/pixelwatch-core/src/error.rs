use thiserror::Error;

#[derive(Debug, Error)]
pub enum StripError {
    #[error("pixel index {index} is outside a strip of {len} pixels")]
    InvalidArgument { index: usize, len: usize },
    #[error("strip length {0} is not addressable with a one-byte index")]
    InvalidLength(usize),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("write to device failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("serial worker is no longer running")]
    Disconnected,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrameError {
    #[error("frame does not start with a sysex start byte")]
    MissingStart,
    #[error("frame is not terminated by a sysex end byte")]
    MissingEnd,
    #[error("frame carries no command byte")]
    Empty,
    #[error("seven-bit packed payload has an odd number of bytes")]
    OddPacking,
    #[error("byte pair {lsb:#04X} {msb:#04X} is not a seven-bit packed byte")]
    BadPacking { lsb: u8, msb: u8 },
}
