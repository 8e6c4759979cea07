use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::error::{FrameError, TransportError};
use crate::strip::Frame;

pub const START_SYSEX: u8 = 0xF0;
pub const END_SYSEX: u8 = 0xF7;

/// How payload bytes are laid out between the sysex markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Packing {
    /// Bytes go out verbatim; the NeoPixel sketch reads `argv[n]` as-is.
    #[default]
    Raw,
    /// Every byte becomes an LSB-7 / MSB pair, keeping the body below 0x80.
    SevenBit,
}

pub fn encode(frame: &Frame, packing: Packing) -> Vec<u8> {
    let mut out = Vec::with_capacity(3 + frame.payload.len() * 2);
    out.push(START_SYSEX);
    out.push(frame.tag);
    match packing {
        Packing::Raw => out.extend_from_slice(&frame.payload),
        Packing::SevenBit => {
            for &b in &frame.payload {
                out.push(b & 0x7F);
                out.push(b >> 7);
            }
        }
    }
    out.push(END_SYSEX);
    out
}

pub fn decode(bytes: &[u8], packing: Packing) -> Result<Frame, FrameError> {
    let body = bytes.strip_prefix(&[START_SYSEX]).ok_or(FrameError::MissingStart)?;
    let body = body.strip_suffix(&[END_SYSEX]).ok_or(FrameError::MissingEnd)?;
    let (&tag, data) = body.split_first().ok_or(FrameError::Empty)?;

    let payload = match packing {
        Packing::Raw => data.to_vec(),
        Packing::SevenBit => {
            if data.len() % 2 != 0 {
                return Err(FrameError::OddPacking);
            }
            data.chunks_exact(2)
                .map(|pair| {
                    let (lsb, msb) = (pair[0], pair[1]);
                    if lsb < 0x80 && msb <= 1 {
                        Ok(lsb | (msb << 7))
                    } else {
                        Err(FrameError::BadPacking { lsb, msb })
                    }
                })
                .collect::<Result<_, _>>()?
        }
    };
    Ok(Frame { tag, payload })
}

/// Anything that can carry an encoded frame to the microcontroller.
pub trait FirmataSink {
    fn send(&mut self, bytes: &[u8]) -> Result<(), TransportError>;
}

impl<S: FirmataSink + ?Sized> FirmataSink for &mut S {
    fn send(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        (**self).send(bytes)
    }
}

/// Sink over any `Write`; each frame is flushed as soon as it is written.
#[derive(Debug, Default)]
pub struct WriteSink<W> {
    inner: W,
}

impl<W: Write> WriteSink<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> FirmataSink for WriteSink<W> {
    fn send(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        self.inner.write_all(bytes)?;
        self.inner.flush()?;
        Ok(())
    }
}
