//! NeoPixel strip control over a custom Firmata sketch: frame encoding, sysex
//! framing, and the serial transport that carries it.

pub mod blink;
pub mod driver;
pub mod error;
pub mod firmata;
pub mod serial_service;
pub mod strip;

pub use blink::Blinker;
pub use driver::StripDriver;
pub use error::{FrameError, StripError, TransportError};
pub use firmata::{FirmataSink, Packing, WriteSink};
pub use serial_service::{PortInfo, SerialConfig, SerialEvent, SerialService};
pub use strip::{Color, Frame, FrameKind, LedStripController, NamedColor};
