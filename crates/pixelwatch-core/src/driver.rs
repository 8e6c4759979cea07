use log::debug;

use crate::error::StripError;
use crate::firmata::{encode, FirmataSink, Packing};
use crate::strip::{Color, Frame, LedStripController};

/// Sends encoded strip frames through a sink.
pub struct StripDriver<S> {
    strip: LedStripController,
    sink: S,
    packing: Packing,
}

impl<S: FirmataSink> StripDriver<S> {
    pub fn new(strip: LedStripController, sink: S, packing: Packing) -> Self {
        Self { strip, sink, packing }
    }

    pub fn strip(&self) -> &LedStripController {
        &self.strip
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Paints every pixel and latches the strip with one trailing SHOW.
    pub fn fill(&mut self, color: Color) -> Result<(), StripError> {
        for frame in self.strip.set_all_pixels(color) {
            self.send(&frame)?;
        }
        self.show()
    }

    /// Updates one pixel; it becomes visible on the next `show`.
    pub fn set_pixel(&mut self, index: usize, color: Color) -> Result<(), StripError> {
        let frame = self.strip.set_pixel(index, color)?;
        self.send(&frame)
    }

    pub fn show(&mut self) -> Result<(), StripError> {
        let frame = self.strip.show();
        self.send(&frame)
    }

    fn send(&mut self, frame: &Frame) -> Result<(), StripError> {
        debug!("sysex {:#04X} {:?}", frame.tag, frame.payload);
        self.sink.send(&encode(frame, self.packing))?;
        Ok(())
    }
}
