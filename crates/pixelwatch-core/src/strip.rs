use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

use crate::error::StripError;

/// Custom SysEx command understood by the NeoPixel Firmata sketch: set one pixel.
pub const NEOPIXEL_SET_COMMAND: u8 = 0x42;
/// Custom SysEx command understood by the NeoPixel Firmata sketch: latch the strip.
pub const NEOPIXEL_SHOW_COMMAND: u8 = 0x44;

pub const DEFAULT_STRIP_LENGTH: usize = 30;
/// The pixel index travels as a single payload byte.
pub const MAX_STRIP_LENGTH: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Color {
    pub const OFF: Color = Color::new(0, 0, 0);

    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NamedColor {
    Red,
    Green,
    Blue,
    Yellow,
    Cyan,
    Magenta,
}

const NAMED_COLORS: [(NamedColor, &str, Color); 6] = [
    (NamedColor::Red, "Red", Color::new(255, 0, 0)),
    (NamedColor::Green, "Green", Color::new(0, 255, 0)),
    (NamedColor::Blue, "Blue", Color::new(0, 0, 255)),
    (NamedColor::Yellow, "Yellow", Color::new(255, 255, 0)),
    (NamedColor::Cyan, "Cyan", Color::new(0, 255, 255)),
    (NamedColor::Magenta, "Magenta", Color::new(255, 0, 255)),
];

impl NamedColor {
    pub const ALL: [NamedColor; 6] = [
        NamedColor::Red,
        NamedColor::Green,
        NamedColor::Blue,
        NamedColor::Yellow,
        NamedColor::Cyan,
        NamedColor::Magenta,
    ];

    pub fn color(self) -> Color {
        NAMED_COLORS[self as usize].2
    }

    pub fn name(self) -> &'static str {
        NAMED_COLORS[self as usize].1
    }
}

impl From<NamedColor> for Color {
    fn from(named: NamedColor) -> Self {
        named.color()
    }
}

impl std::str::FromStr for NamedColor {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NAMED_COLORS
            .iter()
            .find(|(_, name, _)| name.eq_ignore_ascii_case(s.trim()))
            .map(|(named, _, _)| *named)
            .ok_or(())
    }
}

/// Accepts any capitalization, like `FromStr`.
impl<'de> Deserialize<'de> for NamedColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        const NAMES: &[&str] = &["Red", "Green", "Blue", "Yellow", "Cyan", "Magenta"];
        let name = String::deserialize(deserializer)?;
        name.parse()
            .map_err(|()| <D::Error as de::Error>::unknown_variant(&name, NAMES))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    Set,
    Show,
}

impl FrameKind {
    pub fn tag(self) -> u8 {
        match self {
            FrameKind::Set => NEOPIXEL_SET_COMMAND,
            FrameKind::Show => NEOPIXEL_SHOW_COMMAND,
        }
    }
}

/// One outbound extended command: a command tag plus its payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub tag: u8,
    pub payload: Vec<u8>,
}

impl Frame {
    pub fn kind(&self) -> Option<FrameKind> {
        match self.tag {
            NEOPIXEL_SET_COMMAND => Some(FrameKind::Set),
            NEOPIXEL_SHOW_COMMAND => Some(FrameKind::Show),
            _ => None,
        }
    }

    /// Reads back the pixel index and color of a SET frame.
    pub fn pixel(&self) -> Option<(u8, Color)> {
        match (self.kind(), self.payload.as_slice()) {
            (Some(FrameKind::Set), &[index, red, green, blue]) => {
                Some((index, Color::new(red, green, blue)))
            }
            _ => None,
        }
    }
}

/// Encodes pixel updates for a strip of fixed length.
///
/// Holds no state besides the length: every call builds fresh frames, and
/// callers are expected to follow a batch of SET frames with a single SHOW.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedStripController {
    len: usize,
}

impl Default for LedStripController {
    fn default() -> Self {
        Self { len: DEFAULT_STRIP_LENGTH }
    }
}

impl LedStripController {
    pub fn new(len: usize) -> Result<Self, StripError> {
        if len == 0 || len > MAX_STRIP_LENGTH {
            return Err(StripError::InvalidLength(len));
        }
        Ok(Self { len })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn set_pixel(&self, index: usize, color: Color) -> Result<Frame, StripError> {
        if index >= self.len {
            return Err(StripError::InvalidArgument { index, len: self.len });
        }
        Ok(Self::set_frame(index as u8, color))
    }

    pub fn set_all_pixels(&self, color: Color) -> Vec<Frame> {
        (0..self.len).map(|i| Self::set_frame(i as u8, color)).collect()
    }

    pub fn show(&self) -> Frame {
        Frame {
            tag: NEOPIXEL_SHOW_COMMAND,
            payload: Vec::new(),
        }
    }

    fn set_frame(index: u8, color: Color) -> Frame {
        Frame {
            tag: NEOPIXEL_SET_COMMAND,
            payload: vec![index, color.red, color.green, color.blue],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_pixel_payload_is_index_then_rgb() {
        let strip = LedStripController::default();
        for index in [0usize, 1, 17, 29] {
            let color = Color::new(index as u8, 200, 7);
            let frame = strip.set_pixel(index, color).unwrap();
            assert_eq!(frame.tag, NEOPIXEL_SET_COMMAND);
            assert_eq!(frame.payload, vec![index as u8, index as u8, 200, 7]);
        }
    }

    #[test]
    fn set_pixel_rejects_out_of_range() {
        let strip = LedStripController::default();
        let err = strip.set_pixel(30, Color::OFF).unwrap_err();
        assert!(matches!(err, StripError::InvalidArgument { index: 30, len: 30 }));
        assert!(strip.set_pixel(usize::MAX, Color::OFF).is_err());
    }

    #[test]
    fn set_all_pixels_is_ascending_and_complete() {
        let strip = LedStripController::new(12).unwrap();
        let color = Color::new(1, 2, 3);
        let frames = strip.set_all_pixels(color);
        assert_eq!(frames.len(), 12);
        for (i, frame) in frames.iter().enumerate() {
            assert_eq!(frame.pixel(), Some((i as u8, color)));
        }
    }

    #[test]
    fn show_has_empty_payload() {
        let strip = LedStripController::default();
        let _ = strip.set_all_pixels(Color::new(9, 9, 9));
        let frame = strip.show();
        assert_eq!(frame.tag, NEOPIXEL_SHOW_COMMAND);
        assert!(frame.payload.is_empty());
        assert_eq!(frame, strip.show());
    }

    #[test]
    fn pixel_readback_is_lossless() {
        let strip = LedStripController::new(MAX_STRIP_LENGTH).unwrap();
        let color = Color::new(255, 0, 128);
        let frame = strip.set_pixel(255, color).unwrap();
        assert_eq!(frame.pixel(), Some((255, color)));
        assert_eq!(strip.show().pixel(), None);
    }

    #[test]
    fn strip_length_bounds() {
        assert!(matches!(LedStripController::new(0), Err(StripError::InvalidLength(0))));
        assert!(LedStripController::new(MAX_STRIP_LENGTH + 1).is_err());
        assert_eq!(LedStripController::new(1).unwrap().len(), 1);
    }

    #[test]
    fn named_color_table() {
        assert_eq!(NamedColor::Yellow.color(), Color::new(255, 255, 0));
        assert_eq!(Color::from(NamedColor::Magenta), Color::new(255, 0, 255));
        for named in NamedColor::ALL {
            assert_eq!(named.name().parse::<NamedColor>(), Ok(named));
        }
        assert_eq!(" cyan ".parse::<NamedColor>(), Ok(NamedColor::Cyan));
        assert!("Purple".parse::<NamedColor>().is_err());
    }
}
