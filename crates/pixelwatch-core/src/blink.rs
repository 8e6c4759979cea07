use std::time::Duration;

use crate::strip::{Color, NamedColor};

/// One slider step of the blink delay.
pub const BLINK_STEP: Duration = Duration::from_millis(100);

/// Alternates the strip between dark and a selected color on every tick.
#[derive(Debug, Clone)]
pub struct Blinker {
    color: NamedColor,
    lit: bool,
    interval: Duration,
}

impl Default for Blinker {
    fn default() -> Self {
        Self::new(NamedColor::Blue)
    }
}

impl Blinker {
    pub fn new(color: NamedColor) -> Self {
        Self {
            color,
            lit: false,
            interval: BLINK_STEP,
        }
    }

    pub fn selected(&self) -> NamedColor {
        self.color
    }

    /// Takes effect on the next lit phase.
    pub fn select(&mut self, color: NamedColor) {
        self.color = color;
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn set_interval_steps(&mut self, steps: u32) {
        self.interval = BLINK_STEP * steps;
    }

    /// Returns the color the whole strip should show for this tick.
    pub fn tick(&mut self) -> Color {
        if self.lit {
            self.lit = false;
            self.color.color()
        } else {
            self.lit = true;
            Color::OFF
        }
    }
}
