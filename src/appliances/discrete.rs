use tracing::{debug, info};

use crate::appliances::types::{Appliance, LoadContext, parse_int};
use crate::hal::{PixelStrip, Rgb};

/// Highest selectable level.
pub const MAX_LEVEL: i32 = 4;

/// Indicator colour per level, from idle to full draw.
const LEVEL_COLOURS: [Rgb; (MAX_LEVEL + 1) as usize] = [
    (0, 0, 0),
    (0, 0, 64),
    (0, 64, 64),
    (64, 64, 0),
    (96, 0, 0),
];

/// A variable-draw load with discrete levels, such as the heat pump.
///
/// The level is shown on an RGB indicator pixel.
///
/// # Power Flow Convention
/// Returns the level itself (0..=4), always consumption.
#[derive(Debug, Clone)]
pub struct DiscreteLoadAppliance<P> {
    level: i32,
    /// Level restored by [`toggle`](Self::toggle) when switching back on.
    resume_level: i32,
    pixels: P,
}

impl<P: PixelStrip> DiscreteLoadAppliance<P> {
    /// Creates an appliance at level 0 driving `pixels`.
    pub fn new(pixels: P) -> Self {
        Self {
            level: 0,
            resume_level: 1,
            pixels,
        }
    }

    /// Current level in `0..=MAX_LEVEL`.
    pub fn level(&self) -> i32 {
        self.level
    }

    /// Switches between off and the last non-zero level.
    ///
    /// Driven by the physical button, not by serial commands.
    pub fn toggle(&mut self) {
        if self.level > 0 {
            self.resume_level = self.level;
            self.set_level(0);
        } else {
            self.set_level(self.resume_level);
        }
    }

    /// Turns the indicator dark and drops to level 0.
    pub fn shut_down(&mut self) {
        self.level = 0;
        self.pixels.write(&[LEVEL_COLOURS[0]]);
    }

    /// The owned pixel strip.
    pub fn pixels(&self) -> &P {
        &self.pixels
    }

    fn set_level(&mut self, level: i32) {
        let level = if (0..=MAX_LEVEL).contains(&level) { level } else { 0 };
        if level != self.level {
            info!(from = self.level, to = level, "heat pump level changed");
        }
        self.level = level;
        if level > 0 {
            self.resume_level = level;
        }
    }
}

impl<P: PixelStrip> Appliance for DiscreteLoadAppliance<P> {
    fn load(&mut self, _context: &LoadContext) -> i32 {
        self.level
    }

    /// An integer action selects that level; anything else steps up by one.
    /// Levels outside `0..=MAX_LEVEL` wrap to 0.
    fn apply_command(&mut self, action: &[u8]) {
        match parse_int(action) {
            Some(level) => self.set_level(level),
            None => {
                debug!(action = %String::from_utf8_lossy(action), "non-numeric level, stepping up");
                self.set_level(self.level + 1);
            }
        }
    }

    fn sync_output(&mut self) {
        self.pixels.write(&[LEVEL_COLOURS[self.level as usize]]);
    }

    fn kind(&self) -> &'static str {
        "DiscreteLoad"
    }
}
