//! Simulated GPIO, PWM, and pixel outputs, plus randomly pressed buttons.

use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::debug;

use crate::hal::{DigitalInput, DigitalOutput, PixelStrip, PwmChannel, Rgb};

/// Digital output that remembers and logs its level.
#[derive(Debug)]
pub struct SimOutput {
    name: &'static str,
    high: bool,
}

impl SimOutput {
    pub fn new(name: &'static str) -> Self {
        Self { name, high: false }
    }

    pub fn is_high(&self) -> bool {
        self.high
    }
}

impl DigitalOutput for SimOutput {
    fn set_level(&mut self, high: bool) {
        if high != self.high {
            debug!(pin = self.name, high, "output changed");
        }
        self.high = high;
    }
}

/// PWM channel that remembers and logs its duty.
#[derive(Debug, Default)]
pub struct SimPwm {
    duty: u16,
}

impl SimPwm {
    pub fn duty(&self) -> u16 {
        self.duty
    }
}

impl PwmChannel for SimPwm {
    fn set_duty(&mut self, duty: u16) {
        if duty != self.duty {
            debug!(duty, "turbine pwm changed");
        }
        self.duty = duty;
    }
}

/// Pixel strip that keeps the last latched frame.
#[derive(Debug, Default)]
pub struct SimPixels {
    frame: Vec<Rgb>,
}

impl SimPixels {
    pub fn frame(&self) -> &[Rgb] {
        &self.frame
    }
}

impl PixelStrip for SimPixels {
    fn write(&mut self, pixels: &[Rgb]) {
        if pixels != self.frame.as_slice() {
            debug!(?pixels, "pixels latched");
        }
        self.frame.clear();
        self.frame.extend_from_slice(pixels);
    }
}

/// Active-low push button pressed at random.
///
/// Each sample presses the button with probability `press_chance`; a press
/// holds the line low for exactly one sample.
#[derive(Debug)]
pub struct ScriptedButton {
    name: &'static str,
    rng: StdRng,
    press_chance: f64,
    held: bool,
}

impl ScriptedButton {
    /// # Panics
    ///
    /// Panics if `press_chance` is outside `0.0..=1.0`.
    pub fn new(name: &'static str, press_chance: f64, seed: u64) -> Self {
        assert!((0.0..=1.0).contains(&press_chance));
        Self {
            name,
            rng: StdRng::seed_from_u64(seed),
            press_chance,
            held: false,
        }
    }
}

impl DigitalInput for ScriptedButton {
    fn is_high(&mut self) -> bool {
        if self.held {
            self.held = false;
            return true;
        }
        if self.rng.random_bool(self.press_chance) {
            debug!(button = self.name, "simulated press");
            self.held = true;
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn never_pressed_stays_high() {
        let mut button = ScriptedButton::new("wind", 0.0, 1);
        assert!((0..100).all(|_| button.is_high()));
    }

    #[test]
    fn always_pressed_alternates() {
        let mut button = ScriptedButton::new("wind", 1.0, 1);
        let levels: Vec<bool> = (0..4).map(|_| button.is_high()).collect();
        assert_eq!(levels, vec![false, true, false, true]);
    }

    #[test]
    fn same_seed_same_presses() {
        let mut a = ScriptedButton::new("a", 0.3, 42);
        let mut b = ScriptedButton::new("b", 0.3, 42);
        let a: Vec<bool> = (0..50).map(|_| a.is_high()).collect();
        let b: Vec<bool> = (0..50).map(|_| b.is_high()).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn outputs_remember_state() {
        let mut led = SimOutput::new("led");
        led.set_level(true);
        assert!(led.is_high());

        let mut pwm = SimPwm::default();
        pwm.set_duty(250);
        assert_eq!(pwm.duty(), 250);

        let mut pixels = SimPixels::default();
        pixels.write(&[(0, 0, 10)]);
        assert_eq!(pixels.frame(), &[(0, 0, 10)]);
    }
}
