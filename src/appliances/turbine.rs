use tracing::{info, warn};

use crate::appliances::types::{Appliance, LoadContext};
use crate::hal::PwmChannel;

/// Highest wind level before wrapping back to calm.
pub const MAX_WIND_LEVEL: i32 = 5;

/// PWM duty at the lowest non-zero wind level.
const BASE_DUTY: u16 = 200;
/// Additional PWM duty per wind level.
const DUTY_PER_LEVEL: u16 = 25;

/// A wind turbine generator whose speed is shown on a PWM-driven indicator.
///
/// Wind only changes through [`bump`](Self::bump), driven by a physical
/// button; serial commands are ignored.
///
/// # Power Flow Convention
/// Returns **negative** values (generation), never consumption.
#[derive(Debug, Clone)]
pub struct Turbine<W> {
    wind_level: i32,
    pwm: W,
}

impl<W: PwmChannel> Turbine<W> {
    /// Creates a calm turbine driving `pwm`.
    pub fn new(pwm: W) -> Self {
        Self { wind_level: 0, pwm }
    }

    /// Current wind level in `0..=MAX_WIND_LEVEL`.
    pub fn wind_level(&self) -> i32 {
        self.wind_level
    }

    /// Advances the wind by one level, wrapping to calm after the maximum.
    pub fn bump(&mut self) {
        self.wind_level = if self.wind_level >= MAX_WIND_LEVEL {
            0
        } else {
            self.wind_level + 1
        };
        info!(wind = self.wind_level, "wind level changed");
    }

    /// Indicator duty for the current wind level.
    pub fn duty(&self) -> u16 {
        if self.wind_level > 0 {
            BASE_DUTY + DUTY_PER_LEVEL * self.wind_level as u16
        } else {
            0
        }
    }

    /// Forces the indicator PWM to zero without touching the wind level.
    pub fn shut_down(&mut self) {
        self.pwm.set_duty(0);
    }

    /// The owned PWM channel.
    pub fn pwm(&self) -> &W {
        &self.pwm
    }
}

impl<W: PwmChannel> Appliance for Turbine<W> {
    fn load(&mut self, _context: &LoadContext) -> i32 {
        -self.wind_level
    }

    fn apply_command(&mut self, action: &[u8]) {
        warn!(
            action = %String::from_utf8_lossy(action),
            "turbine follows the wind button only, command ignored"
        );
    }

    fn sync_output(&mut self) {
        self.pwm.set_duty(self.duty());
    }

    fn kind(&self) -> &'static str {
        "Turbine"
    }
}
