//! Hardware ports consumed by the node.
//!
//! Board adapters (real HAL pins, the host simulator, test mocks) implement
//! these traits. Appliances and the control loop only ever see the traits, so
//! the same core runs against a microcontroller board or a desktop terminal.

use std::io;

use embedded_hal::digital::{InputPin, OutputPin, PinState};
use embedded_hal::pwm::SetDutyCycle;
use tracing::warn;

use crate::display::CharDisplay;

/// A digital input sampled once per loop iteration.
pub trait DigitalInput {
    /// Returns the current logic level (`true` = high).
    fn is_high(&mut self) -> bool;
}

/// A digital output driven by an appliance.
pub trait DigitalOutput {
    /// Drives the pin high (`true`) or low (`false`).
    fn set_level(&mut self, high: bool);
}

/// A PWM channel driven by an appliance.
pub trait PwmChannel {
    /// Writes a raw duty-cycle value.
    fn set_duty(&mut self, duty: u16);
}

/// One RGB pixel.
pub type Rgb = (u8, u8, u8);

/// An addressable pixel strip (NeoPixel style).
pub trait PixelStrip {
    /// Replaces the strip buffer and latches it to the LEDs.
    fn write(&mut self, pixels: &[Rgb]);
}

/// Monotonic millisecond tick source.
///
/// `now_ms` wraps at `u32::MAX`; compare ticks only through
/// [`crate::node::clock::ticks_diff`].
pub trait TickSource {
    /// Current tick count in milliseconds.
    fn now_ms(&mut self) -> u32;

    /// Idles the loop for `ms` milliseconds.
    fn sleep_ms(&mut self, ms: u32);
}

/// Line-oriented serial link to the grid controller.
pub trait SerialLink {
    /// Returns one complete line if one is available, without blocking.
    ///
    /// The line arrives as raw bytes without its terminator. `Ok(None)` is
    /// the normal "nothing received" case.
    fn read_line(&mut self) -> io::Result<Option<Vec<u8>>>;

    /// Sends one line; the link appends the terminator.
    fn write_line(&mut self, line: &str) -> io::Result<()>;
}

/// The concrete hardware a node runs on.
///
/// Groups the port types so the control loop is generic over one parameter
/// instead of seven.
pub trait Board {
    type Led: DigitalOutput;
    type Pixels: PixelStrip;
    type TurbinePwm: PwmChannel;
    type Button: DigitalInput;
    type Serial: SerialLink;
    type Display: CharDisplay;
    type Clock: TickSource;
}

/// Adapts an `embedded-hal` input pin.
///
/// Read errors are logged and reported as the idle-high level so that a
/// flaky pin never produces a spurious falling edge.
pub struct HalInput<P>(pub P);

impl<P: InputPin> DigitalInput for HalInput<P> {
    fn is_high(&mut self) -> bool {
        match self.0.is_high() {
            Ok(level) => level,
            Err(e) => {
                warn!(kind = ?embedded_hal::digital::Error::kind(&e), "input pin read failed");
                true
            }
        }
    }
}

/// Adapts an `embedded-hal` output pin. Write errors are logged.
pub struct HalOutput<P>(pub P);

impl<P: OutputPin> DigitalOutput for HalOutput<P> {
    fn set_level(&mut self, high: bool) {
        if let Err(e) = self.0.set_state(PinState::from(high)) {
            warn!(kind = ?embedded_hal::digital::Error::kind(&e), "output pin write failed");
        }
    }
}

/// Adapts an `embedded-hal` PWM channel. Duty is clamped to the channel
/// maximum and write errors are logged.
pub struct HalPwm<P>(pub P);

impl<P: SetDutyCycle> PwmChannel for HalPwm<P> {
    fn set_duty(&mut self, duty: u16) {
        let duty = duty.min(self.0.max_duty_cycle());
        if let Err(e) = self.0.set_duty_cycle(duty) {
            warn!(kind = ?embedded_hal::pwm::Error::kind(&e), "pwm write failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;

    use embedded_hal::digital::{self, ErrorKind, ErrorType};
    use embedded_hal::pwm;

    use super::*;

    struct FakePin {
        high: bool,
    }

    impl ErrorType for FakePin {
        type Error = Infallible;
    }

    impl InputPin for FakePin {
        fn is_high(&mut self) -> Result<bool, Infallible> {
            Ok(self.high)
        }

        fn is_low(&mut self) -> Result<bool, Infallible> {
            Ok(!self.high)
        }
    }

    impl OutputPin for FakePin {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.high = false;
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            self.high = true;
            Ok(())
        }
    }

    #[derive(Debug)]
    struct Fault;

    impl digital::Error for Fault {
        fn kind(&self) -> ErrorKind {
            ErrorKind::Other
        }
    }

    struct BrokenPin;

    impl ErrorType for BrokenPin {
        type Error = Fault;
    }

    impl InputPin for BrokenPin {
        fn is_high(&mut self) -> Result<bool, Fault> {
            Err(Fault)
        }

        fn is_low(&mut self) -> Result<bool, Fault> {
            Err(Fault)
        }
    }

    struct FakePwm {
        duty: u16,
    }

    impl pwm::ErrorType for FakePwm {
        type Error = Infallible;
    }

    impl SetDutyCycle for FakePwm {
        fn max_duty_cycle(&self) -> u16 {
            1023
        }

        fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Infallible> {
            self.duty = duty;
            Ok(())
        }
    }

    #[test]
    fn output_adapter_drives_pin() {
        let mut out = HalOutput(FakePin { high: false });
        out.set_level(true);
        assert!(out.0.high);
        out.set_level(false);
        assert!(!out.0.high);
    }

    #[test]
    fn input_adapter_reads_level() {
        let mut input = HalInput(FakePin { high: false });
        assert!(!input.is_high());
    }

    #[test]
    fn broken_input_reads_as_idle_high() {
        let mut input = HalInput(BrokenPin);
        assert!(input.is_high());
    }

    #[test]
    fn pwm_adapter_clamps_to_channel_max() {
        let mut pwm = HalPwm(FakePwm { duty: 0 });
        pwm.set_duty(325);
        assert_eq!(pwm.0.duty, 325);
        pwm.set_duty(5000);
        assert_eq!(pwm.0.duty, 1023);
    }
}
