//! Control loop that ties the house to buttons, serial link, and display.

use std::ops::ControlFlow;

use tracing::{debug, error, info};

use crate::display::status::{Marquee, StatusScreen};
use crate::display::{CharDisplay, GlyphBank, LCD_COLUMNS, StatusGlyphs};
use crate::error::NodeError;
use crate::hal::{Board, SerialLink, TickSource};
use crate::protocol::format_power_sample;

use super::clock::ReportTimer;
use super::house::House;
use super::input::Buttons;
use super::power_balance::PowerBalance;
use super::types::{Iteration, NodeSettings, Peripherals};

/// Title shown on the first row until the first report.
const SPLASH_TITLE: &str = " Smart House ";

/// The energy node: one house plus the I/O around it.
///
/// All mutable state (appliances, report deadline, marquee offset, glyph
/// slots) is owned here and touched only from [`iterate`](Self::iterate).
pub struct Node<B: Board> {
    house: House<B::Led, B::Pixels, B::TurbinePwm>,
    buttons: Buttons<B::Button>,
    serial: B::Serial,
    display: B::Display,
    clock: B::Clock,
    screen: StatusScreen,
    timer: ReportTimer,
    idle_delay_ms: u32,
}

impl<B: Board> Node<B> {
    /// Sets up the display and arms the report timer.
    ///
    /// # Errors
    ///
    /// Fails if the display rejects a write or the glyph slots run out;
    /// both happen before the loop starts.
    ///
    /// # Panics
    ///
    /// Panics if `settings.report_interval_ms` is zero.
    pub fn new(
        house: House<B::Led, B::Pixels, B::TurbinePwm>,
        peripherals: Peripherals<B>,
        settings: &NodeSettings,
    ) -> Result<Self, NodeError> {
        let Peripherals {
            heat_pump_button,
            wind_button,
            serial,
            mut display,
            mut clock,
        } = peripherals;

        display.clear()?;
        let mut bank = GlyphBank::new();
        let glyphs = StatusGlyphs::upload(&mut bank, &mut display)?;
        let marquee = Marquee::new(&settings.marquee);

        let title: String = format!("{SPLASH_TITLE}{}{}", glyphs.house, glyphs.turbine)
            .chars()
            .take(LCD_COLUMNS)
            .collect();
        display.move_to(0, 0)?;
        display.putstr(&title)?;
        display.move_to(0, 1)?;
        display.putstr(&marquee.window(LCD_COLUMNS))?;

        let timer = ReportTimer::new(settings.report_interval_ms, clock.now_ms());
        info!(
            report_interval_ms = settings.report_interval_ms,
            glyph_slots = bank.used(),
            "node ready"
        );

        Ok(Self {
            house,
            buttons: Buttons::new(heat_pump_button, wind_button),
            serial,
            display,
            clock,
            screen: StatusScreen::new(glyphs, marquee),
            timer,
            idle_delay_ms: settings.idle_delay_ms,
        })
    }

    /// Runs one loop iteration.
    ///
    /// 1. Handle button edges.
    /// 2. If the report deadline passed: power balance, telemetry, display.
    /// 3. Dispatch at most one command line.
    /// 4. Idle, unless something happened, never past the next deadline.
    pub fn iterate(&mut self) -> Result<Iteration, NodeError> {
        let edges = self.buttons.poll();
        if edges.heat_pump {
            debug!("heat pump button pressed");
            self.house.toggle_heat_pump();
        }
        if edges.wind {
            debug!("wind button pressed");
            self.house.bump_wind();
        }

        let now = self.clock.now_ms();
        let report = if self.timer.poll(now) {
            Some(self.report()?)
        } else {
            None
        };

        let command = self
            .serial
            .read_line()?
            .map(|line| self.house.dispatch(&line));

        let mut idled_ms = 0;
        if report.is_none() && command.is_none() {
            let now = self.clock.now_ms();
            idled_ms = self.idle_delay_ms.min(self.timer.remaining_ms(now));
            if idled_ms > 0 {
                self.clock.sleep_ms(idled_ms);
            }
        }

        Ok(Iteration {
            edges,
            report,
            command,
            idled_ms,
        })
    }

    /// Runs until `observe` breaks or an iteration fails.
    ///
    /// On failure the outputs are forced safe before the error is returned.
    pub fn run(
        &mut self,
        mut observe: impl FnMut(&Iteration) -> ControlFlow<()>,
    ) -> Result<(), NodeError> {
        loop {
            match self.iterate() {
                Ok(iteration) => {
                    if observe(&iteration).is_break() {
                        return Ok(());
                    }
                }
                Err(e) => {
                    error!(error = %e, "control loop failed");
                    self.house.safe_shutdown();
                    return Err(e);
                }
            }
        }
    }

    fn report(&mut self) -> Result<PowerBalance, NodeError> {
        let balance = self.house.power_balance();
        self.serial
            .write_line(&format_power_sample(balance.total_load))?;
        self.screen.render(&mut self.display, &balance)?;
        info!(%balance, "report");
        Ok(balance)
    }

    pub fn house(&self) -> &House<B::Led, B::Pixels, B::TurbinePwm> {
        &self.house
    }

    pub fn house_mut(&mut self) -> &mut House<B::Led, B::Pixels, B::TurbinePwm> {
        &mut self.house
    }

    pub fn screen(&self) -> &StatusScreen {
        &self.screen
    }

    pub fn serial(&self) -> &B::Serial {
        &self.serial
    }

    pub fn serial_mut(&mut self) -> &mut B::Serial {
        &mut self.serial
    }

    pub fn display(&self) -> &B::Display {
        &self.display
    }

    pub fn clock_mut(&mut self) -> &mut B::Clock {
        &mut self.clock
    }

    pub fn buttons_mut(&mut self) -> &mut Buttons<B::Button> {
        &mut self.buttons
    }
}

impl<B: Board> Drop for Node<B> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            self.house.safe_shutdown();
        }
    }
}
