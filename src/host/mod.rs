//! Desktop board: runs the node against the terminal.
//!
//! Stdin and stdout stand in for the serial link, the LCD is kept in memory
//! and logged, and the two buttons are pressed at random from a seeded RNG.

pub mod clock;
pub mod lcd;
pub mod pins;
pub mod serial;

pub use clock::SystemClock;
pub use lcd::TerminalLcd;
pub use pins::{ScriptedButton, SimOutput, SimPixels, SimPwm};
pub use serial::StdioSerial;

use crate::config::NodeConfig;
use crate::hal::Board;
use crate::node::{House, Peripherals};

/// Seed offset for the wind button RNG to avoid correlation with the heat pump button.
const WIND_SEED_OFFSET: u64 = 57;

/// Port types of the desktop board.
#[derive(Debug)]
pub struct HostBoard;

impl Board for HostBoard {
    type Led = SimOutput;
    type Pixels = SimPixels;
    type TurbinePwm = SimPwm;
    type Button = ScriptedButton;
    type Serial = StdioSerial;
    type Display = TerminalLcd;
    type Clock = SystemClock;
}

/// House wired to simulated outputs.
pub type HostHouse = House<SimOutput, SimPixels, SimPwm>;

impl HostBoard {
    /// Wires a house and its peripherals from a validated configuration,
    /// reading commands from `serial`.
    pub fn assemble(
        config: &NodeConfig,
        serial: StdioSerial,
    ) -> (HostHouse, Peripherals<HostBoard>) {
        let sim = &config.simulation;
        let house = config.build_house(
            SimOutput::new("led"),
            SimPixels::default(),
            SimPwm::default(),
        );
        let peripherals = Peripherals {
            heat_pump_button: ScriptedButton::new(
                "heatpump",
                sim.heatpump_press_chance,
                sim.seed,
            ),
            wind_button: ScriptedButton::new(
                "wind",
                sim.wind_press_chance,
                sim.seed.wrapping_add(WIND_SEED_OFFSET),
            ),
            serial,
            display: TerminalLcd::new(),
            clock: SystemClock::new(),
        };
        (house, peripherals)
    }
}
