//! Core node types: settings, peripherals, and per-iteration records.

use crate::hal::Board;
use crate::protocol::{CommandError, Target};

use super::input::ButtonEdges;
use super::power_balance::PowerBalance;

/// Default report period.
pub const REPORT_INTERVAL_MS: u32 = 1000;

/// Default idle delay when an iteration found nothing to do.
pub const IDLE_DELAY_MS: u32 = 100;

/// Loop timing and screen content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeSettings {
    /// Report period in milliseconds (must be > 0).
    pub report_interval_ms: u32,
    /// Upper bound on the idle delay in milliseconds.
    pub idle_delay_ms: u32,
    /// Text scrolled along the second display row.
    pub marquee: String,
}

impl Default for NodeSettings {
    fn default() -> Self {
        Self {
            report_interval_ms: REPORT_INTERVAL_MS,
            idle_delay_ms: IDLE_DELAY_MS,
            marquee: "Smart House Energy Node * ".to_string(),
        }
    }
}

/// Everything the control loop touches besides the appliance outputs.
pub struct Peripherals<B: Board> {
    pub heat_pump_button: B::Button,
    pub wind_button: B::Button,
    pub serial: B::Serial,
    pub display: B::Display,
    pub clock: B::Clock,
}

/// Complete record of one loop iteration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Iteration {
    /// Button edges handled this iteration.
    pub edges: ButtonEdges,
    /// Power balance, if a report was due.
    pub report: Option<PowerBalance>,
    /// Outcome of the command line, if one arrived.
    pub command: Option<Result<Target, CommandError>>,
    /// Milliseconds spent idling.
    pub idled_ms: u32,
}
