use tracing::info;

use crate::appliances::types::{Appliance, LoadContext};
use crate::hal::DigitalOutput;

/// A load that is either fully on or off, such as the house lighting.
///
/// # Power Flow Convention
/// Returns `load_when_on` while on and 0 while off.
#[derive(Debug, Clone)]
pub struct OnOffAppliance<O> {
    /// Load drawn while switched on.
    pub load_when_on: i32,

    is_on: bool,
    output: O,
}

impl<O: DigitalOutput> OnOffAppliance<O> {
    /// Creates a switched-off appliance driving `output`.
    pub fn new(load_when_on: i32, output: O) -> Self {
        Self {
            load_when_on,
            is_on: false,
            output,
        }
    }

    /// Whether the appliance is currently on.
    pub fn is_on(&self) -> bool {
        self.is_on
    }

    /// Switches off and drives the output low.
    pub fn shut_down(&mut self) {
        self.is_on = false;
        self.output.set_level(false);
    }

    /// The owned output.
    pub fn output(&self) -> &O {
        &self.output
    }
}

impl<O: DigitalOutput> Appliance for OnOffAppliance<O> {
    fn load(&mut self, _context: &LoadContext) -> i32 {
        if self.is_on { self.load_when_on } else { 0 }
    }

    /// `on` switches the appliance on; any other action switches it off.
    fn apply_command(&mut self, action: &[u8]) {
        let on = action == b"on";
        if on != self.is_on {
            info!(on, "light switched");
        }
        self.is_on = on;
    }

    fn sync_output(&mut self) {
        self.output.set_level(self.is_on);
    }

    fn kind(&self) -> &'static str {
        "OnOff"
    }
}
