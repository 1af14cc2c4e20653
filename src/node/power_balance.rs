//! House power balance computation.

use std::fmt;

/// Outcome of one power-balance step, in house sign convention.
///
/// - Positive = consumption / import from the grid
/// - Negative = generation / export to the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PowerBalance {
    /// Sum of the simple appliance loads (lighting, heat pump).
    pub house_load: i32,
    /// Turbine contribution (zero or negative).
    pub turbine_load: i32,
    /// Battery contribution (positive = charging, negative = discharging).
    pub battery_load: i32,
    /// Net flow reported to the grid.
    pub total_load: i32,
    /// Battery state of charge after the step.
    pub state_of_charge: i32,
    /// Battery glyph-table index after the step.
    pub battery_glyph: usize,
}

impl PowerBalance {
    /// House and turbine together: the residual demand the battery sees.
    pub fn total_before_battery(&self) -> i32 {
        self.house_load.saturating_add(self.turbine_load)
    }
}

impl fmt::Display for PowerBalance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "house={:+} turbine={:+} battery={:+} (soc={}) | total={:+}",
            self.house_load,
            self.turbine_load,
            self.battery_load,
            self.state_of_charge,
            self.total_load,
        )
    }
}

/// Computes the net house flow from appliance contributions.
///
/// All inputs must already follow the house sign convention; this is pure
/// summation with **no sign flipping**, saturating at the `i32` limits.
pub fn net_load(house_load: i32, turbine_load: i32, battery_load: i32) -> i32 {
    house_load
        .saturating_add(turbine_load)
        .saturating_add(battery_load)
}
