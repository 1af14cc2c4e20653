use tracing::{debug, info, warn};

use crate::appliances::types::{Appliance, LoadContext, parse_int};

/// Default capacity in load units.
pub const MAX_CHARGE: i32 = 50;

/// Default per-tick charge/discharge limit in load units.
pub const MAX_RATE_OF_CHARGE: i32 = 3;

/// Number of entries in the battery glyph table (0%, 20%, ..., 100%).
pub const GLYPH_COUNT: usize = 6;

/// A home battery that steers the house towards a requested net flow.
///
/// The grid controller sets `net_target`, the flow it wants the house to
/// present. Each power-balance step the battery looks at the load of the
/// rest of the house and charges or discharges to close the gap, limited by
/// its rate and its state of charge.
///
/// # Power Flow Convention
/// - Positive: charging (absorbs power, adds to house load)
/// - Negative: discharging (supplies power, reduces house load)
#[derive(Debug, Clone)]
pub struct Battery {
    /// Capacity in load units.
    pub max_charge: i32,

    /// Per-tick rate limit in load units (positive magnitude).
    pub max_rate: i32,

    state_of_charge: i32,
    net_target: i32,
    last_rate: i32,
}

impl Default for Battery {
    fn default() -> Self {
        Self::new(MAX_CHARGE, MAX_RATE_OF_CHARGE, 0)
    }
}

impl Battery {
    /// Creates a new battery.
    ///
    /// # Arguments
    ///
    /// * `max_charge` - Capacity in load units (must be > 0)
    /// * `max_rate` - Per-tick rate limit (must be > 0)
    /// * `state_of_charge` - Initial charge in `0..=max_charge`
    ///
    /// # Panics
    ///
    /// Panics if capacity or rate is not positive, or the initial charge is
    /// out of range.
    pub fn new(max_charge: i32, max_rate: i32, state_of_charge: i32) -> Self {
        assert!(max_charge > 0);
        assert!(max_rate > 0);
        assert!((0..=max_charge).contains(&state_of_charge));

        Self {
            max_charge,
            max_rate,
            state_of_charge,
            net_target: 0,
            last_rate: 0,
        }
    }

    /// Stored charge in `0..=max_charge`.
    pub fn state_of_charge(&self) -> i32 {
        self.state_of_charge
    }

    /// Flow requested by the grid controller.
    pub fn net_target(&self) -> i32 {
        self.net_target
    }

    /// Rate reported by the most recent step.
    pub fn last_rate(&self) -> i32 {
        self.last_rate
    }

    /// Index into the battery glyph table, one entry per 20% of charge.
    pub fn glyph_index(&self) -> usize {
        let top = GLYPH_COUNT as i64 - 1;
        let scaled = i64::from(self.state_of_charge) * top / i64::from(self.max_charge);
        scaled.clamp(0, top) as usize
    }

    /// Advances the battery by one tick given the rest of the house's load.
    ///
    /// The returned rate is the one requested after the rate clamp. When the
    /// charge clamp absorbs less than that (e.g. 48 + 3 against a capacity
    /// of 50) the full requested rate is still reported.
    pub fn step(&mut self, other_load: i32) -> i32 {
        let target_rate = self
            .net_target
            .saturating_sub(other_load)
            .clamp(-self.max_rate, self.max_rate);

        let charging = self.state_of_charge < self.max_charge && target_rate > 0;
        let discharging = self.state_of_charge > 0 && target_rate < 0;

        if charging || discharging {
            self.state_of_charge =
                self.state_of_charge
                .saturating_add(target_rate)
                .clamp(0, self.max_charge);
            self.last_rate = target_rate;
        } else {
            self.last_rate = 0;
        }

        debug!(
            other_load,
            target_rate,
            rate = self.last_rate,
            soc = self.state_of_charge,
            "battery step"
        );
        self.last_rate
    }
}

impl Appliance for Battery {
    fn load(&mut self, context: &LoadContext) -> i32 {
        self.step(context.other_load)
    }

    /// An integer action sets the net target; anything else is ignored.
    fn apply_command(&mut self, action: &[u8]) {
        match parse_int(action) {
            Some(target) => {
                info!(from = self.net_target, to = target, "battery net target set");
                self.net_target = target;
            }
            None => warn!(
                action = %String::from_utf8_lossy(action),
                "battery target is not an integer, ignored"
            ),
        }
    }

    /// The battery owns no physical output.
    fn sync_output(&mut self) {}

    fn kind(&self) -> &'static str {
        "Battery"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn battery_at(soc: i32, target: i32) -> Battery {
        let mut battery = Battery::new(MAX_CHARGE, MAX_RATE_OF_CHARGE, soc);
        battery.net_target = target;
        battery
    }

    #[test]
    fn test_new_battery() {
        let battery = Battery::default();
        assert_eq!(battery.state_of_charge(), 0);
        assert_eq!(battery.net_target(), 0);
        assert_eq!(battery.last_rate(), 0);
        assert_eq!(battery.max_charge, 50);
        assert_eq!(battery.max_rate, 3);
    }

    #[test]
    #[should_panic]
    fn test_invalid_capacity() {
        Battery::new(0, 3, 0);
    }

    #[test]
    #[should_panic]
    fn test_invalid_initial_charge() {
        Battery::new(50, 3, 51);
    }

    #[test]
    fn test_extreme_targets_clamp_to_rate() {
        let mut battery = battery_at(20, i32::MIN);
        assert_eq!(battery.step(1), -3);
        assert_eq!(battery.state_of_charge(), 17);

        let mut battery = battery_at(20, i32::MAX);
        assert_eq!(battery.step(-2), 3);
        assert_eq!(battery.state_of_charge(), 23);
    }

    #[test]
    fn test_huge_capacity_does_not_overflow() {
        let mut battery = Battery::new(i32::MAX, i32::MAX, i32::MAX - 1);
        battery.apply_command(b"2147483647");
        assert_eq!(battery.step(i32::MIN), i32::MAX);
        assert_eq!(battery.state_of_charge(), i32::MAX);
        assert_eq!(battery.glyph_index(), 5);
    }

    #[test]
    fn test_rate_limited_charge() {
        let mut battery = battery_at(10, 20);
        assert_eq!(battery.step(0), 3);
        assert_eq!(battery.state_of_charge(), 13);
    }

    #[test]
    fn test_rate_limited_discharge() {
        let mut battery = battery_at(10, 0);
        // House draws 7, target 0: battery covers at most 3.
        assert_eq!(battery.step(7), -3);
        assert_eq!(battery.state_of_charge(), 7);
    }

    #[test]
    fn test_exact_gap_is_closed() {
        let mut battery = battery_at(10, 1);
        assert_eq!(battery.step(-1), 2);
        assert_eq!(battery.state_of_charge(), 12);
    }

    #[test]
    fn test_near_full_reports_requested_rate() {
        // 48 + 3 is clamped to 50, but the reported rate stays 3.
        let mut battery = battery_at(48, 3);
        assert_eq!(battery.step(0), 3);
        assert_eq!(battery.state_of_charge(), 50);
    }

    #[test]
    fn test_full_battery_refuses_charge() {
        let mut battery = battery_at(50, 3);
        assert_eq!(battery.step(0), 0);
        assert_eq!(battery.state_of_charge(), 50);
    }

    #[test]
    fn test_empty_battery_refuses_discharge() {
        let mut battery = Battery::default();
        battery.apply_command(b"-5");
        assert_eq!(battery.step(2), 0);
        assert_eq!(battery.state_of_charge(), 0);
        assert_eq!(battery.last_rate(), 0);
    }

    #[test]
    fn test_bad_target_is_ignored() {
        let mut battery = Battery::default();
        battery.apply_command(b"4");
        battery.apply_command(b"lots");
        assert_eq!(battery.net_target(), 4);
    }

    #[test]
    fn test_load_uses_context() {
        let mut battery = battery_at(20, 0);
        assert_eq!(battery.load(&LoadContext::with_other_load(-2)), 2);
        assert_eq!(battery.state_of_charge(), 22);
    }

    #[test]
    fn test_glyph_index_steps_every_ten() {
        let cases = [(0, 0), (9, 0), (10, 1), (25, 2), (49, 4), (50, 5)];
        for (soc, glyph) in cases {
            assert_eq!(battery_at(soc, 0).glyph_index(), glyph, "soc {soc}");
        }
    }

    #[test]
    fn test_complete_charge_discharge_cycle() {
        let mut battery = battery_at(0, 3);
        let mut ticks = 0;
        while battery.step(0) != 0 {
            ticks += 1;
        }
        assert_eq!(battery.state_of_charge(), 50);
        assert_eq!(ticks, 17);

        battery.apply_command(b"-3");
        let mut delivered = 0;
        loop {
            let rate = battery.step(0);
            if rate == 0 {
                break;
            }
            delivered -= rate;
        }
        assert_eq!(battery.state_of_charge(), 0);
        assert!(delivered >= 50);
    }
}
