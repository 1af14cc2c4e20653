//! The house: the fixed set of appliances and the power-balance step.

use tracing::{debug, info, warn};

use crate::appliances::{
    Appliance, Battery, DiscreteLoadAppliance, LoadContext, OnOffAppliance, Turbine,
};
use crate::hal::{DigitalOutput, PixelStrip, PwmChannel};
use crate::protocol::{Command, CommandError, Target};

use super::power_balance::{PowerBalance, net_load};

/// Owns every appliance in the house.
///
/// Holds typed appliance fields rather than trait objects since the
/// appliance set is fixed; trait objects only appear when routing a command
/// to its target.
#[derive(Debug)]
pub struct House<L, P, W> {
    led: OnOffAppliance<L>,
    heat_pump: DiscreteLoadAppliance<P>,
    turbine: Turbine<W>,
    battery: Battery,
}

impl<L, P, W> House<L, P, W>
where
    L: DigitalOutput,
    P: PixelStrip,
    W: PwmChannel,
{
    pub fn new(
        led: OnOffAppliance<L>,
        heat_pump: DiscreteLoadAppliance<P>,
        turbine: Turbine<W>,
        battery: Battery,
    ) -> Self {
        Self {
            led,
            heat_pump,
            turbine,
            battery,
        }
    }

    /// The appliance addressed by a command keyword.
    pub fn appliance_mut(&mut self, target: Target) -> &mut dyn Appliance {
        match target {
            Target::Led => &mut self.led,
            Target::Battery => &mut self.battery,
            Target::Turbine => &mut self.turbine,
            Target::HeatPump => &mut self.heat_pump,
        }
    }

    /// Parses one command line and applies it to its target.
    ///
    /// The action bytes reach the appliance untouched. Malformed lines are
    /// logged and returned as errors; they never change state.
    pub fn dispatch(&mut self, line: &[u8]) -> Result<Target, CommandError> {
        match Command::parse(line) {
            Ok(cmd) => {
                let appliance = self.appliance_mut(cmd.target);
                debug!(
                    appliance = appliance.kind(),
                    action = %String::from_utf8_lossy(cmd.action),
                    "dispatching command"
                );
                appliance.apply_command(cmd.action);
                Ok(cmd.target)
            }
            Err(e) => {
                warn!(
                    line = %String::from_utf8_lossy(line),
                    error = %e,
                    "command dropped"
                );
                Err(e)
            }
        }
    }

    /// Runs one power-balance step.
    ///
    /// Evaluation order is fixed: simple loads, then the turbine, then the
    /// battery, which sees the sum of everything before it.
    pub fn power_balance(&mut self) -> PowerBalance {
        let context = LoadContext::new();

        // 1. Simple loads
        let mut house_load: i32 = 0;
        for appliance in [&mut self.led as &mut dyn Appliance, &mut self.heat_pump] {
            house_load = house_load.saturating_add(appliance.load(&context));
            appliance.sync_output();
        }

        // 2. Generation
        let turbine_load = self.turbine.load(&context);
        self.turbine.sync_output();

        // 3. Battery closes the residual against its target
        let total_before_battery = house_load.saturating_add(turbine_load);
        let battery_load = self
            .battery
            .load(&LoadContext::with_other_load(total_before_battery));
        self.battery.sync_output();

        PowerBalance {
            house_load,
            turbine_load,
            battery_load,
            total_load: net_load(house_load, turbine_load, battery_load),
            state_of_charge: self.battery.state_of_charge(),
            battery_glyph: self.battery.glyph_index(),
        }
    }

    /// Wind button handler.
    pub fn bump_wind(&mut self) {
        self.turbine.bump();
        self.turbine.sync_output();
    }

    /// Heat pump button handler.
    pub fn toggle_heat_pump(&mut self) {
        self.heat_pump.toggle();
        self.heat_pump.sync_output();
    }

    /// Forces every variable output to its de-energised state.
    pub fn safe_shutdown(&mut self) {
        info!("forcing outputs to safe state");
        self.turbine.shut_down();
        self.heat_pump.shut_down();
        self.led.shut_down();
    }

    pub fn led(&self) -> &OnOffAppliance<L> {
        &self.led
    }

    pub fn heat_pump(&self) -> &DiscreteLoadAppliance<P> {
        &self.heat_pump
    }

    pub fn turbine(&self) -> &Turbine<W> {
        &self.turbine
    }

    pub fn battery(&self) -> &Battery {
        &self.battery
    }
}
