//! TOML-based node configuration and preset definitions.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::appliances::battery::{MAX_CHARGE, MAX_RATE_OF_CHARGE};
use crate::appliances::{Battery, DiscreteLoadAppliance, OnOffAppliance, Turbine};
use crate::hal::{DigitalOutput, PixelStrip, PwmChannel};
use crate::node::House;
use crate::node::types::{IDLE_DELAY_MS, NodeSettings, REPORT_INTERVAL_MS};

/// Top-level node configuration parsed from TOML.
///
/// All fields have defaults matching the demo house. Load from TOML with
/// [`NodeConfig::from_toml_file`] or use [`NodeConfig::demo`] for the
/// built-in default.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeConfig {
    /// Loop timing and display text.
    #[serde(default)]
    pub node: LoopConfig,
    /// Lighting parameters.
    #[serde(default)]
    pub led: LedConfig,
    /// Battery storage parameters.
    #[serde(default)]
    pub battery: BatteryConfig,
    /// Host simulation parameters.
    #[serde(default)]
    pub simulation: SimulationConfig,
}

/// Loop timing and display text.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoopConfig {
    /// Report period in milliseconds (must be > 0).
    pub report_interval_ms: u32,
    /// Idle delay cap in milliseconds.
    pub idle_delay_ms: u32,
    /// Text scrolled along the second display row.
    pub marquee: String,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            report_interval_ms: REPORT_INTERVAL_MS,
            idle_delay_ms: IDLE_DELAY_MS,
            marquee: NodeSettings::default().marquee,
        }
    }
}

/// Largest light load that still fits the 16-column status row.
pub const MAX_LED_LOAD: i32 = 5;

/// Lighting parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LedConfig {
    /// Load drawn while the light is on, in `0..=MAX_LED_LOAD`.
    pub load_when_on: i32,
}

impl Default for LedConfig {
    fn default() -> Self {
        Self { load_when_on: 1 }
    }
}

/// Battery storage parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatteryConfig {
    /// Capacity in load units (must be > 0).
    pub max_charge: i32,
    /// Per-report rate limit (must be > 0).
    pub max_rate: i32,
    /// Initial state of charge in `0..=max_charge`.
    pub initial_soc: i32,
}

impl Default for BatteryConfig {
    fn default() -> Self {
        Self {
            max_charge: MAX_CHARGE,
            max_rate: MAX_RATE_OF_CHARGE,
            initial_soc: 0,
        }
    }
}

/// Host simulation parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Master random seed for the simulated buttons.
    pub seed: u64,
    /// Chance per iteration that the wind button is pressed (0.0–1.0).
    pub wind_press_chance: f64,
    /// Chance per iteration that the heat pump button is pressed (0.0–1.0).
    pub heatpump_press_chance: f64,
    /// Stop after this many reports; 0 runs until stdin closes.
    pub max_reports: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            wind_press_chance: 0.02,
            heatpump_press_chance: 0.01,
            max_reports: 0,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"node.report_interval_ms"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {}: {}", self.field, self.message)
    }
}

impl NodeConfig {
    /// Returns the demo house: calm weather, empty battery.
    pub fn demo() -> Self {
        Self {
            node: LoopConfig::default(),
            led: LedConfig::default(),
            battery: BatteryConfig::default(),
            simulation: SimulationConfig::default(),
        }
    }

    /// Returns the windy preset: frequent gusts and a half-charged battery.
    pub fn windy() -> Self {
        Self {
            node: LoopConfig {
                marquee: "Storm warning: turbine at full tilt * ".to_string(),
                ..LoopConfig::default()
            },
            led: LedConfig::default(),
            battery: BatteryConfig {
                initial_soc: 25,
                ..BatteryConfig::default()
            },
            simulation: SimulationConfig {
                wind_press_chance: 0.15,
                heatpump_press_chance: 0.05,
                ..SimulationConfig::default()
            },
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["demo", "windy"];

    /// Loads a configuration from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "demo" => Ok(Self::demo()),
            "windy" => Ok(Self::windy()),
            _ => Err(ConfigError {
                field: "preset".to_string(),
                message: format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            }),
        }
    }

    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "scenario".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if the configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let n = &self.node;
        if n.report_interval_ms == 0 || n.report_interval_ms > i32::MAX as u32 {
            errors.push(ConfigError {
                field: "node.report_interval_ms".into(),
                message: format!("must be in 1..={}", i32::MAX),
            });
        }
        if n.marquee.is_empty() || !n.marquee.is_ascii() {
            errors.push(ConfigError {
                field: "node.marquee".into(),
                message: "must be non-empty ASCII text".into(),
            });
        }

        if !(0..=MAX_LED_LOAD).contains(&self.led.load_when_on) {
            errors.push(ConfigError {
                field: "led.load_when_on".into(),
                message: format!("must be in [0, {MAX_LED_LOAD}]"),
            });
        }

        let bat = &self.battery;
        if bat.max_charge <= 0 {
            errors.push(ConfigError {
                field: "battery.max_charge".into(),
                message: "must be > 0".into(),
            });
        }
        if bat.max_rate <= 0 {
            errors.push(ConfigError {
                field: "battery.max_rate".into(),
                message: "must be > 0".into(),
            });
        }
        if bat.initial_soc < 0 || bat.initial_soc > bat.max_charge {
            errors.push(ConfigError {
                field: "battery.initial_soc".into(),
                message: "must be in [0, battery.max_charge]".into(),
            });
        }

        let sim = &self.simulation;
        for (field, chance) in [
            ("simulation.wind_press_chance", sim.wind_press_chance),
            ("simulation.heatpump_press_chance", sim.heatpump_press_chance),
        ] {
            if !(0.0..=1.0).contains(&chance) {
                errors.push(ConfigError {
                    field: field.into(),
                    message: "must be in [0.0, 1.0]".into(),
                });
            }
        }

        errors
    }

    /// Loop settings for [`crate::node::Node::new`].
    pub fn settings(&self) -> NodeSettings {
        NodeSettings {
            report_interval_ms: self.node.report_interval_ms,
            idle_delay_ms: self.node.idle_delay_ms,
            marquee: self.node.marquee.clone(),
        }
    }

    /// Builds the house from validated parameters and the board's outputs.
    ///
    /// # Panics
    ///
    /// Panics if the battery section fails [`validate`](Self::validate).
    pub fn build_house<L, P, W>(&self, led: L, pixels: P, pwm: W) -> House<L, P, W>
    where
        L: DigitalOutput,
        P: PixelStrip,
        W: PwmChannel,
    {
        let bat = &self.battery;
        House::new(
            OnOffAppliance::new(self.led.load_when_on, led),
            DiscreteLoadAppliance::new(pixels),
            Turbine::new(pwm),
            Battery::new(bat.max_charge, bat.max_rate, bat.initial_soc),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_preset_valid() {
        let cfg = NodeConfig::demo();
        let errors = cfg.validate();
        assert!(errors.is_empty(), "demo should be valid: {errors:?}");
    }

    #[test]
    fn from_preset_unknown() {
        let err = NodeConfig::from_preset("nonexistent");
        assert!(err.is_err());
        let e = err.unwrap_err();
        assert!(e.message.contains("unknown preset"));
    }

    #[test]
    fn all_presets_are_valid() {
        for name in NodeConfig::PRESETS {
            let cfg = NodeConfig::from_preset(name);
            assert!(cfg.is_ok(), "preset \"{name}\" should load");
            let errors = cfg.as_ref().map(|c| c.validate()).unwrap_or_default();
            assert!(
                errors.is_empty(),
                "preset \"{name}\" should be valid: {errors:?}"
            );
        }
    }

    #[test]
    fn windy_presses_wind_more_often() {
        let demo = NodeConfig::demo();
        let windy = NodeConfig::windy();
        assert!(windy.simulation.wind_press_chance > demo.simulation.wind_press_chance);
        assert_eq!(windy.battery.initial_soc, 25);
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
[node]
report_interval_ms = 500
idle_delay_ms = 20
marquee = "Hello grid "

[led]
load_when_on = 2

[battery]
max_charge = 40
max_rate = 4
initial_soc = 10

[simulation]
seed = 7
wind_press_chance = 0.5
heatpump_press_chance = 0.25
max_reports = 12
"#;
        let cfg = NodeConfig::from_toml_str(toml);
        assert!(cfg.is_ok(), "valid TOML should parse: {:?}", cfg.err());
        let cfg = cfg.unwrap();
        assert_eq!(cfg.node.report_interval_ms, 500);
        assert_eq!(cfg.led.load_when_on, 2);
        assert_eq!(cfg.battery.max_charge, 40);
        assert_eq!(cfg.simulation.max_reports, 12);
        assert!(cfg.validate().is_empty());
    }

    #[test]
    fn invalid_toml_unknown_field() {
        let toml = r#"
[node]
report_interval_ms = 1000
bogus_field = true
"#;
        assert!(NodeConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let toml = r#"
[simulation]
seed = 99
"#;
        let cfg = NodeConfig::from_toml_str(toml).unwrap();
        assert_eq!(cfg.simulation.seed, 99);
        assert_eq!(cfg.node.report_interval_ms, 1000);
        assert_eq!(cfg.battery.max_charge, 50);
        assert_eq!(cfg.battery.max_rate, 3);
    }

    #[test]
    fn validation_catches_zero_interval() {
        let mut cfg = NodeConfig::demo();
        cfg.node.report_interval_ms = 0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "node.report_interval_ms"));
    }

    #[test]
    fn validation_catches_soc_above_capacity() {
        let mut cfg = NodeConfig::demo();
        cfg.battery.initial_soc = 51;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "battery.initial_soc"));
    }

    #[test]
    fn validation_bounds_led_load() {
        let mut cfg = NodeConfig::demo();
        cfg.led.load_when_on = MAX_LED_LOAD;
        assert!(cfg.validate().is_empty());
        for load in [-1, MAX_LED_LOAD + 1, i32::MAX, i32::MIN] {
            cfg.led.load_when_on = load;
            let errors = cfg.validate();
            assert!(errors.iter().any(|e| e.field == "led.load_when_on"), "{load}");
        }
    }

    #[test]
    fn validation_reports_every_violation() {
        let mut cfg = NodeConfig::demo();
        cfg.battery.max_rate = 0;
        cfg.simulation.wind_press_chance = 1.5;
        cfg.node.marquee = String::new();
        let fields: Vec<_> = cfg.validate().into_iter().map(|e| e.field).collect();
        assert!(fields.contains(&"battery.max_rate".to_string()));
        assert!(fields.contains(&"simulation.wind_press_chance".to_string()));
        assert!(fields.contains(&"node.marquee".to_string()));
    }

    #[test]
    fn settings_mirror_node_section() {
        let mut cfg = NodeConfig::demo();
        cfg.node.report_interval_ms = 250;
        let settings = cfg.settings();
        assert_eq!(settings.report_interval_ms, 250);
        assert_eq!(settings.idle_delay_ms, 100);
        assert_eq!(settings.marquee, cfg.node.marquee);
    }
}
