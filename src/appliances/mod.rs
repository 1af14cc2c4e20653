//! Appliance simulation components for the house power model.

/// Home battery with rate-limited state of charge.
pub mod battery;
/// Discrete-level loads (heat pump).
pub mod discrete;
/// On/off loads (lighting).
pub mod on_off;
/// Wind turbine generator.
pub mod turbine;
pub mod types;

// Re-export the main types for convenience
pub use battery::Battery;
pub use discrete::DiscreteLoadAppliance;
pub use on_off::OnOffAppliance;
pub use turbine::Turbine;
pub use types::Appliance;
pub use types::LoadContext;
