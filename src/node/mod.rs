//! The energy node: house model, report scheduling, inputs, and control loop.

/// Wrapping tick arithmetic and the report deadline.
pub mod clock;
pub mod engine;
/// Appliance ownership, command routing, and the power-balance step.
pub mod house;
/// Button edge detection.
pub mod input;
pub mod power_balance;
pub mod types;

pub use engine::Node;
pub use house::House;
pub use power_balance::PowerBalance;
pub use types::{Iteration, NodeSettings, Peripherals};
