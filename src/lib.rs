//! Smart-house energy node: appliance power model, grid serial protocol, and
//! status display, generic over the board it runs on.

pub mod appliances;
pub mod cli;
pub mod config;
/// Character LCD contract, glyph slots, and the status screen.
pub mod display;
pub mod error;
pub mod hal;
/// Desktop board used by the binary.
pub mod host;
pub mod io;
/// House model and control loop.
pub mod node;
/// Serial command and telemetry line formats.
pub mod protocol;
pub mod telemetry;

pub use error::NodeError;
