//! Errors that stop the node.
//!
//! Malformed commands are not errors at this level: they are logged and
//! dropped by the dispatcher (see [`crate::protocol::CommandError`]).

use std::io;

use thiserror::Error;

use crate::display::DisplayError;

/// Setup and runtime failures of the control loop.
#[derive(Debug, Error)]
pub enum NodeError {
    /// More custom glyphs were requested than the display offers.
    #[error("all {slots} custom glyph slots are in use")]
    GlyphSlotsExhausted { slots: u8 },

    #[error("serial link failed: {0}")]
    Serial(#[from] io::Error),

    #[error("display failed: {0}")]
    Display(#[from] DisplayError),
}
