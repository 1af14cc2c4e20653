//! Common types and traits for appliance simulation components.

use std::str;

/// Contextual information passed to appliances during load evaluation.
///
/// # Fields
/// * `other_load` - Aggregate load of everything evaluated before this
///   appliance in the current power-balance step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadContext {
    pub other_load: i32,
}

impl LoadContext {
    /// Creates a context with no preceding load.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context carrying the load evaluated so far.
    pub fn with_other_load(other_load: i32) -> Self {
        Self { other_load }
    }
}

/// Trait defining an appliance that consumes or produces power.
///
/// Every appliance in the house implements this capability set, which lets
/// the command dispatcher route actions without knowing the concrete kind.
/// Kind-specific operations (`toggle`, `bump`, `glyph_index`) stay on the
/// concrete types.
pub trait Appliance {
    /// Returns the appliance load for this power-balance step.
    ///
    /// Positive values indicate consumption, negative values generation.
    /// Only the battery reads `context`; its own flow depends on the demand
    /// of everything evaluated before it.
    fn load(&mut self, context: &LoadContext) -> i32;

    /// Applies the action token of a `<target> <action>` command.
    ///
    /// Malformed actions are logged and never propagate; each appliance
    /// decides its own fallback.
    fn apply_command(&mut self, action: &[u8]);

    /// Pushes the current logical state to the owned output.
    ///
    /// Idempotent; never changes logical state.
    fn sync_output(&mut self);

    /// Returns a human-readable type name for the appliance.
    fn kind(&self) -> &'static str;
}

/// Parses a decimal integer action payload.
///
/// Accepts an optional sign. Returns `None` for anything else, including
/// non-UTF-8 bytes and out-of-range values.
pub fn parse_int(action: &[u8]) -> Option<i32> {
    str::from_utf8(action).ok()?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_signed_integers() {
        assert_eq!(parse_int(b"3"), Some(3));
        assert_eq!(parse_int(b"-5"), Some(-5));
        assert_eq!(parse_int(b"+2"), Some(2));
    }

    #[test]
    fn rejects_non_numeric_payloads() {
        assert_eq!(parse_int(b"on"), None);
        assert_eq!(parse_int(b""), None);
        assert_eq!(parse_int(b"1.5"), None);
        assert_eq!(parse_int(&[0xff, 0x31]), None);
        assert_eq!(parse_int(b"99999999999"), None);
    }

    #[test]
    fn default_context_has_no_other_load() {
        assert_eq!(LoadContext::new().other_load, 0);
        assert_eq!(LoadContext::with_other_load(-4).other_load, -4);
    }
}
