//! File output for recorded telemetry.

pub mod export;
