//! Serial protocol between the node and the grid controller.
//!
//! Grid → node: one `<target> <action>` command per line.
//! Node → grid: one `powerSample <total>` telemetry line per report tick.

use std::fmt;

use heapless::Vec as BoundedVec;
use thiserror::Error;
use tracing::{debug, warn};

/// Longest accepted line, excluding the terminator.
pub const MAX_LINE_LEN: usize = 64;

/// Keyword that starts every telemetry line.
pub const POWER_SAMPLE: &str = "powerSample";

/// Appliance addressed by a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Led,
    Battery,
    Turbine,
    HeatPump,
}

impl Target {
    /// Every addressable target.
    pub const ALL: [Target; 4] = [Target::Led, Target::Battery, Target::Turbine, Target::HeatPump];

    /// Wire keyword for this target.
    pub fn keyword(self) -> &'static str {
        match self {
            Target::Led => "led",
            Target::Battery => "battery",
            Target::Turbine => "turbine",
            Target::HeatPump => "heatpump",
        }
    }

    /// Looks up a wire keyword. Matching is exact and case-sensitive.
    pub fn from_keyword(token: &[u8]) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|target| target.keyword().as_bytes() == token)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Reasons a command line is dropped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("expected `<target> <action>`, got {0} token(s)")]
    TokenCount(usize),
    #[error("unknown target `{0}`")]
    UnknownTarget(String),
}

/// A parsed `<target> <action>` command borrowing its action bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command<'a> {
    pub target: Target,
    /// Raw action token, interpreted by the addressed appliance.
    pub action: &'a [u8],
}

impl<'a> Command<'a> {
    /// Splits `line` on ASCII whitespace and resolves the target.
    pub fn parse(line: &'a [u8]) -> Result<Self, CommandError> {
        let mut tokens = line
            .split(|b| b.is_ascii_whitespace())
            .filter(|token| !token.is_empty());

        let (target, action) = match (tokens.next(), tokens.next()) {
            (Some(target), Some(action)) => (target, action),
            (first, _) => return Err(CommandError::TokenCount(usize::from(first.is_some()))),
        };
        let extra = tokens.count();
        if extra > 0 {
            return Err(CommandError::TokenCount(2 + extra));
        }

        let target = Target::from_keyword(target).ok_or_else(|| {
            CommandError::UnknownTarget(String::from_utf8_lossy(target).into_owned())
        })?;
        Ok(Self { target, action })
    }
}

/// Formats the telemetry line for one report tick (without terminator).
pub fn format_power_sample(total_load: i32) -> String {
    format!("{POWER_SAMPLE} {total_load}")
}

/// Extracts the total from a telemetry line, as the grid side reads it.
pub fn parse_power_sample(line: &str) -> Option<i32> {
    line.trim()
        .strip_prefix(POWER_SAMPLE)?
        .trim()
        .parse()
        .ok()
}

/// Assembles serial bytes into lines.
///
/// Lines longer than [`MAX_LINE_LEN`] are dropped whole: once the buffer
/// overflows, bytes are discarded until the next newline. Carriage returns
/// are ignored so `\r\n` terminals work. Line bytes are passed on as
/// received, without UTF-8 validation.
#[derive(Debug, Default)]
pub struct LineAssembler {
    buf: BoundedVec<u8, MAX_LINE_LEN>,
    discarding: bool,
}

impl LineAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one byte, returning a line when `byte` completes one.
    pub fn push(&mut self, byte: u8) -> Option<Vec<u8>> {
        match byte {
            b'\n' if self.discarding => {
                debug!("resynchronised after overlong line");
                self.discarding = false;
                None
            }
            b'\n' => {
                let line = self.buf.to_vec();
                self.buf.clear();
                Some(line)
            }
            b'\r' => None,
            _ if self.discarding => None,
            _ => {
                if self.buf.push(byte).is_err() {
                    warn!(max = MAX_LINE_LEN, "overlong serial line discarded");
                    self.buf.clear();
                    self.discarding = true;
                }
                None
            }
        }
    }

    /// Feeds a chunk of bytes and returns every line it completes.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<Vec<u8>> {
        bytes.iter().filter_map(|&b| self.push(b)).collect()
    }
}
