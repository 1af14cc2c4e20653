//! Command-line argument parsing for the host binary.

use std::env;
use std::path::PathBuf;

/// Parsed command-line options.
#[derive(Debug, Default)]
pub struct CliOptions {
    pub scenario: Option<PathBuf>,
    pub preset: Option<String>,
    pub seed: Option<u64>,
    pub reports: Option<u64>,
    pub telemetry_out: Option<PathBuf>,
    pub help: bool,
}

pub fn parse_args() -> Result<CliOptions, String> {
    let args: Vec<String> = env::args().skip(1).collect();
    parse_args_from(&args)
}

/// Parses options from `args` (program name excluded).
///
/// With neither `--scenario` nor `--preset`, the `demo` preset is selected.
pub fn parse_args_from(args: &[String]) -> Result<CliOptions, String> {
    let mut i = 0usize;
    let mut opts = CliOptions::default();

    while i < args.len() {
        match args[i].as_str() {
            "--scenario" => {
                i += 1;
                let path = args.next_or_err(
                    i,
                    "missing value for --scenario (expected a TOML file path)",
                )?;
                if opts.scenario.replace(PathBuf::from(path)).is_some() {
                    return Err("--scenario provided more than once".to_string());
                }
            }
            "--preset" => {
                i += 1;
                let name =
                    args.next_or_err(i, "missing value for --preset (expected a preset name)")?;
                if opts.preset.replace(name.to_string()).is_some() {
                    return Err("--preset provided more than once".to_string());
                }
            }
            "--seed" => {
                i += 1;
                let raw = args.next_or_err(i, "missing value for --seed (expected a u64)")?;
                let seed = raw
                    .parse::<u64>()
                    .map_err(|_| format!("--seed value \"{raw}\" is not a valid u64"))?;
                opts.seed = Some(seed);
            }
            "--reports" => {
                i += 1;
                let raw = args.next_or_err(i, "missing value for --reports (expected a count)")?;
                let reports = raw
                    .parse::<u64>()
                    .map_err(|_| format!("--reports value \"{raw}\" is not a valid count"))?;
                opts.reports = Some(reports);
            }
            "--telemetry-out" => {
                i += 1;
                let path = args.next_or_err(
                    i,
                    "missing value for --telemetry-out (expected a file path)",
                )?;
                if opts.telemetry_out.replace(PathBuf::from(path)).is_some() {
                    return Err("--telemetry-out provided more than once".to_string());
                }
            }
            "--help" | "-h" => {
                opts.help = true;
                return Ok(opts);
            }
            other => return Err(format!("unknown argument: {other}")),
        }
        i += 1;
    }

    if opts.scenario.is_some() && opts.preset.is_some() {
        return Err(
            "arguments `--scenario` and `--preset` are mutually exclusive; choose one source"
                .to_string(),
        );
    }

    if opts.scenario.is_none() && opts.preset.is_none() {
        opts.preset = Some("demo".to_string());
    }

    Ok(opts)
}

trait SliceArgExt {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String>;
}

impl SliceArgExt for [String] {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String> {
        self.get(index)
            .map(String::as_str)
            .ok_or_else(|| err.to_string())
    }
}

pub fn print_usage() {
    eprintln!("house-node: smart-house energy node on a simulated board");
    eprintln!();
    eprintln!("Usage:");
    eprintln!(
        "  house-node [--scenario <path> | --preset <name>] [--seed <u64>] [--reports <n>] [--telemetry-out <path>]"
    );
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --scenario <path>        Load node config from a TOML file");
    eprintln!("  --preset <name>          Use a built-in preset (demo, windy)");
    eprintln!("  --seed <u64>             Override the button simulation seed");
    eprintln!("  --reports <n>            Stop after n reports (0 = until stdin closes)");
    eprintln!("  --telemetry-out <path>   Export report samples to CSV");
    eprintln!("  --help                   Show this help message");
    eprintln!();
    eprintln!("Commands are read from stdin, one per line: \"<target> <action>\".");
    eprintln!("Telemetry is written to stdout; logs go to stderr (RUST_LOG).");
}
