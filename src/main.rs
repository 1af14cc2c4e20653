//! house-node entry point: CLI wiring and config-driven node construction.

use std::ops::ControlFlow;
use std::process;
use std::sync::atomic::Ordering;

use tracing::{info, warn};

use house_node::cli::{self, CliOptions};
use house_node::config::NodeConfig;
use house_node::host::{HostBoard, StdioSerial};
use house_node::io::export::export_csv;
use house_node::node::Node;
use house_node::telemetry;

fn load_config(opts: &CliOptions) -> NodeConfig {
    let loaded = match (&opts.scenario, &opts.preset) {
        (Some(path), _) => NodeConfig::from_toml_file(path),
        (None, Some(name)) => NodeConfig::from_preset(name),
        (None, None) => Ok(NodeConfig::demo()),
    };
    let mut config = loaded.unwrap_or_else(|e| {
        eprintln!("error: {e}");
        process::exit(1);
    });

    if let Some(seed) = opts.seed {
        config.simulation.seed = seed;
    }
    if let Some(reports) = opts.reports {
        config.simulation.max_reports = reports;
    }

    let errors = config.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("error: {e}");
        }
        process::exit(1);
    }
    config
}

fn main() {
    let opts = cli::parse_args().unwrap_or_else(|e| {
        eprintln!("error: {e}");
        cli::print_usage();
        process::exit(2);
    });
    if opts.help {
        cli::print_usage();
        return;
    }

    telemetry::init_tracing();
    let config = load_config(&opts);

    let serial = StdioSerial::spawn();
    let input_closed = serial.closed_flag();
    let (house, peripherals) = HostBoard::assemble(&config, serial);

    let mut node = Node::<HostBoard>::new(house, peripherals, &config.settings())
        .unwrap_or_else(|e| {
            eprintln!("error: node setup failed: {e}");
            process::exit(1);
        });

    let max_reports = config.simulation.max_reports;
    let mut samples = Vec::new();
    let result = node.run(|iteration| {
        if let Some(balance) = iteration.report {
            samples.push(balance);
        }
        let done = if max_reports > 0 {
            samples.len() as u64 >= max_reports
        } else {
            input_closed.load(Ordering::Relaxed)
        };
        if done {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    });
    node.house_mut().safe_shutdown();
    info!(reports = samples.len(), "node stopped");

    if let Some(path) = &opts.telemetry_out {
        match export_csv(&samples, path) {
            Ok(()) => info!(path = %path.display(), "telemetry exported"),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "telemetry export failed");
                process::exit(1);
            }
        }
    }

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
