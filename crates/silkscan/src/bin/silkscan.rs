//! Locate silkscreen designators on a plotted board and write a JSON report.
//!
//! Usage:
//!     silkscan scan.json
//!     silkscan scan.json --output report.json -v

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::error;
use silkscan::{run_config, ScanConfig};

#[derive(Parser)]
#[command(name = "silkscan")]
#[command(version)]
#[command(
    about = "Find component reference designators on PCB silkscreen layers",
    long_about = None
)]
struct Cli {
    /// JSON scan configuration
    config: PathBuf,

    /// Report path, overriding the config
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Emit JSON logs (requires the `tracing` feature)
    #[arg(long)]
    json_logs: bool,
}

fn init_logging(cli: &Cli) {
    let level = silkscan::core::level_for_verbosity(cli.verbose);
    #[cfg(feature = "tracing")]
    {
        let _ = tracing_log::LogTracer::init();
        log::set_max_level(level);
        silkscan::core::init_tracing(cli.json_logs);
    }
    #[cfg(not(feature = "tracing"))]
    {
        if cli.json_logs {
            eprintln!("--json-logs needs the `tracing` feature; using plain logs");
        }
        let _ = silkscan::core::init_with_level(level);
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    let mut cfg = match ScanConfig::load_json(&cli.config) {
        Ok(cfg) => cfg,
        Err(err) => {
            error!("cannot read {}: {err}", cli.config.display());
            return ExitCode::FAILURE;
        }
    };
    if let Some(output) = &cli.output {
        cfg.output_path = Some(output.display().to_string());
    }

    match run_config(&cfg) {
        Ok(report) => {
            println!(
                "{} located, {} missing -> {}",
                report.designators.len(),
                report.missing.len(),
                cfg.output_path().display()
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("scan failed: {err}");
            ExitCode::FAILURE
        }
    }
}
