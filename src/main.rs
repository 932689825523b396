//! CLI entry point: capture one sweep from a Copper Mountain VNA.
//!
//! Connects to the instrument's SCPI socket server, applies the sweep
//! configuration from the command line, triggers a single sweep, and writes
//! the data table, settings snapshot, and figures to the output directory.
//!
//! ```bash
//! cmt-vna --host 192.168.1.50 --start "1 GHz" --stop "6 GHz" runs/device_a
//! ```

use anyhow::Result;
use clap::Parser;
use cmt_vna::{VnaConfig, VnaSession};
use log::info;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cmt-vna")]
#[command(about = "Capture S-parameter sweeps from a Copper Mountain VNA", long_about = None)]
struct Cli {
    /// Instrument hostname or IP address
    #[arg(long, default_value = "localhost")]
    host: String,

    /// SCPI socket server port (Socket Server must be ON on the instrument)
    #[arg(long, default_value_t = 5025)]
    port: u16,

    /// Sweep start frequency, value plus unit
    #[arg(long, default_value = "3 GHz")]
    start: String,

    /// Sweep stop frequency, value plus unit
    #[arg(long, default_value = "4 GHz")]
    stop: String,

    /// IF bandwidth, value plus unit
    #[arg(long, default_value = "1 kHz")]
    bandwidth: String,

    /// Number of sweep points
    #[arg(long, default_value_t = 3001)]
    points: usize,

    /// Source power in dBm
    #[arg(long, default_value_t = -10.0, allow_hyphen_values = true)]
    power: f64,

    /// Trace parameters in display order, comma separated
    #[arg(long, value_delimiter = ',', default_value = "S11,S12,S22,S21")]
    traces: Vec<String>,

    /// Output directory for the capture (must not already exist)
    output: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = VnaConfig::default()
        .with_address(cli.host, cli.port)
        .with_frequency_range(cli.start, cli.stop)
        .with_if_bandwidth(cli.bandwidth)
        .with_points(cli.points)
        .with_power_dbm(cli.power)
        .with_traces(cli.traces);

    let mut session = VnaSession::connect(config)?;
    let sweep = session.capture(&cli.output)?;

    info!(
        "Captured {} traces x {} points to {}",
        sweep.traces.len(),
        sweep.points(),
        cli.output.display()
    );
    Ok(())
}
