use std::io::{Write, stdout};
use std::path::PathBuf;

use clap::Parser;
use color_eyre::Result;
use gtop::config::{Config, load_config, load_config_from_path};
use gtop::report::{render_detailed_with_width, render_json, render_with_width};
use gtop::snapshot::build_snapshot;
use gtop::system::native::SysinfoProvider;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "gtop",
    version,
    about = "Print a one-shot snapshot of CPU, memory, disk and network health"
)]
struct Cli {
    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// CPU usage sampling window in milliseconds
    #[arg(long)]
    sample_ms: Option<u64>,

    /// Append every partition and interface to the summary
    #[arg(long, default_value_t = false)]
    detailed: bool,

    /// Print the full snapshot as JSON instead of the text report
    #[arg(long, default_value_t = false, conflicts_with = "detailed")]
    json: bool,

    /// Report width in columns
    #[arg(long)]
    width: Option<usize>,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();

    let cli = Cli::parse();
    let config = load_config_for_cli(&cli);

    let mut provider = SysinfoProvider::new();
    let snapshot = build_snapshot(&mut provider, &config).inspect_err(|err| {
        error!(subsystem = %err.subsystem, error = %err, "snapshot aborted");
    })?;

    let text = if cli.json {
        let mut json = render_json(&snapshot)?;
        json.push('\n');
        json
    } else if config.report.detailed {
        render_detailed_with_width(&snapshot, config.report.width)
    } else {
        render_with_width(&snapshot, config.report.width)
    };

    let mut out = stdout().lock();
    out.write_all(text.as_bytes())?;
    out.flush()?;
    Ok(())
}

/// Logs go to stderr so stdout carries only the report.
fn init_tracing() {
    let filter = EnvFilter::try_from_env("GTOP_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config_for_cli(cli: &Cli) -> Config {
    let mut config = match &cli.config {
        Some(path) => load_config_from_path(path),
        None => load_config(),
    };

    if let Some(ms) = cli.sample_ms {
        config.general.cpu_sample_ms = ms;
    }
    if cli.detailed {
        config.report.detailed = true;
    }
    if let Some(width) = cli.width {
        config.report.width = width;
    }

    config
}
