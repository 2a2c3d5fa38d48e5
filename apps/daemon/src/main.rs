use anyhow::{Context, Result};
use clap::Parser;
use cradle::domain::config::BootstrapConfig;
use cradle::kernel::config::load_config;
use cradle_daemon::{Daemon, init_logger};
use std::path::PathBuf;
use tracing::info;

/// Module directive dispatch daemon.
#[derive(Debug, Parser)]
#[command(name = "cradle-daemon", version)]
struct Cli {
    /// Bootstrap configuration file (TOML, YAML or JSON).
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directive document; overrides `document.path` of the bootstrap configuration.
    #[arg(short, long, value_name = "FILE")]
    document: Option<PathBuf>,

    /// Test the configuration and exit.
    #[arg(short = 't', long)]
    check: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config: BootstrapConfig =
        load_config(cli.config.as_deref()).context("Failed to load bootstrap configuration")?;
    let _logger = init_logger(&config.log).context("Failed to initialize logger")?;

    let mut builder = Daemon::builder().config(config);
    if let Some(document) = cli.document {
        builder = builder.document(document);
    }
    let daemon = builder.build()?;

    if cli.check {
        info!(document = %daemon.document().display(), "Configuration test is successful");
        return Ok(());
    }

    daemon.run()
}
