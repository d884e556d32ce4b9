use anyhow::Result;
use clap::Parser;
use fashion_trends::cli::{self, Cli};
use fashion_trends::config::{AppConfig, LogFormat, LoggingConfig};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = AppConfig::load(cli.data_dir.clone())?;
    init_logging(&cfg.settings.logging);
    cli::run(cli, &cfg)
}

/// RUST_LOG wins over the configured level.
fn init_logging(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.level.as_str()));
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match logging.format {
        LogFormat::Compact => builder.compact().init(),
        LogFormat::Pretty => builder.pretty().init(),
        LogFormat::Json => builder.json().init(),
    }
}
