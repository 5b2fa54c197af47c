use anyhow::Result;
use clap::Parser;
use flowkit::cli::{run_cli_with_config, Cli};
use flowkit::config::Config;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::builder().config_path(cli.config.clone()).build()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log.filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    run_cli_with_config(cli, config)
}
