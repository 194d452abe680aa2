use clap::Parser;
use tracing_subscriber::EnvFilter;

use js_backport::cli::{run, Cli};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    run(&cli)
}
