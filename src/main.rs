mod app;
mod cli;
mod download;
mod grid;
mod layout;
mod manifest;
mod qr;
mod song;
mod tools;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = cli::Args::parse();
    app::run(args)
}
