// src/main.rs

use anyhow::Result;
use clap::Parser;
use log::info;
use srcpick::cli;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = cli::Args::parse();
    info!("starting srcpick v{}", env!("CARGO_PKG_VERSION"));

    cli::run(args)
}
