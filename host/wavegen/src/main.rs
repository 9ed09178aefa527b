mod args;
mod commands;
mod config;
mod devmem;
mod status;
mod units;

use crate::args::Args;
use crate::config::Config;
use crate::devmem::DevMem;
use clap::Parser;
use eyre::Context;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::util::SubscriberInitExt;
use wavegen_common::engine::WaveformEngine;
use wavegen_common::sync::RawSpinLock;

fn init_tracing(args: &Args) {
    let level = match (args.quiet, args.verbose) {
        (true, _) => "off",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .finish()
        .init();
}

fn main() -> eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    init_tracing(&args);

    let config = Config::resolve(&args)?;
    let io = DevMem::open(&config.device, config.base_address)
        .wrap_err("failed to open the waveform generator")?;
    let engine: WaveformEngine<RawSpinLock, DevMem> = WaveformEngine::from_io(io);

    commands::execute(&engine, &args.command, &mut std::io::stdout().lock())
}
