mod cli;
mod commands;
mod config;
mod error;
mod processing;

use clap::Parser;
use tracing::subscriber::set_global_default;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::Registry;

use crate::cli::{
    Args,
    Commands,
};
use crate::commands::{
    main_schedule,
    main_write_template,
};
use crate::error::CliError;

#[cfg(target_os = "windows")]
use mimalloc::MiMalloc;

#[cfg(target_os = "windows")]
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Logs to stderr, `RUST_LOG` overrides the default `info` level.
/// Span close events carry the time spent scheduling and writing.
fn init_logging() -> Result<(), CliError> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = Registry::default().with(env_filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_span_events(FmtSpan::CLOSE),
    );
    set_global_default(subscriber)?;
    Ok(())
}

fn main() -> Result<(), CliError> {
    init_logging()?;

    match Args::parse().command {
        Some(Commands::Schedule(args)) => main_schedule(args),
        Some(Commands::WriteTemplate(args)) => main_write_template(args),
        None => {
            eprintln!("No command provided, see `simsef --help`");
            Ok(())
        }
    }
}
