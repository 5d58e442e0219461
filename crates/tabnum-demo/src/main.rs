#![forbid(unsafe_code)]

//! `tabnum-demo`: runs the badge engine against an in-memory workspace.
//!
//! Logging goes to stderr and honours `RUST_LOG` (default `info`); the
//! summary goes to stdout.

mod cli;
mod error;

use tracing_subscriber::EnvFilter;

use crate::cli::LogFormat;

fn init_logging(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    let _ = match format {
        LogFormat::Text => builder.without_time().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}

fn main() {
    if let Err(error) = cli::run_from_env() {
        eprintln!("{error}");
        std::process::exit(error.exit_code());
    }
}
