//! Request From Source - Command-line tool for generating HTTP requests from TypeScript controllers.
//!
//! This binary analyzes a NestJS-style project, extracts every decorated route handler and
//! prints a ready-to-send request per route, with example JSON bodies synthesized from the
//! declared body types.
//!
//! # Usage
//!
//! ```bash
//! request-from-source [OPTIONS] <PROJECT_PATH>
//! ```
//!
//! # Examples
//!
//! Write an `.http` file:
//! ```bash
//! request-from-source ./my-nest-app -o requests.http
//! ```
//!
//! Emit the route report as JSON against a remote host:
//! ```bash
//! request-from-source ./my-nest-app -f json --base-url https://staging.example.com
//! ```
//!
//! Enable verbose logging:
//! ```bash
//! request-from-source ./my-nest-app -v
//! ```

use anyhow::Result;
use clap::Parser;
use log::info;
use request_from_source::cli;

fn main() -> Result<()> {
    // Parse first so the verbose flag can pick the log level
    let args = cli::CliArgs::parse();

    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .parse_default_env()
        .init();

    info!("Request From Source starting...");

    let args = cli::parse_args_from_parsed(args)?;

    cli::run(args)?;

    info!("Request generation completed successfully");

    Ok(())
}
