//! chainconf: configuration scaffolding for blockchain clients
//!
//! Exports a JSON Schema describing the client configuration, writes a
//! default `config.json` and validates it against the same field rules.

mod cli;
mod config;
mod domain;
mod service;

use std::process::ExitCode;

use clap::Parser;

use cli::{Cli, Commands};
use domain::logger::{self, LogSettings};
use domain::{Phase, TracingSink};
use service::{Plan, SetupPaths, SetupService};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let plan = match cli.command.unwrap_or(Commands::Setup) {
        Commands::Setup => Plan::Full,
        Commands::Init => Plan::Only(Phase::WriteDefault),
        Commands::Schema => Plan::Only(Phase::ExportSchema),
        Commands::Check => Plan::Only(Phase::Validate),
        Commands::Version => {
            println!("chainconf {}", env!("CARGO_PKG_VERSION"));
            return ExitCode::SUCCESS;
        }
    };

    let settings = LogSettings {
        debug: cli.debug,
        quiet: cli.quiet,
        log_dir: cli.log_dir.clone(),
    };
    if let Err(e) = logger::init(&settings) {
        eprintln!("Failed to initialize logging: {:#}", e);
        return ExitCode::FAILURE;
    }

    let paths = SetupPaths {
        config: cli.config,
        schema: cli.schema,
    };
    let sink = TracingSink;

    // Failures are already reported through the sink
    match SetupService::new(paths, &sink).run(plan) {
        Ok(_) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}
