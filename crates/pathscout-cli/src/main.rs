//! CLI entry point - the composition root.
//!
//! Builds the detector from global options, then dispatches to handlers.

use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use pathscout_cli::{Cli, CliConfig, CliError, Commands, bootstrap, handlers};

fn main() -> ExitCode {
    // Load environment variables before clap reads `env` defaults
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            let code = err.downcast_ref::<CliError>().map_or(1, CliError::exit_code);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "pathscout_cli=debug,pathscout_core=debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let Some(command) = cli.command.as_ref() else {
        // No command provided - show help
        Cli::command().print_help()?;
        return Ok(());
    };

    let ctx = bootstrap(CliConfig::from_cli(&cli));

    match command {
        Commands::Resolve { schema, base, json } => {
            handlers::resolve::execute(&ctx, schema, base.as_deref(), *json)?;
        }
        Commands::Explain { schema } => {
            handlers::explain::execute(&ctx, schema)?;
        }
        Commands::Split { idents } => {
            handlers::split::execute(idents);
        }
    }
    Ok(())
}
