//! sigbuild CLI - build C targets described by a JSON manifest

use std::io::IsTerminal;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use sigbuild::builder::BuildError;
use sigbuild::core::{LoaderError, SelectError};
use sigbuild::util::diagnostic::{self, Diagnostic, InvalidJsonError};
use sigbuild::util::{Config, GlobalContext};

mod cli;
mod commands;

use cli::{Cli, Commands};

/// Environment variable holding a `tracing` filter directive.
const LOG_ENV: &str = "SIGBUILD_LOG";

fn main() {
    let cli = Cli::parse();
    let color = !cli.no_color && std::io::stderr().is_terminal();

    if let Err(e) = run(cli) {
        report(&e, color);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut ctx = GlobalContext::new()?;
    ctx.set_verbose(cli.verbose);
    let config = ctx.config();

    // Set up logging
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(&cli, &config))
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    // Execute command
    match cli.command {
        Commands::Build(args) => commands::build::execute(args, &ctx, &config),
        Commands::List(args) => commands::list::execute(args, &ctx, &config),
        Commands::About => commands::about::execute(&ctx),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}

/// Command line flags win, then `SIGBUILD_LOG`, then the tool config.
fn log_filter(cli: &Cli, config: &Config) -> EnvFilter {
    let level = match (cli.verbose, cli.log) {
        (true, _) | (false, Some(2)) => Some("sigbuild=debug"),
        (false, Some(0)) => Some("sigbuild=error"),
        (false, Some(_)) => Some("sigbuild=info"),
        (false, None) => None,
    };

    if let Some(level) = level {
        return EnvFilter::new(level);
    }
    if let Ok(directive) = std::env::var(LOG_ENV) {
        return EnvFilter::new(directive);
    }
    match config.log.filter {
        Some(ref directive) => EnvFilter::new(directive),
        None => EnvFilter::new("sigbuild=info"),
    }
}

/// Print an error with whatever extra help its type can offer.
fn report(err: &anyhow::Error, color: bool) {
    if let Some(LoaderError::InvalidJson {
        path,
        message,
        line,
        column,
    }) = err.downcast_ref::<LoaderError>()
    {
        if let Ok(source) = std::fs::read_to_string(path) {
            let name = path.display().to_string();
            let json = InvalidJsonError::new(name, source, message.clone(), *line, *column);
            eprintln!("{:?}", miette::Report::new(json));
            return;
        }
    }

    let mut diag = Diagnostic::error(format!("{:#}", err));
    if let Some(e) = err.downcast_ref::<SelectError>() {
        let typed = e.to_diagnostic();
        diag.context = typed.context;
        diag.suggestions = typed.suggestions;
    } else if let Some(e) = err.downcast_ref::<LoaderError>() {
        diag.suggestions = e.to_diagnostic().suggestions;
    } else if let Some(e) = err.downcast_ref::<BuildError>() {
        diag.suggestions = e.to_diagnostic().suggestions;
    }

    diagnostic::emit(&diag, color);
}
