use clap::Parser;
use colored::*;
use spotcheck::cli::{formatter, Cli, Commands};
use spotcheck::SpotCheckError;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    // SPOTCHECK_LOG wins over -v
    let default_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = std::env::var("SPOTCHECK_LOG")
        .ok()
        .and_then(|spec| EnvFilter::try_new(spec).ok())
        .unwrap_or_else(|| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    formatter::init();

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        process::exit(exit_code(&e));
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = cli.config.as_deref();
    match cli.command {
        Commands::Check(args) => spotcheck::cli::commands::check::run(args, config),
        Commands::Email(args) => spotcheck::cli::commands::email::run(args, config),
        Commands::Config(args) => spotcheck::cli::commands::config::run(args, config),
    }
}

fn exit_code(error: &anyhow::Error) -> i32 {
    match error.downcast_ref::<SpotCheckError>() {
        Some(SpotCheckError::Config(_)) => 2,
        Some(SpotCheckError::Io(_)) => 3,
        Some(SpotCheckError::InvalidInput(_)) => 4,
        Some(SpotCheckError::ExternalTool(_)) => 5,
        Some(SpotCheckError::Network(_)) => 6,
        Some(SpotCheckError::Parse(_)) => 7,
        Some(SpotCheckError::TerminalJob(_)) => 8,
        None => 1,
    }
}
