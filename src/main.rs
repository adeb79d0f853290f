//! weightlog CLI entry point.

use clap::Parser;
use std::process::ExitCode;
use weightlog::cli::commands::{self, Context};
use weightlog::cli::{Cli, Commands};
use weightlog::error::Error;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.quiet {
        weightlog::QUIET.store(true, std::sync::atomic::Ordering::Relaxed);
    }

    // Set up tracing based on verbosity
    init_tracing(cli.verbose, cli.quiet);

    // JSON when asked for, or when stdout is not a terminal
    let json = cli.json || !std::io::IsTerminal::is_terminal(&std::io::stdout());

    match run(&cli, json) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if json {
                eprintln!("{}", e.to_structured_json());
            } else if !cli.quiet {
                if let Some(hint) = e.hint() {
                    eprintln!("Error: {e}\n  Hint: {hint}");
                } else {
                    eprintln!("Error: {e}");
                }
            }
            ExitCode::from(e.exit_code())
        }
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    if quiet {
        return;
    }

    // Honor RUST_LOG if set, otherwise use verbosity flag
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        match verbose {
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("info"),
            2 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn run(cli: &Cli, json: bool) -> Result<(), Error> {
    if let Commands::Completions { shell } = &cli.command {
        return commands::completions::execute(*shell);
    }

    let ctx = Context::resolve(cli, json)?;

    match &cli.command {
        // Record commands see the newest synced data first
        Commands::Add(args) => {
            commands::sync::startup_import(&ctx);
            commands::record::add(args, &ctx)
        }
        Commands::Edit(args) => {
            commands::sync::startup_import(&ctx);
            commands::record::edit(args, &ctx)
        }
        Commands::Rm { date } => {
            commands::sync::startup_import(&ctx);
            commands::record::remove(date, &ctx)
        }
        Commands::List => {
            commands::sync::startup_import(&ctx);
            commands::record::list(&ctx)
        }
        Commands::Stats => {
            commands::sync::startup_import(&ctx);
            commands::report::stats(&ctx)
        }
        Commands::Trend => {
            commands::sync::startup_import(&ctx);
            commands::report::trend(&ctx)
        }

        // Sync
        Commands::Sync { command } => commands::sync::execute(command, &ctx),

        // Config
        Commands::Config { command } => commands::config::execute(command, &ctx),

        Commands::Completions { .. } => Ok(()),
    }
}
