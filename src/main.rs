//! Aurorae Haven CLI entry point.

use clap::Parser;
use haven::cli::commands::{self, Workspace};
use haven::cli::{Cli, Commands};
use haven::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    // Set up tracing based on verbosity
    init_tracing(cli.verbose, cli.quiet);

    // Resolve effective JSON mode: --json OR non-TTY stdout
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
            2 => EnvFilter::new("debug,rusqlite=info"),
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
    // Commands that never touch the data directory
    match &cli.command {
        Commands::Version => return commands::version::execute(json),
        Commands::Completions { shell } => return commands::completions::execute(shell),
        _ => {}
    }

    let workspace = Workspace::resolve(cli.data_dir.as_ref(), cli.db.as_ref(), cli.no_structured)?;

    match &cli.command {
        Commands::Export { output, stdout } => {
            commands::export::execute(&workspace, output.as_ref(), *stdout, json)
        }
        Commands::Import { file, no_reload } => {
            commands::import::execute(&workspace, file, *no_reload, json)
        }
        Commands::Status => commands::status::execute(&workspace, json),
        Commands::Redirect { command } => commands::redirect::execute(command, &workspace, json),
        Commands::Version | Commands::Completions { .. } => Ok(()),
    }
}
