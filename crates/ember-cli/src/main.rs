//! Ember CLI — command-line interface for the Ember scripting language.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use ember_cli::colors::{bold, cyan, red, status_label};
use ember_cli::{repl, run_source};

#[derive(Parser)]
#[command(
    name = "ember",
    version,
    about = "Ember — a small dynamically-typed scripting language"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an Ember source file
    Run {
        /// Path to the source file
        file: PathBuf,
    },
    /// Start an interactive REPL
    Repl,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match cli.command {
        Commands::Run { file } => cmd_run(&file),
        Commands::Repl => {
            if let Err(err) = repl::run_repl() {
                eprintln!("{} {err}", red("Error:"));
                return ExitCode::FAILURE;
            }
            ExitCode::SUCCESS
        }
    }
}

fn cmd_run(file: &PathBuf) -> ExitCode {
    let source = match std::fs::read_to_string(file) {
        Ok(source) => source,
        Err(err) => {
            eprintln!(
                "{} could not read {}: {err}",
                red("Error:"),
                file.display()
            );
            return ExitCode::FAILURE;
        }
    };

    println!(
        "{} {}",
        status_label("Running"),
        bold(&cyan(&file.display().to_string()))
    );

    let result = run_source(&source);
    for line in &result.output {
        println!("{line}");
    }

    if result.succeeded {
        ExitCode::SUCCESS
    } else {
        for error in &result.errors {
            eprintln!("{}", red(&error.to_string()));
        }
        ExitCode::FAILURE
    }
}
