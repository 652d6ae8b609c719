//! csv-flatten: collapse multi-row catalog CSV exports into one row per product

use clap::Parser;
use flatten_cli::commands::Commands;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "csv-flatten",
    version,
    about = "Collapse multi-row catalog CSV exports into one row per product",
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

fn main() -> ExitCode {
    // Usage errors exit with 1 like every other failure; help and version exit 0
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            let _ = e.print();
            return ExitCode::FAILURE;
        }
    };

    match cli.command.execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
