use std::env;
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use pseudocode_cli::args::{parse_args, Command, USAGE};
use pseudocode_cli::driver;

/// Bad flags or missing arguments
const EXIT_USAGE_ERROR: u8 = 2;

fn main() -> ExitCode {
    // Diagnostics are printed below; tracing carries the internals
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error")),
        )
        .with_writer(std::io::stderr)
        .init();

    let options = match parse_args(env::args().skip(1)) {
        Ok(Command::Run(options)) => options,
        Ok(Command::PrintHelp) => {
            println!("{USAGE}");
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("error: {e}");
            eprintln!("{USAGE}");
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
    };

    let report = match driver::run(&options) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error processing '{}': {e}", options.input.display());
            return ExitCode::FAILURE;
        }
    };

    for d in &report.diagnostics {
        eprintln!("{d}");
    }

    if let Some(ast) = &report.ast {
        println!("{ast}");
    }

    if let Some(table) = &report.symbol_table {
        print!("{table}");
    }

    if report.has_errors() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
