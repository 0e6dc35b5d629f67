use std::process::ExitCode;

use clap::Parser;

use labyrinth_cli::{Args, run};
use labyrinth_observability::LogFormat;

fn main() -> ExitCode {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "warn" };
    labyrinth_observability::init_with(level, LogFormat::Compact);

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            tracing::error!(error = %err, "check failed");
            eprintln!("Error: {err:#}");
            ExitCode::from(2)
        }
    }
}
