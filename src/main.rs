mod cli;

use std::process::ExitCode;

use clap::Parser;

fn main() -> ExitCode {
    env_logger::init();

    let args = cli::Args::parse();
    match cli::run(&args) {
        Ok(rows) => {
            log::info!("Processed {rows} rows from {}", args.input.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("pyma-apply failed: {e:#}");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
