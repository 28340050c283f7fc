//! This file defines the functree binary entry point.

use std::process::ExitCode;

use functree::app;
use functree::cli;
use functree::error::ErrorReport;
use functree::tracing;

/// Application entry point
fn main() -> ExitCode {
    let args = cli::parse();
    tracing::init_tracing();
    ::tracing::debug!("{:?}", args);
    match app::run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            ErrorReport::from(&error).log();
            ExitCode::FAILURE
        }
    }
}
