//! techtree - Swimlane layout for work-item dependency graphs

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = techtree::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
