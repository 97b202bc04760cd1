//! # Tally Terminal Entry Point
//!
//! ## Startup Sequence
//! 1. Load configuration (file + environment)
//! 2. Initialize tracing (stderr)
//! 3. Open the snapshot store
//! 4. Run the prompt loop
//!
//! The actual setup is in lib.rs for testability.

use std::process::ExitCode;

fn main() -> ExitCode {
    match tally_terminal::run() {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("tally: {}", err);
            ExitCode::FAILURE
        }
    }
}
