//! lrtool CLI
//!
//! # Usage
//!
//! ```bash
//! # Recommend a learning rate for the defaults (SDXL, 2000 steps)
//! lrtool estimate
//!
//! # Override parameters
//! lrtool estimate --model FLUX.1 --steps 3000 --rank 16 --alpha 8
//!
//! # Replay a saved profile with one change
//! lrtool estimate --profile run.json --offset 0.1
//!
//! # Inspect the lookup tables
//! lrtool info
//!
//! # Check a saved profile against a recomputation
//! lrtool validate run.json
//! ```

use clap::Parser;
use lrtool::cli::{run_command, Cli};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
