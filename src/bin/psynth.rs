#![allow(clippy::print_stderr)]

use anyhow::Result;
use clap::Parser;
use std::io::Write;

use psynth::cli::args::CliArgs;
use psynth::cli::driver;

fn main() -> Result<()> {
    // Initialize tracing if PSYNTH_LOG or RUST_LOG is set (zero cost otherwise).
    // Supports PSYNTH_LOG_FORMAT=tree|json|text (see src/tracing_config.rs).
    psynth::tracing_config::init_tracing();

    let args = CliArgs::parse();
    let result = driver::run(&args)?;

    for note in &result.notes {
        eprintln!("{note}");
    }
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(result.stdout.as_bytes())?;
    stdout.flush()?;

    if result.exit_code != driver::EXIT_SUCCESS {
        std::process::exit(result.exit_code);
    }
    Ok(())
}
