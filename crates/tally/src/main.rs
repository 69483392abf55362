mod args;
mod cli;
mod commands;

use std::process::ExitCode;

use anyhow::Result;

fn main() -> Result<ExitCode> {
    cli::run(std::env::args().collect())
}
