mod check;
mod render;

use std::process::ExitCode;

use anyhow::Result;
use clap::Subcommand;
use tally_conf::Settings;

pub trait Command {
    fn execute(&self, settings: &Settings) -> Result<ExitCode>;
}

#[derive(Debug, Subcommand)]
pub enum TallyCommand {
    /// Render a template against a JSON context
    Render(self::render::Render),
    /// Parse templates and report syntax errors
    Check(self::check::Check),
}

impl Command for TallyCommand {
    fn execute(&self, settings: &Settings) -> Result<ExitCode> {
        match self {
            Self::Render(cmd) => cmd.execute(settings),
            Self::Check(cmd) => cmd.execute(settings),
        }
    }
}
