use std::process::ExitCode;

use anyhow::Context as _;
use anyhow::Result;
use clap::Parser;
use tally_conf::Settings;
use tracing_subscriber::EnvFilter;

use crate::args::Args;
use crate::args::GlobalArgs;
use crate::commands::Command;
use crate::commands::TallyCommand;

/// The main CLI structure that defines the command-line interface
#[derive(Parser)]
#[command(name = "tally")]
#[command(version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: TallyCommand,

    #[command(flatten)]
    pub args: Args,
}

/// Parse CLI arguments and execute the chosen command
pub fn run(args: Vec<String>) -> Result<ExitCode> {
    let cli = Cli::try_parse_from(args).unwrap_or_else(|e| {
        e.exit();
    });

    let project_root =
        std::env::current_dir().context("Failed to determine the working directory")?;
    let settings = Settings::new(&project_root).context("Failed to load settings")?;

    init_tracing(&cli.args.global, settings.debug);

    cli.command.execute(&settings)
}

fn init_tracing(global: &GlobalArgs, debug_setting: bool) {
    let default_level = if global.quiet {
        "error"
    } else {
        match (global.verbose, debug_setting) {
            (0, false) => "warn",
            (0, true) | (1, _) => "debug",
            _ => "trace",
        }
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
