use std::fs;
use std::process::ExitCode;

use anyhow::Context as _;
use anyhow::Result;
use camino::Utf8PathBuf;
use clap::Parser;
use tally_conf::Settings;
use tally_render::Template;

use crate::commands::Command;

#[derive(Debug, Parser)]
pub struct Check {
    /// Template files to check.
    #[arg(required = true)]
    templates: Vec<Utf8PathBuf>,
}

impl Command for Check {
    fn execute(&self, _settings: &Settings) -> Result<ExitCode> {
        let mut failed = false;

        for path in &self.templates {
            let source = fs::read_to_string(path)
                .with_context(|| format!("Failed to read template {path}"))?;
            if let Err(err) = Template::parse(&source) {
                failed = true;
                eprintln!("{path}: {err}");
            }
        }

        Ok(if failed {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        })
    }
}
