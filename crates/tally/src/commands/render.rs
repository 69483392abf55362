use std::fs;
use std::process::ExitCode;

use anyhow::bail;
use anyhow::Context as _;
use anyhow::Result;
use camino::Utf8Path;
use camino::Utf8PathBuf;
use clap::Parser;
use tally_conf::Settings;
use tally_render::Context;
use tally_render::Template;
use tally_render::Value;
use tracing::debug;

use crate::commands::Command;

#[derive(Debug, Parser)]
pub struct Render {
    /// Template file to render.
    template: Utf8PathBuf,

    /// JSON file providing the root context object. Falls back to the
    /// `context` setting when omitted.
    #[arg(long, short)]
    context: Option<Utf8PathBuf>,

    /// Write the rendered output here instead of stdout.
    #[arg(long, short)]
    output: Option<Utf8PathBuf>,
}

impl Command for Render {
    fn execute(&self, settings: &Settings) -> Result<ExitCode> {
        let source = fs::read_to_string(&self.template)
            .with_context(|| format!("Failed to read template {}", self.template))?;
        let template = Template::parse(&source)
            .with_context(|| format!("Failed to parse template {}", self.template))?;
        debug!(template = %self.template, "template parsed");

        let context_path = self
            .context
            .clone()
            .or_else(|| settings.context.clone().map(Utf8PathBuf::from));

        let mut context = match context_path {
            Some(path) => load_context(&path)?,
            None => Context::new(),
        };

        let rendered = template
            .render(&mut context)
            .with_context(|| format!("Failed to render template {}", self.template))?;

        match &self.output {
            Some(path) => fs::write(path, rendered)
                .with_context(|| format!("Failed to write output to {path}"))?,
            None => print!("{rendered}"),
        }

        Ok(ExitCode::SUCCESS)
    }
}

fn load_context(path: &Utf8Path) -> Result<Context> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read context file {path}"))?;
    let value: Value = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse context file {path} as JSON"))?;

    match value {
        Value::Object(map) => Ok(Context::from_object(map)),
        _ => bail!("Context file {path} must contain a JSON object"),
    }
}
