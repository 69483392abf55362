//! Layered settings for the tally CLI.
//!
//! Sources, in increasing precedence: a `tally.toml` in the user's config
//! directory, then `.tally.toml` and `tally.toml` in the project root. All
//! files are optional; missing files mean defaults.

use std::path::Path;

use config::Config;
use config::ConfigError as ExternalConfigError;
use config::File;
use config::FileFormat;
use directories::ProjectDirs;
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration build/deserialize error")]
    Config(#[from] ExternalConfigError),
}

#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Raise the default log level to `debug`.
    pub debug: bool,
    /// Default context JSON file for `tally render`, relative to the
    /// working directory unless absolute.
    pub context: Option<String>,
}

impl Settings {
    pub fn new(project_root: &Path) -> Result<Self, ConfigError> {
        let user_config_file = ProjectDirs::from("io", "tally-lang", "tally")
            .map(|proj_dirs| proj_dirs.config_dir().join("tally.toml"));

        Self::load_from_paths(project_root, user_config_file.as_deref())
    }

    fn load_from_paths(
        project_root: &Path,
        user_config_path: Option<&Path>,
    ) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        if let Some(path) = user_config_path {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(false));
        }

        builder = builder.add_source(
            File::from(project_root.join(".tally.toml"))
                .format(FileFormat::Toml)
                .required(false),
        );

        builder = builder.add_source(
            File::from(project_root.join("tally.toml"))
                .format(FileFormat::Toml)
                .required(false),
        );

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }
}
