//! User configuration.
//!
//! Read from `~/.config/ics-to-markdown/config.toml` (if it exists) and then
//! from `ICS_TO_MARKDOWN_*` environment variables. Command-line flags win
//! over both.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::file::DEFAULT_ICS_FILE_NAME;

const ENV_PREFIX: &str = "ICS_TO_MARKDOWN";

fn default_file() -> String {
    DEFAULT_ICS_FILE_NAME.to_string()
}

fn default_format() -> bool {
    true
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Treat every warning as fatal.
    #[serde(default)]
    pub strict: bool,

    /// Align the table before printing and writing it.
    #[serde(default = "default_format")]
    pub format: bool,

    /// Where `.md` files are written. Defaults to the working directory.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,

    /// Calendar tried when `run` is given no file.
    #[serde(default = "default_file")]
    pub default_file: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            strict: false,
            format: default_format(),
            output_dir: None,
            default_file: default_file(),
        }
    }
}

impl AppConfig {
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("ics-to-markdown").join("config.toml"))
    }

    pub fn load() -> Result<Self> {
        Self::load_from(Self::config_path().as_deref())
    }

    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            tracing::debug!(path = %path.display(), "reading config");
            builder = builder.add_source(File::from(path).required(false));
        }

        builder
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()
            .context("Could not read configuration")?
            .try_deserialize()
            .context("Invalid configuration")
    }

    /// Directory for output files, relative paths resolved by the OS.
    pub fn output_dir(&self) -> &Path {
        self.output_dir.as_deref().unwrap_or(Path::new("."))
    }
}
