//! `emojin.toml` settings for the command-line front end.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use emojin_engine::CompileOptions;
use emojin_engine::compiler::DEFAULT_CLASS_NAME;
use serde::Deserialize;

/// Name of the configuration file.
pub const CONFIG_FILE: &str = "emojin.toml";

/// Settings read from `emojin.toml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// `[compile]` table
    pub compile: CompileConfig,
    /// `[repl]` table
    pub repl: ReplConfig,
}

/// Class-file output settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompileConfig {
    /// Binary name of the generated class
    pub class_name: String,
    /// Value of the `SourceFile` attribute; derived from the class name when unset
    pub source_file: Option<String>,
    /// Directory `.class` files are written to
    pub output_dir: PathBuf,
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            class_name: DEFAULT_CLASS_NAME.to_string(),
            source_file: None,
            output_dir: PathBuf::from("."),
        }
    }
}

impl CompileConfig {
    /// Builds compiler options, with `class_name` overriding the configured name.
    pub fn options(&self, class_name: Option<&str>) -> CompileOptions {
        let mut options =
            CompileOptions::with_class_name(class_name.unwrap_or(&self.class_name));
        // A configured source file only belongs to the configured class.
        if class_name.is_none() {
            options.source_file = self.source_file.clone();
        }
        options
    }
}

/// Interactive session settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReplConfig {
    /// Number of history entries kept
    pub history_size: usize,
    /// Whether the startup banner is printed
    pub banner: bool,
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            history_size: 1000,
            banner: true,
        }
    }
}

impl Config {
    /// Loads the first `emojin.toml` found in the working directory or the
    /// user configuration directory. No file means defaults.
    pub fn load() -> Result<Self> {
        let cwd = std::env::current_dir().ok();
        let user = dirs::config_dir().map(|dir| dir.join("emojin"));

        for dir in cwd.iter().chain(user.iter()) {
            let path = dir.join(CONFIG_FILE);
            if path.is_file() {
                return Self::from_file(&path);
            }
        }

        tracing::debug!("no {} found, using defaults", CONFIG_FILE);
        Ok(Self::default())
    }

    /// Reads and parses one configuration file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config = Self::parse(&text).with_context(|| format!("invalid {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Parses configuration text.
    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }
}
