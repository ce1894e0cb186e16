//! CLI command implementations.

use std::path::PathBuf;

use anyhow::{Context, Result};
use sharpast::{DriverConfig, Language};

pub mod parse;
pub mod serve;

/// Global flags that override the configuration file.
#[derive(Debug, Default)]
pub struct Overrides {
    pub config: Option<PathBuf>,
    pub language: Option<Language>,
    pub omit_defaults: bool,
    pub partial_ast: bool,
    pub roles: bool,
}

impl Overrides {
    /// Loads the configuration file (if any) and applies the flags on top.
    pub fn load(&self) -> Result<DriverConfig> {
        let mut config = match &self.config {
            Some(path) => DriverConfig::load(path)
                .with_context(|| format!("failed to load {}", path.display()))?,
            None => DriverConfig::default(),
        };

        if let Some(language) = self.language {
            config.language = language;
        }
        if self.omit_defaults {
            config.projection.omit_defaults = true;
        }
        if self.partial_ast {
            config.projection.partial_ast = true;
        }
        if self.roles {
            config.projection.roles = true;
        }
        Ok(config)
    }
}
