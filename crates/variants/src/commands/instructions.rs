//! `variants instructions` command implementation.

use std::path::PathBuf;

use clap::Args;
use variants_config::{CliSettings, Config};

use super::page_renderer;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the instructions command.
#[derive(Args)]
pub(crate) struct InstructionsArgs {
    /// Page source file.
    file: PathBuf,

    /// Path to configuration file (default: auto-discover variants.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bypass the instruction cache.
    #[arg(long)]
    no_cache: bool,
}

impl InstructionsArgs {
    /// Execute the instructions command.
    pub(crate) fn execute(self, version: &str) -> Result<(), CliError> {
        let cli_settings = CliSettings {
            cache_enabled: self.no_cache.then_some(false),
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let calls = page_renderer(&config, version)?.instructions(&self.file)?;
        let mut json = serde_json::to_string_pretty(&calls)?;
        json.push('\n');

        Output::new().content(&json);
        Ok(())
    }
}
