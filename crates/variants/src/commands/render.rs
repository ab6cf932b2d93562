//! `variants render` command implementation.

use std::path::PathBuf;

use clap::Args;
use variants_config::{CliSettings, Config};
use variants_markup::{OutputMode, Vars, parse_assignment};

use super::page_renderer;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Page source file.
    file: PathBuf,

    /// Output mode: xhtml or text (overrides config).
    #[arg(short, long)]
    pub(crate) mode: Option<OutputMode>,

    /// Request variable, may be repeated (overrides `[vars]`).
    #[arg(long = "var", value_name = "KEY=VALUE", value_parser = parse_assignment)]
    pub(crate) vars: Vec<(String, String)>,

    /// Path to configuration file (default: auto-discover variants.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Cache directory (overrides config).
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Enable caching (default: enabled).
    #[arg(long)]
    cache: Option<bool>,

    /// Disable caching.
    #[arg(long, conflicts_with = "cache")]
    no_cache: bool,

    /// Enable verbose output (cache decisions and timing logs).
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl RenderArgs {
    /// Execute the render command.
    pub(crate) fn execute(self, version: &str) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            mode: self.mode,
            cache_enabled: self.resolve_cache_enabled(),
            cache_dir: self.cache_dir,
            vars: self.vars.into_iter().collect::<Vars>(),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let vars = config.request_vars();
        let mode = config.render_resolved.mode;

        let renderer = page_renderer(&config, version)?;
        let result = renderer.render(&self.file, mode, &vars)?;

        if self.verbose {
            let source = if result.from_cache { "cache" } else { "source" };
            output.info(&format!(
                "Rendered {} as {mode} from {source} (cacheable: {})",
                self.file.display(),
                result.cacheable
            ));
        }
        output.content(&result.output);
        Ok(())
    }

    /// Resolve `cache_enabled` from --cache/--no-cache flags.
    pub(crate) fn resolve_cache_enabled(&self) -> Option<bool> {
        self.no_cache.then_some(false).or(self.cache)
    }
}
