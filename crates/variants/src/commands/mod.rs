//! CLI command implementations.

pub(crate) mod instructions;
pub(crate) mod render;

pub(crate) use instructions::InstructionsArgs;
pub(crate) use render::RenderArgs;

use variants_config::Config;
use variants_page::{PageRenderer, PageRendererConfig};

use crate::error::CliError;

/// Page renderer for the resolved cache settings.
fn page_renderer(config: &Config, version: &str) -> Result<PageRenderer, CliError> {
    let cache = &config.cache_resolved;
    let renderer = PageRenderer::new(PageRendererConfig {
        cache_dir: cache.enabled.then(|| cache.dir.clone()),
        version: version.to_owned(),
    })?;
    Ok(renderer)
}
