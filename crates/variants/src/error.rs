//! CLI error types.

use variants_config::ConfigError;
use variants_page::PageError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Page(#[from] PageError),

    #[error("{0}")]
    Json(#[from] serde_json::Error),
}
