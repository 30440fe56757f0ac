//! CLI error types.

use oauth1_config::ConfigError;
use oauth1_core::OAuthError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    OAuth(#[from] OAuthError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("invalid request: {0}")]
    Request(#[from] ureq::http::Error),

    #[error("{0}")]
    Validation(String),
}
