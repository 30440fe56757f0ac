//! Configuration for the `oauth1` tool.
//!
//! Parses `oauth1.toml` with serde and discovers it in the current
//! directory or its parents.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! Every string value supports environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Keep secrets out of the file by writing e.g.
//! `consumer_secret = "${OAUTH_CONSUMER_SECRET}"`.

mod expand;

use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override consumer key.
    pub consumer_key: Option<String>,
    /// Override signature method.
    pub signature_method: Option<String>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "oauth1.toml";

/// Consumer key and secret of installed applications.
const ANONYMOUS: &str = "anonymous";

const HMAC_SHA1: &str = "HMAC-SHA1";
const RSA_SHA1: &str = "RSA-SHA1";

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Consumer credentials.
    pub consumer: ConsumerConfig,
    /// Application parameters sent with the token requests.
    pub request: RequestConfig,
    /// Previously obtained token.
    pub token: TokenConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Consumer credentials and signing settings.
#[derive(Deserialize)]
#[serde(default)]
pub struct ConsumerConfig {
    /// Consumer key registered with the provider.
    pub consumer_key: String,
    /// `HMAC-SHA1` or `RSA-SHA1`.
    pub signature_method: String,
    /// Shared secret for HMAC-SHA1.
    pub consumer_secret: String,
    /// PEM key for RSA-SHA1, relative to the config file.
    private_key_file: Option<String>,
    /// Realm for the `Authorization` header.
    pub realm: Option<String>,
    /// Provider label, e.g. `Google`.
    pub service_provider: Option<String>,

    /// Resolved private key path (set after loading).
    #[serde(skip)]
    private_key_path: Option<PathBuf>,
}

impl Default for ConsumerConfig {
    fn default() -> Self {
        Self {
            consumer_key: ANONYMOUS.to_owned(),
            signature_method: HMAC_SHA1.to_owned(),
            consumer_secret: ANONYMOUS.to_owned(),
            private_key_file: None,
            realm: None,
            service_provider: None,
            private_key_path: None,
        }
    }
}

impl ConsumerConfig {
    /// Absolute path of the RSA private key, if configured.
    pub fn private_key_path(&self) -> Option<&Path> {
        self.private_key_path.as_deref()
    }

    /// Whether RSA-SHA1 signing is selected.
    pub fn uses_rsa(&self) -> bool {
        self.signature_method == RSA_SHA1
    }

    fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.consumer_key, "consumer.consumer_key")?;

        match self.signature_method.as_str() {
            HMAC_SHA1 => require_non_empty(&self.consumer_secret, "consumer.consumer_secret"),
            RSA_SHA1 if self.private_key_path.is_none() => Err(ConfigError::Validation(
                "consumer.private_key_file is required for RSA-SHA1".to_owned(),
            )),
            RSA_SHA1 => Ok(()),
            other => Err(ConfigError::Validation(format!(
                "consumer.signature_method must be {HMAC_SHA1} or {RSA_SHA1}, got {other:?}"
            ))),
        }
    }
}

impl fmt::Debug for ConsumerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsumerConfig")
            .field("consumer_key", &self.consumer_key)
            .field("signature_method", &self.signature_method)
            .field("consumer_secret", &"[REDACTED]")
            .field("private_key_path", &self.private_key_path)
            .field("realm", &self.realm)
            .field("service_provider", &self.service_provider)
            .finish_non_exhaustive()
    }
}

/// Application parameters for the request-token and authorize steps.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RequestConfig {
    /// Scope of access requested.
    pub scope: Option<String>,
    /// Application name shown on the consent page.
    pub display_name: Option<String>,
    /// Hosted domain of the account.
    pub hosted_domain: Option<String>,
    /// Language of the consent page.
    pub language: Option<String>,
    /// Callback URL, or `oob` for out-of-band verification.
    pub callback: Option<String>,
}

/// Stored token state.
#[derive(Default, Deserialize)]
#[serde(default)]
pub struct TokenConfig {
    /// `oauth_token=...&oauth_token_secret=...` persistence string.
    pub persisted: Option<String>,
}

impl fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenConfig")
            .field("persisted", &self.persisted.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`consumer.consumer_secret`").
        field: String,
        /// Error message (e.g., "${`OAUTH_SECRET`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `oauth1.toml` in the current directory and
    /// parents, falling back to installed-app defaults.
    ///
    /// CLI settings are applied before validation, so an override can fix
    /// an otherwise invalid file.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = std::env::current_dir()
            .ok()
            .and_then(|cwd| Self::discover_from(&cwd))
        {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.consumer.validate()
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(consumer_key) = &settings.consumer_key {
            self.consumer.consumer_key.clone_from(consumer_key);
        }
        if let Some(signature_method) = &settings.signature_method {
            self.consumer.signature_method.clone_from(signature_method);
        }
    }

    /// Search for the config file in `start` and its parents.
    fn discover_from(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(CONFIG_FILENAME))
            .find(|candidate| candidate.exists())
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        let consumer = &mut self.consumer;
        consumer.consumer_key = expand::expand_env(&consumer.consumer_key, "consumer.consumer_key")?;
        consumer.signature_method =
            expand::expand_env(&consumer.signature_method, "consumer.signature_method")?;
        consumer.consumer_secret =
            expand::expand_env(&consumer.consumer_secret, "consumer.consumer_secret")?;
        expand::expand_opt(&mut consumer.private_key_file, "consumer.private_key_file")?;
        expand::expand_opt(&mut consumer.realm, "consumer.realm")?;
        expand::expand_opt(&mut consumer.service_provider, "consumer.service_provider")?;

        let request = &mut self.request;
        expand::expand_opt(&mut request.scope, "request.scope")?;
        expand::expand_opt(&mut request.display_name, "request.display_name")?;
        expand::expand_opt(&mut request.hosted_domain, "request.hosted_domain")?;
        expand::expand_opt(&mut request.language, "request.language")?;
        expand::expand_opt(&mut request.callback, "request.callback")?;

        expand::expand_opt(&mut self.token.persisted, "token.persisted")?;
        Ok(())
    }

    /// Resolve the private key path relative to the config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.consumer.private_key_path = self
            .consumer
            .private_key_file
            .as_deref()
            .map(|file| config_dir.join(file));
    }
}
