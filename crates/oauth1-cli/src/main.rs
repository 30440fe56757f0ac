//! oauth1 CLI - offline OAuth 1.0a signing.
//!
//! Provides commands for:
//! - `header`: Compute the `Authorization` header for a request
//! - `sign-url`: Compute a URL carrying all OAuth parameters in its query
//! - `authorize-url`: Build the user authorization redirect
//! - `parse-response`: Decode a provider token response

mod commands;
mod error;
mod output;
mod session;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use oauth1_config::{CliSettings, Config};
use tracing_subscriber::EnvFilter;

use commands::{AuthorizeUrlArgs, ParseResponseArgs, SignArgs};
use error::CliError;
use output::Output;

/// oauth1 - OAuth 1.0a request signing.
#[derive(Parser)]
#[command(name = "oauth1", version, about)]
struct Cli {
    /// Path to configuration file (default: auto-discover oauth1.toml).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override the consumer key.
    #[arg(long, global = true, env = "OAUTH1_CONSUMER_KEY")]
    consumer_key: Option<String>,

    /// Override the signature method (HMAC-SHA1 or RSA-SHA1).
    #[arg(long, global = true)]
    signature_method: Option<String>,

    /// Enable debug logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the Authorization header for a request.
    Header(SignArgs),
    /// Print the request URL with every OAuth parameter in the query.
    SignUrl(SignArgs),
    /// Print the URL the user opens to authorize a request token.
    AuthorizeUrl(AuthorizeUrlArgs),
    /// Decode a token response read from stdin.
    ParseResponse(ParseResponseArgs),
}

impl Cli {
    fn load_config(&self) -> Result<Config, CliError> {
        let settings = CliSettings {
            consumer_key: self.consumer_key.clone(),
            signature_method: self.signature_method.clone(),
        };
        Ok(Config::load(self.config.as_deref(), Some(&settings))?)
    }

    fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        match &self.command {
            Commands::ParseResponse(args) => args.execute(&output),
            Commands::Header(args) => args.execute_header(&self.load_config()?, &output),
            Commands::SignUrl(args) => args.execute_sign_url(&self.load_config()?, &output),
            Commands::AuthorizeUrl(args) => args.execute(&self.load_config()?, &output),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // --verbose enables DEBUG level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = cli.execute() {
        Output::new().error(&format!("Error: {err}"));
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "oauth1",
            "header",
            "--url",
            "https://example.com/feed",
            "--consumer-key",
            "example.com",
            "-v",
        ])
        .unwrap();

        assert!(cli.verbose);
        assert_eq!(cli.consumer_key.as_deref(), Some("example.com"));
        assert!(matches!(cli.command, Commands::Header(_)));
    }

    #[test]
    fn test_timestamp_requires_nonce() {
        let result = Cli::try_parse_from([
            "oauth1",
            "sign-url",
            "--url",
            "https://example.com/feed",
            "--timestamp",
            "1262325600",
        ]);
        assert!(result.is_err());
    }
}
