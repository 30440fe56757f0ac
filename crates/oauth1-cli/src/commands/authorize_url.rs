//! `oauth1 authorize-url` command implementation.

use clap::Args;
use oauth1_config::Config;
use ureq::http::Uri;

use crate::error::CliError;
use crate::output::Output;
use crate::session::authentication_from_config;

/// Arguments for the authorize-url command.
#[derive(Args)]
pub(crate) struct AuthorizeUrlArgs {
    /// Provider authorization endpoint.
    #[arg(short, long)]
    url: String,

    /// Request token returned by the request-token call.
    #[arg(short, long)]
    token: String,

    /// Consent page template for mobile devices (`btmpl`).
    #[arg(long)]
    mobile: Option<String>,
}

impl AuthorizeUrlArgs {
    /// Execute the authorize-url command.
    pub(crate) fn execute(&self, config: &Config, output: &Output) -> Result<(), CliError> {
        let url = self.authorize_url(config)?;
        output.label("Open this URL in a browser to authorize the token:");
        output.result(&url.to_string());
        Ok(())
    }

    fn authorize_url(&self, config: &Config) -> Result<Uri, CliError> {
        let endpoint: Uri = self
            .url
            .parse()
            .map_err(|e| CliError::Validation(format!("invalid URL {}: {e}", self.url)))?;

        let mut auth = authentication_from_config(config, None)?;
        auth.params_mut().set_token(self.token.as_str());
        if let Some(mobile) = &self.mobile {
            auth.params_mut().set_mobile(mobile.as_str());
        }

        Ok(auth.authorize_token_uri(&endpoint)?)
    }
}
