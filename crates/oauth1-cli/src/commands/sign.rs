//! `oauth1 header` and `oauth1 sign-url` command implementations.

use std::path::PathBuf;

use clap::{Args, ValueEnum};
use oauth1_config::Config;
use oauth1_core::{Authentication, FixedClock, OAuthError};
use ureq::http::Request;
use ureq::http::header::{AUTHORIZATION, CONTENT_TYPE};

use crate::error::CliError;
use crate::output::Output;
use crate::session::authentication_from_config;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Token exchange step being signed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum Phase {
    /// Obtain a request token.
    RequestToken,
    /// Exchange an authorized request token for an access token.
    AccessToken,
    /// Access a protected resource.
    Resource,
}

/// Where the OAuth parameters go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    Header,
    Query,
}

/// Arguments shared by the header and sign-url commands.
#[derive(Args)]
pub(crate) struct SignArgs {
    /// Token exchange step.
    #[arg(long, value_enum, default_value_t = Phase::Resource)]
    phase: Phase,

    /// HTTP method.
    #[arg(short = 'X', long, default_value = "GET")]
    method: String,

    /// Request URL, including any query parameters.
    #[arg(short, long)]
    url: String,

    /// Form-encoded request body; its parameters are signed.
    #[arg(short, long)]
    data: Option<String>,

    /// Verifier from the authorization callback (access-token phase).
    #[arg(long)]
    verifier: Option<String>,

    /// File holding a persisted `oauth_token=...&oauth_token_secret=...` string.
    #[arg(long)]
    token_file: Option<PathBuf>,

    /// Fixed `oauth_timestamp`, for reproducible output.
    #[arg(long, requires = "nonce")]
    timestamp: Option<String>,

    /// Fixed `oauth_nonce`, for reproducible output.
    #[arg(long, requires = "timestamp")]
    nonce: Option<String>,
}

impl SignArgs {
    /// Execute the header command.
    pub(crate) fn execute_header(&self, config: &Config, output: &Output) -> Result<(), CliError> {
        let auth = self.authentication(config)?;
        let mut request = self.build_request()?;
        let original = request.uri().clone();

        self.sign(&auth, &mut request, Placement::Header)?;

        let header = request
            .headers()
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| CliError::Validation("no Authorization header produced".to_owned()))?;
        output.result(header);

        // Application parameters were moved into the query
        if request.uri() != &original {
            output.label("Send the request to:");
            output.result(&request.uri().to_string());
        }
        Ok(())
    }

    /// Execute the sign-url command.
    pub(crate) fn execute_sign_url(&self, config: &Config, output: &Output) -> Result<(), CliError> {
        let auth = self.authentication(config)?;
        let mut request = self.build_request()?;

        self.sign(&auth, &mut request, Placement::Query)?;

        output.result(&request.uri().to_string());
        Ok(())
    }

    fn authentication(&self, config: &Config) -> Result<Authentication, CliError> {
        let mut auth = authentication_from_config(config, self.token_file.as_deref())?;

        if let (Some(timestamp), Some(nonce)) = (&self.timestamp, &self.nonce) {
            auth = auth.with_clock(FixedClock::new(timestamp.as_str(), nonce.as_str()));
        }
        if let Some(verifier) = &self.verifier {
            auth.params_mut().set_verifier(verifier.as_str());
        }
        if self.phase == Phase::AccessToken {
            // The stored token is the request token being exchanged
            auth.set_has_access_token(false);
        }
        Ok(auth)
    }

    fn build_request(&self) -> Result<Request<Vec<u8>>, CliError> {
        let mut builder = Request::builder()
            .method(self.method.to_ascii_uppercase().as_str())
            .uri(self.url.as_str());

        let body = match &self.data {
            Some(data) => {
                builder = builder.header(CONTENT_TYPE, FORM_CONTENT_TYPE);
                data.as_bytes().to_vec()
            }
            None => Vec::new(),
        };
        Ok(builder.body(body)?)
    }

    fn sign(
        &self,
        auth: &Authentication,
        request: &mut Request<Vec<u8>>,
        placement: Placement,
    ) -> Result<(), CliError> {
        tracing::debug!(phase = ?self.phase, ?placement, "Signing request");
        match (self.phase, placement) {
            (Phase::RequestToken, Placement::Header) => auth.add_request_token_header(request)?,
            (Phase::RequestToken, Placement::Query) => auth.add_request_token_params(request)?,
            (Phase::AccessToken, Placement::Header) => auth.add_access_token_header(request)?,
            (Phase::AccessToken, Placement::Query) => auth.add_access_token_params(request)?,
            (Phase::Resource, Placement::Header) => auth.authorize_request(request)?,
            (Phase::Resource, Placement::Query) => {
                if !auth.has_access_token() {
                    return Err(OAuthError::NotAuthorized.into());
                }
                auth.add_resource_token_params(request)?;
            }
        }
        Ok(())
    }
}
