//! `oauth1 parse-response` command implementation.

use std::collections::BTreeMap;
use std::io::Read;

use clap::Args;
use oauth1_core::{PersistedToken, parse_response};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the parse-response command.
#[derive(Args)]
pub(crate) struct ParseResponseArgs {
    /// Print the persistence string instead of the decoded keys.
    #[arg(long)]
    persist: bool,
}

impl ParseResponseArgs {
    /// Execute the parse-response command, reading the body from stdin.
    pub(crate) fn execute(&self, output: &Output) -> Result<(), CliError> {
        let mut body = String::new();
        std::io::stdin().read_to_string(&mut body)?;

        let params = parse_response(&body)?;
        if params
            .get("oauth_callback_confirmed")
            .is_some_and(|confirmed| confirmed != "true")
        {
            output.warning("Provider did not confirm the callback");
        }

        for line in self.render(&body)? {
            output.result(&line);
        }
        Ok(())
    }

    fn render(&self, body: &str) -> Result<Vec<String>, CliError> {
        if self.persist {
            let persisted = PersistedToken::parse(body)
                .serialize()
                .ok_or_else(|| CliError::Validation("response has no oauth_token".to_owned()))?;
            return Ok(vec![persisted]);
        }

        let params: BTreeMap<String, String> = parse_response(body)?.into_iter().collect();
        Ok(params
            .into_iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect())
    }
}
