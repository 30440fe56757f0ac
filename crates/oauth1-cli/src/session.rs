//! Building an [`Authentication`] from configuration.

use std::path::Path;

use oauth1_config::Config;
use oauth1_core::{Authentication, SignatureMethod, read_private_key};

use crate::error::CliError;

/// Create the authentication state described by `config`.
///
/// A token stored in `[token] persisted` is restored as an access token;
/// `token_file` takes precedence over it.
pub(crate) fn authentication_from_config(
    config: &Config,
    token_file: Option<&Path>,
) -> Result<Authentication, CliError> {
    let consumer = &config.consumer;
    let method: SignatureMethod = consumer.signature_method.parse()?;

    let private_key = match consumer.private_key_path() {
        Some(path) if consumer.uses_rsa() => {
            tracing::debug!(path = %path.display(), "Reading RSA private key");
            read_private_key(path)?
        }
        _ => consumer.consumer_secret.clone(),
    };

    let mut auth = Authentication::new(method, consumer.consumer_key.as_str(), private_key);
    auth.set_realm(consumer.realm.clone());
    auth.set_service_provider(consumer.service_provider.clone());

    let request = &config.request;
    let params = auth.params_mut();
    if let Some(scope) = &request.scope {
        params.set_scope(scope.as_str());
    }
    if let Some(display_name) = &request.display_name {
        params.set_display_name(display_name.as_str());
    }
    if let Some(hosted_domain) = &request.hosted_domain {
        params.set_hosted_domain(hosted_domain.as_str());
    }
    if let Some(language) = &request.language {
        params.set_language(language.as_str());
    }
    if let Some(callback) = &request.callback {
        params.set_callback(callback.as_str());
    }

    let persisted = match token_file {
        Some(path) => Some(std::fs::read_to_string(path)?),
        None => config.token.persisted.clone(),
    };
    if let Some(persisted) = persisted {
        auth.restore_from_persistence(persisted.trim());
    }

    Ok(auth)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn load(dir: &Path, content: &str) -> Config {
        let path = dir.join("oauth1.toml");
        std::fs::write(&path, content).unwrap();
        Config::load(Some(&path), None).unwrap()
    }

    #[test]
    fn test_installed_app_defaults() {
        let auth = authentication_from_config(&Config::default(), None).unwrap();

        assert_eq!(auth.params().consumer_key(), Some("anonymous"));
        assert_eq!(auth.params().signature_method(), Some("HMAC-SHA1"));
        assert_eq!(auth.private_key(), "anonymous");
        assert!(!auth.has_access_token());
    }

    #[test]
    fn test_request_params_and_persisted_token() {
        let dir = tempfile::tempdir().unwrap();
        let config = load(
            dir.path(),
            r#"
[consumer]
consumer_key = "example.com"
consumer_secret = "s3cr3t"
realm = "https://example.com/"

[request]
scope = "https://www.google.com/m8/feeds/"
hosted_domain = "example.com"
callback = "oob"

[token]
persisted = "oauth_token=1%2Faccess&oauth_token_secret=secret"
"#,
        );

        let auth = authentication_from_config(&config, None).unwrap();

        assert_eq!(auth.realm(), Some("https://example.com/"));
        assert_eq!(auth.params().scope(), Some("https://www.google.com/m8/feeds/"));
        assert_eq!(auth.params().hosted_domain(), Some("example.com"));
        assert_eq!(auth.params().callback(), Some("oob"));
        assert_eq!(auth.access_token(), Some("1/access"));
        assert_eq!(auth.params().token_secret(), Some("secret"));
    }

    #[test]
    fn test_token_file_overrides_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = load(
            dir.path(),
            "[token]\npersisted = \"oauth_token=from-config&oauth_token_secret=a\"\n",
        );
        let token_file = dir.path().join("token");
        std::fs::write(&token_file, "oauth_token=from-file&oauth_token_secret=b\n").unwrap();

        let auth = authentication_from_config(&config, Some(&token_file)).unwrap();

        assert_eq!(auth.params().token(), Some("from-file"));
        assert_eq!(auth.params().token_secret(), Some("b"));
    }

    #[test]
    fn test_missing_rsa_key_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = load(
            dir.path(),
            "[consumer]\nsignature_method = \"RSA-SHA1\"\nprivate_key_file = \"missing.pem\"\n",
        );

        let result = authentication_from_config(&config, None);

        assert!(matches!(result, Err(CliError::OAuth(_))));
    }
}
