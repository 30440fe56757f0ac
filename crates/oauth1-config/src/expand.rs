//! `${VAR}` expansion for configuration strings.

use crate::ConfigError;

/// Variable that was referenced but is not set.
struct UnsetVar(String);

/// Expand `${VAR}` and `${VAR:-default}` references in `value`.
///
/// `field` names the config key in error messages. Strings without `${`
/// come back unchanged, so bare `$VAR` stays literal.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |name| {
        std::env::var(name)
            .map(Some)
            .map_err(|_| UnsetVar(name.to_owned()))
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{}}} not set", e.cause.0),
    })
}

/// Expand an optional value in place.
pub(crate) fn expand_opt(value: &mut Option<String>, field: &str) -> Result<(), ConfigError> {
    if let Some(current) = value.as_deref() {
        *value = Some(expand_env(current, field)?);
    }
    Ok(())
}
