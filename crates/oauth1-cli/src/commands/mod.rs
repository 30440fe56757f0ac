//! CLI command implementations.

pub(crate) mod authorize_url;
pub(crate) mod parse_response;
pub(crate) mod sign;

pub(crate) use authorize_url::AuthorizeUrlArgs;
pub(crate) use parse_response::ParseResponseArgs;
pub(crate) use sign::SignArgs;
