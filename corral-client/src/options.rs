//! Agent connection option resolution
//!
//! Turns the caller-supplied agent URL and access token into validated
//! connection options, before any network I/O happens.

use url::Url;

use crate::error::ClientError;

/// Resolved connection options for an agent.
#[derive(Debug, Clone)]
pub struct AgentOptions {
    /// Agent base URL without a trailing slash, e.g. `http://localhost:8500`
    pub base_url: String,
    /// Access token; may be empty for anonymous access
    pub token: String,
}

/// Resolve and validate agent connection options.
///
/// Checks:
/// - URL is non-empty and parseable
/// - Scheme is http or https only
/// - URL contains a hostname
pub fn resolve_agent_options(agent_url: &str, token: &str) -> Result<AgentOptions, ClientError> {
    if agent_url.is_empty() {
        return Err(ClientError::InvalidArgument(
            "agent url is missing".to_string(),
        ));
    }

    let parsed = Url::parse(agent_url)
        .map_err(|e| ClientError::InvalidArgument(format!("invalid agent url: {e}")))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(ClientError::InvalidArgument(format!(
                "unsupported URL scheme: {scheme} (only http and https are allowed)"
            )));
        }
    }

    if parsed.host_str().is_none() {
        return Err(ClientError::InvalidArgument(
            "agent url must contain a hostname".to_string(),
        ));
    }

    let base_url = agent_url.trim_end_matches('/').to_string();

    Ok(AgentOptions {
        base_url,
        token: token.to_string(),
    })
}
