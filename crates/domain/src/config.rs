use std::time::Duration;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid API base URL `{url}`: {error}")]
    BadBaseUrl { url: String, error: url::ParseError },
}

/// Everything the Content Gateway needs, resolved once at startup and
/// threaded in at construction. Nothing in the gateway reads ambient
/// process state.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub base_url: Url,
    pub timeout: Duration,
}

impl GatewayConfig {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ConfigError> {
        let base_url = Url::parse(base_url).map_err(|error| ConfigError::BadBaseUrl {
            url: base_url.to_owned(),
            error,
        })?;
        Ok(Self { base_url, timeout })
    }
}
