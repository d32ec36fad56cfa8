// src/blockchain/endpoint.rs

use std::fmt;

use url::Url;

use super::error::ConfigurationError;

/// Validated HTTP(S) URL of the node. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    url: Url,
}

impl Endpoint {
    pub fn parse(input: &str) -> Result<Self, ConfigurationError> {
        if !(input.starts_with("https://") || input.starts_with("http://")) {
            return Err(ConfigurationError::InvalidScheme(input.to_string()));
        }

        let url = Url::parse(input).map_err(|e| ConfigurationError::MalformedUrl {
            url: input.to_string(),
            reason: e.to_string(),
        })?;
        if url.host_str().map_or(true, str::is_empty) {
            return Err(ConfigurationError::MalformedUrl {
                url: input.to_string(),
                reason: "missing host".to_string(),
            });
        }

        Ok(Self { url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}
