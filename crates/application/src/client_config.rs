use service_dispatch_core::{BearerToken, DispatchError, DispatchResult};
use url::Url;

/// Body key whose presence marks a healthy service root.
pub const DEFAULT_PING_MARKER_KEY: &str = "version";

/// Connection settings for one dispatch service.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    base_url: Url,
    token: BearerToken,
    debug: bool,
    ping_marker_key: String,
}

impl ClientConfig {
    /// Creates a configuration from a base address and shared secret.
    ///
    /// The base address must be an absolute `http` or `https` URL; a trailing
    /// slash is added so relative endpoints resolve beneath it.
    pub fn new(base_address: &str, secret: impl Into<String>) -> DispatchResult<Self> {
        let mut base_url = Url::parse(base_address.trim()).map_err(|error| {
            DispatchError::Validation(format!("invalid base address '{base_address}': {error}"))
        })?;

        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(DispatchError::Validation(format!(
                "base address '{base_address}' must use http or https"
            )));
        }

        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(path.as_str());
        }

        Ok(Self {
            base_url,
            token: BearerToken::new(secret)?,
            debug: false,
            ping_marker_key: DEFAULT_PING_MARKER_KEY.to_owned(),
        })
    }

    /// Enables diagnostic logging of outbound calls.
    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Overrides the key [`crate::DispatchClient::ping`] expects in the root body.
    #[must_use]
    pub fn with_ping_marker_key(mut self, ping_marker_key: impl Into<String>) -> Self {
        self.ping_marker_key = ping_marker_key.into();
        self
    }

    /// Returns the normalized base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Returns the credential sent with every call.
    #[must_use]
    pub fn token(&self) -> &BearerToken {
        &self.token
    }

    /// Returns whether diagnostic logging is enabled.
    #[must_use]
    pub fn debug(&self) -> bool {
        self.debug
    }

    /// Returns the liveness marker key.
    #[must_use]
    pub fn ping_marker_key(&self) -> &str {
        self.ping_marker_key.as_str()
    }

    /// Resolves a path beneath the base URL.
    ///
    /// Rooted, scheme-relative and absolute paths are rejected, as is any
    /// path that resolves outside the base URL's origin or path prefix.
    pub fn endpoint(&self, path: &str) -> DispatchResult<Url> {
        let escapes_base = |reason: &str| {
            DispatchError::Validation(format!(
                "endpoint path '{path}' {reason} '{}'",
                self.base_url
            ))
        };

        if path.starts_with(['/', '\\']) || Url::parse(path).is_ok() {
            return Err(escapes_base("must be relative to"));
        }

        let url = self.base_url.join(path).map_err(|error| {
            DispatchError::Validation(format!("invalid endpoint path '{path}': {error}"))
        })?;

        if url.origin() != self.base_url.origin()
            || !url.path().starts_with(self.base_url.path())
        {
            return Err(escapes_base("resolves outside"));
        }

        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use service_dispatch_core::DispatchError;

    use super::{ClientConfig, DEFAULT_PING_MARKER_KEY};

    #[test]
    fn base_address_gains_trailing_slash() {
        let config = ClientConfig::new("https://dispatch.test/api", "secret");
        assert!(config.is_ok());
        let config = config.unwrap_or_else(|_| unreachable!());

        assert_eq!(config.base_url().as_str(), "https://dispatch.test/api/");
        assert_eq!(config.ping_marker_key(), DEFAULT_PING_MARKER_KEY);
        assert!(!config.debug());

        let endpoint = config.endpoint("v0.1.0/create");
        assert_eq!(
            endpoint.map(|url| url.to_string()).ok().as_deref(),
            Some("https://dispatch.test/api/v0.1.0/create")
        );
    }

    #[test]
    fn endpoint_stays_beneath_base_url() {
        let config = ClientConfig::new("https://dispatch.test/api", "secret")
            .unwrap_or_else(|_| unreachable!());

        for path in [
            "//evil.test/steal",
            "/transactions",
            "\\\\evil.test/steal",
            "https://evil.test/steal",
            "../transactions",
            "transactions/../../admin",
        ] {
            assert!(
                matches!(config.endpoint(path), Err(DispatchError::Validation(_))),
                "{path} should be rejected"
            );
        }

        assert_eq!(
            config.endpoint("").map(|url| url.to_string()).ok().as_deref(),
            Some("https://dispatch.test/api/")
        );
        assert_eq!(
            config
                .endpoint("transaction?external_id=x")
                .map(|url| url.to_string())
                .ok()
                .as_deref(),
            Some("https://dispatch.test/api/transaction?external_id=x")
        );
    }

    #[test]
    fn rejects_invalid_addresses_and_empty_secret() {
        assert!(ClientConfig::new("not a url", "secret").is_err());
        assert!(ClientConfig::new("ftp://dispatch.test", "secret").is_err());
        assert!(ClientConfig::new("https://dispatch.test", "  ").is_err());
    }
}
