use std::fmt::{Debug, Formatter};

use crate::{DispatchResult, NonEmptyString};

/// Shared secret presented as `Authorization: Bearer <secret>`.
///
/// The older `user:secret` Basic scheme is no longer accepted by the dispatch
/// service and has no counterpart here.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken {
    secret: NonEmptyString,
}

impl BearerToken {
    /// Header value with the secret masked, for logs.
    pub const REDACTED_VALUE: &'static str = "Bearer [redacted]";

    /// Creates a bearer token from a non-empty secret.
    pub fn new(secret: impl Into<String>) -> DispatchResult<Self> {
        Ok(Self {
            secret: NonEmptyString::new(secret)?,
        })
    }

    /// Returns the full `Authorization` header value.
    #[must_use]
    pub fn authorization_value(&self) -> String {
        format!("Bearer {}", self.secret.as_str())
    }
}

impl Debug for BearerToken {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str("BearerToken([redacted])")
    }
}

#[cfg(test)]
mod tests {
    use super::BearerToken;

    #[test]
    fn bearer_token_formats_authorization_header() {
        let token = BearerToken::new("s3cret");
        assert!(token.is_ok());
        let token = token.unwrap_or_else(|_| unreachable!());

        assert_eq!(token.authorization_value(), "Bearer s3cret");
        assert_eq!(format!("{token:?}"), "BearerToken([redacted])");
    }

    #[test]
    fn bearer_token_rejects_empty_secret() {
        assert!(BearerToken::new("").is_err());
    }
}
