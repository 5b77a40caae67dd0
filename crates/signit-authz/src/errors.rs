use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing bearer token")]
    MissingToken,
    #[error("malformed bearer token: {0}")]
    MalformedToken(String),
    #[error("unsupported signing algorithm")]
    UnsupportedAlgorithm,
    #[error("no signing key published for kid {0}")]
    UnknownKeyId(String),
    #[error("key resolution throttled")]
    KeyResolutionThrottled,
    #[error("key resolution timed out")]
    KeyResolutionTimeout,
    #[error("key set unavailable: {0}")]
    KeySetUnavailable(String),
    #[error("invalid token signature")]
    InvalidSignature,
    #[error("claim mismatch: {0}")]
    ClaimMismatch(String),
    #[error("token expired")]
    ExpiredToken,
    #[error("insufficient permissions")]
    InsufficientPermission,
}

pub type AuthResult<T> = Result<T, AuthError>;

impl AuthError {
    /// True when the request failed authentication rather than authorization.
    /// Drives the 401/403 split at the HTTP boundary.
    pub fn is_authentication(&self) -> bool {
        !matches!(
            self,
            AuthError::InsufficientPermission
                | AuthError::KeyResolutionThrottled
                | AuthError::KeyResolutionTimeout
                | AuthError::KeySetUnavailable(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_variants() {
        let errors = vec![
            AuthError::MissingToken,
            AuthError::MalformedToken("bad".to_string()),
            AuthError::UnsupportedAlgorithm,
            AuthError::UnknownKeyId("k1".to_string()),
            AuthError::KeyResolutionThrottled,
            AuthError::KeyResolutionTimeout,
            AuthError::KeySetUnavailable("refused".to_string()),
            AuthError::InvalidSignature,
            AuthError::ClaimMismatch("aud".to_string()),
            AuthError::ExpiredToken,
            AuthError::InsufficientPermission,
        ];

        for error in errors {
            let rendered = error.to_string();
            assert!(!rendered.is_empty());
        }
    }

    #[test]
    fn permission_denial_is_not_an_authentication_failure() {
        assert!(!AuthError::InsufficientPermission.is_authentication());
        assert!(AuthError::MissingToken.is_authentication());
        assert!(AuthError::ExpiredToken.is_authentication());
        assert!(!AuthError::KeyResolutionThrottled.is_authentication());
    }
}
