use crate::errors::{AuthError, AuthResult};
use serde_json::Value;

/// Signature-checked token payload. Exists only for the duration of request
/// handling; never persisted.
#[derive(Debug, Clone)]
pub struct VerifiedClaims {
    issuer: String,
    subject: Option<String>,
    expires_at: i64,
    claims: Value,
}

impl VerifiedClaims {
    /// Wrap an already-verified payload. Callers must have validated the
    /// signature first; this only checks structural presence of `iss`/`exp`.
    pub(crate) fn from_payload(claims: Value) -> AuthResult<Self> {
        let issuer = string_claim(&claims, "iss")
            .ok_or_else(|| AuthError::ClaimMismatch("iss".to_string()))?;
        let expires_at = claims
            .get("exp")
            .and_then(Value::as_i64)
            .ok_or_else(|| AuthError::ClaimMismatch("exp".to_string()))?;
        let subject = string_claim(&claims, "sub");
        Ok(Self {
            issuer,
            subject,
            expires_at,
            claims,
        })
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    pub fn expires_at(&self) -> i64 {
        self.expires_at
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.claims.get(name)
    }

    /// Permission list stored directly under the namespace claim. The claim
    /// value may be an array of strings or one space-delimited string; both
    /// normalize to a list. Anything else yields no permissions.
    pub fn namespaced_permissions(&self, namespace: &str) -> Vec<String> {
        let Some(value) = self.claims.get(namespace) else {
            return Vec::new();
        };
        if let Some(values) = value.as_array() {
            return values
                .iter()
                .filter_map(|item| item.as_str().map(|perm| perm.to_string()))
                .collect();
        }
        if let Some(value) = value.as_str() {
            return value.split_whitespace().map(|perm| perm.to_string()).collect();
        }
        Vec::new()
    }
}

fn string_claim(claims: &Value, name: &str) -> Option<String> {
    // Only accept string-valued claims; other types are ignored.
    claims
        .get(name)
        .and_then(|value| value.as_str())
        .map(|value| value.to_string())
}
