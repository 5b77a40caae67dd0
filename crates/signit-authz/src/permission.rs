use crate::claims::VerifiedClaims;
use crate::errors::{AuthError, AuthResult};

/// Required permission set checked against the token's namespaced claim.
///
/// Matching is list-superset: every required permission must appear in the
/// granted list. There is no partial-match mode.
#[derive(Debug, Clone)]
pub struct PermissionPolicy {
    namespace: String,
    required: Vec<String>,
}

impl PermissionPolicy {
    pub fn new(namespace: impl Into<String>, required: Vec<String>) -> Self {
        Self {
            namespace: namespace.into(),
            required,
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn required(&self) -> &[String] {
        &self.required
    }

    pub fn check(&self, claims: &VerifiedClaims) -> AuthResult<()> {
        let granted = claims.namespaced_permissions(&self.namespace);
        let missing = self
            .required
            .iter()
            .any(|perm| !granted.iter().any(|grant| grant == perm));
        if missing {
            return Err(AuthError::InsufficientPermission);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const NAMESPACE: &str = "https://api.example/app_metadata";

    fn claims_with(value: serde_json::Value) -> VerifiedClaims {
        VerifiedClaims::from_payload(json!({
            "iss": "https://issuer.example/",
            "exp": 1_900_000_000i64,
            NAMESPACE: value,
        }))
        .expect("claims")
    }

    #[test]
    fn superset_grant_passes() {
        let policy = PermissionPolicy::new(NAMESPACE, vec!["custom:perm2".to_string()]);
        let claims = claims_with(json!(["custom:perm1", "custom:perm2"]));
        policy.check(&claims).expect("allowed");
    }

    #[test]
    fn every_required_permission_must_be_present() {
        let policy = PermissionPolicy::new(
            NAMESPACE,
            vec!["custom:perm1".to_string(), "custom:perm2".to_string()],
        );
        let claims = claims_with(json!(["custom:perm1"]));
        let err = policy.check(&claims).unwrap_err();
        assert!(matches!(err, AuthError::InsufficientPermission));
    }

    #[test]
    fn space_delimited_grants_are_accepted() {
        let policy = PermissionPolicy::new(NAMESPACE, vec!["custom:perm2".to_string()]);
        let claims = claims_with(json!("custom:perm1 custom:perm2"));
        policy.check(&claims).expect("allowed");
    }

    #[test]
    fn absent_namespace_denies() {
        let policy =
            PermissionPolicy::new("https://other/app_metadata", vec!["custom:perm2".to_string()]);
        let claims = claims_with(json!(["custom:perm2"]));
        let err = policy.check(&claims).unwrap_err();
        assert!(matches!(err, AuthError::InsufficientPermission));
    }

    #[test]
    fn empty_requirement_is_vacuously_satisfied() {
        let policy = PermissionPolicy::new(NAMESPACE, vec![]);
        let claims = claims_with(json!([]));
        policy.check(&claims).expect("allowed");
    }
}
