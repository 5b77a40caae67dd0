use serde::{Deserialize, Serialize};

/// Intended use advertised for a published key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyUse {
    Sig,
    Enc,
}

/// Single RSA public key entry from the provider's key set. Providers attach
/// extra members (`x5c`, `x5t`, ...) which are ignored on decode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Jwk {
    pub kty: String,
    pub kid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alg: Option<String>,
    #[serde(rename = "use", default, skip_serializing_if = "Option::is_none")]
    pub use_field: Option<KeyUse>,
    pub n: String,
    pub e: String,
}

/// Key set document fetched from the well-known endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Jwks {
    pub keys: Vec<Jwk>,
}
