//! Response envelope and authentication-response parsing.
//!
//! # Design
//! Every successful vendor response wraps its payload as
//! `{"data": ..., "meta": ...}`. A body without `data` is rejected outright;
//! an empty `data` is never invented. The OAuth token endpoint is the one
//! exception: it answers with a flat object and gets its own parser.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{ApiError, Result};
use crate::fields;

/// A parsed `{data, meta}` response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope {
    pub data: Value,
    /// Empty object when the response carried no `meta`.
    pub meta: Value,
}

impl Envelope {
    /// Decode `data` into a typed value.
    pub fn data_as<T: DeserializeOwned>(&self) -> Result<T> {
        T::deserialize(&self.data).map_err(|e| ApiError::MalformedResponse {
            message: format!("unexpected `data` shape: {e}"),
            source: Some(e),
        })
    }
}

/// Flat body returned by the OAuth token endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthenticationResponse {
    pub token_type: String,
    pub expires_in: u64,
    pub access_token: String,
}

impl AuthenticationResponse {
    /// Value for the `Authorization` header, e.g. `Bearer tok123`.
    pub fn authorization(&self) -> String {
        format!("{} {}", self.token_type, self.access_token)
    }
}

pub fn default_meta() -> Value {
    Value::Object(Map::new())
}

/// Parse a raw body into an `Envelope`.
pub fn parse_envelope(body: &str) -> Result<Envelope> {
    let value: Value = serde_json::from_str(body).map_err(ApiError::invalid_json)?;
    let data = fields::required(&value, "data")?.clone();
    let meta = value.get("meta").cloned().unwrap_or_else(default_meta);
    Ok(Envelope { data, meta })
}

/// Parse a raw body into an `AuthenticationResponse`.
pub fn parse_authentication(body: &str) -> Result<AuthenticationResponse> {
    let value: Value = serde_json::from_str(body).map_err(ApiError::invalid_json)?;
    Ok(AuthenticationResponse {
        token_type: fields::required_str(&value, "token_type")?.to_string(),
        expires_in: fields::required_u64(&value, "expires_in")?,
        access_token: fields::required_str(&value, "access_token")?.to_string(),
    })
}
