//! Bootstrap flows that install the `Authorization` header.
//!
//! Register (API key) clients use a static bearer key. OAuth clients trade
//! their client credentials for an access token first.

use tracing::info;

use crate::client::ApiClient;
use crate::envelope::AuthenticationResponse;
use crate::error::Result;
use crate::http::Transport;
use crate::params::Params;

pub const ACCESS_TOKEN_ENDPOINT: &str = "/api/v3/oauth/clients/access-token";

/// Static API key issued to register clients.
#[derive(Clone)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn apply<T: Transport>(&self, client: &mut ApiClient<T>) {
        client.add_header("Authorization", &format!("Bearer {}", self.0));
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// OAuth client-credentials pair.
#[derive(Clone)]
pub struct OAuthCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl OAuthCredentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    fn params(&self) -> Params {
        Params::new()
            .with("grant_type", "client_credentials")
            .with("client_id", self.client_id.as_str())
            .with("client_secret", self.client_secret.as_str())
    }

    /// Request an access token and install it on `client`.
    ///
    /// On failure the client is left untouched.
    pub fn authenticate<T: Transport>(&self, client: &mut ApiClient<T>) -> Result<AuthenticationResponse> {
        let auth = client.authentication_request(ACCESS_TOKEN_ENDPOINT, &self.params())?;
        client.add_header("Authorization", &auth.authorization());
        info!(client_id = %self.client_id, expires_in = auth.expires_in, "obtained access token");
        Ok(auth)
    }
}

impl std::fmt::Debug for OAuthCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .finish()
    }
}
