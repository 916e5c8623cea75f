//! Request building, transport dispatch and response parsing for the Leat
//! (Piggy) REST API.
//!
//! # Design
//! `ApiClient` owns its configuration and a `Transport`. Each call is split
//! into `build_request` (pure, deterministic) and a single transport round
//! trip whose outcome is either parsed as an `Envelope` or classified by
//! `mapper::classify`. There is no retry, cache or rate limit: one call, one
//! attempt. Mutating the configuration takes `&mut self`, so sharing a client
//! across threads forces callers to settle configuration first.

use tracing::debug;

use crate::config::ClientConfig;
use crate::envelope::{self, AuthenticationResponse, Envelope};
use crate::error::{ApiError, Result};
use crate::http::{self, HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};
use crate::mapper;
use crate::params::Params;

/// Synchronous client for the vendor REST API.
#[derive(Debug, Clone)]
pub struct ApiClient<T> {
    config: ClientConfig,
    transport: T,
}

impl<T: Transport> ApiClient<T> {
    /// Client against the default base URL, no `Authorization` yet.
    pub fn new(transport: T) -> Self {
        Self::with_config(ClientConfig::default(), transport)
    }

    pub fn with_config(config: ClientConfig, transport: T) -> Self {
        Self { config, transport }
    }

    /// Override the base URL. No network effect.
    pub fn configure(&mut self, base_url: &str) {
        self.config.set_base_url(base_url);
    }

    /// Set or overwrite a header sent on every subsequent request.
    pub fn add_header(&mut self, name: &str, value: &str) {
        self.config.set_header(name, value);
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn base_url(&self) -> &str {
        self.config.base_url()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn has_authorization(&self) -> bool {
        self.config.header("Authorization").is_some()
    }

    /// Build the request for `endpoint` without sending it.
    ///
    /// GET/DELETE carry `params` in the query string; POST/PUT send them as a
    /// form-encoded body.
    pub fn build_request(&self, method: HttpMethod, endpoint: &str, params: &Params) -> HttpRequest {
        let mut url = format!("{}{}", self.config.base_url(), endpoint);
        let mut headers = self.config.headers().to_vec();
        let encoded = params.encode();

        let body = if method.uses_query() {
            if !encoded.is_empty() {
                url.push(if url.contains('?') { '&' } else { '?' });
                url.push_str(&encoded);
            }
            None
        } else {
            http::set_header(&mut headers, "content-type", "application/x-www-form-urlencoded");
            Some(encoded)
        };

        HttpRequest {
            method,
            url,
            headers,
            body,
        }
    }

    /// Perform an authenticated call and parse the `{data, meta}` envelope.
    pub fn request(&self, method: HttpMethod, endpoint: &str, params: &Params) -> Result<Envelope> {
        if !self.has_authorization() {
            return Err(ApiError::AuthNotConfigured);
        }
        let response = self.execute(method, endpoint, params)?;
        envelope::parse_envelope(&response.body)
    }

    pub fn get(&self, endpoint: &str, params: &Params) -> Result<Envelope> {
        self.request(HttpMethod::Get, endpoint, params)
    }

    pub fn post(&self, endpoint: &str, params: &Params) -> Result<Envelope> {
        self.request(HttpMethod::Post, endpoint, params)
    }

    pub fn put(&self, endpoint: &str, params: &Params) -> Result<Envelope> {
        self.request(HttpMethod::Put, endpoint, params)
    }

    pub fn delete(&self, endpoint: &str, params: &Params) -> Result<Envelope> {
        self.request(HttpMethod::Delete, endpoint, params)
    }

    /// POST to the OAuth token endpoint. Needs no `Authorization` header and
    /// expects a flat body instead of an envelope.
    pub fn authentication_request(&self, endpoint: &str, params: &Params) -> Result<AuthenticationResponse> {
        let response = self.execute(HttpMethod::Post, endpoint, params)?;
        envelope::parse_authentication(&response.body)
    }

    fn execute(&self, method: HttpMethod, endpoint: &str, params: &Params) -> Result<HttpResponse> {
        let request = self.build_request(method, endpoint, params);
        debug!(%method, url = %request.url, "sending request");

        let response = match self.transport.send(&request) {
            Ok(response) if response.is_success() => response,
            Ok(response) => {
                debug!(%method, url = %request.url, status = response.status, "request rejected");
                return Err(mapper::classify(TransportError::Status(response)));
            }
            Err(error) => {
                debug!(%method, url = %request.url, %error, "transport failed");
                return Err(mapper::classify(error));
            }
        };

        debug!(%method, url = %request.url, status = response.status, "response received");
        Ok(response)
    }
}
