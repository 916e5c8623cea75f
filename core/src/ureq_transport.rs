//! Blocking `Transport` backed by ureq.
//!
//! Status-as-error is disabled so 4xx/5xx come back as `HttpResponse` data
//! and the client's mapper decides what they mean. Bodies are read as bytes
//! so a non-UTF-8 body is reported with its status instead of as an I/O
//! failure.

use std::time::Duration;

use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};

#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }

    /// Transport whose every call is bounded by `timeout`.
    pub fn with_timeout(timeout: Duration) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build()
            .new_agent();
        Self { agent }
    }

    /// Wrap a caller-configured agent.
    pub fn with_agent(agent: ureq::Agent) -> Self {
        Self { agent }
    }
}

fn with_headers<B>(mut builder: ureq::RequestBuilder<B>, headers: &[(String, String)]) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

fn map_error(error: ureq::Error) -> TransportError {
    match error {
        ureq::Error::StatusCode(status) => TransportError::Status(HttpResponse::new(status, "")),
        ureq::Error::Timeout(_) => TransportError::Timeout(error.to_string()),
        ureq::Error::Io(_) | ureq::Error::HostNotFound | ureq::Error::ConnectionFailed => {
            TransportError::Connection(error.to_string())
        }
        other => TransportError::Other(other.to_string()),
    }
}

impl Transport for UreqTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = request.url.as_str();
        let headers = request.headers.as_slice();
        let body = request.body.as_deref().unwrap_or("");

        let result = match request.method {
            HttpMethod::Get => with_headers(self.agent.get(url), headers).call(),
            HttpMethod::Delete => with_headers(self.agent.delete(url), headers).call(),
            HttpMethod::Post => with_headers(self.agent.post(url), headers).send(body.as_bytes()),
            HttpMethod::Put => with_headers(self.agent.put(url), headers).send(body.as_bytes()),
        };
        let mut response = result.map_err(map_error)?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| Some((name.as_str().to_string(), value.to_str().ok()?.to_string())))
            .collect();
        let bytes = response.body_mut().read_to_vec().map_err(map_error)?;
        let body = String::from_utf8(bytes).map_err(|e| TransportError::UndecodableBody {
            status,
            message: e.utf8_error().to_string(),
        })?;

        Ok(HttpResponse { status, headers, body })
    }
}
