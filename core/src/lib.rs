//! Synchronous client core for the Leat (Piggy) loyalty REST API.
//!
//! # Overview
//! `ApiClient` builds requests against the vendor base URL, sends them
//! through a pluggable `Transport`, and parses the `{data, meta}` envelope
//! every successful response carries. Failures are classified into four
//! kinds (`ApiError`) that callers pattern-match on.
//!
//! # Design
//! - The transport is a trait, so tests run against in-memory fakes and the
//!   `ureq` feature supplies a real blocking transport.
//! - `build_request` is pure; the only I/O is one `Transport::send` per call.
//! - An `Authorization` header is required before any enveloped call; the
//!   `auth` module obtains one from an API key or OAuth client credentials.
//! - Resources (`shops`, `vouchers`) decode `data` with serde and are thin
//!   by intent; richer entity mapping lives with the callers.
//!
//! ```no_run
//! use leat_core::{ApiClient, ApiKey, Params, UreqTransport};
//!
//! let mut client = ApiClient::new(UreqTransport::new());
//! ApiKey::new("my-api-key").apply(&mut client);
//! let envelope = client.get("/api/v3/oauth/clients/shops", &Params::new())?;
//! println!("{}", envelope.data);
//! # Ok::<(), leat_core::ApiError>(())
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod fields;
pub mod http;
pub mod mapper;
pub mod params;
pub mod resources;
#[cfg(feature = "ureq")]
pub mod ureq_transport;

pub use auth::{ApiKey, OAuthCredentials};
pub use client::ApiClient;
pub use config::ClientConfig;
pub use envelope::{AuthenticationResponse, Envelope};
pub use error::{ApiError, ErrorKind, Result};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};
pub use params::Params;
#[cfg(feature = "ureq")]
pub use ureq_transport::UreqTransport;
