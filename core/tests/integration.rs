//! End-to-end flows against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives `ApiClient` through
//! `UreqTransport` over real HTTP: OAuth bootstrap, enveloped reads, form
//! posts, vendor error bodies and maintenance mode.

use leat_core::resources::{Shops, Vouchers};
use leat_core::{
    ApiClient, ApiError, ApiKey, ErrorKind, OAuthCredentials, Params, UreqTransport,
};
use mock_server::AppState;
use serde_json::{json, Value};

/// Start a mock server on a random port and return its base URL.
fn start_server(state: AppState) -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::serve(listener, state).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

fn client(base_url: &str) -> ApiClient<UreqTransport> {
    let mut client = ApiClient::new(UreqTransport::new());
    client.configure(base_url);
    client
}

#[test]
fn oauth_bootstrap_then_resources() {
    let base_url = start_server(AppState::seeded());
    let mut client = client(&base_url);

    // Step 1: nothing works before authentication.
    let err = client.get("/api/v3/oauth/clients/shops", &Params::new()).unwrap_err();
    assert!(matches!(err, ApiError::AuthNotConfigured));

    // Step 2: wrong secret is a plain request failure carrying the vendor message.
    let err = OAuthCredentials::new(mock_server::CLIENT_ID, "wrong")
        .authenticate(&mut client)
        .unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert!(!client.has_authorization());

    // Step 3: valid credentials install the token.
    let auth = OAuthCredentials::new(mock_server::CLIENT_ID, mock_server::CLIENT_SECRET)
        .authenticate(&mut client)
        .unwrap();
    assert_eq!(auth.token_type, "Bearer");
    assert_eq!(auth.expires_in, 3600);

    // Step 4: list shops; no meta on the wire means an empty meta.
    let envelope = client.get("/api/v3/oauth/clients/shops", &Params::new()).unwrap();
    assert_eq!(envelope.data[0], json!({"uuid": "u1", "name": "Shop One"}));
    assert_eq!(envelope.meta, json!({}));

    // Step 5: typed resource access.
    let shop = Shops::new(&client).find("u2").unwrap();
    assert_eq!(shop.name, "Shop Two");

    // Step 6: missing shop keeps status and message.
    match Shops::new(&client).find("nope").unwrap_err() {
        ApiError::RequestFailed {
            status,
            message,
            code,
            ..
        } => {
            assert_eq!(status, Some(404));
            assert_eq!(message, "Shop not found");
            assert_eq!(code, Some(404));
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn voucher_redemption_over_form_post() {
    let base_url = start_server(AppState::seeded());
    let mut client = client(&base_url);
    ApiKey::new(mock_server::API_KEY).apply(&mut client);

    let vouchers = Vouchers::new(&client);
    let voucher = vouchers.find("WELCOME10").unwrap();
    assert_eq!(voucher.status, "ACTIVE");

    let redeemed = vouchers.redeem("WELCOME10", Some("contact-1")).unwrap();
    assert!(redeemed.is_redeemed());

    match vouchers.redeem("WELCOME10", None).unwrap_err() {
        ApiError::RequestFailed { status, code, errors, .. } => {
            assert_eq!(status, Some(422));
            assert_eq!(code, Some(62));
            assert!(errors.unwrap()["code"].is_array());
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn query_and_form_encoding_reach_the_server() {
    let base_url = start_server(AppState::seeded());
    let mut client = client(&base_url);
    ApiKey::new(mock_server::API_KEY).apply(&mut client);

    let params = Params::new()
        .with("a", 1)
        .with("b", Value::Null)
        .with("name", "Shop One & Co");

    let envelope = client.get("/echo", &params).unwrap();
    assert_eq!(envelope.data, json!({"a": "1", "name": "Shop One & Co"}));
    assert_eq!(envelope.meta, json!({"method": "GET"}));

    let envelope = client.post("/echo", &params).unwrap();
    assert_eq!(envelope.data, json!({"a": "1", "name": "Shop One & Co"}));
    assert_eq!(envelope.meta, json!({"method": "POST"}));
}

#[test]
fn missing_data_is_malformed() {
    let base_url = start_server(AppState::seeded());
    let mut client = client(&base_url);
    ApiKey::new(mock_server::API_KEY).apply(&mut client);

    let err = client.get("/broken", &Params::new()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedResponse);
}

#[test]
fn maintenance_mode_is_distinct_from_failure() {
    let state = AppState::seeded();
    let base_url = start_server(state.clone());
    let mut client = client(&base_url);
    ApiKey::new(mock_server::API_KEY).apply(&mut client);

    state.set_maintenance(true);
    let err = client.get("/api/v3/oauth/clients/shops", &Params::new()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MaintenanceMode);

    state.set_maintenance(false);
    assert!(client.get("/api/v3/oauth/clients/shops", &Params::new()).is_ok());
}

/// Serve one raw HTTP/1.1 response, byte for byte, to the first connection.
fn serve_raw_once(status_line: &str, body: &'static [u8]) -> String {
    use std::io::{Read, Write};

    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let head = format!(
        "{status_line}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        body.len()
    );

    std::thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = stream.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }
        stream.write_all(head.as_bytes()).unwrap();
        stream.write_all(body).unwrap();
        stream.flush().unwrap();
    });

    format!("http://{addr}")
}

#[test]
fn non_utf8_success_body_is_malformed() {
    let base_url = serve_raw_once("HTTP/1.1 200 OK", b"\xff\xfe{\"data\":1}");
    let mut client = client(&base_url);
    ApiKey::new("k").apply(&mut client);

    let err = client.get("/x", &Params::new()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedResponse, "{err}");
}

#[test]
fn non_utf8_maintenance_body_is_still_maintenance() {
    let base_url = serve_raw_once("HTTP/1.1 503 Service Unavailable", b"\xff\xfe");
    let mut client = client(&base_url);
    ApiKey::new("k").apply(&mut client);

    let err = client.get("/x", &Params::new()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MaintenanceMode, "{err}");
}

#[test]
fn unreachable_host_is_request_failed_without_status() {
    // Bind then drop to get a port nobody listens on.
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let mut client = client(&format!("http://127.0.0.1:{port}"));
    ApiKey::new("k").apply(&mut client);

    let err = client.get("/anything", &Params::new()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RequestFailed);
    assert_eq!(err.status(), None);
}
