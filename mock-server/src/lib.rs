//! In-memory stand-in for the Leat (Piggy) REST API.
//!
//! Serves the OAuth token endpoint, a few enveloped resource routes, and two
//! diagnostic routes (`/echo`, `/broken`). Flipping maintenance mode makes
//! every route answer 503 the way the real API does during planned downtime.

use std::{
    collections::{HashMap, HashSet},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use axum::{
    extract::{Path, Query, Request, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const CLIENT_ID: &str = "test-client";
pub const CLIENT_SECRET: &str = "test-secret";
pub const API_KEY: &str = "test-api-key";

const PREFIX: &str = "/api/v3/oauth/clients";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Shop {
    pub uuid: String,
    pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Voucher {
    pub uuid: Uuid,
    pub code: String,
    pub status: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_uuid: Option<String>,
}

#[derive(Default)]
struct Data {
    shops: Vec<Shop>,
    vouchers: HashMap<String, Voucher>,
    tokens: HashSet<String>,
}

/// Shared server state. Clones share the same data.
#[derive(Clone, Default)]
pub struct AppState {
    data: Arc<RwLock<Data>>,
    maintenance: Arc<AtomicBool>,
}

impl AppState {
    /// State seeded with two shops and one active voucher.
    pub fn seeded() -> Self {
        let welcome = Voucher {
            uuid: Uuid::new_v4(),
            code: "WELCOME10".to_string(),
            status: "ACTIVE".to_string(),
            name: "10% off".to_string(),
            contact_uuid: None,
        };
        let data = Data {
            shops: vec![
                Shop {
                    uuid: "u1".to_string(),
                    name: "Shop One".to_string(),
                },
                Shop {
                    uuid: "u2".to_string(),
                    name: "Shop Two".to_string(),
                },
            ],
            vouchers: HashMap::from([(welcome.code.clone(), welcome)]),
            tokens: HashSet::new(),
        };
        Self {
            data: Arc::new(RwLock::new(data)),
            maintenance: Arc::default(),
        }
    }

    pub fn set_maintenance(&self, enabled: bool) {
        self.maintenance.store(enabled, Ordering::SeqCst);
    }
}

type Failure = (StatusCode, Json<Value>);

fn failure(status: StatusCode, message: &str) -> Failure {
    (
        status,
        Json(json!({"code": status.as_u16(), "message": message})),
    )
}

pub fn app() -> Router {
    app_with_state(AppState::seeded())
}

pub fn app_with_state(state: AppState) -> Router {
    Router::new()
        .route(&format!("{PREFIX}/access-token"), post(access_token))
        .route(&format!("{PREFIX}/shops"), get(list_shops))
        .route(&format!("{PREFIX}/shops/{{uuid}}"), get(get_shop))
        .route(&format!("{PREFIX}/vouchers/find"), get(find_voucher))
        .route(&format!("{PREFIX}/vouchers/redeem"), post(redeem_voucher))
        .route("/echo", get(echo).post(echo_form))
        .route("/broken", get(broken))
        .layer(middleware::from_fn_with_state(state.clone(), maintenance_gate))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    serve(listener, AppState::seeded()).await
}

pub async fn serve(listener: TcpListener, state: AppState) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_state(state)).await
}

async fn maintenance_gate(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if state.maintenance.load(Ordering::SeqCst) {
        tracing::info!(uri = %request.uri(), "rejecting request during maintenance");
        return failure(StatusCode::SERVICE_UNAVAILABLE, "The API is down for maintenance").into_response();
    }
    next.run(request).await
}

async fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), Failure> {
    let token = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| failure(StatusCode::UNAUTHORIZED, "Unauthenticated."))?;
    if token == API_KEY || state.data.read().await.tokens.contains(token) {
        Ok(())
    } else {
        Err(failure(StatusCode::UNAUTHORIZED, "Unauthenticated."))
    }
}

#[derive(Deserialize)]
pub struct TokenRequest {
    pub grant_type: String,
    pub client_id: String,
    pub client_secret: String,
}

async fn access_token(
    State(state): State<AppState>,
    Form(input): Form<TokenRequest>,
) -> Result<Json<Value>, Failure> {
    if input.grant_type != "client_credentials"
        || input.client_id != CLIENT_ID
        || input.client_secret != CLIENT_SECRET
    {
        return Err(failure(StatusCode::UNAUTHORIZED, "Client authentication failed"));
    }
    let token = Uuid::new_v4().to_string();
    state.data.write().await.tokens.insert(token.clone());
    Ok(Json(json!({
        "token_type": "Bearer",
        "expires_in": 3600,
        "access_token": token,
    })))
}

async fn list_shops(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<Value>, Failure> {
    authorize(&state, &headers).await?;
    let data = state.data.read().await;
    Ok(Json(json!({ "data": data.shops })))
}

async fn get_shop(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(uuid): Path<String>,
) -> Result<Json<Value>, Failure> {
    authorize(&state, &headers).await?;
    let data = state.data.read().await;
    data.shops
        .iter()
        .find(|shop| shop.uuid == uuid)
        .map(|shop| Json(json!({ "data": shop, "meta": {} })))
        .ok_or_else(|| failure(StatusCode::NOT_FOUND, "Shop not found"))
}

#[derive(Deserialize)]
pub struct VoucherQuery {
    pub code: String,
}

async fn find_voucher(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<VoucherQuery>,
) -> Result<Json<Value>, Failure> {
    authorize(&state, &headers).await?;
    let data = state.data.read().await;
    data.vouchers
        .get(&query.code)
        .map(|voucher| Json(json!({ "data": voucher })))
        .ok_or_else(|| failure(StatusCode::NOT_FOUND, "Voucher not found"))
}

#[derive(Deserialize)]
pub struct RedeemRequest {
    pub code: String,
    pub contact_uuid: Option<String>,
}

async fn redeem_voucher(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(input): Form<RedeemRequest>,
) -> Result<Json<Value>, Failure> {
    authorize(&state, &headers).await?;
    let mut data = state.data.write().await;
    let voucher = data
        .vouchers
        .get_mut(&input.code)
        .ok_or_else(|| failure(StatusCode::NOT_FOUND, "Voucher not found"))?;
    if voucher.status == "REDEEMED" {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "code": 62,
                "message": "Voucher already redeemed",
                "errors": {"code": ["The voucher has already been redeemed."]},
            })),
        ));
    }
    voucher.status = "REDEEMED".to_string();
    voucher.contact_uuid = input.contact_uuid;
    Ok(Json(json!({ "data": voucher })))
}

async fn echo(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<Value>, Failure> {
    authorize(&state, &headers).await?;
    Ok(Json(json!({ "data": query, "meta": {"method": "GET"} })))
}

async fn echo_form(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> Result<Json<Value>, Failure> {
    authorize(&state, &headers).await?;
    Ok(Json(json!({ "data": form, "meta": {"method": "POST"} })))
}

async fn broken() -> Json<Value> {
    Json(json!({ "meta": {} }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn voucher_serializes_without_contact() {
        let voucher = Voucher {
            uuid: Uuid::nil(),
            code: "X".to_string(),
            status: "ACTIVE".to_string(),
            name: "Test".to_string(),
            contact_uuid: None,
        };
        let json = serde_json::to_value(&voucher).unwrap();
        assert_eq!(json["uuid"], "00000000-0000-0000-0000-000000000000");
        assert_eq!(json["code"], "X");
        assert!(json.get("contact_uuid").is_none());
    }

    #[test]
    fn token_request_requires_every_field() {
        let result: Result<TokenRequest, _> =
            serde_json::from_str(r#"{"grant_type":"client_credentials","client_id":"a"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn redeem_request_contact_is_optional() {
        let input: RedeemRequest = serde_json::from_str(r#"{"code":"X"}"#).unwrap();
        assert_eq!(input.code, "X");
        assert!(input.contact_uuid.is_none());
    }

    #[test]
    fn seeded_state_starts_out_of_maintenance() {
        let state = AppState::seeded();
        assert!(!state.maintenance.load(Ordering::SeqCst));
        state.set_maintenance(true);
        assert!(state.clone().maintenance.load(Ordering::SeqCst));
    }

    #[test]
    fn failure_body_carries_code_and_message() {
        let (status, Json(body)) = failure(StatusCode::NOT_FOUND, "gone");
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"code": 404, "message": "gone"}));
    }
}
