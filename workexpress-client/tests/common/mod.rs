// workexpress-client/tests/common/mod.rs
// In-process mock of the WorkExpress backend

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::net::TcpListener;

use workexpress_client::{AuthContext, ClientConfig, ClientRef, TrackingRecord, WorkExpressClient};

pub const TOKEN: &str = "test-token";

/// Canned data and recorded traffic
#[derive(Default)]
pub struct MockState {
    /// tracking number -> internal package payload
    pub packages: HashMap<String, Value>,
    /// tracking number -> external carrier payload
    pub external: HashMap<String, Value>,
    /// status returned by the internal lookup instead of a 404
    pub package_error: Option<(u16, Value)>,
    /// tracking number -> invoice number
    pub invoiced: HashMap<String, String>,
    /// tracking numbers whose verification answers 500
    pub broken_verification: HashSet<String>,
    /// customer ids whose invoice creation answers 500
    pub failing_customers: HashSet<String>,
    /// user id -> user payload
    pub users: HashMap<String, Value>,
    /// every `METHOD path` served
    pub hits: Vec<String>,
    /// bodies posted to `/invoices`
    pub created: Vec<Value>,
    /// bodies sent to package update endpoints
    pub updates: Vec<(String, Value)>,
    /// `METHOD path` -> time to wait before answering
    pub delays: HashMap<String, Duration>,
}

impl MockState {
    pub fn delay(&mut self, hit: &str, millis: u64) {
        self.delays.insert(hit.to_string(), Duration::from_millis(millis));
    }
}

pub type Shared = Arc<Mutex<MockState>>;

pub struct MockBackend {
    pub base_url: String,
    pub state: Shared,
}

impl MockBackend {
    pub async fn start(state: MockState) -> Self {
        let state = Arc::new(Mutex::new(state));
        let app = Router::new()
            .route("/packages/tracking/{tracking}", get(package_by_tracking))
            .route("/cargo/external-tracking/{tracking}", get(external_tracking))
            .route("/packages/{id}/dimensions", post(update_dimensions))
            .route("/packages/{id}/weights", put(update_weights))
            .route("/invoices/verify-package/{tracking}", get(verify_package))
            .route("/invoices", post(create_invoice))
            .route("/users/all", get(all_users))
            .route("/users/{id}", get(user_by_id))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    pub fn client(&self) -> WorkExpressClient {
        self.client_with(AuthContext::new(TOKEN))
    }

    pub fn client_with(&self, auth: AuthContext) -> WorkExpressClient {
        WorkExpressClient::new(ClientConfig::new(&self.base_url).with_timeout(5), auth).unwrap()
    }

    pub fn hits(&self) -> Vec<String> {
        self.state.lock().unwrap().hits.clone()
    }

    pub fn created(&self) -> Vec<Value> {
        self.state.lock().unwrap().created.clone()
    }
}

pub fn client_ref(id: &str, rate: f64, insurance: bool) -> ClientRef {
    ClientRef {
        id: id.to_string(),
        name: format!("Client {}", id),
        email: format!("{}@example.com", id),
        plan_rate: rate,
        plan_name: None,
        branch_name: None,
        shipping_insurance: insurance,
    }
}

pub fn record(id: &str, tracking: &str, weight: f64, client: Option<ClientRef>) -> TrackingRecord {
    TrackingRecord {
        id: Some(id.to_string()),
        tracking_number: tracking.to_string(),
        package_status: "received".to_string(),
        weight,
        volumetric_weight: weight,
        length: 0.0,
        width: 0.0,
        height: 0.0,
        client,
        position: None,
        declared_value: None,
        carrier: None,
    }
}

/// Internal package payload with a nested client
pub fn package(id: &str, tracking: &str, weight: f64, client: Value) -> Value {
    json!({
        "_id": id,
        "trackingNumber": tracking,
        "packageStatus": "received",
        "weight": weight,
        "volumetricWeight": weight,
        "length": 10,
        "width": 8,
        "height": 4,
        "client": client,
    })
}

pub fn client_json(id: &str, name: &str, rate: f64, insurance: Value) -> Value {
    json!({
        "_id": id,
        "name": name,
        "email": format!("{}@example.com", id),
        "planRate": rate,
        "shippingInsurance": insurance,
    })
}

async fn record_hit(state: &Shared, hit: String) {
    let delay = {
        let mut guard = state.lock().unwrap();
        let delay = guard.delays.get(&hit).copied();
        guard.hits.push(hit);
        delay
    };
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
}

fn unauthorized(headers: &HeaderMap) -> Option<Response> {
    let expected = format!("Bearer {}", TOKEN);
    let ok = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == expected);
    (!ok).then(|| {
        (StatusCode::UNAUTHORIZED, Json(json!({ "message": "Unauthorized" }))).into_response()
    })
}

fn not_found(what: &str) -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "message": format!("{} not found", what) }))).into_response()
}

async fn package_by_tracking(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(tracking): Path<String>,
) -> Response {
    record_hit(&state, format!("GET /packages/tracking/{}", tracking)).await;
    if let Some(resp) = unauthorized(&headers) {
        return resp;
    }
    let guard = state.lock().unwrap();
    if let Some((status, body)) = &guard.package_error {
        let status = StatusCode::from_u16(*status).unwrap();
        return (status, Json(body.clone())).into_response();
    }
    match guard.packages.get(&tracking) {
        Some(body) => Json(body.clone()).into_response(),
        None => not_found("Package"),
    }
}

async fn external_tracking(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(tracking): Path<String>,
) -> Response {
    record_hit(&state, format!("GET /cargo/external-tracking/{}", tracking)).await;
    if let Some(resp) = unauthorized(&headers) {
        return resp;
    }
    match state.lock().unwrap().external.get(&tracking) {
        Some(body) => Json(body.clone()).into_response(),
        None => not_found("Cargo"),
    }
}

async fn update_dimensions(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    record_hit(&state, format!("POST /packages/{}/dimensions", id)).await;
    if let Some(resp) = unauthorized(&headers) {
        return resp;
    }
    state.lock().unwrap().updates.push((format!("dimensions:{}", id), body));
    Json(json!({ "success": true })).into_response()
}

async fn update_weights(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    record_hit(&state, format!("PUT /packages/{}/weights", id)).await;
    if let Some(resp) = unauthorized(&headers) {
        return resp;
    }
    state.lock().unwrap().updates.push((format!("weights:{}", id), body));
    StatusCode::NO_CONTENT.into_response()
}

async fn verify_package(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(tracking): Path<String>,
) -> Response {
    record_hit(&state, format!("GET /invoices/verify-package/{}", tracking)).await;
    if let Some(resp) = unauthorized(&headers) {
        return resp;
    }
    let guard = state.lock().unwrap();
    if guard.broken_verification.contains(&tracking) {
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "message": "verification down" })))
            .into_response();
    }
    match guard.invoiced.get(&tracking) {
        Some(number) => Json(json!({
            "isInvoiced": true,
            "invoiceDetails": { "invoice_number": number, "status": "paid" },
        }))
        .into_response(),
        None => Json(json!({ "isInvoiced": false })).into_response(),
    }
}

async fn create_invoice(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    record_hit(&state, "POST /invoices".to_string()).await;
    if let Some(resp) = unauthorized(&headers) {
        return resp;
    }
    let mut guard = state.lock().unwrap();
    let customer = body["customer_id"].as_str().unwrap_or_default().to_string();
    if guard.failing_customers.contains(&customer) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "message": ["invoice service unavailable", "retry later"] })),
        )
            .into_response();
    }
    guard.created.push(body.clone());
    let number = format!("INV-{:04}", guard.created.len());
    (
        StatusCode::CREATED,
        Json(json!({
            "data": {
                "_id": format!("inv-{}", customer),
                "invoiceNumber": number,
                "totalAmount": body["total_amount"].clone(),
                "status": "pending",
            }
        })),
    )
        .into_response()
}

async fn all_users(State(state): State<Shared>, headers: HeaderMap) -> Response {
    record_hit(&state, "GET /users/all".to_string()).await;
    if let Some(resp) = unauthorized(&headers) {
        return resp;
    }
    let mut users: Vec<Value> = state.lock().unwrap().users.values().cloned().collect();
    users.sort_by_key(|u| u["_id"].as_str().unwrap_or_default().to_string());
    Json(json!({ "users": users })).into_response()
}

async fn user_by_id(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    record_hit(&state, format!("GET /users/{}", id)).await;
    if let Some(resp) = unauthorized(&headers) {
        return resp;
    }
    match state.lock().unwrap().users.get(&id) {
        Some(user) => Json(json!({ "data": user })).into_response(),
        None => not_found("User"),
    }
}
