//! In-process mock of the shop backend.
//!
//! [`MockBackend::start`] serves the REST API on an ephemeral local port and
//! records every request, so tests can drive the real clients and then
//! inspect what was sent.
//!
//! # Authentication
//!
//! `POST /login` with [`ADMIN_EMAIL`] / [`ADMIN_PASSWORD`] returns the current
//! access token and sets a `refreshToken` cookie. Write endpoints reject any
//! other bearer token with 401. [`MockBackend::expire_token`] rotates the
//! accepted token; `POST /auth/refresh-token` hands out the new one when the
//! cookie is present and refreshing has not been disabled.

use std::sync::{Arc, Mutex, MutexGuard};

use axum::extract::{Multipart, Path, Request, State};
use axum::http::{HeaderMap, Method, StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use serde_json::{Value, json};
use url::Url;

pub const ADMIN_EMAIL: &str = "admin@threadline.pk";
pub const ADMIN_PASSWORD: &str = "correct horse";

/// A request as seen by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub bearer: Option<String>,
}

/// Mutable backend state shared with the handlers.
#[derive(Debug)]
pub struct MockState {
    pub products: Vec<Value>,
    pub questions: Vec<(String, Value)>,
    pub banners: Vec<Value>,
    pub orders: Vec<Value>,
    /// Bodies received by `POST /create-order`.
    pub placed_orders: Vec<Value>,
    /// Bodies received by `POST /add-product` and `PUT /products/:id`.
    pub saved_products: Vec<Value>,
    /// `(field, file name, content type)` per uploaded part.
    pub uploads: Vec<(String, String, String)>,
    pub requests: Vec<RecordedRequest>,
    /// Products whose question list answers 500.
    pub broken_question_lists: Vec<String>,
    pub reject_orders: bool,
    pub refresh_enabled: bool,
    pub refreshes: usize,
    token_generation: usize,
    id_counter: usize,
}

impl MockState {
    fn current_token(&self) -> String {
        format!("token-{}", self.token_generation)
    }

    fn next_id(&mut self, prefix: &str) -> String {
        self.id_counter += 1;
        format!("{prefix}-{}", self.id_counter)
    }
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            products: seed_products(),
            questions: seed_questions(),
            banners: vec![json!({ "_id": "b-1", "imageUrl": "https://cdn.threadline.pk/banners/eid.jpg" })],
            orders: seed_orders(),
            placed_orders: Vec::new(),
            saved_products: Vec::new(),
            uploads: Vec::new(),
            requests: Vec::new(),
            broken_question_lists: Vec::new(),
            reject_orders: false,
            refresh_enabled: true,
            refreshes: 0,
            token_generation: 1,
            id_counter: 100,
        }
    }
}

type Shared = Arc<Mutex<MockState>>;

/// A running mock backend. The server stops when the test's runtime ends.
#[derive(Debug, Clone)]
pub struct MockBackend {
    base_url: Url,
    state: Shared,
}

impl MockBackend {
    /// Bind an ephemeral port and start serving.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub async fn start() -> Self {
        let state: Shared = Arc::new(Mutex::new(MockState::default()));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .unwrap_or_else(|e| panic!("failed to bind mock backend: {e}"));
        let addr = listener
            .local_addr()
            .unwrap_or_else(|e| panic!("mock backend has no address: {e}"));

        let app = router(state.clone());
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        let base_url = Url::parse(&format!("http://{addr}/api/v1/"))
            .unwrap_or_else(|e| panic!("invalid mock url: {e}"));
        Self { base_url, state }
    }

    /// API root, ending in `/`.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Lock the state for inspection or setup.
    ///
    /// # Panics
    ///
    /// Panics if a handler panicked while holding the lock.
    pub fn state(&self) -> MutexGuard<'_, MockState> {
        lock(&self.state)
    }

    /// Invalidate the current access token.
    pub fn expire_token(&self) {
        self.state().token_generation += 1;
    }

    /// The token write endpoints currently accept.
    #[must_use]
    pub fn current_token(&self) -> String {
        self.state().current_token()
    }

    /// Requests received so far whose path ends with `suffix`.
    #[must_use]
    pub fn requests_to(&self, suffix: &str) -> Vec<RecordedRequest> {
        self.state()
            .requests
            .iter()
            .filter(|r| r.path.ends_with(suffix))
            .cloned()
            .collect()
    }
}

fn lock(state: &Shared) -> MutexGuard<'_, MockState> {
    state
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}

fn router(state: Shared) -> Router {
    let api = Router::new()
        .route("/products", get(list_products))
        .route(
            "/products/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/products/featured/{id}", put(set_featured))
        .route("/add-product", post(add_product))
        .route("/upload-images", post(upload_images))
        .route("/create-order", post(create_order))
        .route("/qa/product/{id}", get(list_questions))
        .route("/qa/product/{id}/question", post(ask_question))
        .route("/qa/question/{id}", delete(delete_question))
        .route("/qa/question/{id}/answer", post(answer_question))
        .route("/qa/question/{id}/answer/{answer_id}", delete(delete_answer))
        .route("/banners", get(list_banners).post(upload_banner))
        .route("/banners/{id}", delete(delete_banner))
        .route("/orders", get(list_orders))
        .route("/orders/{id}/status", put(update_order_status))
        .route("/login", post(login))
        .route("/auth/refresh-token", post(refresh_token));

    Router::new()
        .nest("/api/v1", api)
        .layer(middleware::from_fn_with_state(state.clone(), record))
        .with_state(state)
}

async fn record(State(state): State<Shared>, request: Request, next: Next) -> Response {
    let bearer = bearer(request.headers());
    lock(&state).requests.push(RecordedRequest {
        method: request.method().clone(),
        path: request.uri().path().to_owned(),
        bearer,
    });
    next.run(request).await
}

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::to_owned)
}

fn message(status: StatusCode, text: &str) -> Response {
    (status, Json(json!({ "message": text }))).into_response()
}

/// 401 unless the request carries the current token.
fn authorize(state: &MockState, headers: &HeaderMap) -> Result<(), Response> {
    if bearer(headers).as_deref() == Some(state.current_token().as_str()) {
        Ok(())
    } else {
        Err(message(StatusCode::UNAUTHORIZED, "Token expired"))
    }
}

// =============================================================================
// Catalog
// =============================================================================

async fn list_products(State(state): State<Shared>) -> Json<Value> {
    Json(json!({ "products": lock(&state).products }))
}

async fn get_product(State(state): State<Shared>, Path(id): Path<String>) -> Response {
    let state = lock(&state);
    state
        .products
        .iter()
        .find(|p| p["_id"] == id.as_str())
        .map_or_else(
            || message(StatusCode::NOT_FOUND, "Product not found"),
            |p| Json(json!({ "product": p })).into_response(),
        )
}

async fn add_product(State(state): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    let mut state = lock(&state);
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }
    let id = state.next_id("p");
    let mut product = body.clone();
    product["_id"] = json!(id);
    state.products.push(product.clone());
    state.saved_products.push(body);
    (StatusCode::CREATED, Json(json!({ "message": "Product added", "product": product }))).into_response()
}

async fn update_product(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let mut state = lock(&state);
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }
    let Some(index) = state.products.iter().position(|p| p["_id"] == id.as_str()) else {
        return message(StatusCode::NOT_FOUND, "Product not found");
    };
    let mut product = body.clone();
    product["_id"] = json!(id);
    if let Some(slot) = state.products.get_mut(index) {
        *slot = product;
    }
    state.saved_products.push(body);
    message(StatusCode::OK, "Product updated")
}

async fn delete_product(State(state): State<Shared>, headers: HeaderMap, Path(id): Path<String>) -> Response {
    let mut state = lock(&state);
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }
    let before = state.products.len();
    state.products.retain(|p| p["_id"] != id.as_str());
    if state.products.len() == before {
        message(StatusCode::NOT_FOUND, "Product not found")
    } else {
        message(StatusCode::OK, "Product deleted")
    }
}

async fn set_featured(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let mut state = lock(&state);
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }
    let Some(product) = state.products.iter_mut().find(|p| p["_id"] == id.as_str()) else {
        return message(StatusCode::NOT_FOUND, "Product not found");
    };
    product["isFeatured"] = body["isFeatured"].clone();
    Json(json!({ "product": product })).into_response()
}

async fn upload_images(State(state): State<Shared>, headers: HeaderMap, multipart: Multipart) -> Response {
    if let Err(denied) = authorize(&lock(&state), &headers) {
        return denied;
    }
    match read_parts(multipart).await {
        Ok(parts) => {
            let urls: Vec<String> = parts
                .iter()
                .map(|(_, name, _)| format!("https://cdn.threadline.pk/uploads/{name}"))
                .collect();
            lock(&state).uploads.extend(parts);
            Json(json!(urls)).into_response()
        }
        Err(response) => response,
    }
}

async fn read_parts(mut multipart: Multipart) -> Result<Vec<(String, String, String)>, Response> {
    let mut parts = Vec::new();
    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                let name = field.name().unwrap_or_default().to_owned();
                let file = field.file_name().unwrap_or_default().to_owned();
                let mime = field.content_type().unwrap_or_default().to_owned();
                if field.bytes().await.is_err() {
                    return Err(message(StatusCode::BAD_REQUEST, "Unreadable upload"));
                }
                parts.push((name, file, mime));
            }
            Ok(None) => return Ok(parts),
            Err(_) => return Err(message(StatusCode::BAD_REQUEST, "Malformed upload")),
        }
    }
}

// =============================================================================
// Orders
// =============================================================================

async fn create_order(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut state = lock(&state);
    if state.reject_orders {
        return message(StatusCode::BAD_REQUEST, "Some items are out of stock");
    }
    let id = state.next_id("o");
    state.placed_orders.push(body);
    (
        StatusCode::CREATED,
        Json(json!({ "message": "Order placed successfully", "order": { "_id": id } })),
    )
        .into_response()
}

async fn list_orders(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let state = lock(&state);
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }
    Json(json!({ "orders": state.orders })).into_response()
}

async fn update_order_status(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let mut state = lock(&state);
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }
    let Some(order) = state.orders.iter_mut().find(|o| o["_id"] == id.as_str()) else {
        return message(StatusCode::NOT_FOUND, "Order not found");
    };
    order["status"] = body["status"].clone();
    Json(json!({ "order": order })).into_response()
}

// =============================================================================
// Questions
// =============================================================================

async fn list_questions(State(state): State<Shared>, Path(id): Path<String>) -> Response {
    let state = lock(&state);
    if state.broken_question_lists.contains(&id) {
        return message(StatusCode::INTERNAL_SERVER_ERROR, "Database unavailable");
    }
    let questions: Vec<&Value> = state
        .questions
        .iter()
        .filter(|(product, _)| *product == id)
        .map(|(_, q)| q)
        .collect();
    Json(json!({ "questions": questions })).into_response()
}

async fn ask_question(
    State(state): State<Shared>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let mut state = lock(&state);
    let question_id = state.next_id("q");
    let thread = json!({
        "_id": question_id,
        "question": {
            "text": body["text"],
            "askedBy": body["askedBy"],
            "createdAt": "2024-07-01T12:00:00Z"
        },
        "answers": []
    });
    state.questions.push((id, thread.clone()));
    (StatusCode::CREATED, Json(thread)).into_response()
}

async fn answer_question(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let mut state = lock(&state);
    if body["isAdmin"] == true
        && let Err(denied) = authorize(&state, &headers)
    {
        return denied;
    }
    let answer_id = state.next_id("a");
    let Some((_, thread)) = state.questions.iter_mut().find(|(_, q)| q["_id"] == id.as_str()) else {
        return message(StatusCode::NOT_FOUND, "Question not found");
    };
    let answer = json!({
        "_id": answer_id,
        "text": body["text"],
        "answeredBy": body["answeredBy"],
        "isAdmin": body["isAdmin"],
        "createdAt": "2024-07-02T09:00:00Z"
    });
    if let Some(answers) = thread["answers"].as_array_mut() {
        answers.push(answer);
    }
    (StatusCode::CREATED, Json(thread.clone())).into_response()
}

async fn delete_question(State(state): State<Shared>, headers: HeaderMap, Path(id): Path<String>) -> Response {
    let mut state = lock(&state);
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }
    state.questions.retain(|(_, q)| q["_id"] != id.as_str());
    message(StatusCode::OK, "Question deleted")
}

async fn delete_answer(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path((id, answer_id)): Path<(String, String)>,
) -> Response {
    let mut state = lock(&state);
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }
    let Some((_, thread)) = state.questions.iter_mut().find(|(_, q)| q["_id"] == id.as_str()) else {
        return message(StatusCode::NOT_FOUND, "Question not found");
    };
    if let Some(answers) = thread["answers"].as_array_mut() {
        answers.retain(|a| a["_id"] != answer_id.as_str());
    }
    message(StatusCode::OK, "Answer deleted")
}

// =============================================================================
// Banners
// =============================================================================

async fn list_banners(State(state): State<Shared>) -> Json<Value> {
    Json(json!(lock(&state).banners))
}

async fn upload_banner(State(state): State<Shared>, headers: HeaderMap, multipart: Multipart) -> Response {
    if let Err(denied) = authorize(&lock(&state), &headers) {
        return denied;
    }
    let parts = match read_parts(multipart).await {
        Ok(parts) => parts,
        Err(response) => return response,
    };
    let mut state = lock(&state);
    for (_, file, _) in &parts {
        let id = state.next_id("b");
        state.banners.push(json!({
            "_id": id,
            "imageUrl": format!("https://cdn.threadline.pk/banners/{file}")
        }));
    }
    state.uploads.extend(parts);
    message(StatusCode::CREATED, "Banner uploaded")
}

async fn delete_banner(State(state): State<Shared>, headers: HeaderMap, Path(id): Path<String>) -> Response {
    let mut state = lock(&state);
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }
    state.banners.retain(|b| b["_id"] != id.as_str());
    message(StatusCode::OK, "Banner deleted")
}

// =============================================================================
// Auth
// =============================================================================

async fn login(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let state = lock(&state);
    if body["email"] != ADMIN_EMAIL || body["password"] != ADMIN_PASSWORD {
        return message(StatusCode::UNAUTHORIZED, "Invalid credentials");
    }
    (
        [(header::SET_COOKIE, "refreshToken=r-1; Path=/; HttpOnly")],
        Json(json!({
            "token": state.current_token(),
            "user": { "_id": "u-1", "email": ADMIN_EMAIL, "name": "Hina", "role": "admin" }
        })),
    )
        .into_response()
}

async fn refresh_token(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let mut state = lock(&state);
    let has_cookie = headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("refreshToken="));
    if !state.refresh_enabled || !has_cookie {
        return message(StatusCode::UNAUTHORIZED, "Refresh token invalid");
    }
    state.refreshes += 1;
    Json(json!({ "token": state.current_token() })).into_response()
}

// =============================================================================
// Seed data
// =============================================================================

fn seed_products() -> Vec<Value> {
    vec![
        json!({
            "_id": "p-lawn",
            "name": "Printed Lawn Suit",
            "description": "Three-piece summer lawn with chiffon dupatta.",
            "price": 4500,
            "category": "Women",
            "sizes": ["S", "M", "L"],
            "colors": ["Mint", "Peach"],
            "images": ["https://cdn.threadline.pk/p/lawn-1.jpg"],
            "isFeatured": true
        }),
        json!({
            "_id": "p-kurta",
            "name": "Khaddar Kurta",
            "description": "Hand-woven winter kurta.",
            "price": 3200.5,
            "category": "Men",
            "sizes": ["M", "L", "XL"],
            "color": "Indigo",
            "images": []
        }),
        json!({
            "_id": 7,
            "name": "Kids Polo",
            "price": 1200,
            "category": "Kids",
            "sizes": ["S"]
        }),
    ]
}

fn seed_questions() -> Vec<(String, Value)> {
    vec![
        (
            "p-lawn".to_owned(),
            json!({
                "_id": "q-1",
                "question": { "text": "Is the dupatta included?", "askedBy": "Maryam", "createdAt": "2024-06-01T08:00:00Z" },
                "answers": [{
                    "_id": "a-1",
                    "text": "Yes, a chiffon dupatta is included.",
                    "answeredBy": "Store Admin",
                    "isAdmin": true,
                    "createdAt": "2024-06-01T10:00:00Z"
                }]
            }),
        ),
        (
            "p-kurta".to_owned(),
            json!({
                "_id": "q-2",
                "question": { "text": "Does it run small?", "askedBy": "Bilal", "createdAt": "2024-06-03T08:00:00Z" },
                "answers": []
            }),
        ),
    ]
}

fn seed_orders() -> Vec<Value> {
    vec![
        json!({
            "_id": "o-1",
            "customerInfo": { "firstName": "Ayesha", "lastName": "Khan", "email": "ayesha@example.pk", "phoneNumber": "03001234567" },
            "paymentMethod": "Cash on Delivery",
            "orderItems": [{ "product": "p-lawn", "size": "M" }],
            "totalAmount": 4500,
            "status": "Processing",
            "createdAt": "2024-06-10T10:00:00Z"
        }),
        json!({
            "_id": "o-2",
            "customerInfo": { "firstName": "Omar", "lastName": "Farooq", "email": "omar@example.pk", "phoneNumber": "03211234567" },
            "paymentMethod": "Cash on Delivery",
            "orderItems": [{ "product": "p-kurta", "size": "L" }, { "product": "7", "size": "S" }],
            "totalAmount": 4400.5,
            "status": "Shipped",
            "createdAt": "2024-06-12T10:00:00Z"
        }),
    ]
}
