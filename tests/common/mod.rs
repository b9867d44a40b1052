// In-process mock portal shared by the integration tests.
//
// Serves the subset of the portal REST API the workflows consume, backed by
// a mutable in-memory state the tests seed and inspect. Each test spawns
// its own instance on an ephemeral port so state never leaks between tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::{Context, Result};
use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, patch, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Map, Value};

pub const STAFF_EMAIL: &str = "staff@portal.test";
pub const STAFF_PASSWORD: &str = "hunter22";
pub const ACCOUNT_ID: &str = "acct-1";

#[derive(Default)]
pub struct PortalState {
    /// IC -> registered owner name
    pub owners: HashMap<String, String>,
    pub active: Vec<Value>,
    pub soft_deleted: Vec<Value>,
    pub notifications: Vec<Value>,
    /// Emails still free for account creation
    pub staff_emails: Vec<String>,
    /// email -> directory entry
    pub staff: HashMap<String, Value>,
    /// When set, `/check-conflict` answers with a soft-delete conflict
    pub conflict_message: Option<String>,
    pub verify_valid: bool,
    pub fail_recovery: bool,
    // Recorded requests, inspected by tests
    pub conflict_checks: Vec<Map<String, Value>>,
    pub edits: Vec<Map<String, Value>>,
    pub recoveries: Vec<Value>,
    pub uploads: Vec<Map<String, Value>>,
    pub created_users: Vec<Map<String, Value>>,
}

pub struct TestPortal {
    pub base_url: String,
    state: Arc<Mutex<PortalState>>,
}

impl TestPortal {
    pub async fn spawn() -> Result<Self> {
        let state = Arc::new(Mutex::new(PortalState::default()));

        let app = Router::new()
            .route("/login", post(login))
            .route("/user", get(current_user))
            .route("/get-document", get(get_documents))
            .route("/get-soft-deleted-document", get(get_soft_deleted))
            .route("/check-ic-exist", get(check_ic_exist))
            .route("/get-owner-name", get(get_owner_name))
            .route("/check-conflict/:id", post(check_conflict))
            .route("/edit/:id", patch(edit_document))
            .route("/delete/:id", delete(delete_document))
            .route("/recover-documents", post(recover_documents))
            .route("/verify", post(verify_document))
            .route("/upload", post(upload_document))
            .route("/create-user", post(create_user))
            .route("/staff-info", get(staff_info))
            .route("/available-staff-emails", get(available_staff_emails))
            .route("/notifications/:account_id", get(list_notifications))
            .route("/notifications/:id/read", post(mark_read))
            .route("/notifications/:account_id/read-all", post(mark_all_read))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .context("failed to bind mock portal")?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            base_url: format!("http://{}", addr),
            state,
        })
    }

    pub fn state(&self) -> MutexGuard<'_, PortalState> {
        self.state.lock().expect("portal state poisoned")
    }

    pub fn add_owner(&self, ic: &str, name: &str) {
        self.state().owners.insert(ic.to_string(), name.to_string());
    }

    pub fn seed_active(&self, doc: Value) {
        self.state().active.push(doc);
    }

    pub fn seed_soft_deleted(&self, doc: Value) {
        self.state().soft_deleted.push(doc);
    }

    pub fn set_conflict(&self, message: &str) {
        self.state().conflict_message = Some(message.to_string());
    }
}

/// One document record in the portal's wire shape
pub fn document(n: u32, owner_ic: &str, owner_name: &str, doc_type: &str) -> Value {
    json!({
        "doc_record_id": n.to_string(),
        "doc_encrypted_id": format!("enc-{}", n),
        "doc_owner_name": owner_name,
        "doc_owner_ic": owner_ic,
        "document_type": doc_type,
        "issuer_id": 7,
        "issuer_name": "JPN Putrajaya",
        "issue_date": "2024-05-01",
        "verification_url": format!("https://portal.test/originals/{}.pdf", n),
        "is_deleted": false,
        "deleted_by": null,
        "deleted_by_name": null,
        "deleted_at": null,
    })
}

pub fn notification(id: &str, message: &str, created_at: &str, has_read: bool) -> Value {
    json!({
        "notification_id": id,
        "message": message,
        "created_at": created_at,
        "has_read": has_read,
    })
}

type Shared = Arc<Mutex<PortalState>>;

fn error_body(status: StatusCode, detail: &str) -> Response {
    (status, Json(json!({ "detail": detail }))).into_response()
}

async fn login(mut multipart: Multipart) -> Response {
    let mut fields = HashMap::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        let value = field.text().await.unwrap_or_default();
        fields.insert(name, value);
    }

    let email = fields.get("email").map(String::as_str);
    let password = fields.get("password").map(String::as_str);
    if email == Some(STAFF_EMAIL) && password == Some(STAFF_PASSWORD) {
        Json(json!({ "message": "Login successful" })).into_response()
    } else {
        error_body(StatusCode::UNAUTHORIZED, "Invalid email or password")
    }
}

async fn current_user() -> Json<Value> {
    Json(json!({
        "id": ACCOUNT_ID,
        "email": STAFF_EMAIL,
        "account_holder_name": "Test Staff",
        "is_super": true,
        "profile_picture": null,
    }))
}

#[derive(Deserialize)]
struct ListingQuery {
    owner_ic: String,
    #[serde(default)]
    doc_type: String,
    page: u64,
    limit: u64,
}

fn page_of(records: &[Value], query: &ListingQuery) -> Json<Value> {
    let matching: Vec<&Value> = records
        .iter()
        .filter(|d| d["doc_owner_ic"].as_str() == Some(query.owner_ic.as_str()))
        .filter(|d| {
            query.doc_type.is_empty() || d["document_type"].as_str() == Some(query.doc_type.as_str())
        })
        .collect();

    let total = matching.len() as u64;
    let start = (query.page * query.limit) as usize;
    let documents: Vec<&Value> = matching
        .into_iter()
        .skip(start)
        .take(query.limit as usize)
        .collect();

    Json(json!({ "documents": documents, "total": total }))
}

async fn get_documents(State(state): State<Shared>, Query(query): Query<ListingQuery>) -> Json<Value> {
    let state = state.lock().unwrap();
    page_of(&state.active, &query)
}

async fn get_soft_deleted(
    State(state): State<Shared>,
    Query(query): Query<ListingQuery>,
) -> Json<Value> {
    let state = state.lock().unwrap();
    page_of(&state.soft_deleted, &query)
}

#[derive(Deserialize)]
struct OwnerQuery {
    doc_owner_ic: String,
}

async fn check_ic_exist(State(state): State<Shared>, Query(query): Query<OwnerQuery>) -> Response {
    let state = state.lock().unwrap();
    match state.owners.get(&query.doc_owner_ic) {
        Some(name) => Json(json!({ "name": name })).into_response(),
        None => error_body(StatusCode::NOT_FOUND, "No document owner found for this IC"),
    }
}

async fn get_owner_name(State(state): State<Shared>, Query(query): Query<OwnerQuery>) -> Json<Value> {
    let state = state.lock().unwrap();
    Json(json!({ "name": state.owners.get(&query.doc_owner_ic) }))
}

async fn check_conflict(
    State(state): State<Shared>,
    Path(_id): Path<String>,
    Json(body): Json<Map<String, Value>>,
) -> Response {
    let mut state = state.lock().unwrap();
    state.conflict_checks.push(body);

    match &state.conflict_message {
        Some(message) => (
            StatusCode::CONFLICT,
            Json(json!({ "status": "soft_deleted_conflict", "message": message })),
        )
            .into_response(),
        None => Json(json!({ "message": "No conflict" })).into_response(),
    }
}

async fn edit_document(
    State(state): State<Shared>,
    Path(_id): Path<String>,
    Json(body): Json<Map<String, Value>>,
) -> Response {
    let mut state = state.lock().unwrap();

    let override_requested = body.get("status").and_then(Value::as_str) == Some("soft_delete_conflict");
    state.edits.push(body.clone());

    if override_requested {
        // The soft-deleted occupant is gone for good
        state.conflict_message = None;
    }

    let mut accepted = body;
    accepted.remove("status");
    Json(Value::Object(accepted)).into_response()
}

#[derive(Deserialize)]
struct DeleteQuery {
    acc_id: String,
}

async fn delete_document(
    State(state): State<Shared>,
    Path(id): Path<String>,
    Query(query): Query<DeleteQuery>,
) -> Response {
    let mut state = state.lock().unwrap();
    let position = state
        .active
        .iter()
        .position(|d| d["doc_encrypted_id"].as_str() == Some(id.as_str()));

    match position {
        Some(i) => {
            let mut doc = state.active.remove(i);
            doc["is_deleted"] = Value::Bool(true);
            doc["deleted_by"] = Value::String(query.acc_id);
            doc["deleted_by_name"] = Value::String("Test Staff".to_string());
            doc["deleted_at"] = Value::String("2024-06-15T08:30:00Z".to_string());
            state.soft_deleted.push(doc);
            Json(json!({ "message": "Document deleted" })).into_response()
        }
        None => error_body(StatusCode::NOT_FOUND, "Document not found"),
    }
}

async fn recover_documents(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut state = state.lock().unwrap();
    state.recoveries.push(body.clone());

    if state.fail_recovery {
        return error_body(StatusCode::INTERNAL_SERVER_ERROR, "Recovery failed");
    }

    let ids: Vec<String> = body["encrypted_doc_ids"]
        .as_array()
        .map(|a| {
            a.iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let (recovered, remaining): (Vec<Value>, Vec<Value>) = state
        .soft_deleted
        .drain(..)
        .partition(|d| ids.iter().any(|id| d["doc_encrypted_id"].as_str() == Some(id)));
    let count = recovered.len();
    state.soft_deleted = remaining;
    state.active.extend(recovered);

    Json(json!({ "message": format!("{} document(s) recovered", count) })).into_response()
}

async fn verify_document(State(state): State<Shared>, mut multipart: Multipart) -> Response {
    let mut saw_id = false;
    let mut saw_file = false;
    while let Ok(Some(field)) = multipart.next_field().await {
        match field.name().unwrap_or_default() {
            "encrypted_doc_id" => saw_id = !field.text().await.unwrap_or_default().is_empty(),
            "file" => saw_file = !field.bytes().await.unwrap_or_default().is_empty(),
            _ => {}
        }
    }
    if !saw_id || !saw_file {
        return error_body(StatusCode::UNPROCESSABLE_ENTITY, "Missing document or file");
    }

    let state = state.lock().unwrap();
    if state.verify_valid {
        Json(json!({ "status": "valid", "message": "Document is authentic" })).into_response()
    } else {
        Json(json!({ "status": "invalid", "message": "Document does not match the original" }))
            .into_response()
    }
}

async fn upload_document(State(state): State<Shared>, mut multipart: Multipart) -> Response {
    let mut fields = Map::new();
    let mut file_size = 0usize;
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        if name == "file" {
            file_size = field.bytes().await.unwrap_or_default().len();
        } else {
            let value = field.text().await.unwrap_or_default();
            fields.insert(name, Value::String(value));
        }
    }
    if file_size == 0 {
        return error_body(StatusCode::UNPROCESSABLE_ENTITY, "No file uploaded");
    }

    let mut state = state.lock().unwrap();
    state.uploads.push(fields);
    Json(json!({ "download_url": "https://portal.test/downloads/issued.pdf" })).into_response()
}

async fn create_user(State(state): State<Shared>, mut multipart: Multipart) -> Response {
    let mut fields = Map::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        let value = field.text().await.unwrap_or_default();
        fields.insert(name, Value::String(value));
    }

    let mut state = state.lock().unwrap();
    let email = fields
        .get("email")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    if !state.staff_emails.iter().any(|e| e == &email) {
        return error_body(StatusCode::CONFLICT, "Email is not available");
    }
    state.staff_emails.retain(|e| e != &email);
    state.created_users.push(fields);
    Json(json!({ "message": "User created successfully" })).into_response()
}

#[derive(Deserialize)]
struct StaffQuery {
    email: String,
}

async fn staff_info(State(state): State<Shared>, Query(query): Query<StaffQuery>) -> Response {
    let state = state.lock().unwrap();
    match state.staff.get(&query.email) {
        Some(info) => Json(info.clone()).into_response(),
        None => error_body(StatusCode::NOT_FOUND, "No staff member found for this email"),
    }
}

#[derive(Deserialize)]
struct EmailSearchQuery {
    search: String,
}

async fn available_staff_emails(
    State(state): State<Shared>,
    Query(query): Query<EmailSearchQuery>,
) -> Json<Value> {
    let state = state.lock().unwrap();
    let emails: Vec<&String> = state
        .staff_emails
        .iter()
        .filter(|e| e.contains(&query.search))
        .collect();
    Json(json!(emails))
}

async fn list_notifications(
    State(state): State<Shared>,
    Path(_account_id): Path<String>,
) -> Json<Value> {
    let state = state.lock().unwrap();
    Json(Value::Array(state.notifications.clone()))
}

async fn mark_read(State(state): State<Shared>, Path(id): Path<String>) -> Json<Value> {
    let mut state = state.lock().unwrap();
    for n in &mut state.notifications {
        if n["notification_id"].as_str() == Some(id.as_str()) {
            n["has_read"] = Value::Bool(true);
        }
    }
    Json(json!({ "message": "Notification marked as read" }))
}

async fn mark_all_read(State(state): State<Shared>, Path(_account_id): Path<String>) -> Json<Value> {
    let mut state = state.lock().unwrap();
    for n in &mut state.notifications {
        n["has_read"] = Value::Bool(true);
    }
    Json(json!({ "message": "All notifications marked as read" }))
}
