use crate::persist::SaveFile;
use crate::store::{CreateTaskRequest, Task, TaskStatus, TaskStore};
use axum::{
    extract::{Path, State},
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};
use tower_http::cors::CorsLayer;
use uuid::Uuid;

// ── Shared state ───────────────────────────────────────────────

pub struct AppState {
    pub store: RwLock<TaskStore>,
    pub save_file: SaveFile,
}

pub type SharedState = Arc<AppState>;

// ── Errors ─────────────────────────────────────────────────────

/// JSON error body: `message` is safe for users, `error` carries the
/// underlying detail on persistence failures.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub struct ApiError {
    status: StatusCode,
    message: String,
    detail: Option<String>,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        ApiError {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
            detail: None,
        }
    }

    fn not_found(message: impl Into<String>) -> Self {
        ApiError {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
            detail: None,
        }
    }

    fn internal(message: impl Into<String>, err: impl std::fmt::Display) -> Self {
        let message = message.into();
        let detail = err.to_string();
        tracing::error!(%message, %detail, "request failed");
        ApiError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message,
            detail: Some(detail),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            message: self.message,
            error: self.detail,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<crate::store::StoreError> for ApiError {
    fn from(err: crate::store::StoreError) -> Self {
        use crate::store::StoreError;
        match err {
            StoreError::MissingFields => ApiError::bad_request(err.to_string()),
            StoreError::TaskNotFound => ApiError::not_found(err.to_string()),
        }
    }
}

// ── Router ─────────────────────────────────────────────────────

/// Build the application router. `client_origin` is the single origin the
/// CORS layer admits.
pub fn router(state: SharedState, client_origin: &str) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(
            client_origin
                .parse::<HeaderValue>()
                .expect("client origin must be a valid header value"),
        )
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/api/tasks", get(list_tasks).post(create_task))
        .route(
            "/api/tasks/:id",
            put(update_task_status).delete(delete_task),
        )
        .route("/api/health", get(health))
        .with_state(state)
        .layer(cors)
}

// ── Handlers ───────────────────────────────────────────────────

// GET /api/health
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

// GET /api/tasks
async fn list_tasks(State(state): State<SharedState>) -> Result<Json<Vec<Task>>, ApiError> {
    let store = state.store.read().unwrap();
    Ok(Json(store.list_sorted()))
}

// POST /api/tasks
async fn create_task(
    State(state): State<SharedState>,
    Json(payload): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let task = state.store.write().unwrap().create(payload)?;

    state
        .save_file
        .save_task(&task)
        .map_err(|e| ApiError::internal("Failed to create task", e))?;

    tracing::info!(id = %task.id, "task created");
    Ok((StatusCode::CREATED, Json(task)))
}

/// The status arrives as free text so anything outside the known set can be
/// answered with a 400; every other field in the body is ignored.
#[derive(Debug, Deserialize)]
struct UpdateStatusRequest {
    #[serde(default)]
    status: Option<String>,
}

// PUT /api/tasks/:id
async fn update_task_status(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<Json<Task>, ApiError> {
    let status = payload
        .status
        .as_deref()
        .and_then(TaskStatus::parse)
        .ok_or_else(|| ApiError::bad_request("Invalid status value."))?;

    let task = state.store.write().unwrap().update_status(id, status)?;

    state
        .save_file
        .save_task(&task)
        .map_err(|e| ApiError::internal("Failed to update task", e))?;

    tracing::info!(id = %task.id, %status, "task status updated");
    Ok(Json(task))
}

// DELETE /api/tasks/:id
async fn delete_task(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.store.write().unwrap().remove(id)?;

    state
        .save_file
        .remove_task(id)
        .map_err(|e| ApiError::internal("Failed to delete task", e))?;

    tracing::info!(%id, "task deleted");
    Ok(StatusCode::NO_CONTENT)
}
