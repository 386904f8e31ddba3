use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use permalink::{normalize_segment, PathBuilder, PathError, PathOptionsPatch, Record};
use serde::Deserialize;
use serde_json::{json, Value};

use super::AppState;
use crate::backend::{parse_id, BackendError};

/// Build the application router with all API routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/permalink", post(generate))
        .route("/permalink/{id}", get(generate_for_id))
        .route("/slug", post(slug))
        .with_state(state);

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
}

/// JSON error body: `{"error": code, "message": text}`.
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(json!({ "error": self.code, "message": self.message })),
        )
            .into_response()
    }
}

impl From<PathError<BackendError>> for ApiError {
    fn from(err: PathError<BackendError>) -> Self {
        let message = err.to_string();
        match err {
            PathError::CycleDetected { .. } => {
                ApiError::new(StatusCode::UNPROCESSABLE_ENTITY, "cycle_detected", message)
            }
            PathError::Resolution(_) => {
                ApiError::new(StatusCode::BAD_GATEWAY, "resolution_failed", message)
            }
            PathError::Cancelled => {
                ApiError::new(StatusCode::SERVICE_UNAVAILABLE, "cancelled", message)
            }
        }
    }
}

#[derive(Deserialize)]
pub struct GenerateRequest {
    record: Value,
    #[serde(default)]
    options: Option<PathOptionsPatch>,
}

#[derive(Deserialize)]
pub struct SlugRequest {
    text: String,
}

/// GET /health
async fn health() -> Json<Value> {
    Json(json!({ "ok": true }))
}

/// POST /api/permalink — generate for a possibly unsaved record
async fn generate(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<Value>, ApiError> {
    let record = Record::from_draft(req.record, &state.id_field)
        .map_err(|e| ApiError::new(StatusCode::BAD_REQUEST, "invalid_record", e.to_string()))?;

    let builder = match req.options {
        Some(patch) => PathBuilder::new(patch.apply(state.builder.options().clone())),
        None => state.builder.clone(),
    };

    let permalink = builder
        .build_with_cancel(&record, &state.backend, &state.shutdown)
        .await?;
    Ok(Json(json!({ "permalink": permalink })))
}

/// GET /api/permalink/:id — generate for a stored record
async fn generate_for_id(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&id);
    let record = state
        .backend
        .fetch(&id)
        .await
        .map_err(|e| ApiError::new(StatusCode::BAD_GATEWAY, "resolution_failed", e.to_string()))?
        .ok_or_else(|| {
            ApiError::new(StatusCode::NOT_FOUND, "not_found", format!("record {id} not found"))
        })?;

    let permalink = state
        .builder
        .build_with_cancel(&record, &state.backend, &state.shutdown)
        .await?;
    Ok(Json(json!({ "id": id, "permalink": permalink })))
}

/// POST /api/slug
async fn slug(Json(req): Json<SlugRequest>) -> Json<Value> {
    Json(json!({ "slug": normalize_segment(&req.text) }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use permalink::{CancellationToken, MemoryStore, PathOptions};
    use tower::ServiceExt;

    use crate::backend::Backend;

    fn page(id: i64, title: &str, parent: Option<i64>) -> Record {
        Record::new(id)
            .with_field("title", title)
            .with_field("parent", parent.map_or(Value::Null, Value::from))
    }

    fn test_state() -> Arc<AppState> {
        let store = MemoryStore::with_records(
            "parent",
            [
                page(1, "Home", None),
                page(2, "About", Some(1)),
                page(3, "", Some(2)),
                page(4, "Team", Some(3)),
                page(5, "Loop", Some(5)),
                page(6, "Orphan", Some(99)),
            ],
        );
        Arc::new(AppState {
            backend: Backend::Memory(store),
            builder: PathBuilder::new(PathOptions::default()),
            id_field: "id".into(),
            shutdown: CancellationToken::new(),
        })
    }

    fn post(url: &str, body: &Value) -> Request<Body> {
        Request::post(url)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(body).expect("serialize JSON body")))
            .expect("build POST request")
    }

    async fn send(state: Arc<AppState>, req: Request<Body>) -> (StatusCode, Value) {
        let resp = build_router(state).oneshot(req).await.unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let req = Request::get("/health").body(Body::empty()).unwrap();
        let (status, json) = send(test_state(), req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["ok"], true);
    }

    #[tokio::test]
    async fn test_generate_for_stored_record() {
        let req = Request::get("/api/permalink/4").body(Body::empty()).unwrap();
        let (status, json) = send(test_state(), req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, json!({"id": 4, "permalink": "/home/about/team"}));
    }

    #[tokio::test]
    async fn test_generate_unknown_id() {
        let req = Request::get("/api/permalink/404").body(Body::empty()).unwrap();
        let (status, json) = send(test_state(), req).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "not_found");
    }

    #[tokio::test]
    async fn test_generate_draft_with_options() {
        let body = json!({
            "record": {"title": "Our Mission", "parent": 2},
            "options": {"slashAtStart": false}
        });
        let (status, json) = send(test_state(), post("/api/permalink", &body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["permalink"], "home/about/our-mission");
    }

    #[tokio::test]
    async fn test_generate_untitled_root_placeholder() {
        let body = json!({"record": {"title": ""}, "options": {"placeholder": "Pending"}});
        let (status, json) = send(test_state(), post("/api/permalink", &body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["permalink"], "Pending");
    }

    #[tokio::test]
    async fn test_cycle_is_unprocessable() {
        let req = Request::get("/api/permalink/5").body(Body::empty()).unwrap();
        let (status, json) = send(test_state(), req).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["error"], "cycle_detected");
    }

    #[tokio::test]
    async fn test_draft_parented_to_itself_is_unprocessable() {
        let body = json!({"record": {"id": "1", "title": "Home", "parent": 1}});
        let (status, json) = send(test_state(), post("/api/permalink", &body)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["error"], "cycle_detected");
    }

    #[tokio::test]
    async fn test_missing_parent_is_bad_gateway() {
        let req = Request::get("/api/permalink/6").body(Body::empty()).unwrap();
        let (status, json) = send(test_state(), req).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(json["error"], "resolution_failed");
        assert!(json["message"].as_str().unwrap().contains("missing parent 99"));
    }

    #[tokio::test]
    async fn test_non_object_record_is_rejected() {
        let body = json!({"record": ["not", "an", "object"]});
        let (status, json) = send(test_state(), post("/api/permalink", &body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "invalid_record");
    }

    #[tokio::test]
    async fn test_shutdown_cancels_builds() {
        let state = test_state();
        state.shutdown.cancel();
        let req = Request::get("/api/permalink/2").body(Body::empty()).unwrap();
        let (status, json) = send(state, req).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(json["error"], "cancelled");
    }

    #[tokio::test]
    async fn test_slug() {
        let body = json!({"text": "  Hello, World!  "});
        let (status, json) = send(test_state(), post("/api/slug", &body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, json!({"slug": "hello-world"}));
    }
}
