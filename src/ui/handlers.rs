//! HTTP API handlers

use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::Html;
use axum::Json;
use uuid::Uuid;

use crate::ui::server::AppState;

/// API response wrapper
#[derive(serde::Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}

/// Landing page: start a new meeting or join by id
pub async fn index() -> Html<&'static str> {
    Html(include_str!("../../static/index.html"))
}

/// Session page; the id in the path is read by the page script, so any id
/// yields the same document
pub async fn session_page(Path(_id): Path<String>) -> Html<&'static str> {
    Html(include_str!("../../static/session.html"))
}

/// A freshly minted session
#[derive(serde::Serialize)]
pub struct NewSession {
    pub id: String,
}

/// Mint an opaque session id for a shareable `/session/<id>` link
pub async fn create_session() -> Json<ApiResponse<NewSession>> {
    let id = Uuid::new_v4().to_string();
    tracing::debug!(session = %id, "session created");
    Json(ApiResponse::ok(NewSession { id }))
}

/// System status
#[derive(serde::Serialize)]
pub struct SystemStatus {
    pub version: String,
    pub uptime_seconds: u64,
    pub active_sessions: usize,
}

/// Get system status
pub async fn get_status(State(state): State<Arc<AppState>>) -> Json<ApiResponse<SystemStatus>> {
    let status = SystemStatus {
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        active_sessions: state.active_sessions.load(Ordering::Relaxed),
    };
    Json(ApiResponse::ok(status))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_response_carries_data_or_error() {
        let ok = ApiResponse::ok(7);
        assert!(ok.success);
        assert_eq!(ok.data, Some(7));
        assert!(ok.error.is_none());

        let err: ApiResponse<()> = ApiResponse::error("bad request");
        assert!(!err.success);
        assert!(err.data.is_none());
        assert_eq!(err.error.as_deref(), Some("bad request"));
    }
}
