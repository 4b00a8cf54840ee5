use axum::extract::{Json, Path};
use axum::http::StatusCode;
use contracts::domain::a001_member::{MemberDto, MemberInfo};
use contracts::system::auth::ChangePinRequest;

use crate::domain::a001_member::service;
use crate::system::auth::extractor::CurrentSession;

/// GET /api/member
pub async fn list_all() -> Result<Json<Vec<MemberInfo>>, StatusCode> {
    match service::list_info().await {
        Ok(members) => Ok(Json(members)),
        Err(e) => {
            tracing::error!("Failed to list members: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// POST /api/member (leader only)
pub async fn create(
    CurrentSession(session): CurrentSession,
    Json(dto): Json<MemberDto>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    if !session.is_leader() {
        return Err(StatusCode::FORBIDDEN);
    }

    match service::create(dto).await {
        Ok(id) => Ok(Json(serde_json::json!({ "id": id.to_string() }))),
        Err(e) => {
            tracing::error!("Failed to create member: {}", e);
            Err(super::error_status(&e))
        }
    }
}

/// PUT /api/member/:id/pin
pub async fn change_pin(
    CurrentSession(session): CurrentSession,
    Path(id): Path<String>,
    Json(request): Json<ChangePinRequest>,
) -> Result<StatusCode, StatusCode> {
    match service::change_pin(&session, &id, &request.old_pin, &request.new_pin).await {
        Ok(()) => Ok(StatusCode::OK),
        Err(e) => {
            tracing::warn!("PIN change refused for member {}: {}", id, e);
            Err(super::error_status(&e))
        }
    }
}
