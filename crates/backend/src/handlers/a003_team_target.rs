use axum::extract::{Json, Path};
use axum::http::StatusCode;

use contracts::domain::a003_team_target::{TeamTarget, TeamTargetDto};

use crate::domain::a003_team_target::service;
use crate::system::auth::extractor::CurrentSession;

/// GET /api/team_target
pub async fn list_all() -> Result<Json<Vec<TeamTarget>>, StatusCode> {
    match service::list_all().await {
        Ok(targets) => Ok(Json(targets)),
        Err(e) => {
            tracing::error!("Failed to list team targets: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// GET /api/team_target/:month — zero-valued default when the month is not
/// configured yet
pub async fn get_by_month(Path(month): Path<String>) -> Result<Json<TeamTarget>, StatusCode> {
    match service::get_or_default(&month).await {
        Ok(target) => Ok(Json(target)),
        Err(e) => {
            tracing::error!("Failed to get team target for {}: {}", month, e);
            Err(super::error_status(&e))
        }
    }
}

/// POST /api/team_target (leader only)
pub async fn upsert(
    CurrentSession(session): CurrentSession,
    Json(dto): Json<TeamTargetDto>,
) -> Result<Json<TeamTarget>, StatusCode> {
    if !session.is_leader() {
        return Err(StatusCode::FORBIDDEN);
    }

    let month = dto.month.clone();
    match service::upsert(dto).await {
        Ok(target) => {
            tracing::info!("Team target for {} saved", month);
            Ok(Json(target))
        }
        Err(e) => {
            tracing::error!("Failed to save team target for {}: {}", month, e);
            Err(super::error_status(&e))
        }
    }
}
