use axum::extract::{Json, Path, Query};
use axum::http::StatusCode;
use serde::Deserialize;

use contracts::domain::a002_report::{Report, ReportDto};

use crate::domain::a002_report::service;
use crate::domain::a002_report::service::ReportListRequest;
use crate::system::auth::extractor::CurrentSession;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub member_id: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub limit: Option<u64>,
}

/// GET /api/report?member_id=..&date_from=..&date_to=..
pub async fn list(Query(query): Query<ListQuery>) -> Result<Json<Vec<Report>>, StatusCode> {
    let request = ReportListRequest {
        member_id: query.member_id,
        date_from: query.date_from,
        date_to: query.date_to,
        limit: query.limit,
    };

    match service::list(request).await {
        Ok(reports) => Ok(Json(reports)),
        Err(e) => {
            tracing::error!("Failed to list reports: {}", e);
            Err(super::error_status(&e))
        }
    }
}

/// GET /api/report/:id
pub async fn get_by_id(Path(id): Path<String>) -> Result<Json<Report>, StatusCode> {
    match service::get_by_id(&id).await {
        Ok(Some(report)) => Ok(Json(report)),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            tracing::error!("Failed to get report {}: {}", id, e);
            Err(super::error_status(&e))
        }
    }
}

/// POST /api/report
pub async fn create(
    CurrentSession(_session): CurrentSession,
    Json(dto): Json<ReportDto>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    match service::create(dto).await {
        Ok(id) => Ok(Json(serde_json::json!({ "id": id.to_string() }))),
        Err(e) => {
            tracing::error!("Failed to create report: {}", e);
            Err(super::error_status(&e))
        }
    }
}

/// PUT /api/report/:id (leader or owning member)
pub async fn update(
    CurrentSession(session): CurrentSession,
    Path(id): Path<String>,
    Json(dto): Json<ReportDto>,
) -> Result<StatusCode, StatusCode> {
    match service::update(&session, &id, dto).await {
        Ok(()) => Ok(StatusCode::OK),
        Err(e) => {
            tracing::error!("Failed to update report {}: {}", id, e);
            Err(super::error_status(&e))
        }
    }
}

/// DELETE /api/report/:id (leader only)
pub async fn delete(
    CurrentSession(session): CurrentSession,
    Path(id): Path<String>,
) -> Result<StatusCode, StatusCode> {
    if !session.is_leader() {
        return Err(StatusCode::FORBIDDEN);
    }

    match service::delete(&id).await {
        Ok(()) => Ok(StatusCode::OK),
        Err(e) => {
            tracing::error!("Failed to delete report {}: {}", id, e);
            Err(super::error_status(&e))
        }
    }
}
