use axum::extract::{Json, Path};
use axum::http::StatusCode;

use contracts::dashboards::d100_kpi_summary::AllocationPreview;
use contracts::domain::a004_target_allocation::AllocationSaveRequest;

use crate::domain::a004_target_allocation::service;
use crate::shared::kpi::allocation::AllocationInvalid;

/// GET /api/target_allocation/:month — shares plus resolved preview
/// amounts; months without rows fall back to the equal split
pub async fn get_by_month(
    Path(month): Path<String>,
) -> Result<Json<AllocationPreview>, StatusCode> {
    match service::get_preview(&month).await {
        Ok(preview) => Ok(Json(preview)),
        Err(e) => {
            tracing::error!("Failed to resolve allocation for {}: {}", month, e);
            Err(super::error_status(&e))
        }
    }
}

/// POST /api/target_allocation (leader route). A share set that does not
/// sum to 100% is refused with 422 and an inline message; nothing is
/// persisted in that case.
pub async fn save(
    Json(request): Json<AllocationSaveRequest>,
) -> Result<Json<AllocationPreview>, (StatusCode, String)> {
    let month = request.month.clone();
    match service::save(request).await {
        Ok(preview) => {
            tracing::info!("Allocation for {} saved", month);
            Ok(Json(preview))
        }
        Err(e) => {
            if let Some(invalid) = e.downcast_ref::<AllocationInvalid>() {
                tracing::warn!("Allocation save refused: {}", invalid);
                return Err((StatusCode::UNPROCESSABLE_ENTITY, invalid.to_string()));
            }
            tracing::error!("Failed to save allocation for {}: {}", month, e);
            Err((super::error_status(&e), e.to_string()))
        }
    }
}
