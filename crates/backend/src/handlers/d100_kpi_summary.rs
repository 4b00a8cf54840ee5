use axum::extract::Query;
use axum::http::StatusCode;
use axum::Json;

use contracts::dashboards::d100_kpi_summary::{KpiSummaryRequest, KpiSummaryResponse};

use crate::dashboards::d100_kpi_summary::service;
use crate::shared::format::format_money_short;

/// GET /api/d100/kpi_summary?month=2025-11&member_id=...
pub async fn get_kpi_summary(
    Query(request): Query<KpiSummaryRequest>,
) -> Result<Json<KpiSummaryResponse>, StatusCode> {
    tracing::info!("D100 Dashboard: computing KPI summary for {}", request.month);

    match service::get_kpi_summary(request).await {
        Ok(response) => {
            tracing::info!(
                "D100 Dashboard: {} at {} realized, progress {:.1}%, forecast {:.1}%",
                response.period,
                format_money_short(response.team.revenue as f64),
                response.progress_percent,
                response.forecast.forecast_percent
            );
            Ok(Json(response))
        }
        Err(e) => {
            tracing::error!("D100 Dashboard: failed to compute summary: {}", e);
            Err(super::error_status(&e))
        }
    }
}
