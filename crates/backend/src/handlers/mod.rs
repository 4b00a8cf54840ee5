pub mod a001_member;
pub mod a002_report;
pub mod a003_team_target;
pub mod a004_target_allocation;
pub mod d100_kpi_summary;

use axum::http::StatusCode;

/// Map a service error onto an HTTP status by its message. Services raise
/// plain anyhow errors; the few categories handlers care about are encoded
/// in the message prefix.
pub(crate) fn error_status(e: &anyhow::Error) -> StatusCode {
    let msg = e.to_string();
    if msg.contains("Permission denied") {
        StatusCode::FORBIDDEN
    } else if msg.contains("Old PIN incorrect") {
        StatusCode::UNAUTHORIZED
    } else if msg.contains("not found") || msg.contains("Not found") {
        StatusCode::NOT_FOUND
    } else if msg.contains("Validation failed") || msg.contains("Invalid") {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}
