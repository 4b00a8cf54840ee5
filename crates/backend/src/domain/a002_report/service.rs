use chrono::NaiveDate;
use contracts::domain::a002_report::{parse_report_date, Report, ReportDto, ReportId};
use contracts::domain::common::AggregateId;
use contracts::system::auth::SessionClaims;
use uuid::Uuid;

use super::repository;
use super::repository::ReportListQuery;

/// Query parameters accepted by the list endpoint; dates arrive as strings
/// and are validated here before touching the repository.
#[derive(Debug, Clone, Default)]
pub struct ReportListRequest {
    pub member_id: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub limit: Option<u64>,
}

fn parse_optional_date(value: &Option<String>) -> anyhow::Result<Option<NaiveDate>> {
    match value {
        Some(s) if !s.trim().is_empty() => {
            let date = parse_report_date(s).map_err(|e| anyhow::anyhow!(e))?;
            Ok(Some(date))
        }
        _ => Ok(None),
    }
}

pub async fn list(request: ReportListRequest) -> anyhow::Result<Vec<Report>> {
    let query = ReportListQuery {
        member_id: request.member_id,
        date_from: parse_optional_date(&request.date_from)?,
        date_to: parse_optional_date(&request.date_to)?,
        limit: request.limit,
    };

    let db = crate::shared::data::db::get_connection();
    let reports = repository::list(db, &query).await?;
    Ok(reports)
}

pub async fn get_by_id(id: &str) -> anyhow::Result<Option<Report>> {
    let report_id = ReportId::from_string(id).map_err(|e| anyhow::anyhow!(e))?;

    let db = crate::shared::data::db::get_connection();
    let report = repository::find_by_id(db, &report_id).await?;
    Ok(report)
}

/// Create a report. Any authenticated member may file reports; the DTO
/// parse step is the strict ingest boundary for dates and counters.
pub async fn create(dto: ReportDto) -> anyhow::Result<Uuid> {
    let report = dto
        .parse()
        .map_err(|e| anyhow::anyhow!("Validation failed: {}", e))?;

    let id = report.id.0;

    let db = crate::shared::data::db::get_connection();
    repository::insert(db, &report).await?;

    Ok(id)
}

/// Update a report in place. Allowed for the leader and the owning member.
pub async fn update(session: &SessionClaims, id: &str, dto: ReportDto) -> anyhow::Result<()> {
    let existing = get_by_id(id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Report not found: {}", id))?;

    if !session.is_leader() && session.sub != existing.member_id.as_string() {
        return Err(anyhow::anyhow!("Permission denied"));
    }

    let mut updated = dto
        .parse()
        .map_err(|e| anyhow::anyhow!("Validation failed: {}", e))?;

    // Identity and lifecycle come from the stored row, not the payload
    updated.id = existing.id;
    updated.metadata = existing.metadata;

    let db = crate::shared::data::db::get_connection();
    repository::update(db, &updated).await?;

    Ok(())
}

/// Soft-delete a report (leader action; the route is behind the leader
/// middleware)
pub async fn delete(id: &str) -> anyhow::Result<()> {
    let report_id = ReportId::from_string(id).map_err(|e| anyhow::anyhow!(e))?;

    let db = crate::shared::data::db::get_connection();
    repository::soft_delete(db, &report_id).await?;

    Ok(())
}
