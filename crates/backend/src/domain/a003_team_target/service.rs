use contracts::domain::a002_report::parse_report_date;
use contracts::domain::a003_team_target::{month_bounds, TeamTarget, TeamTargetDto};

use super::repository;

/// Target for a month. A month with no row yields the zero-valued default
/// spanning the calendar month, so every downstream metric degrades to zero
/// instead of erroring.
pub async fn get_or_default(month: &str) -> anyhow::Result<TeamTarget> {
    let db = crate::shared::data::db::get_connection();

    match repository::find_by_month(db, month).await? {
        Some(target) => Ok(target),
        None => TeamTarget::default_for_month(month).map_err(|e| anyhow::anyhow!(e)),
    }
}

pub async fn list_all() -> anyhow::Result<Vec<TeamTarget>> {
    let db = crate::shared::data::db::get_connection();
    let targets = repository::list_all(db).await?;
    Ok(targets)
}

/// Upsert a month's target (leader action). Omitted range dates default to
/// the calendar bounds of the month.
pub async fn upsert(dto: TeamTargetDto) -> anyhow::Result<TeamTarget> {
    let (month_start, month_end) = month_bounds(&dto.month).map_err(|e| anyhow::anyhow!(e))?;

    let start_date = match &dto.start_date {
        Some(s) if !s.trim().is_empty() => {
            parse_report_date(s).map_err(|e| anyhow::anyhow!(e))?
        }
        _ => month_start,
    };
    let end_date = match &dto.end_date {
        Some(s) if !s.trim().is_empty() => {
            parse_report_date(s).map_err(|e| anyhow::anyhow!(e))?
        }
        _ => month_end,
    };

    let db = crate::shared::data::db::get_connection();

    let target = match repository::find_by_month(db, &dto.month).await? {
        Some(mut existing) => {
            existing.target = dto.target;
            existing.start_date = start_date;
            existing.end_date = end_date;
            existing
                .validate()
                .map_err(|e| anyhow::anyhow!("Validation failed: {}", e))?;
            repository::update(db, &existing).await?;
            existing
        }
        None => {
            let fresh =
                TeamTarget::new_for_insert(dto.month.clone(), dto.target, start_date, end_date);
            fresh
                .validate()
                .map_err(|e| anyhow::anyhow!("Validation failed: {}", e))?;
            repository::insert(db, &fresh).await?;
            fresh
        }
    };

    Ok(target)
}
