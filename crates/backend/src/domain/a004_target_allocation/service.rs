use contracts::dashboards::d100_kpi_summary::AllocationPreview;
use contracts::domain::a001_member::MemberId;
use contracts::domain::a003_team_target::parse_month;
use contracts::domain::a004_target_allocation::{AllocationSaveRequest, AllocationShare};
use contracts::domain::common::AggregateId;

use super::repository;
use crate::domain::{a001_member, a003_team_target};
use crate::shared::kpi::allocation::{self, AllocationInvalid};

/// Stored shares for a month, falling back to the equal split when the
/// month has no rows yet. The boolean reports whether the fallback applied.
pub async fn shares_or_equal_split(
    month: &str,
    member_ids: &[String],
) -> anyhow::Result<(std::collections::HashMap<String, f64>, bool)> {
    let db = crate::shared::data::db::get_connection();
    let stored = repository::get_shares(db, month).await?;

    if stored.is_empty() {
        Ok((allocation::equal_split(member_ids), true))
    } else {
        Ok((stored, false))
    }
}

/// Resolve a month's allocation into absolute amounts for preview. Invalid
/// share sums are reported through the `is_valid` flag, never as an error.
pub async fn get_preview(month: &str) -> anyhow::Result<AllocationPreview> {
    parse_month(month).map_err(|e| anyhow::anyhow!(e))?;

    let members = a001_member::service::list_all().await?;
    let member_ids: Vec<String> = members.iter().map(|m| m.to_string_id()).collect();

    let target = a003_team_target::service::get_or_default(month).await?;
    let (shares, _) = shares_or_equal_split(month, &member_ids).await?;

    let outcome = allocation::resolve(target.target, &shares, &member_ids);

    Ok(AllocationPreview {
        month: month.to_string(),
        is_valid: outcome.is_valid(),
        total_percent: outcome.total_percent,
        amounts: outcome.amounts,
        shares,
    })
}

/// Replace a month's shares (leader action). Persisting is refused when the
/// shares do not sum to 100% within tolerance; the caller surfaces the
/// message inline and keeps the previous allocation.
pub async fn save(request: AllocationSaveRequest) -> anyhow::Result<AllocationPreview> {
    parse_month(&request.month).map_err(|e| anyhow::anyhow!(e))?;

    let mut shares = Vec::with_capacity(request.shares.len());
    for (member_id, percent) in &request.shares {
        let share = AllocationShare {
            member_id: MemberId::from_string(member_id).map_err(|e| anyhow::anyhow!(e))?,
            month: request.month.clone(),
            percent: *percent,
        };
        share
            .validate()
            .map_err(|e| anyhow::anyhow!("Validation failed: {}", e))?;
        shares.push(share);
    }

    let total_percent: f64 = request.shares.values().sum();
    if (total_percent - 100.0).abs() > allocation::SHARE_SUM_TOLERANCE {
        return Err(AllocationInvalid {
            month: request.month.clone(),
            total_percent,
        }
        .into());
    }

    let db = crate::shared::data::db::get_connection();
    repository::replace_month(db, &request.month, &shares).await?;

    get_preview(&request.month).await
}
