use anyhow::Result;
use std::collections::HashMap;

use contracts::dashboards::d100_kpi_summary::{
    AllocationPreview, DayKpi, ForecastCard, KpiSummaryRequest, KpiSummaryResponse, MemberKpi,
    ScopeTotals,
};
use contracts::domain::a001_member::{Member, MemberId};
use contracts::domain::a002_report::Report;
use contracts::domain::a003_team_target::{days_in_month, parse_month, TeamTarget};
use contracts::domain::common::AggregateId;

use super::repository;
use crate::domain::{a001_member, a003_team_target, a004_target_allocation};
use crate::shared::kpi::aggregation::{
    self, aggregate, progress_percent, remaining, ScopeFilter, Totals,
};
use crate::shared::kpi::allocation;
use crate::shared::kpi::pace::{required_pace, PaceInputs};

/// Compute the KPI summary for one month, optionally scoped to one member
pub async fn get_kpi_summary(request: KpiSummaryRequest) -> Result<KpiSummaryResponse> {
    let target = a003_team_target::service::get_or_default(&request.month).await?;
    let members = a001_member::service::list_all().await?;
    let member_ids: Vec<String> = members.iter().map(|m| m.to_string_id()).collect();

    let (shares, _) =
        a004_target_allocation::service::shares_or_equal_split(&request.month, &member_ids)
            .await?;

    let reports = repository::fetch_reports_in_range(target.start_date, target.end_date).await?;

    build_summary(&request, &target, &members, shares, &reports)
}

fn scope_totals(totals: &Totals) -> ScopeTotals {
    ScopeTotals {
        reach: totals.reach,
        responses: totals.responses,
        deals: totals.deals,
        revenue: totals.revenue,
        average_order_value: totals.average_order_value(),
        reply_rate: totals.reply_rate(),
        conversion_rate: totals.conversion_rate(),
    }
}

/// Pure assembly of the summary payload from an already-loaded snapshot
pub fn build_summary(
    request: &KpiSummaryRequest,
    target: &TeamTarget,
    members: &[Member],
    shares: HashMap<String, f64>,
    reports: &[Report],
) -> Result<KpiSummaryResponse> {
    let (year, month_no) = parse_month(&request.month).map_err(|e| anyhow::anyhow!(e))?;

    let member_filter = match &request.member_id {
        Some(id) => Some(MemberId::from_string(id).map_err(|e| anyhow::anyhow!(e))?),
        None => None,
    };

    let filter = ScopeFilter {
        member_id: member_filter,
        date_from: Some(target.start_date),
        date_to: Some(target.end_date),
    };
    let agg = aggregate(reports, &filter);

    let member_ids: Vec<String> = members.iter().map(|m| m.to_string_id()).collect();
    let outcome = allocation::resolve(target.target, &shares, &member_ids);

    // A member scope measures against that member's allocated amount,
    // the team scope against the full team target.
    let scoped_target = match &member_filter {
        Some(id) => outcome.amount_for(&id.as_string()),
        None => target.target as f64,
    };

    let forecast = aggregation::forecast(
        agg.team.revenue,
        agg.distinct_report_days(),
        days_in_month(year, month_no),
        scoped_target,
    );

    let pace = required_pace(&PaceInputs {
        team_target: target.target,
        member_count: members.len(),
        start_date: target.start_date,
        end_date: target.end_date,
        average_order_value: agg.team.average_order_value(),
        reply_rate: agg.team.reply_rate(),
        conversion_rate: agg.team.conversion_rate(),
    });

    let mut by_member = HashMap::new();
    for member in members {
        if let Some(filter_id) = &member_filter {
            if member.id != *filter_id {
                continue;
            }
        }
        let id = member.to_string_id();
        let totals = agg.by_member.get(&member.id).copied().unwrap_or_default();
        let member_target = outcome.amount_for(&id);
        by_member.insert(
            id,
            MemberKpi {
                name: member.name.clone(),
                color: member.color.clone(),
                totals: scope_totals(&totals),
                target: member_target,
                progress_percent: progress_percent(totals.revenue, member_target),
                remaining: remaining(totals.revenue, member_target),
            },
        );
    }

    let by_day = agg
        .by_day
        .iter()
        .map(|(date, totals)| DayKpi {
            date: *date,
            totals: scope_totals(totals),
        })
        .collect();

    Ok(KpiSummaryResponse {
        period: request.month.clone(),
        team: scope_totals(&agg.team),
        team_target: target.target,
        progress_percent: progress_percent(agg.team.revenue, scoped_target),
        remaining: remaining(agg.team.revenue, scoped_target),
        forecast: forecast_card(forecast),
        by_member,
        by_day,
        pace,
        allocation: AllocationPreview {
            month: request.month.clone(),
            is_valid: outcome.is_valid(),
            total_percent: outcome.total_percent,
            amounts: outcome.amounts,
            shares,
        },
    })
}

fn forecast_card(f: aggregation::Forecast) -> ForecastCard {
    ForecastCard {
        distinct_report_days: f.distinct_report_days,
        days_in_month: f.days_in_month,
        average_per_day: f.average_per_day,
        forecast_percent: f.forecast_percent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use contracts::domain::a001_member::MemberRole;
    use contracts::domain::a002_report::ReportId;
    use contracts::domain::common::EntityMetadata;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn member(name: &str, role: MemberRole) -> Member {
        Member::new_for_insert(
            name.to_string(),
            role,
            "#3b82f6".to_string(),
            "1111".to_string(),
        )
    }

    fn report(member_id: MemberId, day: &str, revenue: i64) -> Report {
        Report {
            id: ReportId::new_v4(),
            member_id,
            report_date: date(day),
            reach: 10,
            responses: 3,
            deals: 1,
            revenue,
            product: None,
            channel: None,
            warehouse: None,
            order_code: None,
            order_date: None,
            customer_name: None,
            phone: None,
            address: None,
            note: None,
            status: None,
            metadata: EntityMetadata::new(),
        }
    }

    fn november_target(target: i64) -> TeamTarget {
        TeamTarget::new_for_insert(
            "2025-11".to_string(),
            target,
            date("2025-11-01"),
            date("2025-11-30"),
        )
    }

    #[test]
    fn run_rate_forecast_hits_target_exactly() {
        // 10 reporting days, 100k/day realized, 3M target over a 30-day
        // month: projecting the average over the remaining 20 days lands on
        // 100%.
        let m = member("Vũ", MemberRole::Regular);
        let reports: Vec<Report> = (1..=10)
            .map(|day| report(m.id, &format!("2025-11-{:02}", day), 100_000))
            .collect();

        let shares = HashMap::from([(m.to_string_id(), 100.0)]);
        let request = KpiSummaryRequest {
            month: "2025-11".to_string(),
            member_id: None,
        };
        let summary =
            build_summary(&request, &november_target(3_000_000), &[m], shares, &reports)
                .unwrap();

        assert_eq!(summary.team.revenue, 1_000_000);
        assert_eq!(summary.forecast.distinct_report_days, 10);
        assert_eq!(summary.forecast.days_in_month, 30);
        assert_eq!(summary.forecast.average_per_day, 100_000.0);
        assert!((summary.forecast.forecast_percent - 100.0).abs() < 1e-9);
        assert!((summary.progress_percent - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn member_scope_measures_against_member_target() {
        let m1 = member("Vũ", MemberRole::Regular);
        let m2 = member("Quỳnh", MemberRole::Regular);
        let reports = vec![
            report(m1.id, "2025-11-03", 400_000),
            report(m2.id, "2025-11-03", 100_000),
        ];
        let shares = HashMap::from([
            (m1.to_string_id(), 50.0),
            (m2.to_string_id(), 50.0),
        ]);

        let request = KpiSummaryRequest {
            month: "2025-11".to_string(),
            member_id: Some(m1.to_string_id()),
        };
        let summary = build_summary(
            &request,
            &november_target(1_000_000),
            &[m1.clone(), m2],
            shares,
            &reports,
        )
        .unwrap();

        // Only m1's reports in scope, measured against m1's 500k share
        assert_eq!(summary.team.revenue, 400_000);
        assert!((summary.progress_percent - 80.0).abs() < 1e-9);
        assert_eq!(summary.remaining, 100_000.0);
        assert_eq!(summary.by_member.len(), 1);
        assert!(summary.by_member.contains_key(&m1.to_string_id()));
    }

    #[test]
    fn over_achievement_is_uncapped_with_zero_remaining() {
        let m = member("Ngân", MemberRole::Regular);
        let reports = vec![report(m.id, "2025-11-03", 1_500_000)];
        let shares = HashMap::from([(m.to_string_id(), 100.0)]);

        let request = KpiSummaryRequest {
            month: "2025-11".to_string(),
            member_id: None,
        };
        let summary =
            build_summary(&request, &november_target(1_000_000), &[m], shares, &reports)
                .unwrap();

        assert!(summary.progress_percent > 100.0);
        assert_eq!(summary.remaining, 0.0);
    }

    #[test]
    fn unconfigured_month_degrades_to_zero_metrics() {
        let m = member("Vũ", MemberRole::Regular);
        let target = TeamTarget::default_for_month("2025-11").unwrap();
        let reports = vec![report(m.id, "2025-11-03", 250_000)];
        let shares = HashMap::from([(m.to_string_id(), 100.0)]);

        let request = KpiSummaryRequest {
            month: "2025-11".to_string(),
            member_id: None,
        };
        let summary = build_summary(&request, &target, &[m], shares, &reports).unwrap();

        assert_eq!(summary.team_target, 0);
        assert_eq!(summary.progress_percent, 0.0);
        assert_eq!(summary.remaining, 0.0);
        assert_eq!(summary.forecast.forecast_percent, 0.0);
        // Realized totals still show up
        assert_eq!(summary.team.revenue, 250_000);
    }

    #[test]
    fn invalid_allocation_is_flagged_in_the_payload() {
        let m1 = member("Vũ", MemberRole::Regular);
        let m2 = member("Quỳnh", MemberRole::Regular);
        let shares = HashMap::from([
            (m1.to_string_id(), 60.0),
            (m2.to_string_id(), 30.0),
        ]);

        let request = KpiSummaryRequest {
            month: "2025-11".to_string(),
            member_id: None,
        };
        let summary = build_summary(
            &request,
            &november_target(1_000_000),
            &[m1.clone(), m2.clone()],
            shares,
            &[],
        )
        .unwrap();

        assert!(!summary.allocation.is_valid);
        assert_eq!(summary.allocation.total_percent, 90.0);
        // Preview amounts are still resolved
        assert_eq!(summary.allocation.amounts[&m1.to_string_id()], 600_000.0);
        assert_eq!(summary.allocation.amounts[&m2.to_string_id()], 300_000.0);
        // Member cards use the previewed amounts as targets
        assert_eq!(summary.by_member[&m2.to_string_id()].target, 300_000.0);
    }

    #[test]
    fn by_day_sequence_is_ordered() {
        let m = member("Vũ", MemberRole::Regular);
        let reports = vec![
            report(m.id, "2025-11-20", 1),
            report(m.id, "2025-11-05", 2),
            report(m.id, "2025-11-11", 3),
        ];
        let shares = HashMap::from([(m.to_string_id(), 100.0)]);

        let request = KpiSummaryRequest {
            month: "2025-11".to_string(),
            member_id: None,
        };
        let summary =
            build_summary(&request, &november_target(1_000_000), &[m], shares, &reports)
                .unwrap();

        let dates: Vec<String> = summary.by_day.iter().map(|d| d.date.to_string()).collect();
        assert_eq!(dates, ["2025-11-05", "2025-11-11", "2025-11-20"]);
    }

    #[test]
    fn bad_month_or_member_is_rejected() {
        let request = KpiSummaryRequest {
            month: "november".to_string(),
            member_id: None,
        };
        let target = TeamTarget::default_for_month("2025-11").unwrap();
        assert!(build_summary(&request, &target, &[], HashMap::new(), &[]).is_err());

        let request = KpiSummaryRequest {
            month: "2025-11".to_string(),
            member_id: Some("not-a-uuid".to_string()),
        };
        assert!(build_summary(&request, &target, &[], HashMap::new(), &[]).is_err());
    }
}
