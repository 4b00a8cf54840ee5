use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Request for the KPI summary dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KpiSummaryRequest {
    /// Month key in `YYYY-MM` form
    pub month: String,
    /// Restrict the summary to one member
    pub member_id: Option<String>,
}

/// Realized counters plus the zero-guarded rate metrics derived from them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScopeTotals {
    pub reach: i64,
    pub responses: i64,
    pub deals: i64,
    pub revenue: i64,
    /// revenue / deals, 0 when no deals
    pub average_order_value: f64,
    /// responses / reach, 0 when no reach
    pub reply_rate: f64,
    /// deals / responses, 0 when no responses
    pub conversion_rate: f64,
}

/// Per-member slice of the summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberKpi {
    pub name: String,
    pub color: String,
    pub totals: ScopeTotals,
    /// Absolute target resolved from the member's allocation share
    pub target: f64,
    /// Uncapped; values above 100 signal over-achievement
    pub progress_percent: f64,
    /// Never negative
    pub remaining: f64,
}

/// Per-day slice of the summary, emitted in ascending date order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayKpi {
    pub date: NaiveDate,
    pub totals: ScopeTotals,
}

/// Naive linear run-rate projection of month-end attainment. Assumes every
/// remaining day yields the observed per-reporting-day average, which over-
/// or under-estimates when report density is uneven.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastCard {
    pub distinct_report_days: u32,
    pub days_in_month: u32,
    pub average_per_day: f64,
    /// Uncapped; falls back to the plain progress percent when there is no
    /// daily-average signal
    pub forecast_percent: f64,
}

/// Required-pace guidance derived from currently observed rates.
/// Informational only, not a prediction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaceCard {
    /// Days in the campaign range excluding Sundays
    pub working_days: u32,
    pub per_member_target: f64,
    pub daily_per_member: f64,
    /// Six working days per week (Mon-Sat)
    pub weekly_per_member: f64,
    pub deals_per_day: f64,
    pub required_responses: f64,
    pub required_reach: f64,
}

/// Resolved allocation preview for the month. Amounts are returned even when
/// the share sum is invalid so the leader UI can preview before fixing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationPreview {
    pub month: String,
    /// Percent per member id
    pub shares: HashMap<String, f64>,
    /// Absolute amount per member id
    pub amounts: HashMap<String, f64>,
    pub total_percent: f64,
    /// False when the shares do not sum to 100 within tolerance
    pub is_valid: bool,
}

/// Full KPI summary payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KpiSummaryResponse {
    /// Month key the summary was computed for
    pub period: String,
    pub team: ScopeTotals,
    pub team_target: i64,
    /// Uncapped team progress against the scoped target
    pub progress_percent: f64,
    /// Never negative
    pub remaining: f64,
    pub forecast: ForecastCard,
    /// Keyed by member id
    pub by_member: HashMap<String, MemberKpi>,
    pub by_day: Vec<DayKpi>,
    pub pace: PaceCard,
    pub allocation: AllocationPreview,
}
