use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};

use contracts::domain::a001_member::MemberId;
use contracts::domain::a002_report::Report;

/// Optional member/date-range restriction applied before any aggregation.
/// Both range boundaries are inclusive.
#[derive(Debug, Clone, Default)]
pub struct ScopeFilter {
    pub member_id: Option<MemberId>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl ScopeFilter {
    pub fn matches(&self, report: &Report) -> bool {
        if let Some(member_id) = &self.member_id {
            if report.member_id != *member_id {
                return false;
            }
        }
        if let Some(from) = self.date_from {
            if report.report_date < from {
                return false;
            }
        }
        if let Some(to) = self.date_to {
            if report.report_date > to {
                return false;
            }
        }
        true
    }
}

/// Summed counters for one scope (team, member or day)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    pub reach: i64,
    pub responses: i64,
    pub deals: i64,
    pub revenue: i64,
}

impl Totals {
    fn add(&mut self, report: &Report) {
        self.reach += report.reach;
        self.responses += report.responses;
        self.deals += report.deals;
        self.revenue += report.revenue;
    }

    /// revenue / deals, 0 when no deals
    pub fn average_order_value(&self) -> f64 {
        ratio(self.revenue as f64, self.deals as f64)
    }

    /// responses / reach, 0 when no reach
    pub fn reply_rate(&self) -> f64 {
        ratio(self.responses as f64, self.reach as f64)
    }

    /// deals / responses, 0 when no responses
    pub fn conversion_rate(&self) -> f64 {
        ratio(self.deals as f64, self.responses as f64)
    }
}

/// Zero-guarded division: an undefined ratio is reported as 0, never as
/// infinity or NaN.
pub fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

/// Uncapped attainment percentage; values above 100 signal over-achievement
pub fn progress_percent(revenue: i64, target: f64) -> f64 {
    if target > 0.0 {
        100.0 * revenue as f64 / target
    } else {
        0.0
    }
}

/// Amount still missing toward a target; clamped at 0
pub fn remaining(revenue: i64, target: f64) -> f64 {
    (target - revenue as f64).max(0.0)
}

/// Totals over the filtered set, partitioned globally, per member and per
/// day (ascending date order)
#[derive(Debug, Clone, Default)]
pub struct KpiAggregate {
    pub team: Totals,
    pub by_member: HashMap<MemberId, Totals>,
    pub by_day: BTreeMap<NaiveDate, Totals>,
}

impl KpiAggregate {
    /// Count of unique dates that have at least one report
    pub fn distinct_report_days(&self) -> u32 {
        self.by_day.len() as u32
    }
}

/// Single pass over the snapshot; input order is irrelevant
pub fn aggregate(reports: &[Report], filter: &ScopeFilter) -> KpiAggregate {
    let mut result = KpiAggregate::default();

    for report in reports.iter().filter(|r| filter.matches(r)) {
        result.team.add(report);
        result.by_member.entry(report.member_id).or_default().add(report);
        result.by_day.entry(report.report_date).or_default().add(report);
    }

    result
}

/// Linear run-rate projection of month-end attainment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Forecast {
    pub distinct_report_days: u32,
    pub days_in_month: u32,
    pub average_per_day: f64,
    pub forecast_percent: f64,
}

/// Project month-end attainment from the observed per-reporting-day average.
///
/// Every remaining calendar day is assumed to yield the historical average,
/// which over- or under-estimates when report density is uneven. With no
/// daily-average signal (or no target) the projection falls back to the
/// plain progress percentage.
pub fn forecast(
    revenue: i64,
    distinct_report_days: u32,
    days_in_month: u32,
    target: f64,
) -> Forecast {
    let average_per_day = ratio(revenue as f64, distinct_report_days as f64);
    let days_remaining = days_in_month.saturating_sub(distinct_report_days);

    let forecast_percent = if average_per_day > 0.0 && target > 0.0 {
        100.0 * (revenue as f64 + average_per_day * days_remaining as f64) / target
    } else {
        progress_percent(revenue, target)
    };

    Forecast {
        distinct_report_days,
        days_in_month,
        average_per_day,
        forecast_percent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::common::EntityMetadata;
    use contracts::domain::a002_report::ReportId;

    fn member(n: u128) -> MemberId {
        MemberId::new(uuid::Uuid::from_u128(n))
    }

    fn report(member_id: MemberId, date: &str, counters: [i64; 4]) -> Report {
        Report {
            id: ReportId::new_v4(),
            member_id,
            report_date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            reach: counters[0],
            responses: counters[1],
            deals: counters[2],
            revenue: counters[3],
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

    #[test]
    fn sums_all_counters() {
        let reports = vec![
            report(member(1), "2025-11-01", [10, 3, 1, 30_000_000]),
            report(member(2), "2025-11-01", [12, 4, 1, 35_000_000]),
            report(member(1), "2025-11-02", [15, 5, 2, 50_000_000]),
        ];
        let agg = aggregate(&reports, &ScopeFilter::default());

        assert_eq!(agg.team.reach, 37);
        assert_eq!(agg.team.responses, 12);
        assert_eq!(agg.team.deals, 4);
        assert_eq!(agg.team.revenue, 115_000_000);
        assert_eq!(agg.by_member.len(), 2);
        assert_eq!(agg.by_member[&member(1)].revenue, 80_000_000);
        assert_eq!(agg.distinct_report_days(), 2);
    }

    #[test]
    fn member_filter_keeps_only_that_member() {
        let reports = vec![
            report(member(1), "2025-11-01", [10, 3, 1, 30_000_000]),
            report(member(2), "2025-11-01", [12, 4, 1, 35_000_000]),
        ];
        let filter = ScopeFilter {
            member_id: Some(member(2)),
            ..Default::default()
        };
        let agg = aggregate(&reports, &filter);

        assert_eq!(agg.team.revenue, 35_000_000);
        assert_eq!(agg.by_member.len(), 1);
    }

    #[test]
    fn date_range_is_inclusive_on_both_ends() {
        let reports = vec![
            report(member(1), "2025-11-01", [1, 0, 0, 100]),
            report(member(1), "2025-11-02", [1, 0, 0, 200]),
            report(member(1), "2025-11-03", [1, 0, 0, 400]),
            report(member(1), "2025-11-04", [1, 0, 0, 800]),
        ];
        let filter = ScopeFilter {
            member_id: None,
            date_from: Some(NaiveDate::from_ymd_opt(2025, 11, 2).unwrap()),
            date_to: Some(NaiveDate::from_ymd_opt(2025, 11, 3).unwrap()),
        };
        let agg = aggregate(&reports, &filter);
        assert_eq!(agg.team.revenue, 600);
    }

    #[test]
    fn by_day_is_ordered_ascending() {
        let reports = vec![
            report(member(1), "2025-11-20", [1, 0, 0, 1]),
            report(member(1), "2025-11-05", [1, 0, 0, 2]),
            report(member(1), "2025-11-11", [1, 0, 0, 3]),
        ];
        let agg = aggregate(&reports, &ScopeFilter::default());
        let dates: Vec<_> = agg.by_day.keys().map(|d| d.to_string()).collect();
        assert_eq!(dates, ["2025-11-05", "2025-11-11", "2025-11-20"]);
    }

    #[test]
    fn average_order_value_guards_zero_deals() {
        let reports = vec![
            report(member(1), "2025-11-01", [5, 2, 2, 100]),
            report(member(1), "2025-11-02", [5, 2, 0, 0]),
        ];
        let agg = aggregate(&reports, &ScopeFilter::default());
        assert_eq!(agg.team.deals, 2);
        assert_eq!(agg.team.revenue, 100);
        assert_eq!(agg.team.average_order_value(), 50.0);

        let empty = aggregate(&[], &ScopeFilter::default());
        assert_eq!(empty.team.average_order_value(), 0.0);
    }

    #[test]
    fn rates_guard_zero_denominators() {
        let agg = aggregate(
            &[report(member(1), "2025-11-01", [0, 0, 0, 500])],
            &ScopeFilter::default(),
        );
        assert_eq!(agg.team.reply_rate(), 0.0);
        assert_eq!(agg.team.conversion_rate(), 0.0);
    }

    #[test]
    fn counter_violations_still_aggregate() {
        // responses > reach, deals > responses: tolerated, summed as-is
        let agg = aggregate(
            &[report(member(1), "2025-11-01", [1, 5, 9, 100])],
            &ScopeFilter::default(),
        );
        assert_eq!(agg.team.responses, 5);
        assert_eq!(agg.team.deals, 9);
        assert!(agg.team.reply_rate() > 1.0);
    }

    #[test]
    fn progress_is_uncapped_and_remaining_clamped() {
        assert!((progress_percent(1_500_000, 1_000_000.0) - 150.0).abs() < 1e-9);
        assert_eq!(remaining(1_500_000, 1_000_000.0), 0.0);
        assert_eq!(remaining(400_000, 1_000_000.0), 600_000.0);
        assert_eq!(progress_percent(500, 0.0), 0.0);
    }

    #[test]
    fn forecast_projects_linearly() {
        // 10 reporting days out of 30, 1M realized against a 3M target:
        // 100k/day * 20 remaining days lands exactly on target.
        let f = forecast(1_000_000, 10, 30, 3_000_000.0);
        assert_eq!(f.average_per_day, 100_000.0);
        assert!((f.forecast_percent - 100.0).abs() < 1e-9);
    }

    #[test]
    fn forecast_falls_back_to_progress() {
        // No reporting days yet
        let f = forecast(0, 0, 30, 3_000_000.0);
        assert_eq!(f.average_per_day, 0.0);
        assert_eq!(f.forecast_percent, 0.0);

        // No target set
        let f = forecast(1_000_000, 10, 30, 0.0);
        assert_eq!(f.forecast_percent, 0.0);
    }

    #[test]
    fn forecast_day_overrun_does_not_underflow() {
        // More distinct reporting days than the month has calendar days can
        // only happen with corrupted input; the projection degrades to plain
        // progress instead of wrapping around.
        let f = forecast(600, 31, 30, 1_000.0);
        assert!((f.forecast_percent - 60.0).abs() < 1e-9);
    }

    #[test]
    fn aggregation_is_idempotent() {
        let reports = vec![
            report(member(1), "2025-11-01", [10, 3, 1, 30_000_000]),
            report(member(2), "2025-11-02", [12, 4, 1, 35_000_000]),
        ];
        let filter = ScopeFilter::default();
        let first = aggregate(&reports, &filter);
        let second = aggregate(&reports, &filter);

        assert_eq!(first.team, second.team);
        assert_eq!(first.by_day, second.by_day);
        assert_eq!(first.by_member[&member(1)], second.by_member[&member(1)]);
    }
}
