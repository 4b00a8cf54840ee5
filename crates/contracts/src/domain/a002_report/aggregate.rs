use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::a001_member::MemberId;
use crate::domain::common::{AggregateId, EntityMetadata};

// ============================================================================
// ID Type
// ============================================================================

/// Unique identifier of a daily sales report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReportId(pub Uuid);

impl ReportId {
    pub fn new(value: Uuid) -> Self {
        Self(value)
    }

    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }
}

impl AggregateId for ReportId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(ReportId::new)
            .map_err(|e| format!("Invalid UUID: {}", e))
    }
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// One member's sales report for one calendar day.
///
/// The counters are expected to satisfy `responses <= reach` and
/// `deals <= responses`, but that is not enforced here: aggregation must
/// tolerate violating rows without failing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub id: ReportId,
    pub member_id: MemberId,
    /// Calendar day the report covers (date only, no time component)
    pub report_date: NaiveDate,

    /// Prospects contacted
    pub reach: i64,
    /// Prospects who replied
    pub responses: i64,
    /// Orders closed
    pub deals: i64,
    /// Revenue amount (plain integer currency units)
    pub revenue: i64,

    // Descriptive attributes; not part of KPI arithmetic
    pub product: Option<String>,
    pub channel: Option<String>,
    pub warehouse: Option<String>,
    pub order_code: Option<String>,
    pub order_date: Option<NaiveDate>,
    pub customer_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub note: Option<String>,
    pub status: Option<String>,

    pub metadata: EntityMetadata,
}

impl Report {
    pub fn to_string_id(&self) -> String {
        self.id.as_string()
    }
}

/// Strict date parsing for the ingest boundary. Everything past this point
/// works with `NaiveDate`, so range filters always compare calendar order.
pub fn parse_report_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| format!("Invalid date '{}': expected YYYY-MM-DD", s))
}

// ============================================================================
// DTO + parse boundary
// ============================================================================

/// Create/update payload for a report. `parse` converts the untyped wire
/// representation into the canonical `Report` and is the only place where
/// dates and counters are validated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportDto {
    pub id: Option<String>,
    pub member_id: String,
    pub report_date: String,

    pub reach: i64,
    pub responses: i64,
    pub deals: i64,
    pub revenue: i64,

    pub product: Option<String>,
    pub channel: Option<String>,
    pub warehouse: Option<String>,
    pub order_code: Option<String>,
    pub order_date: Option<String>,
    pub customer_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub note: Option<String>,
    pub status: Option<String>,
}

impl ReportDto {
    pub fn parse(&self) -> Result<Report, String> {
        let id = match &self.id {
            Some(s) => ReportId::from_string(s)?,
            None => ReportId::new_v4(),
        };
        let member_id = MemberId::from_string(&self.member_id)?;
        let report_date = parse_report_date(&self.report_date)?;
        let order_date = match &self.order_date {
            Some(s) if !s.trim().is_empty() => Some(parse_report_date(s)?),
            _ => None,
        };

        for (label, value) in [
            ("reach", self.reach),
            ("responses", self.responses),
            ("deals", self.deals),
            ("revenue", self.revenue),
        ] {
            if value < 0 {
                return Err(format!("Field '{}' cannot be negative", label));
            }
        }

        Ok(Report {
            id,
            member_id,
            report_date,
            reach: self.reach,
            responses: self.responses,
            deals: self.deals,
            revenue: self.revenue,
            product: self.product.clone(),
            channel: self.channel.clone(),
            warehouse: self.warehouse.clone(),
            order_code: self.order_code.clone(),
            order_date,
            customer_name: self.customer_name.clone(),
            phone: self.phone.clone(),
            address: self.address.clone(),
            note: self.note.clone(),
            status: self.status.clone(),
            metadata: EntityMetadata::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dto(date: &str) -> ReportDto {
        ReportDto {
            id: None,
            member_id: Uuid::new_v4().to_string(),
            report_date: date.to_string(),
            reach: 10,
            responses: 3,
            deals: 1,
            revenue: 30_000_000,
            product: Some("Long Mã".to_string()),
            channel: Some("Facebook".to_string()),
            warehouse: None,
            order_code: None,
            order_date: None,
            customer_name: None,
            phone: None,
            address: None,
            note: None,
            status: None,
        }
    }

    #[test]
    fn parses_canonical_date() {
        let report = dto("2025-11-03").parse().unwrap();
        assert_eq!(
            report.report_date,
            NaiveDate::from_ymd_opt(2025, 11, 3).unwrap()
        );
        assert_eq!(report.revenue, 30_000_000);
    }

    #[test]
    fn rejects_malformed_dates() {
        assert!(dto("03/11/2025").parse().is_err());
        assert!(dto("2025-13-01").parse().is_err());
        assert!(dto("2025-11-3").parse().is_err());
        assert!(dto("").parse().is_err());
    }

    #[test]
    fn rejects_negative_counters() {
        let mut d = dto("2025-11-03");
        d.deals = -1;
        let err = d.parse().unwrap_err();
        assert!(err.contains("deals"));
    }

    #[test]
    fn counter_violations_are_not_rejected() {
        // responses > reach is suspicious but valid input; the aggregation
        // layer must cope with it.
        let mut d = dto("2025-11-03");
        d.reach = 1;
        d.responses = 5;
        d.deals = 9;
        assert!(d.parse().is_ok());
    }
}
