use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::{AggregateId, EntityMetadata};

// ============================================================================
// ID Type
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TeamTargetId(pub Uuid);

impl TeamTargetId {
    pub fn new(value: Uuid) -> Self {
        Self(value)
    }

    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }
}

impl AggregateId for TeamTargetId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(TeamTargetId::new)
            .map_err(|e| format!("Invalid UUID: {}", e))
    }
}

// ============================================================================
// Month helpers
// ============================================================================

/// Parse a `YYYY-MM` month key into (year, month)
pub fn parse_month(month: &str) -> Result<(i32, u32), String> {
    let err = || format!("Invalid month '{}': expected YYYY-MM", month);
    let (y, m) = month.split_once('-').ok_or_else(err)?;
    if y.len() != 4 || m.len() != 2 {
        return Err(err());
    }
    let year: i32 = y.parse().map_err(|_| err())?;
    let mon: u32 = m.parse().map_err(|_| err())?;
    if !(1..=12).contains(&mon) {
        return Err(err());
    }
    Ok((year, mon))
}

/// Calendar day count of a month
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0) {
                29
            } else {
                28
            }
        }
        _ => 31,
    }
}

/// First and last calendar day of a `YYYY-MM` month
pub fn month_bounds(month: &str) -> Result<(NaiveDate, NaiveDate), String> {
    let (year, mon) = parse_month(month)?;
    let first = NaiveDate::from_ymd_opt(year, mon, 1)
        .ok_or_else(|| format!("Invalid month '{}'", month))?;
    let last = NaiveDate::from_ymd_opt(year, mon, days_in_month(year, mon))
        .ok_or_else(|| format!("Invalid month '{}'", month))?;
    Ok((first, last))
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// Team-wide absolute revenue target for one calendar month, together with
/// the campaign date range pacing calculations run over.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamTarget {
    pub id: TeamTargetId,
    /// Month key in `YYYY-MM` form
    pub month: String,
    /// Absolute revenue target for the whole team
    pub target: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub metadata: EntityMetadata,
}

impl TeamTarget {
    pub fn new_for_insert(
        month: String,
        target: i64,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        Self {
            id: TeamTargetId::new_v4(),
            month,
            target,
            start_date,
            end_date,
            metadata: EntityMetadata::new(),
        }
    }

    /// Zero-valued target spanning the calendar month. Used whenever no row
    /// exists for a month so every metric degrades to zero instead of
    /// failing.
    pub fn default_for_month(month: &str) -> Result<Self, String> {
        let (start, end) = month_bounds(month)?;
        Ok(Self::new_for_insert(month.to_string(), 0, start, end))
    }

    pub fn validate(&self) -> Result<(), String> {
        parse_month(&self.month)?;
        if self.target < 0 {
            return Err("Target cannot be negative".into());
        }
        if self.end_date < self.start_date {
            return Err("End date cannot precede start date".into());
        }
        Ok(())
    }
}

// ============================================================================
// DTO
// ============================================================================

/// Upsert payload for a month target. Omitted dates default to the calendar
/// bounds of the month.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamTargetDto {
    pub month: String,
    pub target: i64,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_key_is_validated() {
        assert_eq!(parse_month("2025-11").unwrap(), (2025, 11));
        assert!(parse_month("2025-13").is_err());
        assert!(parse_month("2025-1").is_err());
        assert!(parse_month("202511").is_err());
        assert!(parse_month("").is_err());
    }

    #[test]
    fn month_lengths() {
        assert_eq!(days_in_month(2025, 11), 30);
        assert_eq!(days_in_month(2025, 12), 31);
        assert_eq!(days_in_month(2025, 2), 28);
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2100, 2), 28);
        assert_eq!(days_in_month(2000, 2), 29);
    }

    #[test]
    fn bounds_cover_the_whole_month() {
        let (first, last) = month_bounds("2025-11").unwrap();
        assert_eq!(first, NaiveDate::from_ymd_opt(2025, 11, 1).unwrap());
        assert_eq!(last, NaiveDate::from_ymd_opt(2025, 11, 30).unwrap());
    }

    #[test]
    fn default_target_is_zero() {
        let t = TeamTarget::default_for_month("2025-11").unwrap();
        assert_eq!(t.target, 0);
        assert!(t.validate().is_ok());
    }
}
