use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::a001_member::MemberId;
use crate::domain::a003_team_target::parse_month;

/// One member's percentage portion of a month's team target.
/// Rows are unique per `(member, month)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationShare {
    pub member_id: MemberId,
    /// Month key in `YYYY-MM` form
    pub month: String,
    /// Percent of the team target, expected in [0, 100]
    pub percent: f64,
}

impl AllocationShare {
    pub fn validate(&self) -> Result<(), String> {
        parse_month(&self.month)?;
        if !(0.0..=100.0).contains(&self.percent) {
            return Err(format!(
                "Allocation percent {} out of range [0, 100]",
                self.percent
            ));
        }
        Ok(())
    }
}

/// Replace payload for one month's allocation, keyed by member id string
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationSaveRequest {
    pub month: String,
    pub shares: HashMap<String, f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_range_is_validated() {
        let mut share = AllocationShare {
            member_id: MemberId::new_v4(),
            month: "2025-11".to_string(),
            percent: 25.0,
        };
        assert!(share.validate().is_ok());

        share.percent = -0.5;
        assert!(share.validate().is_err());

        share.percent = 100.5;
        assert!(share.validate().is_err());

        share.percent = 100.0;
        assert!(share.validate().is_ok());
    }
}
