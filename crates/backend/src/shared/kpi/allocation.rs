use std::collections::HashMap;

/// Tolerance for the share-sum check, in percent points
pub const SHARE_SUM_TOLERANCE: f64 = 0.01;

/// Shares for a month do not sum to 100%. Non-fatal for reads: resolved
/// amounts are still usable as a preview; only persisting is refused.
#[derive(Debug, thiserror::Error)]
#[error("allocation shares for {month} sum to {total_percent:.2}%, expected 100%")]
pub struct AllocationInvalid {
    pub month: String,
    pub total_percent: f64,
}

/// Result of resolving percentage shares into absolute amounts
#[derive(Debug, Clone)]
pub struct AllocationOutcome {
    /// Absolute target per member id; every known member gets an entry
    pub amounts: HashMap<String, f64>,
    /// Sum over all supplied shares
    pub total_percent: f64,
}

impl AllocationOutcome {
    pub fn is_valid(&self) -> bool {
        (self.total_percent - 100.0).abs() <= SHARE_SUM_TOLERANCE
    }

    pub fn amount_for(&self, member_id: &str) -> f64 {
        self.amounts.get(member_id).copied().unwrap_or(0.0)
    }
}

/// Turn a month's percentage shares into absolute per-member amounts.
///
/// A member without a share gets 0, not an error. The amounts are computed
/// unconditionally; callers check `is_valid` before allowing a save.
pub fn resolve(
    team_target: i64,
    shares: &HashMap<String, f64>,
    members: &[String],
) -> AllocationOutcome {
    let total_percent: f64 = shares.values().sum();

    let amounts = members
        .iter()
        .map(|id| {
            let percent = shares.get(id).copied().unwrap_or(0.0);
            (id.clone(), percent / 100.0 * team_target as f64)
        })
        .collect();

    AllocationOutcome {
        amounts,
        total_percent,
    }
}

/// Equal-division fallback used when a month has no shares at all.
/// Applied by the caller before `resolve`; the resolver never splits
/// implicitly.
pub fn equal_split(members: &[String]) -> HashMap<String, f64> {
    if members.is_empty() {
        return HashMap::new();
    }
    let percent = 100.0 / members.len() as f64;
    members.iter().map(|id| (id.clone(), percent)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("m{}", i)).collect()
    }

    #[test]
    fn even_split_resolves_exactly() {
        let members = ids(2);
        let shares: HashMap<String, f64> =
            [("m1".to_string(), 50.0), ("m2".to_string(), 50.0)].into();
        let outcome = resolve(1_000_000, &shares, &members);

        assert!(outcome.is_valid());
        assert_eq!(outcome.amount_for("m1"), 500_000.0);
        assert_eq!(outcome.amount_for("m2"), 500_000.0);
    }

    #[test]
    fn under_allocated_month_is_flagged_but_still_resolved() {
        let members = ids(2);
        let shares: HashMap<String, f64> =
            [("m1".to_string(), 60.0), ("m2".to_string(), 30.0)].into();
        let outcome = resolve(1_000_000, &shares, &members);

        assert!(!outcome.is_valid());
        assert_eq!(outcome.total_percent, 90.0);
        assert_eq!(outcome.amount_for("m1"), 600_000.0);
        assert_eq!(outcome.amount_for("m2"), 300_000.0);
    }

    #[test]
    fn amounts_sum_back_to_the_target() {
        let members = ids(3);
        let shares: HashMap<String, f64> = [
            ("m1".to_string(), 42.5),
            ("m2".to_string(), 37.5),
            ("m3".to_string(), 20.0),
        ]
        .into();
        let outcome = resolve(3_000_000, &shares, &members);

        assert!(outcome.is_valid());
        let sum: f64 = outcome.amounts.values().sum();
        assert!((sum - 3_000_000.0).abs() < 1e-6);
    }

    #[test]
    fn missing_share_means_zero_amount() {
        let members = ids(3);
        let shares: HashMap<String, f64> =
            [("m1".to_string(), 70.0), ("m2".to_string(), 30.0)].into();
        let outcome = resolve(1_000_000, &shares, &members);

        assert_eq!(outcome.amount_for("m3"), 0.0);
        assert!(outcome.is_valid());
    }

    #[test]
    fn zero_target_resolves_to_all_zeros() {
        let members = ids(2);
        let shares: HashMap<String, f64> =
            [("m1".to_string(), 50.0), ("m2".to_string(), 50.0)].into();
        let outcome = resolve(0, &shares, &members);

        assert!(outcome.is_valid());
        assert!(outcome.amounts.values().all(|&v| v == 0.0));
    }

    #[test]
    fn tolerance_allows_rounding_noise() {
        let members = ids(3);
        let shares: HashMap<String, f64> = [
            ("m1".to_string(), 33.33),
            ("m2".to_string(), 33.33),
            ("m3".to_string(), 33.34),
        ]
        .into();
        assert!(resolve(1_000_000, &shares, &members).is_valid());

        let drifted: HashMap<String, f64> = [
            ("m1".to_string(), 33.3),
            ("m2".to_string(), 33.3),
            ("m3".to_string(), 33.3),
        ]
        .into();
        assert!(!resolve(1_000_000, &drifted, &members).is_valid());
    }

    #[test]
    fn equal_split_covers_all_members() {
        let members = ids(4);
        let shares = equal_split(&members);
        assert_eq!(shares.len(), 4);
        assert!(shares.values().all(|&p| p == 25.0));
        assert!(resolve(4_000_000, &shares, &members).is_valid());

        assert!(equal_split(&[]).is_empty());
    }
}
