//! Pure KPI computation over in-memory snapshots.
//!
//! Everything in this module is a side-effect-free function of its inputs:
//! the data layer hands over reports, targets and shares, and the same
//! snapshot always produces the same result. Ratio metrics substitute 0 for
//! an undefined value whenever a denominator is zero.

pub mod aggregation;
pub mod allocation;
pub mod pace;
