pub mod aggregate;

pub use aggregate::{
    days_in_month, month_bounds, parse_month, TeamTarget, TeamTargetDto, TeamTargetId,
};
