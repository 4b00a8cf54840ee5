pub mod a001_member;
pub mod a002_report;
pub mod a003_team_target;
pub mod a004_target_allocation;
