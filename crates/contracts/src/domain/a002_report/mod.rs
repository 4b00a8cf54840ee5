pub mod aggregate;

pub use aggregate::{parse_report_date, Report, ReportDto, ReportId};
