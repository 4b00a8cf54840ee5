use anyhow::Result;
use chrono::NaiveDate;
use sea_orm::{FromQueryResult, Statement};
use uuid::Uuid;

use contracts::domain::a001_member::MemberId;
use contracts::domain::a002_report::{Report, ReportId};
use contracts::domain::common::EntityMetadata;

use crate::shared::data::db::get_connection;

/// Raw report row for aggregation; only the KPI-relevant columns
#[derive(Debug, Clone, FromQueryResult)]
struct ReportRow {
    pub id: String,
    pub member_id: String,
    pub report_date: String,
    pub reach: i64,
    pub responses: i64,
    pub deals: i64,
    pub revenue: i64,
}

impl ReportRow {
    fn into_report(self) -> Report {
        let uuid = Uuid::parse_str(&self.id).unwrap_or_else(|_| Uuid::new_v4());
        let member_uuid = Uuid::parse_str(&self.member_id).unwrap_or_else(|_| Uuid::new_v4());
        let report_date =
            NaiveDate::parse_from_str(&self.report_date, "%Y-%m-%d").unwrap_or_default();

        Report {
            id: ReportId::new(uuid),
            member_id: MemberId::new(member_uuid),
            report_date,
            reach: self.reach,
            responses: self.responses,
            deals: self.deals,
            revenue: self.revenue,
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
}

/// All active reports inside the inclusive date range. Dates are stored in
/// canonical `YYYY-MM-DD` form, so SQL string comparison matches calendar
/// order.
pub async fn fetch_reports_in_range(
    date_from: NaiveDate,
    date_to: NaiveDate,
) -> Result<Vec<Report>> {
    let db = get_connection();

    let sql = r#"
        SELECT id, member_id, report_date, reach, responses, deals, revenue
        FROM a002_report
        WHERE is_deleted = 0 AND report_date >= ? AND report_date <= ?
        ORDER BY report_date, member_id
    "#;

    let stmt = Statement::from_sql_and_values(
        sea_orm::DatabaseBackend::Sqlite,
        sql,
        [date_from.to_string().into(), date_to.to_string().into()],
    );

    let rows = ReportRow::find_by_statement(stmt).all(db).await?;

    Ok(rows.into_iter().map(|r| r.into_report()).collect())
}
