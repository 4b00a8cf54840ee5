use chrono::{NaiveDate, Utc};
use contracts::domain::a001_member::MemberId;
use contracts::domain::a002_report::{Report, ReportId};
use contracts::domain::common::{AggregateId, EntityMetadata};
use sea_orm::entity::prelude::*;
use sea_orm::prelude::Expr;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set};
use uuid::Uuid;

mod report {
    use sea_orm::entity::prelude::*;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "a002_report")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: String,
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
        pub is_deleted: bool,
        pub created_at: Option<chrono::DateTime<chrono::Utc>>,
        pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
        pub version: i32,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

impl From<report::Model> for Report {
    fn from(m: report::Model) -> Self {
        let metadata = EntityMetadata {
            created_at: m.created_at.unwrap_or_else(Utc::now),
            updated_at: m.updated_at.unwrap_or_else(Utc::now),
            is_deleted: m.is_deleted,
            version: m.version,
        };

        let uuid = Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4());
        let member_uuid = Uuid::parse_str(&m.member_id).unwrap_or_else(|_| Uuid::new_v4());

        // Dates are validated at the ingest boundary; stored rows are in
        // canonical form.
        let report_date =
            NaiveDate::parse_from_str(&m.report_date, "%Y-%m-%d").unwrap_or_default();
        let order_date = m
            .order_date
            .as_deref()
            .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok());

        Report {
            id: ReportId::new(uuid),
            member_id: MemberId::new(member_uuid),
            report_date,
            reach: m.reach,
            responses: m.responses,
            deals: m.deals,
            revenue: m.revenue,
            product: m.product,
            channel: m.channel,
            warehouse: m.warehouse,
            order_code: m.order_code,
            order_date,
            customer_name: m.customer_name,
            phone: m.phone,
            address: m.address,
            note: m.note,
            status: m.status,
            metadata,
        }
    }
}

fn to_active_model(
    r: &Report,
    created_at: Option<chrono::DateTime<Utc>>,
    version: i32,
) -> report::ActiveModel {
    let now = Utc::now();

    report::ActiveModel {
        id: Set(r.id.as_string()),
        member_id: Set(r.member_id.as_string()),
        report_date: Set(r.report_date.to_string()),
        reach: Set(r.reach),
        responses: Set(r.responses),
        deals: Set(r.deals),
        revenue: Set(r.revenue),
        product: Set(r.product.clone()),
        channel: Set(r.channel.clone()),
        warehouse: Set(r.warehouse.clone()),
        order_code: Set(r.order_code.clone()),
        order_date: Set(r.order_date.map(|d| d.to_string())),
        customer_name: Set(r.customer_name.clone()),
        phone: Set(r.phone.clone()),
        address: Set(r.address.clone()),
        note: Set(r.note.clone()),
        status: Set(r.status.clone()),
        is_deleted: Set(false),
        created_at: Set(Some(created_at.unwrap_or(now))),
        updated_at: Set(Some(now)),
        version: Set(version),
    }
}

// ============================================================================
// Repository functions
// ============================================================================

/// List filter. Range boundaries are inclusive; dates are stored in
/// canonical `YYYY-MM-DD` form so string comparison in SQL matches calendar
/// order.
#[derive(Debug, Clone, Default)]
pub struct ReportListQuery {
    pub member_id: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub limit: Option<u64>,
}

pub async fn list(
    db: &DatabaseConnection,
    query: &ReportListQuery,
) -> Result<Vec<Report>, DbErr> {
    let mut find = report::Entity::find().filter(report::Column::IsDeleted.eq(false));

    if let Some(member_id) = &query.member_id {
        find = find.filter(report::Column::MemberId.eq(member_id.clone()));
    }
    if let Some(from) = query.date_from {
        find = find.filter(report::Column::ReportDate.gte(from.to_string()));
    }
    if let Some(to) = query.date_to {
        find = find.filter(report::Column::ReportDate.lte(to.to_string()));
    }

    let mut find = find
        .order_by_desc(report::Column::ReportDate)
        .order_by_desc(report::Column::CreatedAt);
    if let Some(limit) = query.limit {
        find = find.limit(limit);
    }

    let models = find.all(db).await?;
    Ok(models.into_iter().map(|m| m.into()).collect())
}

pub async fn find_by_id(
    db: &DatabaseConnection,
    id: &ReportId,
) -> Result<Option<Report>, DbErr> {
    let model = report::Entity::find_by_id(id.as_string()).one(db).await?;
    Ok(model.map(|m| m.into()))
}

pub async fn count(db: &DatabaseConnection) -> Result<u64, DbErr> {
    report::Entity::find()
        .filter(report::Column::IsDeleted.eq(false))
        .count(db)
        .await
}

pub async fn insert(db: &DatabaseConnection, r: &Report) -> Result<(), DbErr> {
    to_active_model(r, None, 1).insert(db).await?;
    Ok(())
}

pub async fn update(db: &DatabaseConnection, r: &Report) -> Result<(), DbErr> {
    let active_model = to_active_model(
        r,
        Some(r.metadata.created_at),
        r.metadata.version + 1,
    );
    report::Entity::update(active_model).exec(db).await?;
    Ok(())
}

pub async fn soft_delete(db: &DatabaseConnection, id: &ReportId) -> Result<(), DbErr> {
    let now = Utc::now();
    report::Entity::update_many()
        .col_expr(report::Column::IsDeleted, Expr::value(true))
        .col_expr(report::Column::UpdatedAt, Expr::value(now))
        .filter(report::Column::Id.eq(id.as_string()))
        .exec(db)
        .await?;
    Ok(())
}
