use chrono::{NaiveDate, Utc};
use contracts::domain::a003_team_target::{TeamTarget, TeamTargetId};
use contracts::domain::common::{AggregateId, EntityMetadata};
use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

mod team_target {
    use sea_orm::entity::prelude::*;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "a003_team_target")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: String,
        pub month: String,
        pub target: i64,
        pub start_date: String,
        pub end_date: String,
        pub is_deleted: bool,
        pub created_at: Option<chrono::DateTime<chrono::Utc>>,
        pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
        pub version: i32,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

impl From<team_target::Model> for TeamTarget {
    fn from(m: team_target::Model) -> Self {
        let metadata = EntityMetadata {
            created_at: m.created_at.unwrap_or_else(Utc::now),
            updated_at: m.updated_at.unwrap_or_else(Utc::now),
            is_deleted: m.is_deleted,
            version: m.version,
        };

        let uuid = Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4());
        let start_date =
            NaiveDate::parse_from_str(&m.start_date, "%Y-%m-%d").unwrap_or_default();
        let end_date = NaiveDate::parse_from_str(&m.end_date, "%Y-%m-%d").unwrap_or_default();

        TeamTarget {
            id: TeamTargetId::new(uuid),
            month: m.month,
            target: m.target,
            start_date,
            end_date,
            metadata,
        }
    }
}

// ============================================================================
// Repository functions
// ============================================================================

pub async fn find_by_month(
    db: &DatabaseConnection,
    month: &str,
) -> Result<Option<TeamTarget>, DbErr> {
    let model = team_target::Entity::find()
        .filter(team_target::Column::IsDeleted.eq(false))
        .filter(team_target::Column::Month.eq(month))
        .one(db)
        .await?;
    Ok(model.map(|m| m.into()))
}

/// All configured months, ascending
pub async fn list_all(db: &DatabaseConnection) -> Result<Vec<TeamTarget>, DbErr> {
    let models = team_target::Entity::find()
        .filter(team_target::Column::IsDeleted.eq(false))
        .order_by_asc(team_target::Column::Month)
        .all(db)
        .await?;
    Ok(models.into_iter().map(|m| m.into()).collect())
}

pub async fn count(db: &DatabaseConnection) -> Result<u64, DbErr> {
    team_target::Entity::find()
        .filter(team_target::Column::IsDeleted.eq(false))
        .count(db)
        .await
}

pub async fn insert(db: &DatabaseConnection, t: &TeamTarget) -> Result<(), DbErr> {
    let now = Utc::now();

    let active_model = team_target::ActiveModel {
        id: Set(t.id.as_string()),
        month: Set(t.month.clone()),
        target: Set(t.target),
        start_date: Set(t.start_date.to_string()),
        end_date: Set(t.end_date.to_string()),
        is_deleted: Set(false),
        created_at: Set(Some(now)),
        updated_at: Set(Some(now)),
        version: Set(1),
    };

    active_model.insert(db).await?;
    Ok(())
}

pub async fn update(db: &DatabaseConnection, t: &TeamTarget) -> Result<(), DbErr> {
    let now = Utc::now();

    let active_model = team_target::ActiveModel {
        id: Set(t.id.as_string()),
        month: Set(t.month.clone()),
        target: Set(t.target),
        start_date: Set(t.start_date.to_string()),
        end_date: Set(t.end_date.to_string()),
        is_deleted: Set(t.metadata.is_deleted),
        created_at: Set(Some(t.metadata.created_at)),
        updated_at: Set(Some(now)),
        version: Set(t.metadata.version + 1),
    };

    team_target::Entity::update(active_model).exec(db).await?;
    Ok(())
}
