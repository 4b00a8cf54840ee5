use chrono::Utc;
use contracts::domain::a001_member::MemberId;
use contracts::domain::a004_target_allocation::AllocationShare;
use contracts::domain::common::AggregateId;
use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, Set};
use std::collections::HashMap;
use uuid::Uuid;

mod target_allocation {
    use sea_orm::entity::prelude::*;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "a004_target_allocation")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: String,
        pub member_id: String,
        pub month: String,
        pub percent: f64,
        pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

impl From<target_allocation::Model> for AllocationShare {
    fn from(m: target_allocation::Model) -> Self {
        let member_uuid = Uuid::parse_str(&m.member_id).unwrap_or_else(|_| Uuid::new_v4());
        AllocationShare {
            member_id: MemberId::new(member_uuid),
            month: m.month,
            percent: m.percent,
        }
    }
}

// ============================================================================
// Repository functions
// ============================================================================

/// Shares for a month keyed by member id string; empty when the month has
/// no allocation yet
pub async fn get_shares(
    db: &DatabaseConnection,
    month: &str,
) -> Result<HashMap<String, f64>, DbErr> {
    let models = target_allocation::Entity::find()
        .filter(target_allocation::Column::Month.eq(month))
        .all(db)
        .await?;

    Ok(models
        .into_iter()
        .map(|m| (m.member_id, m.percent))
        .collect())
}

/// Replace one month's rows with a new share set
pub async fn replace_month(
    db: &DatabaseConnection,
    month: &str,
    shares: &[AllocationShare],
) -> Result<(), DbErr> {
    target_allocation::Entity::delete_many()
        .filter(target_allocation::Column::Month.eq(month))
        .exec(db)
        .await?;

    let now = Utc::now();
    for share in shares {
        let active_model = target_allocation::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            member_id: Set(share.member_id.as_string()),
            month: Set(share.month.clone()),
            percent: Set(share.percent),
            created_at: Set(Some(now)),
        };
        active_model.insert(db).await?;
    }

    Ok(())
}
