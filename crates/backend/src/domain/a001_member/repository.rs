use chrono::Utc;
use contracts::domain::a001_member::{Member, MemberId, MemberRole};
use contracts::domain::common::{AggregateId, EntityMetadata};
use sea_orm::entity::prelude::*;
use sea_orm::prelude::Expr;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

mod member {
    use sea_orm::entity::prelude::*;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "a001_member")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: String,
        pub name: String,
        pub role: String,
        pub color: String,
        pub pin: String,
        pub is_deleted: bool,
        pub created_at: Option<chrono::DateTime<chrono::Utc>>,
        pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
        pub version: i32,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

impl From<member::Model> for Member {
    fn from(m: member::Model) -> Self {
        let metadata = EntityMetadata {
            created_at: m.created_at.unwrap_or_else(Utc::now),
            updated_at: m.updated_at.unwrap_or_else(Utc::now),
            is_deleted: m.is_deleted,
            version: m.version,
        };

        let uuid = Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4());
        let role = MemberRole::from_str(&m.role).unwrap_or(MemberRole::Regular);

        Member {
            id: MemberId::new(uuid),
            name: m.name,
            role,
            color: m.color,
            pin: m.pin,
            metadata,
        }
    }
}

// ============================================================================
// Repository functions
// ============================================================================

/// All active members, oldest first (seed order)
pub async fn list_all(db: &DatabaseConnection) -> Result<Vec<Member>, DbErr> {
    let models = member::Entity::find()
        .filter(member::Column::IsDeleted.eq(false))
        .order_by_asc(member::Column::CreatedAt)
        .all(db)
        .await?;

    Ok(models.into_iter().map(|m| m.into()).collect())
}

pub async fn find_by_id(
    db: &DatabaseConnection,
    id: &MemberId,
) -> Result<Option<Member>, DbErr> {
    let model = member::Entity::find_by_id(id.as_string()).one(db).await?;
    Ok(model.map(|m| m.into()))
}

pub async fn count(db: &DatabaseConnection) -> Result<u64, DbErr> {
    member::Entity::find()
        .filter(member::Column::IsDeleted.eq(false))
        .count(db)
        .await
}

pub async fn insert(db: &DatabaseConnection, m: &Member) -> Result<(), DbErr> {
    let now = Utc::now();

    let active_model = member::ActiveModel {
        id: Set(m.id.as_string()),
        name: Set(m.name.clone()),
        role: Set(m.role.as_str().to_string()),
        color: Set(m.color.clone()),
        pin: Set(m.pin.clone()),
        is_deleted: Set(false),
        created_at: Set(Some(now)),
        updated_at: Set(Some(now)),
        version: Set(1),
    };

    active_model.insert(db).await?;
    Ok(())
}

pub async fn update_pin(
    db: &DatabaseConnection,
    id: &MemberId,
    new_pin: &str,
) -> Result<(), DbErr> {
    let now = Utc::now();
    member::Entity::update_many()
        .col_expr(member::Column::Pin, Expr::value(new_pin))
        .col_expr(member::Column::UpdatedAt, Expr::value(now))
        .filter(member::Column::Id.eq(id.as_string()))
        .exec(db)
        .await?;
    Ok(())
}
