use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveModelBehavior, ActiveValue, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A claim on a preparation item.
///
/// Rows are inserted by the claim resolver and never updated or deleted.
/// The `preparation_item_id` column carries a unique index; it is what
/// serializes concurrent claims on the same item.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "supply_claims")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub preparation_item_id: Uuid,
    pub user_id: Uuid,
    pub quantity: i32,
    pub claimed_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::preparation_item::Entity",
        from = "Column::PreparationItemId",
        to = "super::preparation_item::Column::Id"
    )]
    PreparationItem,
}

impl Related<super::preparation_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PreparationItem.def()
    }
}

#[async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C: ConnectionTrait>(self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let mut active_model = self;

        if insert {
            if let ActiveValue::NotSet = active_model.claimed_at {
                active_model.claimed_at = Set(Utc::now());
            }

            if let ActiveValue::NotSet = active_model.id {
                active_model.id = Set(Uuid::new_v4());
            }
        }

        Ok(active_model)
    }
}
