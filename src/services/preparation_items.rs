use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::alert::Entity as AlertEntity;
use crate::entities::preparation_item::{self, Entity as PreparationItemEntity};
use crate::entities::supply_claim;
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};

#[derive(Debug, Clone)]
pub struct AddPreparationItemCommand {
    pub alert_id: Uuid,
    pub name: String,
    pub total_quantity: i32,
    pub unit: Option<String>,
}

/// Supply-list view of an item: the item plus its claim state.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SupplyItemStatus {
    pub id: Uuid,
    pub alert_id: Uuid,
    pub name: String,
    pub total_quantity: i32,
    pub unit: Option<String>,
    pub claimed: bool,
    pub claimed_by: Option<Uuid>,
    pub claimed_quantity: Option<i32>,
    pub claimed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl SupplyItemStatus {
    fn from_item_and_claim(
        item: preparation_item::Model,
        claim: Option<supply_claim::Model>,
    ) -> Self {
        Self {
            id: item.id,
            alert_id: item.alert_id,
            name: item.name,
            total_quantity: item.total_quantity,
            unit: item.unit,
            claimed: claim.is_some(),
            claimed_by: claim.as_ref().map(|c| c.user_id),
            claimed_quantity: claim.as_ref().map(|c| c.quantity),
            claimed_at: claim.as_ref().map(|c| c.claimed_at),
            created_at: item.created_at,
        }
    }
}

/// Service for managing an alert's supply list.
#[derive(Clone)]
pub struct PreparationItemService {
    db_pool: Arc<DatabaseConnection>,
    event_sender: EventSender,
}

impl PreparationItemService {
    /// Creates a new preparation item service instance
    pub fn new(db_pool: Arc<DatabaseConnection>, event_sender: EventSender) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Adds an item to an alert's supply list.
    ///
    /// The total quantity is fixed here; there is no resize operation.
    #[instrument(skip(self))]
    pub async fn add_item(
        &self,
        command: AddPreparationItemCommand,
    ) -> Result<preparation_item::Model, ServiceError> {
        let db = &*self.db_pool;

        let alert = AlertEntity::find_by_id(command.alert_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        if alert.is_none() {
            return Err(ServiceError::NotFound(format!(
                "Alert {} not found",
                command.alert_id
            )));
        }

        let model = preparation_item::ActiveModel {
            alert_id: Set(command.alert_id),
            name: Set(command.name),
            total_quantity: Set(command.total_quantity),
            unit: Set(command.unit),
            ..Default::default()
        };

        let inserted = model.insert(db).await.map_err(ServiceError::DatabaseError)?;

        info!(
            item_id = %inserted.id,
            alert_id = %inserted.alert_id,
            total_quantity = inserted.total_quantity,
            "preparation item added"
        );

        if let Err(e) = self
            .event_sender
            .send(Event::PreparationItemAdded {
                alert_id: inserted.alert_id,
                item_id: inserted.id,
                total_quantity: inserted.total_quantity,
            })
            .await
        {
            error!(item_id = %inserted.id, error = %e, "failed to publish item event");
        }

        Ok(inserted)
    }

    /// Gets a single item, scoped to its alert.
    #[instrument(skip(self))]
    pub async fn get_item(
        &self,
        alert_id: Uuid,
        item_id: Uuid,
    ) -> Result<Option<preparation_item::Model>, ServiceError> {
        let db = &*self.db_pool;

        let item = PreparationItemEntity::find_by_id(item_id)
            .filter(preparation_item::Column::AlertId.eq(alert_id))
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok(item)
    }

    /// Lists an alert's supply list with claim status per item.
    #[instrument(skip(self))]
    pub async fn list_for_alert(
        &self,
        alert_id: Uuid,
    ) -> Result<Vec<SupplyItemStatus>, ServiceError> {
        let db = &*self.db_pool;

        let items_with_claims = PreparationItemEntity::find()
            .filter(preparation_item::Column::AlertId.eq(alert_id))
            .order_by_asc(preparation_item::Column::CreatedAt)
            .find_with_related(supply_claim::Entity)
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        let statuses = items_with_claims
            .into_iter()
            .map(|(item, mut claims)| {
                // The unique index guarantees at most one claim per item.
                SupplyItemStatus::from_item_and_claim(item, claims.pop())
            })
            .collect();

        Ok(statuses)
    }
}
