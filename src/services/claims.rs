//! Supply-item claim resolution.
//!
//! Claims are exclusive: the first claimant takes the item, and the unique
//! index on `supply_claims.preparation_item_id` is what enforces that under
//! concurrency. The lookups ahead of the insert are an optimistic pre-check
//! that exists to produce fast, specific rejections; they are not race-free
//! and are not relied on for correctness.

use metrics::counter;
use sea_orm::error::SqlErr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set,
};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::entities::preparation_item::{self, Entity as PreparationItemEntity};
use crate::entities::supply_claim::{self, Entity as SupplyClaimEntity};
use crate::errors::{ClaimError, ServiceError};
use crate::events::{Event, EventSender};

/// A validated claim request. Handlers are responsible for producing this
/// from the wire format; by the time it reaches the service every field is
/// present and the quantity is positive.
#[derive(Debug, Clone)]
pub struct ClaimItemCommand {
    pub item_id: Uuid,
    pub user_id: Uuid,
    pub alert_id: Uuid,
    pub quantity: i32,
}

/// Service resolving claims on preparation items.
#[derive(Clone)]
pub struct ClaimService {
    db_pool: Arc<DatabaseConnection>,
    event_sender: EventSender,
}

impl ClaimService {
    /// Creates a new claim service instance
    pub fn new(db_pool: Arc<DatabaseConnection>, event_sender: EventSender) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Resolves a claim request against an item's supply.
    ///
    /// Exactly one row is inserted on success; on any rejection nothing is
    /// written. A `RaceLost` rejection is terminal for this request —
    /// whether to retry is the caller's decision.
    #[instrument(skip(self), fields(item_id = %command.item_id, user_id = %command.user_id))]
    pub async fn claim_item(
        &self,
        command: ClaimItemCommand,
    ) -> Result<supply_claim::Model, ClaimError> {
        let db = &*self.db_pool;

        // Pre-check: any existing claim closes the item, no matter whose.
        let existing = SupplyClaimEntity::find()
            .filter(supply_claim::Column::PreparationItemId.eq(command.item_id))
            .one(db)
            .await?;

        if let Some(existing_claim) = existing {
            counter!("whistl_claims.rejected", 1, "reason" => "already_claimed");
            return Err(ClaimError::AlreadyClaimed { existing_claim });
        }

        // Scope by alert as well as item id so an item id reused under a
        // different alert cannot be claimed through the wrong alert.
        let item = PreparationItemEntity::find_by_id(command.item_id)
            .filter(preparation_item::Column::AlertId.eq(command.alert_id))
            .one(db)
            .await?;

        let Some(item) = item else {
            counter!("whistl_claims.rejected", 1, "reason" => "not_found");
            return Err(ClaimError::NotFound);
        };

        if command.quantity > item.total_quantity {
            counter!("whistl_claims.rejected", 1, "reason" => "insufficient_quantity");
            return Err(ClaimError::InsufficientQuantity {
                available: item.total_quantity,
            });
        }

        let claim = supply_claim::ActiveModel {
            preparation_item_id: Set(command.item_id),
            user_id: Set(command.user_id),
            quantity: Set(command.quantity),
            ..Default::default()
        };

        // The unique index arbitrates the window between the pre-check and
        // this insert.
        let inserted = claim.insert(db).await.map_err(|e| {
            if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                counter!("whistl_claims.rejected", 1, "reason" => "race_lost");
                warn!(
                    item_id = %command.item_id,
                    user_id = %command.user_id,
                    "claim lost the race to a concurrent request"
                );
                ClaimError::RaceLost
            } else {
                ClaimError::Storage(e)
            }
        })?;

        counter!("whistl_claims.accepted", 1);
        info!(
            claim_id = %inserted.id,
            quantity = inserted.quantity,
            "claim accepted"
        );

        // Event delivery is best-effort; the claim is already durable.
        if let Err(e) = self
            .event_sender
            .send(Event::SupplyClaimed {
                claim_id: inserted.id,
                alert_id: command.alert_id,
                item_id: inserted.preparation_item_id,
                user_id: inserted.user_id,
                quantity: inserted.quantity,
                claimed_at: inserted.claimed_at,
            })
            .await
        {
            warn!(claim_id = %inserted.id, error = %e, "failed to publish claim event");
        }

        Ok(inserted)
    }

    /// Lists the claims recorded under an alert, newest first.
    #[instrument(skip(self))]
    pub async fn list_claims_for_alert(
        &self,
        alert_id: Uuid,
    ) -> Result<Vec<supply_claim::Model>, ServiceError> {
        let db = &*self.db_pool;

        let claims = SupplyClaimEntity::find()
            .join(
                JoinType::InnerJoin,
                supply_claim::Relation::PreparationItem.def(),
            )
            .filter(preparation_item::Column::AlertId.eq(alert_id))
            .order_by_desc(supply_claim::Column::ClaimedAt)
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok(claims)
    }

    /// Fetches the claim for a single item, if any.
    #[instrument(skip(self))]
    pub async fn claim_for_item(
        &self,
        item_id: Uuid,
    ) -> Result<Option<supply_claim::Model>, ServiceError> {
        let db = &*self.db_pool;

        let claim = SupplyClaimEntity::find()
            .filter(supply_claim::Column::PreparationItemId.eq(item_id))
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok(claim)
    }
}
