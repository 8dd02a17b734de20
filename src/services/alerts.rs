use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryOrder, Set};
use std::sync::Arc;
use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::entities::alert::{self, AlertSeverity, Entity as AlertEntity};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};

#[derive(Debug, Clone)]
pub struct CreateAlertCommand {
    pub title: String,
    pub description: Option<String>,
    pub severity: AlertSeverity,
    pub created_by: Uuid,
}

/// Service for managing alerts
#[derive(Clone)]
pub struct AlertService {
    db_pool: Arc<DatabaseConnection>,
    event_sender: EventSender,
}

impl AlertService {
    /// Creates a new alert service instance
    pub fn new(db_pool: Arc<DatabaseConnection>, event_sender: EventSender) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Creates an alert and announces it on the event channel.
    #[instrument(skip(self))]
    pub async fn create_alert(
        &self,
        command: CreateAlertCommand,
    ) -> Result<alert::Model, ServiceError> {
        let db = &*self.db_pool;

        let model = alert::ActiveModel {
            title: Set(command.title),
            description: Set(command.description),
            severity: Set(command.severity.as_str().to_string()),
            created_by: Set(command.created_by),
            ..Default::default()
        };

        let inserted = model.insert(db).await.map_err(ServiceError::DatabaseError)?;

        info!(alert_id = %inserted.id, severity = %inserted.severity, "alert created");

        if let Err(e) = self
            .event_sender
            .send(Event::AlertCreated {
                alert_id: inserted.id,
                severity: inserted.severity.clone(),
                created_by: inserted.created_by,
            })
            .await
        {
            error!(alert_id = %inserted.id, error = %e, "failed to publish alert event");
        }

        Ok(inserted)
    }

    /// Gets an alert by id
    #[instrument(skip(self))]
    pub async fn get_alert(&self, alert_id: Uuid) -> Result<Option<alert::Model>, ServiceError> {
        let db = &*self.db_pool;

        let found = AlertEntity::find_by_id(alert_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok(found)
    }

    /// Lists alerts with pagination, newest first
    #[instrument(skip(self))]
    pub async fn list_alerts(
        &self,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<alert::Model>, u64), ServiceError> {
        let db = &*self.db_pool;

        let paginator = AlertEntity::find()
            .order_by_desc(alert::Column::CreatedAt)
            .paginate(db, per_page);

        let total = paginator.num_items().await.map_err(|e| {
            error!(error = %e, "failed to count alerts");
            ServiceError::DatabaseError(e)
        })?;

        let alerts = paginator.fetch_page(page.saturating_sub(1)).await.map_err(|e| {
            error!(page, per_page, error = %e, "failed to fetch alerts page");
            ServiceError::DatabaseError(e)
        })?;

        Ok((alerts, total))
    }
}
