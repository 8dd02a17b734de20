pub mod alerts;
pub mod claims;
pub mod common;
pub mod preparation_items;

use crate::db::DbPool;
use crate::events::EventSender;
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub alerts: Arc<crate::services::AlertService>,
    pub preparation_items: Arc<crate::services::PreparationItemService>,
    pub claims: Arc<crate::services::ClaimService>,
}

impl AppServices {
    /// Build the AppServices container from the shared pool and event channel.
    pub fn new(db_pool: Arc<DbPool>, event_sender: EventSender) -> Self {
        let alerts = Arc::new(crate::services::AlertService::new(
            db_pool.clone(),
            event_sender.clone(),
        ));
        let preparation_items = Arc::new(crate::services::PreparationItemService::new(
            db_pool.clone(),
            event_sender.clone(),
        ));
        let claims = Arc::new(crate::services::ClaimService::new(db_pool, event_sender));

        Self {
            alerts,
            preparation_items,
            claims,
        }
    }
}
