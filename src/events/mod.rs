use chrono::{DateTime, Utc};
use metrics::counter;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    /// Creates a new EventSender
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }
}

// Define the various events that can occur in the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    // Alert events
    AlertCreated {
        alert_id: Uuid,
        severity: String,
        created_by: Uuid,
    },

    // Supply list events
    PreparationItemAdded {
        alert_id: Uuid,
        item_id: Uuid,
        total_quantity: i32,
    },

    // Claim events
    SupplyClaimed {
        claim_id: Uuid,
        alert_id: Uuid,
        item_id: Uuid,
        user_id: Uuid,
        quantity: i32,
        claimed_at: DateTime<Utc>,
    },
}

impl Event {
    fn kind(&self) -> &'static str {
        match self {
            Event::AlertCreated { .. } => "alert_created",
            Event::PreparationItemAdded { .. } => "preparation_item_added",
            Event::SupplyClaimed { .. } => "supply_claimed",
        }
    }
}

/// Drains the event channel, logging each event.
///
/// Runs as a background task for the lifetime of the process; exits when
/// every sender has been dropped.
pub async fn process_events(mut receiver: mpsc::Receiver<Event>) {
    info!("Event processor started");

    while let Some(event) = receiver.recv().await {
        counter!("whistl_events.processed", 1, "kind" => event.kind());

        match &event {
            Event::AlertCreated {
                alert_id,
                severity,
                created_by,
            } => {
                info!(%alert_id, %severity, %created_by, "alert created");
            }
            Event::PreparationItemAdded {
                alert_id,
                item_id,
                total_quantity,
            } => {
                info!(%alert_id, %item_id, total_quantity, "preparation item added");
            }
            Event::SupplyClaimed {
                claim_id,
                alert_id,
                item_id,
                user_id,
                quantity,
                ..
            } => {
                info!(%claim_id, %alert_id, %item_id, %user_id, quantity, "supply item claimed");
            }
        }
    }

    warn!("Event channel closed; event processor exiting");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn events_round_trip_through_channel() {
        let (tx, mut rx) = mpsc::channel(8);
        let sender = EventSender::new(tx);

        let alert_id = Uuid::new_v4();
        sender
            .send(Event::AlertCreated {
                alert_id,
                severity: "critical".into(),
                created_by: Uuid::new_v4(),
            })
            .await
            .expect("send should succeed");

        match rx.recv().await {
            Some(Event::AlertCreated { alert_id: got, .. }) => assert_eq!(got, alert_id),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn send_fails_after_receiver_dropped() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let sender = EventSender::new(tx);

        let result = sender
            .send(Event::PreparationItemAdded {
                alert_id: Uuid::new_v4(),
                item_id: Uuid::new_v4(),
                total_quantity: 5,
            })
            .await;
        assert!(result.is_err());
    }
}
