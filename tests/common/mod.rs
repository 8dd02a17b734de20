use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tokio::sync::mpsc;
use tower::ServiceExt;
use uuid::Uuid;
use whistl_api::{
    config::AppConfig,
    db,
    entities::AlertSeverity,
    events::{self, EventSender},
    handlers::AppServices,
    services::{alerts::CreateAlertCommand, preparation_items::AddPreparationItemCommand},
    AppState,
};

/// Helper harness for spinning up an application state backed by a
/// throwaway SQLite database.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    _event_task: tokio::task::JoinHandle<()>,
    _db_dir: TempDir,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new() -> Self {
        let db_dir = tempfile::tempdir().expect("failed to create temp dir");
        let db_path = db_dir.path().join("whistl_test.db");

        let mut cfg = AppConfig::new(
            format!("sqlite://{}?mode=rwc", db_path.display()),
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );
        cfg.auto_migrate = true;
        // A single connection keeps SQLite free of writer lock errors while
        // still letting claim attempts interleave between awaits.
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations");

        let db_arc = Arc::new(pool);
        let (event_tx, event_rx) = mpsc::channel(100);
        let event_sender = EventSender::new(event_tx);
        let event_task = tokio::spawn(events::process_events(event_rx));

        let services = AppServices::new(db_arc.clone(), event_sender.clone());

        let state = AppState {
            db: db_arc,
            config: cfg,
            event_sender,
            services,
        };

        let router = Router::new()
            .nest("/api/v1", whistl_api::api_v1_routes())
            .with_state(state.clone());

        Self {
            router,
            state,
            _event_task: event_task,
            _db_dir: db_dir,
        }
    }

    /// Issue a request against the router and decode the JSON response.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                builder
                    .body(Body::from(json.to_string()))
                    .expect("failed to build request")
            }
            None => builder.body(Body::empty()).expect("failed to build request"),
        };

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("request failed");

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("failed to read body")
            .to_bytes();

        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        (status, json)
    }

    /// Seed an alert directly through the service layer; returns its id.
    pub async fn seed_alert(&self) -> Uuid {
        let alert = self
            .state
            .services
            .alerts
            .create_alert(CreateAlertCommand {
                title: "Flood warning".to_string(),
                description: Some("River level rising".to_string()),
                severity: AlertSeverity::Warning,
                created_by: Uuid::new_v4(),
            })
            .await
            .expect("failed to seed alert");
        alert.id
    }

    /// Seed a preparation item under an alert; returns its id.
    pub async fn seed_item(&self, alert_id: Uuid, name: &str, total_quantity: i32) -> Uuid {
        let item = self
            .state
            .services
            .preparation_items
            .add_item(AddPreparationItemCommand {
                alert_id,
                name: name.to_string(),
                total_quantity,
                unit: Some("units".to_string()),
            })
            .await
            .expect("failed to seed item");
        item.id
    }
}
