//! whistl API Library
//!
//! Emergency-coordination supply service: alerts, supply lists, and
//! concurrency-safe supply-item claiming.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod health;
pub mod migrator;
pub mod openapi;
pub mod services;

use axum::{
    routing::{get, post},
    Router,
};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub event_sender: events::EventSender,
    pub services: handlers::AppServices,
}

// Common response wrapper for non-paginated endpoints
#[derive(Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            errors: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
            errors: None,
        }
    }
}

/// Build the versioned API router
pub fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/alerts",
            get(handlers::alerts::list_alerts).post(handlers::alerts::create_alert),
        )
        .route("/alerts/:id", get(handlers::alerts::get_alert))
        .route(
            "/alerts/:alert_id/items",
            get(handlers::preparation_items::list_items)
                .post(handlers::preparation_items::add_item),
        )
        .route(
            "/alerts/:alert_id/items/:item_id",
            get(handlers::preparation_items::get_item),
        )
        .route(
            "/alerts/:alert_id/claims",
            get(handlers::claims::list_alert_claims),
        )
        .route("/claims", post(handlers::claims::claim_item))
}
