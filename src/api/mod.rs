//! HTTP handlers and router for the booking API

pub mod bookings;
pub mod equipment;
pub mod extract;
pub mod health;
pub mod openapi;
pub mod share_requests;
pub mod training;

use axum::{
    routing::{delete, get, patch, post},
    Router,
};
use serde::Serialize;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::AppState;

/// Success envelope: `{success: true, message?, data?}`
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: None,
        }
    }

    pub fn ok() -> Self {
        Self {
            success: true,
            message: None,
            data: None,
        }
    }
}

/// Build the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let booking_routes = Router::new()
        // Equipment
        .route("/equipment/list", get(equipment::list_equipment))
        .route("/equipment/:id", get(equipment::get_equipment))
        .route("/equipment/:id/bookings", get(equipment::list_equipment_bookings))
        // Bookings
        .route("/booking/create", post(bookings::create_booking))
        .route("/booking/:id", get(bookings::get_booking))
        .route("/booking/:id/member/:account", delete(bookings::cancel_booking))
        .route("/member/:account/bookings", get(bookings::list_member_bookings))
        // Share requests
        .route("/share-request/create", post(share_requests::create_share_request))
        .route("/share-request/:id/handle", post(share_requests::handle_share_request))
        .route("/booking/:id/share-requests", get(share_requests::list_booking_requests))
        .route("/member/:account/share-requests/received", get(share_requests::list_received))
        .route("/member/:account/share-requests/sent", get(share_requests::list_sent))
        .route("/member/:account/share-requests/pending-count", get(share_requests::pending_count))
        // Training
        .route("/booking/:id/training-records", post(training::save_training_records))
        .route("/booking/:id/training-sessions", get(training::list_sessions))
        .route("/booking/:id/session/:session_id/complete", post(training::complete_session))
        .route("/booking/:id/session/:session_id", delete(training::delete_session))
        .route("/training-records/record/:id/completed", patch(training::update_record_completed));

    let api = Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .nest("/equipment-booking", booking_routes)
        .with_state(state);

    Router::new()
        .nest("/api", api)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
