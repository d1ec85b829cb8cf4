//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{bookings, equipment, health, share_requests, training};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Gym Booking API",
        version = "0.1.0",
        description = "Equipment booking, slot sharing and training log REST API"
    ),
    servers(
        (url = "/api", description = "API")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Equipment
        equipment::list_equipment,
        equipment::get_equipment,
        equipment::list_equipment_bookings,
        // Bookings
        bookings::create_booking,
        bookings::get_booking,
        bookings::cancel_booking,
        bookings::list_member_bookings,
        // Share requests
        share_requests::create_share_request,
        share_requests::handle_share_request,
        share_requests::list_booking_requests,
        share_requests::list_received,
        share_requests::list_sent,
        share_requests::pending_count,
        // Training
        training::save_training_records,
        training::list_sessions,
        training::update_record_completed,
        training::complete_session,
        training::delete_session,
    ),
    components(
        schemas(
            // Equipment
            crate::models::Equipment,
            crate::models::EquipmentStatus,
            crate::models::Member,
            // Bookings
            crate::models::Booking,
            crate::models::BookingView,
            crate::models::BookingDetails,
            crate::models::BookingStatus,
            crate::models::BookingAccess,
            crate::models::booking::CreateBookingRequest,
            bookings::BookingCreated,
            // Share requests
            crate::models::ShareRequest,
            crate::models::ShareRequestDetails,
            crate::models::ShareRequestStatus,
            crate::models::ShareAction,
            crate::models::share_request::CreateShareRequest,
            crate::models::share_request::HandleShareRequest,
            crate::models::share_request::PendingCount,
            share_requests::ShareRequestCreated,
            // Training
            crate::models::TrainingSession,
            crate::models::TrainingRecord,
            crate::models::TrainingSessionDetails,
            crate::models::SessionStatus,
            crate::models::training::TrainingRecordInput,
            crate::models::training::SaveTrainingRecords,
            crate::models::training::SavedTrainingRecords,
            crate::models::training::UpdateRecordCompleted,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "equipment", description = "Bookable equipment"),
        (name = "bookings", description = "Equipment bookings"),
        (name = "share-requests", description = "Requests to share a booked slot"),
        (name = "training", description = "Training sessions logged against a booking")
    )
)]
pub struct ApiDoc;

/// Swagger UI and the raw OpenAPI document
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
