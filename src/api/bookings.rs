//! Booking API endpoints

use axum::{
    extract::State,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::{booking::CreateBookingRequest, BookingDetails, BookingView},
    AppState,
};

use super::{
    extract::{ApiJson, ApiPath},
    ApiResponse,
};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingCreated {
    pub booking_id: i32,
}

/// Book a time window on one equipment
#[utoipa::path(
    post,
    path = "/equipment-booking/booking/create",
    tag = "bookings",
    request_body = CreateBookingRequest,
    responses(
        (status = 200, description = "Booking created", body = BookingCreated),
        (status = 400, description = "Missing fields or invalid time window", body = crate::error::ErrorResponse),
        (status = 404, description = "Unknown member or equipment", body = crate::error::ErrorResponse),
        (status = 409, description = "Time window already booked", body = crate::error::ErrorResponse),
        (status = 422, description = "Equipment cannot be booked", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_booking(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateBookingRequest>,
) -> AppResult<Json<ApiResponse<BookingCreated>>> {
    let booking_id = state.services.bookings.create_booking(&request).await?;
    Ok(Json(ApiResponse::data(BookingCreated { booking_id })))
}

/// Booking with its share requests and training sessions
#[utoipa::path(
    get,
    path = "/equipment-booking/booking/{id}",
    tag = "bookings",
    params(("id" = i32, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking details", body = BookingDetails),
        (status = 404, description = "Booking not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_booking(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> AppResult<Json<ApiResponse<BookingDetails>>> {
    let details = state.services.bookings.get_booking_details(id).await?;
    Ok(Json(ApiResponse::data(details)))
}

/// Cancel a booking; only its owner may do so
#[utoipa::path(
    delete,
    path = "/equipment-booking/booking/{id}/member/{account}",
    tag = "bookings",
    params(
        ("id" = i32, Path, description = "Booking ID"),
        ("account" = i64, Path, description = "Owner's member account")
    ),
    responses(
        (status = 200, description = "Booking cancelled"),
        (status = 404, description = "Booking not found or not permitted", body = crate::error::ErrorResponse)
    )
)]
pub async fn cancel_booking(
    State(state): State<AppState>,
    ApiPath((id, account)): ApiPath<(i32, i64)>,
) -> AppResult<Json<ApiResponse<()>>> {
    if !state.services.bookings.cancel_booking(id, account).await? {
        return Err(AppError::NotFound("booking not found or not permitted".to_string()));
    }
    Ok(Json(ApiResponse::message("booking cancelled")))
}

/// A member's own bookings plus bookings shared with them
#[utoipa::path(
    get,
    path = "/equipment-booking/member/{account}/bookings",
    tag = "bookings",
    params(("account" = i64, Path, description = "Member account")),
    responses(
        (status = 200, description = "Bookings, latest first", body = Vec<BookingView>)
    )
)]
pub async fn list_member_bookings(
    State(state): State<AppState>,
    ApiPath(account): ApiPath<i64>,
) -> AppResult<Json<ApiResponse<Vec<BookingView>>>> {
    let bookings = state.services.bookings.get_bookings_for_member(account).await?;
    Ok(Json(ApiResponse::data(bookings)))
}
