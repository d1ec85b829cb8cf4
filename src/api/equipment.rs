//! Equipment API endpoints

use axum::{
    extract::State,
    Json,
};

use crate::{
    error::AppResult,
    models::{BookingView, Equipment},
    AppState,
};

use super::{extract::ApiPath, ApiResponse};

/// List equipment that can be booked
#[utoipa::path(
    get,
    path = "/equipment-booking/equipment/list",
    tag = "equipment",
    responses(
        (status = 200, description = "Bookable equipment", body = Vec<Equipment>)
    )
)]
pub async fn list_equipment(State(state): State<AppState>) -> AppResult<Json<ApiResponse<Vec<Equipment>>>> {
    let equipment = state.services.equipment.list_bookable().await?;
    Ok(Json(ApiResponse::data(equipment)))
}

/// Get equipment by ID
#[utoipa::path(
    get,
    path = "/equipment-booking/equipment/{id}",
    tag = "equipment",
    params(("id" = i32, Path, description = "Equipment ID")),
    responses(
        (status = 200, description = "Equipment details", body = Equipment),
        (status = 404, description = "Equipment not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_equipment(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> AppResult<Json<ApiResponse<Equipment>>> {
    let equipment = state.services.equipment.get_by_id(id).await?;
    Ok(Json(ApiResponse::data(equipment)))
}

/// Active bookings on one equipment that have not ended yet
#[utoipa::path(
    get,
    path = "/equipment-booking/equipment/{id}/bookings",
    tag = "equipment",
    params(("id" = i32, Path, description = "Equipment ID")),
    responses(
        (status = 200, description = "Upcoming bookings, earliest first", body = Vec<BookingView>)
    )
)]
pub async fn list_equipment_bookings(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> AppResult<Json<ApiResponse<Vec<BookingView>>>> {
    let bookings = state.services.equipment.list_active_bookings_for(id).await?;
    Ok(Json(ApiResponse::data(bookings)))
}
