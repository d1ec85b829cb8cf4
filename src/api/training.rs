//! Training session API endpoints

use axum::{
    extract::State,
    Json,
};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        training::{SaveTrainingRecords, SavedTrainingRecords, SessionMemberQuery, UpdateRecordCompleted},
        TrainingSessionDetails,
    },
    AppState,
};

use super::{
    extract::{ApiJson, ApiPath, ApiQuery},
    ApiResponse,
};

/// Save a batch of sets as a new training session
#[utoipa::path(
    post,
    path = "/equipment-booking/booking/{id}/training-records",
    tag = "training",
    params(("id" = i32, Path, description = "Booking ID")),
    request_body = SaveTrainingRecords,
    responses(
        (status = 200, description = "Session saved", body = SavedTrainingRecords),
        (status = 403, description = "Not the booking owner", body = crate::error::ErrorResponse),
        (status = 404, description = "Booking not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn save_training_records(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(request): ApiJson<SaveTrainingRecords>,
) -> AppResult<Json<ApiResponse<SavedTrainingRecords>>> {
    request.validate()?;
    let Some(member_account) = request.member_account else {
        return Err(AppError::Validation("memberAccount is required".to_string()));
    };

    let saved = state
        .services
        .training
        .save_training_records(id, request.records, request.fully_complete, member_account)
        .await?;
    Ok(Json(ApiResponse::data(saved)))
}

/// Sessions of a booking with their records
#[utoipa::path(
    get,
    path = "/equipment-booking/booking/{id}/training-sessions",
    tag = "training",
    params(("id" = i32, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Sessions, newest first", body = Vec<TrainingSessionDetails>)
    )
)]
pub async fn list_sessions(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> AppResult<Json<ApiResponse<Vec<TrainingSessionDetails>>>> {
    let sessions = state.services.training.list_sessions_for_booking(id).await?;
    Ok(Json(ApiResponse::data(sessions)))
}

/// Toggle the completed flag of one record
#[utoipa::path(
    patch,
    path = "/equipment-booking/training-records/record/{id}/completed",
    tag = "training",
    params(("id" = i32, Path, description = "Training record ID")),
    request_body = UpdateRecordCompleted,
    responses(
        (status = 200, description = "Record updated"),
        (status = 403, description = "Not the booking owner", body = crate::error::ErrorResponse),
        (status = 409, description = "Session is locked", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_record_completed(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(request): ApiJson<UpdateRecordCompleted>,
) -> AppResult<Json<ApiResponse<()>>> {
    request.validate()?;
    let (Some(completed), Some(member_account)) = (request.completed, request.member_account) else {
        return Err(AppError::Validation("please fill in all required fields".to_string()));
    };

    state
        .services
        .training
        .update_record_completed(id, completed, member_account)
        .await?;
    Ok(Json(ApiResponse::ok()))
}

/// Lock a session
#[utoipa::path(
    post,
    path = "/equipment-booking/booking/{id}/session/{session_id}/complete",
    tag = "training",
    params(
        ("id" = i32, Path, description = "Booking ID"),
        ("session_id" = i32, Path, description = "Training session ID")
    ),
    responses(
        (status = 200, description = "Session locked"),
        (status = 404, description = "Session not found or already locked", body = crate::error::ErrorResponse)
    )
)]
pub async fn complete_session(
    State(state): State<AppState>,
    ApiPath((id, session_id)): ApiPath<(i32, i32)>,
) -> AppResult<Json<ApiResponse<()>>> {
    state.services.training.complete_session(id, session_id).await?;
    Ok(Json(ApiResponse::ok()))
}

/// Delete a session and its records
#[utoipa::path(
    delete,
    path = "/equipment-booking/booking/{id}/session/{session_id}",
    tag = "training",
    params(
        ("id" = i32, Path, description = "Booking ID"),
        ("session_id" = i32, Path, description = "Training session ID"),
        SessionMemberQuery
    ),
    responses(
        (status = 200, description = "Session deleted"),
        (status = 403, description = "Not the booking owner", body = crate::error::ErrorResponse),
        (status = 404, description = "Session not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_session(
    State(state): State<AppState>,
    ApiPath((id, session_id)): ApiPath<(i32, i32)>,
    ApiQuery(query): ApiQuery<SessionMemberQuery>,
) -> AppResult<Json<ApiResponse<()>>> {
    let member_account = query
        .member_account
        .ok_or_else(|| AppError::Validation("memberAccount is required".to_string()))?;

    state
        .services
        .training
        .delete_session(id, session_id, member_account)
        .await?;
    Ok(Json(ApiResponse::ok()))
}
