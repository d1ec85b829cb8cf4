//! Share request API endpoints

use axum::{
    extract::State,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        share_request::{CreateShareRequest, HandleShareRequest, PendingCount},
        ShareAction, ShareRequest, ShareRequestDetails,
    },
    AppState,
};

use super::{
    extract::{ApiJson, ApiPath},
    ApiResponse,
};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShareRequestCreated {
    pub request_id: i32,
}

/// Ask the owner of a booking to share it
#[utoipa::path(
    post,
    path = "/equipment-booking/share-request/create",
    tag = "share-requests",
    request_body = CreateShareRequest,
    responses(
        (status = 200, description = "Request created", body = ShareRequestCreated),
        (status = 404, description = "Booking not found or no longer valid", body = crate::error::ErrorResponse),
        (status = 409, description = "A pending request already exists", body = crate::error::ErrorResponse),
        (status = 422, description = "Requester owns the booking", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_share_request(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateShareRequest>,
) -> AppResult<Json<ApiResponse<ShareRequestCreated>>> {
    request.validate()?;
    let (Some(booking_id), Some(requester_account)) = (request.booking_id, request.requester_account) else {
        return Err(AppError::Validation("please fill in all required fields".to_string()));
    };

    let request_id = state
        .services
        .share_requests
        .request_share(booking_id, requester_account)
        .await?;
    Ok(Json(ApiResponse::data(ShareRequestCreated { request_id })))
}

/// Accept or reject a request on one of the owner's bookings
#[utoipa::path(
    post,
    path = "/equipment-booking/share-request/{id}/handle",
    tag = "share-requests",
    params(("id" = i32, Path, description = "Share request ID")),
    request_body = HandleShareRequest,
    responses(
        (status = 200, description = "Request handled"),
        (status = 400, description = "Unknown action", body = crate::error::ErrorResponse),
        (status = 404, description = "Request not found or not permitted", body = crate::error::ErrorResponse)
    )
)]
pub async fn handle_share_request(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(request): ApiJson<HandleShareRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    request.validate()?;
    let (Some(owner_account), Some(action)) = (request.booking_owner_account, request.action.as_deref()) else {
        return Err(AppError::Validation("please fill in all required fields".to_string()));
    };
    let action: ShareAction = action.parse()?;

    state
        .services
        .share_requests
        .handle_share_request(id, owner_account, action)
        .await?;

    let message = match action {
        ShareAction::Accept => "share request accepted",
        ShareAction::Reject => "share request rejected",
    };
    Ok(Json(ApiResponse::message(message)))
}

/// Every request on a booking, newest first
#[utoipa::path(
    get,
    path = "/equipment-booking/booking/{id}/share-requests",
    tag = "share-requests",
    params(("id" = i32, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Share requests", body = Vec<ShareRequest>)
    )
)]
pub async fn list_booking_requests(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> AppResult<Json<ApiResponse<Vec<ShareRequest>>>> {
    let requests = state.services.share_requests.list_for_booking(id).await?;
    Ok(Json(ApiResponse::data(requests)))
}

/// Requests on bookings the member owns
#[utoipa::path(
    get,
    path = "/equipment-booking/member/{account}/share-requests/received",
    tag = "share-requests",
    params(("account" = i64, Path, description = "Member account")),
    responses(
        (status = 200, description = "Received requests", body = Vec<ShareRequestDetails>)
    )
)]
pub async fn list_received(
    State(state): State<AppState>,
    ApiPath(account): ApiPath<i64>,
) -> AppResult<Json<ApiResponse<Vec<ShareRequestDetails>>>> {
    let requests = state.services.share_requests.list_received(account).await?;
    Ok(Json(ApiResponse::data(requests)))
}

/// Requests the member sent
#[utoipa::path(
    get,
    path = "/equipment-booking/member/{account}/share-requests/sent",
    tag = "share-requests",
    params(("account" = i64, Path, description = "Member account")),
    responses(
        (status = 200, description = "Sent requests", body = Vec<ShareRequestDetails>)
    )
)]
pub async fn list_sent(
    State(state): State<AppState>,
    ApiPath(account): ApiPath<i64>,
) -> AppResult<Json<ApiResponse<Vec<ShareRequestDetails>>>> {
    let requests = state.services.share_requests.list_sent(account).await?;
    Ok(Json(ApiResponse::data(requests)))
}

/// Pending requests waiting on the member
#[utoipa::path(
    get,
    path = "/equipment-booking/member/{account}/share-requests/pending-count",
    tag = "share-requests",
    params(("account" = i64, Path, description = "Member account")),
    responses(
        (status = 200, description = "Pending request count", body = PendingCount)
    )
)]
pub async fn pending_count(
    State(state): State<AppState>,
    ApiPath(account): ApiPath<i64>,
) -> AppResult<Json<ApiResponse<PendingCount>>> {
    let count = state.services.share_requests.count_pending_received(account).await?;
    Ok(Json(ApiResponse::data(PendingCount { count })))
}
