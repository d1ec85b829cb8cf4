//! Share request model

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::enums::ShareRequestStatus;

/// A member asking the owner of a booking to share its slot
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ShareRequest {
    pub id: i32,
    pub booking_id: i32,
    pub requester_account: i64,
    /// Requester name as it was when the request was made
    pub requester_name: String,
    pub status: ShareRequestStatus,
    pub created_at: NaiveDateTime,
}

/// Share request joined with its booking and equipment, for inbox/outbox views
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ShareRequestDetails {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub request: ShareRequest,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub location_note: String,
    pub owner_account: i64,
    pub owner_name: String,
    pub equipment_name: Option<String>,
    pub equipment_location: Option<String>,
}

/// Create share request body
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateShareRequest {
    #[validate(required(message = "bookingId is required"))]
    pub booking_id: Option<i32>,
    #[validate(required(message = "requesterAccount is required"))]
    pub requester_account: Option<i64>,
}

/// Accept/reject body
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HandleShareRequest {
    #[validate(required(message = "bookingOwnerAccount is required"))]
    pub booking_owner_account: Option<i64>,
    /// `accept` or `reject`
    #[validate(required(message = "action is required"))]
    pub action: Option<String>,
}

/// Pending requests waiting on a member's decision
#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
pub struct PendingCount {
    pub count: i64,
}
