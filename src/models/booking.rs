//! Equipment booking model and the booking time window

use chrono::{DateTime, Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::HashMap;
use utoipa::ToSchema;
use validator::Validate;

use super::enums::{BookingAccess, BookingStatus};
use super::share_request::ShareRequest;
use super::training::TrainingSessionDetails;
use crate::error::{AppError, AppResult};

/// Booking row
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Booking {
    pub id: i32,
    pub equipment_id: i32,
    pub member_account: i64,
    /// Member name as it was when the booking was made
    pub member_name: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub location_note: String,
    pub status: BookingStatus,
    pub created_at: NaiveDateTime,
}

impl Booking {
    pub fn window(&self) -> BookingWindow {
        BookingWindow {
            start: self.start_time,
            end: self.end_time,
        }
    }

    pub fn is_owned_by(&self, account: i64) -> bool {
        self.member_account == account
    }
}

/// Booking joined with the equipment display fields.
///
/// Equipment fields are `None` when the equipment row no longer exists.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookingView {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub booking: Booking,
    pub equipment_name: Option<String>,
    pub equipment_location: Option<String>,
    #[sqlx(skip)]
    pub booking_type: BookingAccess,
}

/// Booking detail page payload
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingDetails {
    #[serde(flatten)]
    pub booking: BookingView,
    pub share_requests: Vec<ShareRequest>,
    pub training_sessions: Vec<TrainingSessionDetails>,
}

/// Half-open time interval `[start, end)` of a booking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl BookingWindow {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> AppResult<Self> {
        if end <= start {
            return Err(AppError::Validation(
                "end time must be later than start time".to_string(),
            ));
        }
        Ok(Self { start, end })
    }

    /// Parse both bounds from client input
    pub fn parse(start: &str, end: &str) -> AppResult<Self> {
        Self::new(parse_booking_time(start)?, parse_booking_time(end)?)
    }

    /// Reject windows that start before `now`
    pub fn ensure_not_past(&self, now: NaiveDateTime) -> AppResult<()> {
        if self.start < now {
            return Err(AppError::Validation(
                "cannot book a time in the past".to_string(),
            ));
        }
        Ok(())
    }

    /// Touching endpoints do not overlap
    pub fn overlaps(&self, other: &BookingWindow) -> bool {
        self.start < other.end && self.end > other.start
    }
}

/// Parse a client-supplied booking time as local wall-clock time.
///
/// Accepts `YYYY-MM-DDTHH:MM`, `YYYY-MM-DDTHH:MM:SS[.f]`, the same with a space
/// separator, and RFC 3339 timestamps (converted to local time).
pub fn parse_booking_time(value: &str) -> AppResult<NaiveDateTime> {
    const FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
    ];

    let value = value.trim();
    if let Some(parsed) = FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
    {
        return Ok(parsed);
    }

    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Local).naive_local())
        .map_err(|_| AppError::Validation(format!("invalid date/time '{}'", value)))
}

/// Everything needed to insert a booking
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub equipment_id: i32,
    pub member_account: i64,
    pub member_name: String,
    pub window: BookingWindow,
    pub location_note: String,
}

/// Create booking request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    #[validate(required(message = "equipmentId is required"), range(min = 1))]
    pub equipment_id: Option<i32>,
    #[validate(required(message = "memberAccount is required"))]
    pub member_account: Option<i64>,
    /// e.g. `2025-01-01T10:00`
    #[validate(required(message = "startTime is required"))]
    pub start_time: Option<String>,
    #[validate(required(message = "endTime is required"))]
    pub end_time: Option<String>,
    pub location_note: Option<String>,
}

/// Combine a member's own bookings with bookings shared with them.
///
/// Duplicates are dropped by booking id, keeping the owner view. The result is
/// sorted by start time, latest first.
pub fn merge_member_bookings(owned: Vec<BookingView>, shared: Vec<BookingView>) -> Vec<BookingView> {
    let mut by_id: HashMap<i32, BookingView> = HashMap::new();

    for mut view in shared {
        view.booking_type = BookingAccess::Shared;
        by_id.insert(view.booking.id, view);
    }
    for mut view in owned {
        view.booking_type = BookingAccess::Owner;
        by_id.insert(view.booking.id, view);
    }

    let mut merged: Vec<BookingView> = by_id.into_values().collect();
    merged.sort_by(|a, b| {
        b.booking
            .start_time
            .cmp(&a.booking.start_time)
            .then(b.booking.id.cmp(&a.booking.id))
    });
    merged
}
