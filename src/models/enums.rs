//! Status enums and their allowed transitions

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

// ---------------------------------------------------------------------------
// EquipmentStatus
// ---------------------------------------------------------------------------

/// Physical condition of a piece of equipment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[sqlx(type_name = "equipment_status", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum EquipmentStatus {
    Normal,
    Damaged,
    UnderRepair,
}

impl EquipmentStatus {
    /// Only equipment in normal condition may be booked
    pub fn is_bookable(self) -> bool {
        self == EquipmentStatus::Normal
    }
}

impl std::fmt::Display for EquipmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            EquipmentStatus::Normal => "normal",
            EquipmentStatus::Damaged => "damaged",
            EquipmentStatus::UnderRepair => "under-repair",
        };
        write!(f, "{}", label)
    }
}

// ---------------------------------------------------------------------------
// BookingStatus
// ---------------------------------------------------------------------------

/// Booking lifecycle: active -> cancelled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[sqlx(type_name = "booking_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Active,
    Cancelled,
}

impl BookingStatus {
    pub fn is_active(self) -> bool {
        self == BookingStatus::Active
    }

    /// Transition to cancelled. Cancelling twice is rejected.
    pub fn cancel(self) -> AppResult<Self> {
        match self {
            BookingStatus::Active => Ok(BookingStatus::Cancelled),
            BookingStatus::Cancelled => {
                Err(AppError::Conflict("booking is already cancelled".to_string()))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// ShareRequestStatus / ShareAction
// ---------------------------------------------------------------------------

/// Share request lifecycle: pending -> accepted | rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[sqlx(type_name = "share_request_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ShareRequestStatus {
    Pending,
    Accepted,
    Rejected,
}

impl ShareRequestStatus {
    pub fn is_pending(self) -> bool {
        self == ShareRequestStatus::Pending
    }

    /// Apply an owner decision.
    ///
    /// Already-handled requests may be handled again; the latest decision
    /// overwrites the previous one.
    pub fn handle(self, action: ShareAction) -> Self {
        match action {
            ShareAction::Accept => ShareRequestStatus::Accepted,
            ShareAction::Reject => ShareRequestStatus::Rejected,
        }
    }
}

/// Decision taken by a booking owner on a share request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ShareAction {
    Accept,
    Reject,
}

impl FromStr for ShareAction {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "accept" => Ok(ShareAction::Accept),
            "reject" => Ok(ShareAction::Reject),
            other => Err(AppError::Validation(format!("invalid action '{}'", other))),
        }
    }
}

// ---------------------------------------------------------------------------
// SessionStatus
// ---------------------------------------------------------------------------

/// Training session lifecycle: confirmed -> completed (locked)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[sqlx(type_name = "training_session_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Confirmed,
    Completed,
}

impl SessionStatus {
    /// Initial status for a freshly saved session
    pub fn initial(fully_complete: bool) -> Self {
        if fully_complete {
            SessionStatus::Completed
        } else {
            SessionStatus::Confirmed
        }
    }

    pub fn is_locked(self) -> bool {
        self == SessionStatus::Completed
    }

    /// One-way lock. There is no way back to confirmed.
    pub fn complete(self) -> AppResult<Self> {
        match self {
            SessionStatus::Confirmed => Ok(SessionStatus::Completed),
            SessionStatus::Completed => Err(AppError::NotFound(
                "session not found or already locked".to_string(),
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// BookingAccess
// ---------------------------------------------------------------------------

/// How a member came to see a booking in their list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BookingAccess {
    #[default]
    Owner,
    Shared,
}
