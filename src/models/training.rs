//! Training sessions and the per-set records logged against a booking

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::HashSet;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::enums::SessionStatus;
use crate::error::{AppError, AppResult};

/// A saved batch of sets for one booking
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct TrainingSession {
    pub id: i32,
    pub booking_id: i32,
    pub status: SessionStatus,
    pub created_at: NaiveDateTime,
}

/// One set inside a session
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct TrainingRecord {
    pub id: i32,
    /// `None` for records saved before sessions existed
    pub session_id: Option<i32>,
    pub booking_id: i32,
    pub set_number: i32,
    /// Free-form, may carry units ("20kg")
    pub weight: String,
    pub repetitions: String,
    pub completed: bool,
    pub exercise_name: String,
    pub created_at: NaiveDateTime,
}

/// A session together with its records, as shown on the booking page.
///
/// `id` and `created_at` are `None` only for the legacy pseudo-session.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TrainingSessionDetails {
    pub id: Option<i32>,
    pub booking_id: i32,
    pub status: SessionStatus,
    pub created_at: Option<NaiveDateTime>,
    pub records: Vec<TrainingRecord>,
}

impl TrainingSessionDetails {
    pub fn new(session: TrainingSession, records: Vec<TrainingRecord>) -> Self {
        Self {
            id: Some(session.id),
            booking_id: session.booking_id,
            status: session.status,
            created_at: Some(session.created_at),
            records,
        }
    }
}

/// One row of client input when saving a session
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct TrainingRecordInput {
    #[validate(range(min = 1, message = "set_number must be positive"))]
    pub set_number: Option<i32>,
    #[serde(default)]
    #[validate(length(max = 50, message = "weight must be at most 50 characters"))]
    pub weight: String,
    #[serde(default)]
    #[validate(length(max = 50, message = "repetitions must be at most 50 characters"))]
    pub repetitions: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    #[validate(length(max = 100, message = "exercise_name must be at most 100 characters"))]
    pub exercise_name: String,
}

/// A record ready for insertion, with its set number resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTrainingRecord {
    pub set_number: i32,
    pub weight: String,
    pub repetitions: String,
    pub completed: bool,
    pub exercise_name: String,
}

/// Number sets by position unless the client supplied a number, then check
/// numbers are unique within the batch.
pub fn number_records(inputs: Vec<TrainingRecordInput>) -> AppResult<Vec<NewTrainingRecord>> {
    let mut seen = HashSet::new();
    let mut records = Vec::with_capacity(inputs.len());

    for (index, input) in inputs.into_iter().enumerate() {
        input.validate()?;
        let set_number = match input.set_number {
            Some(n) => n,
            None => i32::try_from(index + 1)
                .map_err(|_| AppError::Validation("too many training records".to_string()))?,
        };
        if !seen.insert(set_number) {
            return Err(AppError::Validation(format!(
                "set number {} appears more than once",
                set_number
            )));
        }
        records.push(NewTrainingRecord {
            set_number,
            weight: input.weight.trim().to_string(),
            repetitions: input.repetitions.trim().to_string(),
            completed: input.completed,
            exercise_name: input.exercise_name.trim().to_string(),
        });
    }

    Ok(records)
}

/// Save training records body
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveTrainingRecords {
    #[serde(default)]
    pub records: Vec<TrainingRecordInput>,
    /// Lock the session immediately instead of leaving it editable
    #[serde(default = "default_fully_complete")]
    pub fully_complete: bool,
    #[validate(required(message = "memberAccount is required"))]
    pub member_account: Option<i64>,
}

fn default_fully_complete() -> bool {
    true
}

/// Result of saving a batch of records
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SavedTrainingRecords {
    pub session_id: Option<i32>,
    pub records: Vec<TrainingRecord>,
}

/// Toggle a record's completed flag
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRecordCompleted {
    #[validate(required(message = "completed is required"))]
    pub completed: Option<bool>,
    #[validate(required(message = "memberAccount is required"))]
    pub member_account: Option<i64>,
}

/// Query string for session deletion
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct SessionMemberQuery {
    pub member_account: Option<i64>,
}

/// A record with what is needed to authorise edits to it
#[derive(Debug, Clone)]
pub struct RecordContext {
    pub record: TrainingRecord,
    /// `None` when the record predates sessions
    pub session_status: Option<SessionStatus>,
    /// `None` when the parent booking no longer exists
    pub booking_owner: Option<i64>,
}

impl RecordContext {
    /// Only records of a confirmed session may change
    pub fn is_editable(&self) -> bool {
        matches!(self.session_status, Some(SessionStatus::Confirmed))
    }
}

/// A session with the owner of its booking
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub session: TrainingSession,
    pub booking_owner: i64,
}
