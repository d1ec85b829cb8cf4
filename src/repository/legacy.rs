//! Compatibility for training records saved before sessions existed.
//!
//! Such rows have no `session_id`. They are presented as one read-only,
//! completed pseudo-session appended after the real sessions. Delete this
//! module once historical records have been migrated into real sessions.

use crate::models::{SessionStatus, TrainingRecord, TrainingSessionDetails};

/// Split records into session-bound ones and legacy ones
pub fn partition_legacy(records: Vec<TrainingRecord>) -> (Vec<TrainingRecord>, Vec<TrainingRecord>) {
    records.into_iter().partition(|r| r.session_id.is_some())
}

/// Wrap legacy records into the synthetic session, if there are any
pub fn legacy_session(booking_id: i32, mut records: Vec<TrainingRecord>) -> Option<TrainingSessionDetails> {
    if records.is_empty() {
        return None;
    }
    records.sort_by_key(|r| (r.set_number, r.id));
    Some(TrainingSessionDetails {
        id: None,
        booking_id,
        status: SessionStatus::Completed,
        created_at: None,
        records,
    })
}
