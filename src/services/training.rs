//! Training sessions logged against a booking

use indexmap::IndexMap;

use crate::{
    error::{AppError, AppResult},
    models::{
        training::{number_records, SavedTrainingRecords, TrainingRecordInput},
        SessionStatus, TrainingRecord, TrainingSessionDetails,
    },
    repository::{legacy, Repository},
};

const SESSION_LOCKED: &str = "session not found or already locked";

/// Sessions of a booking with their records, newest first, followed by the
/// legacy pseudo-session when session-less records exist.
pub(crate) async fn sessions_for_booking(
    repository: &Repository,
    booking_id: i32,
) -> AppResult<Vec<TrainingSessionDetails>> {
    let sessions = repository.training.list_sessions(booking_id).await?;
    let records = repository.training.list_records(booking_id).await?;
    let (current, historic) = legacy::partition_legacy(records);

    let mut by_session: IndexMap<i32, Vec<TrainingRecord>> = IndexMap::new();
    for record in current {
        if let Some(session_id) = record.session_id {
            by_session.entry(session_id).or_default().push(record);
        }
    }

    let mut details: Vec<TrainingSessionDetails> = sessions
        .into_iter()
        .map(|session| {
            let records = by_session.shift_remove(&session.id).unwrap_or_default();
            TrainingSessionDetails::new(session, records)
        })
        .collect();
    details.extend(legacy::legacy_session(booking_id, historic));
    Ok(details)
}

#[derive(Clone)]
pub struct TrainingService {
    repository: Repository,
}

impl TrainingService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    async fn booking_owner(&self, booking_id: i32) -> AppResult<i64> {
        self.repository
            .bookings
            .get_view(booking_id)
            .await?
            .map(|view| view.booking.member_account)
            .ok_or_else(|| AppError::NotFound(format!("Booking {} not found", booking_id)))
    }

    /// Save a batch of sets as a new session.
    ///
    /// The session starts completed when `fully_complete` is set, confirmed
    /// otherwise. An empty batch creates nothing.
    pub async fn save_training_records(
        &self,
        booking_id: i32,
        inputs: Vec<TrainingRecordInput>,
        fully_complete: bool,
        member_account: i64,
    ) -> AppResult<SavedTrainingRecords> {
        if self.booking_owner(booking_id).await? != member_account {
            return Err(AppError::Permission(
                "only the booking owner can record training".to_string(),
            ));
        }

        if inputs.is_empty() {
            return Ok(SavedTrainingRecords {
                session_id: None,
                records: Vec::new(),
            });
        }

        let records = number_records(inputs)?;
        let status = SessionStatus::initial(fully_complete);
        let (session, records) = self
            .repository
            .training
            .create_session(booking_id, status, records)
            .await?;

        tracing::info!(
            booking_id,
            session_id = session.id,
            records = records.len(),
            ?status,
            "training session saved"
        );
        Ok(SavedTrainingRecords {
            session_id: Some(session.id),
            records,
        })
    }

    /// Toggle the completed flag of a record in a confirmed session
    pub async fn update_record_completed(
        &self,
        record_id: i32,
        completed: bool,
        member_account: i64,
    ) -> AppResult<()> {
        let context = self
            .repository
            .training
            .find_record_context(record_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Training record {} not found", record_id)))?;

        if context.booking_owner != Some(member_account) {
            return Err(AppError::Permission(
                "only the booking owner can update training records".to_string(),
            ));
        }
        if !context.is_editable() {
            return Err(AppError::Conflict("training session is locked".to_string()));
        }

        // The session may have been locked since the context was read
        if !self
            .repository
            .training
            .set_record_completed(record_id, completed)
            .await?
        {
            return Err(AppError::Conflict("training session is locked".to_string()));
        }
        Ok(())
    }

    /// Lock a confirmed session. There is no way back.
    pub async fn complete_session(&self, booking_id: i32, session_id: i32) -> AppResult<()> {
        let context = self
            .repository
            .training
            .find_session(booking_id, session_id)
            .await?
            .ok_or_else(|| AppError::NotFound(SESSION_LOCKED.to_string()))?;
        context.session.status.complete()?;

        // The store only updates confirmed rows, so a concurrent lock still loses here
        if !self
            .repository
            .training
            .complete_session(booking_id, session_id)
            .await?
        {
            return Err(AppError::NotFound(SESSION_LOCKED.to_string()));
        }
        tracing::info!(booking_id, session_id, "training session locked");
        Ok(())
    }

    /// Delete a session and its records, whatever its status
    pub async fn delete_session(&self, booking_id: i32, session_id: i32, member_account: i64) -> AppResult<()> {
        let context = self
            .repository
            .training
            .find_session(booking_id, session_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Training session {} not found", session_id)))?;

        if context.booking_owner != member_account {
            return Err(AppError::Permission(
                "only the booking owner can delete a training session".to_string(),
            ));
        }

        if !self.repository.training.delete_session(session_id).await? {
            return Err(AppError::NotFound(format!("Training session {} not found", session_id)));
        }
        tracing::info!(booking_id, session_id, member_account, "training session deleted");
        Ok(())
    }

    pub async fn list_sessions_for_booking(&self, booking_id: i32) -> AppResult<Vec<TrainingSessionDetails>> {
        sessions_for_booking(&self.repository, booking_id).await
    }
}
