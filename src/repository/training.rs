//! Training sessions and records repository

use async_trait::async_trait;
use sqlx::{FromRow, Pool, Postgres};

use crate::{
    error::AppResult,
    models::{
        training::{NewTrainingRecord, RecordContext, SessionContext},
        SessionStatus, TrainingRecord, TrainingSession,
    },
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TrainingStore: Send + Sync {
    /// Insert a session and all of its records in one transaction
    async fn create_session(
        &self,
        booking_id: i32,
        status: SessionStatus,
        records: Vec<NewTrainingRecord>,
    ) -> AppResult<(TrainingSession, Vec<TrainingRecord>)>;

    async fn find_record_context(&self, record_id: i32) -> AppResult<Option<RecordContext>>;

    /// Update the flag only while the record's session is confirmed
    async fn set_record_completed(&self, record_id: i32, completed: bool) -> AppResult<bool>;

    /// The session, provided it belongs to `booking_id`
    async fn find_session(&self, booking_id: i32, session_id: i32) -> AppResult<Option<SessionContext>>;

    /// Confirmed -> completed. `false` when missing or already completed.
    async fn complete_session(&self, booking_id: i32, session_id: i32) -> AppResult<bool>;

    /// Remove the session and its records
    async fn delete_session(&self, session_id: i32) -> AppResult<bool>;

    /// Sessions of a booking, newest first
    async fn list_sessions(&self, booking_id: i32) -> AppResult<Vec<TrainingSession>>;

    /// Every record of a booking, including ones without a session
    async fn list_records(&self, booking_id: i32) -> AppResult<Vec<TrainingRecord>>;
}

#[derive(FromRow)]
struct RecordContextRow {
    #[sqlx(flatten)]
    record: TrainingRecord,
    session_status: Option<SessionStatus>,
    booking_owner: Option<i64>,
}

impl From<RecordContextRow> for RecordContext {
    fn from(row: RecordContextRow) -> Self {
        Self {
            record: row.record,
            session_status: row.session_status,
            booking_owner: row.booking_owner,
        }
    }
}

#[derive(FromRow)]
struct SessionContextRow {
    #[sqlx(flatten)]
    session: TrainingSession,
    booking_owner: i64,
}

#[derive(Clone)]
pub struct TrainingRepository {
    pool: Pool<Postgres>,
}

impl TrainingRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TrainingStore for TrainingRepository {
    async fn create_session(
        &self,
        booking_id: i32,
        status: SessionStatus,
        records: Vec<NewTrainingRecord>,
    ) -> AppResult<(TrainingSession, Vec<TrainingRecord>)> {
        let mut tx = self.pool.begin().await?;

        let session = sqlx::query_as::<_, TrainingSession>(
            "INSERT INTO training_sessions (booking_id, status) VALUES ($1, $2) RETURNING *",
        )
        .bind(booking_id)
        .bind(status)
        .fetch_one(&mut *tx)
        .await?;

        let mut saved = Vec::with_capacity(records.len());
        for record in &records {
            let row = sqlx::query_as::<_, TrainingRecord>(
                r#"
                INSERT INTO training_records
                    (session_id, booking_id, set_number, weight, repetitions, completed, exercise_name)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING *
                "#,
            )
            .bind(session.id)
            .bind(booking_id)
            .bind(record.set_number)
            .bind(&record.weight)
            .bind(&record.repetitions)
            .bind(record.completed)
            .bind(&record.exercise_name)
            .fetch_one(&mut *tx)
            .await?;
            saved.push(row);
        }

        tx.commit().await?;
        Ok((session, saved))
    }

    async fn find_record_context(&self, record_id: i32) -> AppResult<Option<RecordContext>> {
        let row = sqlx::query_as::<_, RecordContextRow>(
            r#"
            SELECT r.*, s.status AS session_status, b.member_account AS booking_owner
            FROM training_records r
            LEFT JOIN training_sessions s ON r.session_id = s.id
            LEFT JOIN equipment_bookings b ON r.booking_id = b.id
            WHERE r.id = $1
            "#,
        )
        .bind(record_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Into::into))
    }

    async fn set_record_completed(&self, record_id: i32, completed: bool) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE training_records r
            SET completed = $2
            FROM training_sessions s
            WHERE r.id = $1 AND r.session_id = s.id AND s.status = 'confirmed'
            "#,
        )
        .bind(record_id)
        .bind(completed)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_session(&self, booking_id: i32, session_id: i32) -> AppResult<Option<SessionContext>> {
        let row = sqlx::query_as::<_, SessionContextRow>(
            r#"
            SELECT s.*, b.member_account AS booking_owner
            FROM training_sessions s
            JOIN equipment_bookings b ON s.booking_id = b.id
            WHERE s.id = $1 AND s.booking_id = $2
            "#,
        )
        .bind(session_id)
        .bind(booking_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| SessionContext {
            session: r.session,
            booking_owner: r.booking_owner,
        }))
    }

    async fn complete_session(&self, booking_id: i32, session_id: i32) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE training_sessions
            SET status = 'completed'
            WHERE id = $1 AND booking_id = $2 AND status = 'confirmed'
            "#,
        )
        .bind(session_id)
        .bind(booking_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_session(&self, session_id: i32) -> AppResult<bool> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM training_records WHERE session_id = $1")
            .bind(session_id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM training_sessions WHERE id = $1")
            .bind(session_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_sessions(&self, booking_id: i32) -> AppResult<Vec<TrainingSession>> {
        let rows = sqlx::query_as::<_, TrainingSession>(
            "SELECT * FROM training_sessions WHERE booking_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(booking_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn list_records(&self, booking_id: i32) -> AppResult<Vec<TrainingRecord>> {
        let rows = sqlx::query_as::<_, TrainingRecord>(
            r#"
            SELECT * FROM training_records
            WHERE booking_id = $1
            ORDER BY session_id NULLS LAST, set_number, id
            "#,
        )
        .bind(booking_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
