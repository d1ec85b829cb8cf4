//! Share requests repository

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{ShareRequest, ShareRequestDetails, ShareRequestStatus},
};

/// Message returned for a second pending request on the same booking
pub const DUPLICATE_REQUEST: &str = "duplicate request, please wait for the owner to respond";

const DETAILS_SELECT: &str = r#"
    SELECT sr.*, b.start_time, b.end_time, b.location_note,
           b.member_account AS owner_account, b.member_name AS owner_name,
           e.name AS equipment_name, e.location AS equipment_location
    FROM share_requests sr
    JOIN equipment_bookings b ON sr.booking_id = b.id
    LEFT JOIN equipment e ON b.equipment_id = e.id
"#;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ShareRequestStore: Send + Sync {
    async fn find_pending(&self, booking_id: i32, requester_account: i64) -> AppResult<Option<ShareRequest>>;

    /// Insert a pending request
    async fn create(&self, booking_id: i32, requester_account: i64, requester_name: String) -> AppResult<i32>;

    /// The request, provided its booking is owned by `owner_account`
    async fn find_for_owner(&self, request_id: i32, owner_account: i64) -> AppResult<Option<ShareRequest>>;

    async fn set_status(&self, request_id: i32, status: ShareRequestStatus) -> AppResult<()>;

    /// Every request on a booking, newest first
    async fn list_for_booking(&self, booking_id: i32) -> AppResult<Vec<ShareRequest>>;

    /// Requests targeting bookings owned by the member, newest first
    async fn list_received(&self, owner_account: i64) -> AppResult<Vec<ShareRequestDetails>>;

    /// Requests the member sent, newest first
    async fn list_sent(&self, requester_account: i64) -> AppResult<Vec<ShareRequestDetails>>;

    async fn count_pending_received(&self, owner_account: i64) -> AppResult<i64>;
}

#[derive(Clone)]
pub struct ShareRequestsRepository {
    pool: Pool<Postgres>,
}

impl ShareRequestsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ShareRequestStore for ShareRequestsRepository {
    async fn find_pending(&self, booking_id: i32, requester_account: i64) -> AppResult<Option<ShareRequest>> {
        let row = sqlx::query_as::<_, ShareRequest>(
            r#"
            SELECT * FROM share_requests
            WHERE booking_id = $1 AND requester_account = $2 AND status = 'pending'
            "#,
        )
        .bind(booking_id)
        .bind(requester_account)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn create(&self, booking_id: i32, requester_account: i64, requester_name: String) -> AppResult<i32> {
        // The partial unique index catches a concurrent duplicate
        sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO share_requests (booking_id, requester_account, requester_name, status)
            VALUES ($1, $2, $3, 'pending')
            RETURNING id
            "#,
        )
        .bind(booking_id)
        .bind(requester_account)
        .bind(&requester_name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::conflict_on_unique(e, DUPLICATE_REQUEST))
    }

    async fn find_for_owner(&self, request_id: i32, owner_account: i64) -> AppResult<Option<ShareRequest>> {
        let row = sqlx::query_as::<_, ShareRequest>(
            r#"
            SELECT sr.* FROM share_requests sr
            JOIN equipment_bookings b ON sr.booking_id = b.id
            WHERE sr.id = $1 AND b.member_account = $2
            "#,
        )
        .bind(request_id)
        .bind(owner_account)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn set_status(&self, request_id: i32, status: ShareRequestStatus) -> AppResult<()> {
        sqlx::query("UPDATE share_requests SET status = $1 WHERE id = $2")
            .bind(status)
            .bind(request_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list_for_booking(&self, booking_id: i32) -> AppResult<Vec<ShareRequest>> {
        let rows = sqlx::query_as::<_, ShareRequest>(
            "SELECT * FROM share_requests WHERE booking_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(booking_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn list_received(&self, owner_account: i64) -> AppResult<Vec<ShareRequestDetails>> {
        let query = format!(
            "{} WHERE b.member_account = $1 ORDER BY sr.created_at DESC, sr.id DESC",
            DETAILS_SELECT
        );
        let rows = sqlx::query_as::<_, ShareRequestDetails>(&query)
            .bind(owner_account)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn list_sent(&self, requester_account: i64) -> AppResult<Vec<ShareRequestDetails>> {
        let query = format!(
            "{} WHERE sr.requester_account = $1 ORDER BY sr.created_at DESC, sr.id DESC",
            DETAILS_SELECT
        );
        let rows = sqlx::query_as::<_, ShareRequestDetails>(&query)
            .bind(requester_account)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn count_pending_received(&self, owner_account: i64) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM share_requests sr
            JOIN equipment_bookings b ON sr.booking_id = b.id
            WHERE b.member_account = $1 AND sr.status = 'pending'
            "#,
        )
        .bind(owner_account)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}
