//! Equipment bookings repository

use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{Booking, BookingAccess, BookingView, BookingWindow, NewBooking},
};

/// Message returned whenever a requested window collides with an active booking
pub const SLOT_TAKEN: &str = "time slot already booked, please choose another time";

const VIEW_SELECT: &str = r#"
    SELECT b.*, e.name AS equipment_name, e.location AS equipment_location
    FROM equipment_bookings b
    LEFT JOIN equipment e ON b.equipment_id = e.id
"#;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Active bookings on the equipment whose window overlaps `window`
    async fn find_conflicts(&self, equipment_id: i32, window: BookingWindow) -> AppResult<Vec<Booking>>;

    /// Insert an active booking unless it collides with another active one.
    /// The check and the insert are atomic per equipment.
    async fn create(&self, booking: NewBooking) -> AppResult<i32>;

    /// Cancel an active booking owned by `member_account`. `false` when no row matched.
    async fn cancel(&self, booking_id: i32, member_account: i64) -> AppResult<bool>;

    /// Active bookings on the equipment that end after `now`, earliest first
    async fn list_upcoming_for_equipment(&self, equipment_id: i32, now: NaiveDateTime) -> AppResult<Vec<BookingView>>;

    /// Active bookings owned by the member
    async fn list_owned_active(&self, member_account: i64) -> AppResult<Vec<BookingView>>;

    /// Active bookings the member joined through an accepted share request
    async fn list_shared_active(&self, member_account: i64) -> AppResult<Vec<BookingView>>;

    async fn get_view(&self, booking_id: i32) -> AppResult<Option<BookingView>>;
}

#[derive(Clone)]
pub struct BookingsRepository {
    pool: Pool<Postgres>,
}

impl BookingsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    async fn fetch_conflicts<'c, E>(
        executor: E,
        equipment_id: i32,
        window: BookingWindow,
    ) -> AppResult<Vec<Booking>>
    where
        E: sqlx::Executor<'c, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, Booking>(
            r#"
            SELECT * FROM equipment_bookings
            WHERE equipment_id = $1
              AND status = 'active'
              AND start_time < $3
              AND end_time > $2
            ORDER BY start_time
            "#,
        )
        .bind(equipment_id)
        .bind(window.start)
        .bind(window.end)
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }
}

#[async_trait]
impl BookingStore for BookingsRepository {
    async fn find_conflicts(&self, equipment_id: i32, window: BookingWindow) -> AppResult<Vec<Booking>> {
        Self::fetch_conflicts(&self.pool, equipment_id, window).await
    }

    async fn create(&self, booking: NewBooking) -> AppResult<i32> {
        let mut tx = self.pool.begin().await?;

        // Serialise creates on the same equipment until commit
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(i64::from(booking.equipment_id))
            .execute(&mut *tx)
            .await?;

        let conflicts = Self::fetch_conflicts(&mut *tx, booking.equipment_id, booking.window).await?;
        if !conflicts.is_empty() {
            return Err(AppError::Conflict(SLOT_TAKEN.to_string()));
        }

        let booking_id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO equipment_bookings
                (equipment_id, member_account, member_name, start_time, end_time, location_note, status)
            VALUES ($1, $2, $3, $4, $5, $6, 'active')
            RETURNING id
            "#,
        )
        .bind(booking.equipment_id)
        .bind(booking.member_account)
        .bind(&booking.member_name)
        .bind(booking.window.start)
        .bind(booking.window.end)
        .bind(&booking.location_note)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(booking_id)
    }

    async fn cancel(&self, booking_id: i32, member_account: i64) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE equipment_bookings
            SET status = 'cancelled'
            WHERE id = $1 AND member_account = $2 AND status = 'active'
            "#,
        )
        .bind(booking_id)
        .bind(member_account)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_upcoming_for_equipment(&self, equipment_id: i32, now: NaiveDateTime) -> AppResult<Vec<BookingView>> {
        let query = format!(
            "{} WHERE b.equipment_id = $1 AND b.status = 'active' AND b.end_time > $2 ORDER BY b.start_time ASC",
            VIEW_SELECT
        );
        let rows = sqlx::query_as::<_, BookingView>(&query)
            .bind(equipment_id)
            .bind(now)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn list_owned_active(&self, member_account: i64) -> AppResult<Vec<BookingView>> {
        let query = format!(
            "{} WHERE b.member_account = $1 AND b.status = 'active' ORDER BY b.start_time DESC",
            VIEW_SELECT
        );
        let rows = sqlx::query_as::<_, BookingView>(&query)
            .bind(member_account)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn list_shared_active(&self, member_account: i64) -> AppResult<Vec<BookingView>> {
        let rows = sqlx::query_as::<_, BookingView>(
            r#"
            SELECT DISTINCT ON (b.id) b.*, e.name AS equipment_name, e.location AS equipment_location
            FROM share_requests sr
            JOIN equipment_bookings b ON sr.booking_id = b.id
            LEFT JOIN equipment e ON b.equipment_id = e.id
            WHERE sr.requester_account = $1
              AND sr.status = 'accepted'
              AND b.status = 'active'
            ORDER BY b.id
            "#,
        )
        .bind(member_account)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|mut view| {
                view.booking_type = BookingAccess::Shared;
                view
            })
            .collect())
    }

    async fn get_view(&self, booking_id: i32) -> AppResult<Option<BookingView>> {
        let query = format!("{} WHERE b.id = $1", VIEW_SELECT);
        let row = sqlx::query_as::<_, BookingView>(&query)
            .bind(booking_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }
}
