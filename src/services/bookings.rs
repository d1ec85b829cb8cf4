//! Booking manager: creation with conflict detection, cancellation, member views

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        booking::{merge_member_bookings, CreateBookingRequest},
        Booking, BookingDetails, BookingView, BookingWindow, NewBooking,
    },
    repository::Repository,
};

use super::{training, Clock};

#[derive(Clone)]
pub struct BookingsService {
    repository: Repository,
    clock: Clock,
}

impl BookingsService {
    pub fn new(repository: Repository, clock: Clock) -> Self {
        Self { repository, clock }
    }

    /// Active bookings on the equipment overlapping `window`
    pub async fn find_conflicts(&self, equipment_id: i32, window: BookingWindow) -> AppResult<Vec<Booking>> {
        self.repository.bookings.find_conflicts(equipment_id, window).await
    }

    /// Create a booking and return its id
    pub async fn create_booking(&self, request: &CreateBookingRequest) -> AppResult<i32> {
        request.validate()?;
        let (Some(equipment_id), Some(member_account), Some(start), Some(end)) = (
            request.equipment_id,
            request.member_account,
            request.start_time.as_deref(),
            request.end_time.as_deref(),
        ) else {
            return Err(AppError::Validation("please fill in all required fields".to_string()));
        };

        let window = BookingWindow::parse(start, end)?;
        window.ensure_not_past(self.clock.now())?;

        let member = self
            .repository
            .members
            .find_by_account(member_account)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Member {} not found", member_account)))?;

        let equipment = self
            .repository
            .equipment
            .get_by_id(equipment_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", equipment_id)))?;
        if !equipment.status.is_bookable() {
            return Err(AppError::BusinessRule(format!(
                "Equipment {} is {} and cannot be booked",
                equipment.id, equipment.status
            )));
        }

        let booking_id = self
            .repository
            .bookings
            .create(NewBooking {
                equipment_id,
                member_account,
                member_name: member.name,
                window,
                location_note: request.location_note.clone().unwrap_or_default(),
            })
            .await?;

        tracing::info!(booking_id, equipment_id, member_account, "booking created");
        Ok(booking_id)
    }

    /// Cancel a booking on behalf of its owner.
    ///
    /// Returns `false` when the booking does not exist, is not owned by the
    /// requester, or is already cancelled.
    pub async fn cancel_booking(&self, booking_id: i32, member_account: i64) -> AppResult<bool> {
        let Some(view) = self.repository.bookings.get_view(booking_id).await? else {
            return Ok(false);
        };
        if view.booking.member_account != member_account {
            return Ok(false);
        }
        if let Err(e) = view.booking.status.cancel() {
            tracing::debug!(booking_id, error = %e, "booking not cancellable");
            return Ok(false);
        }

        // Guarded by status in SQL as well, a concurrent cancel yields false
        let cancelled = self.repository.bookings.cancel(booking_id, member_account).await?;
        if cancelled {
            tracing::info!(booking_id, member_account, "booking cancelled");
        }
        Ok(cancelled)
    }

    /// Own active bookings plus bookings shared through accepted requests, latest first
    pub async fn get_bookings_for_member(&self, member_account: i64) -> AppResult<Vec<BookingView>> {
        let owned = self.repository.bookings.list_owned_active(member_account).await?;
        let shared = self.repository.bookings.list_shared_active(member_account).await?;
        Ok(merge_member_bookings(owned, shared))
    }

    pub async fn get_booking_by_id(&self, booking_id: i32) -> AppResult<BookingView> {
        self.repository
            .bookings
            .get_view(booking_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Booking {} not found", booking_id)))
    }

    /// Booking with its share requests and training sessions.
    ///
    /// A failing secondary lookup yields an empty list instead of an error.
    pub async fn get_booking_details(&self, booking_id: i32) -> AppResult<BookingDetails> {
        let booking = self.get_booking_by_id(booking_id).await?;

        let share_requests = self
            .repository
            .share_requests
            .list_for_booking(booking_id)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(booking_id, error = %e, "share requests unavailable");
                Vec::new()
            });

        let training_sessions = training::sessions_for_booking(&self.repository, booking_id)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(booking_id, error = %e, "training sessions unavailable");
                Vec::new()
            });

        Ok(BookingDetails {
            booking,
            share_requests,
            training_sessions,
        })
    }
}
