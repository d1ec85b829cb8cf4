//! Share requests: members asking to join someone else's booking

use crate::{
    error::{AppError, AppResult},
    models::{ShareAction, ShareRequest, ShareRequestDetails},
    repository::{share_requests::DUPLICATE_REQUEST, Repository},
};

#[derive(Clone)]
pub struct ShareRequestsService {
    repository: Repository,
}

impl ShareRequestsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Create a pending request from `requester_account` on `booking_id`.
    ///
    /// Rejects a second pending request from the same member, bookings that
    /// are missing or cancelled, and the owner's own bookings.
    pub async fn create_share_request(
        &self,
        booking_id: i32,
        requester_account: i64,
        requester_name: &str,
    ) -> AppResult<i32> {
        if self
            .repository
            .share_requests
            .find_pending(booking_id, requester_account)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(DUPLICATE_REQUEST.to_string()));
        }

        let booking = match self.repository.bookings.get_view(booking_id).await? {
            Some(view) if view.booking.status.is_active() => view.booking,
            _ => return Err(AppError::NotFound("booking not found or no longer valid".to_string())),
        };
        if booking.is_owned_by(requester_account) {
            return Err(AppError::BusinessRule("cannot request your own booking".to_string()));
        }

        let id = self
            .repository
            .share_requests
            .create(booking_id, requester_account, requester_name.to_string())
            .await?;

        tracing::info!(request_id = id, booking_id, requester_account, "share request created");
        Ok(id)
    }

    /// Like [`create_share_request`](Self::create_share_request), resolving
    /// the requester's display name from the member directory.
    pub async fn request_share(&self, booking_id: i32, requester_account: i64) -> AppResult<i32> {
        let member = self
            .repository
            .members
            .find_by_account(requester_account)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Member {} not found", requester_account)))?;
        self.create_share_request(booking_id, requester_account, &member.name)
            .await
    }

    /// Accept or reject a request on one of the owner's bookings
    pub async fn handle_share_request(
        &self,
        request_id: i32,
        owner_account: i64,
        action: ShareAction,
    ) -> AppResult<()> {
        let request = self
            .repository
            .share_requests
            .find_for_owner(request_id, owner_account)
            .await?
            .ok_or_else(|| AppError::NotFound("request not found or not permitted".to_string()))?;

        let status = request.status.handle(action);
        self.repository
            .share_requests
            .set_status(request.id, status)
            .await?;

        tracing::info!(request_id, owner_account, ?status, "share request handled");
        Ok(())
    }

    pub async fn list_for_booking(&self, booking_id: i32) -> AppResult<Vec<ShareRequest>> {
        self.repository.share_requests.list_for_booking(booking_id).await
    }

    /// Requests on bookings the member owns, newest first
    pub async fn list_received(&self, owner_account: i64) -> AppResult<Vec<ShareRequestDetails>> {
        self.repository.share_requests.list_received(owner_account).await
    }

    pub async fn list_sent(&self, requester_account: i64) -> AppResult<Vec<ShareRequestDetails>> {
        self.repository.share_requests.list_sent(requester_account).await
    }

    pub async fn count_pending_received(&self, owner_account: i64) -> AppResult<i64> {
        self.repository
            .share_requests
            .count_pending_received(owner_account)
            .await
    }
}
