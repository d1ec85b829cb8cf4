//! In-memory stores used by service and router tests

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::sync::{Arc, Mutex, MutexGuard};

use super::{
    bookings::SLOT_TAKEN, share_requests::DUPLICATE_REQUEST, BookingStore, EquipmentStore,
    MemberDirectory, Repository, ShareRequestStore, TrainingStore,
};
use crate::{
    error::{AppError, AppResult},
    models::{
        training::{NewTrainingRecord, RecordContext, SessionContext},
        Booking, BookingAccess, BookingStatus, BookingView, BookingWindow, Equipment,
        EquipmentStatus, Member, NewBooking, SessionStatus, ShareRequest, ShareRequestDetails,
        ShareRequestStatus, TrainingRecord, TrainingSession,
    },
};

#[derive(Default)]
struct State {
    members: Vec<Member>,
    equipment: Vec<Equipment>,
    bookings: Vec<Booking>,
    share_requests: Vec<ShareRequest>,
    sessions: Vec<TrainingSession>,
    records: Vec<TrainingRecord>,
    next_id: i32,
}

impl State {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    /// Strictly increasing creation timestamps
    fn stamp(&self) -> NaiveDateTime {
        let base = NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap_or_default();
        base + Duration::seconds(i64::from(self.next_id))
    }

    fn view(&self, booking: &Booking) -> BookingView {
        let equipment = self.equipment.iter().find(|e| e.id == booking.equipment_id);
        BookingView {
            booking: booking.clone(),
            equipment_name: equipment.map(|e| e.name.clone()),
            equipment_location: equipment.map(|e| e.location.clone()),
            booking_type: BookingAccess::Owner,
        }
    }

    fn details(&self, request: &ShareRequest) -> Option<ShareRequestDetails> {
        let booking = self.bookings.iter().find(|b| b.id == request.booking_id)?;
        let view = self.view(booking);
        Some(ShareRequestDetails {
            request: request.clone(),
            start_time: booking.start_time,
            end_time: booking.end_time,
            location_note: booking.location_note.clone(),
            owner_account: booking.member_account,
            owner_name: booking.member_name.clone(),
            equipment_name: view.equipment_name,
            equipment_location: view.equipment_location,
        })
    }
}

fn newest_first<T>(items: &mut [T], key: impl Fn(&T) -> (NaiveDateTime, i32)) {
    items.sort_by(|a, b| key(b).cmp(&key(a)));
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().expect("memory store poisoned")
    }

    pub fn repository(self: &Arc<Self>) -> Repository {
        Repository {
            equipment: self.clone(),
            members: self.clone(),
            bookings: self.clone(),
            share_requests: self.clone(),
            training: self.clone(),
        }
    }

    pub fn add_member(&self, account: i64, name: &str) {
        self.state().members.push(Member {
            account,
            name: name.to_string(),
        });
    }

    pub fn rename_member(&self, account: i64, name: &str) {
        if let Some(m) = self.state().members.iter_mut().find(|m| m.account == account) {
            m.name = name.to_string();
        }
    }

    pub fn add_equipment(&self, name: &str, status: EquipmentStatus) -> i32 {
        let mut state = self.state();
        let id = state.next_id();
        state.equipment.push(Equipment {
            id,
            name: name.to_string(),
            location: "Hall A".to_string(),
            status,
            description: String::new(),
            image_ref: None,
            function_description: None,
        });
        id
    }

    pub fn remove_equipment(&self, id: i32) {
        self.state().equipment.retain(|e| e.id != id);
    }

    pub fn booking(&self, id: i32) -> Option<Booking> {
        self.state().bookings.iter().find(|b| b.id == id).cloned()
    }

    pub fn active_bookings(&self) -> Vec<Booking> {
        self.state()
            .bookings
            .iter()
            .filter(|b| b.status.is_active())
            .cloned()
            .collect()
    }

    pub fn session_count(&self) -> usize {
        self.state().sessions.len()
    }

    pub fn record_count(&self) -> usize {
        self.state().records.len()
    }

    /// A record written before sessions existed
    pub fn add_legacy_record(&self, booking_id: i32, set_number: i32, exercise_name: &str) -> i32 {
        let mut state = self.state();
        let id = state.next_id();
        let created_at = state.stamp();
        state.records.push(TrainingRecord {
            id,
            session_id: None,
            booking_id,
            set_number,
            weight: "15kg".to_string(),
            repetitions: "10".to_string(),
            completed: true,
            exercise_name: exercise_name.to_string(),
            created_at,
        });
        id
    }
}

#[async_trait]
impl EquipmentStore for MemoryStore {
    async fn list_by_status(&self, status: EquipmentStatus) -> AppResult<Vec<Equipment>> {
        let mut rows: Vec<Equipment> = self
            .state()
            .equipment
            .iter()
            .filter(|e| e.status == status)
            .cloned()
            .collect();
        rows.sort_by_key(|e| e.id);
        Ok(rows)
    }

    async fn get_by_id(&self, id: i32) -> AppResult<Option<Equipment>> {
        Ok(self.state().equipment.iter().find(|e| e.id == id).cloned())
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}

#[async_trait]
impl MemberDirectory for MemoryStore {
    async fn find_by_account(&self, account: i64) -> AppResult<Option<Member>> {
        Ok(self.state().members.iter().find(|m| m.account == account).cloned())
    }
}

fn conflicts(state: &State, equipment_id: i32, window: BookingWindow) -> Vec<Booking> {
    let mut rows: Vec<Booking> = state
        .bookings
        .iter()
        .filter(|b| b.equipment_id == equipment_id && b.status.is_active() && b.window().overlaps(&window))
        .cloned()
        .collect();
    rows.sort_by_key(|b| b.start_time);
    rows
}

#[async_trait]
impl BookingStore for MemoryStore {
    async fn find_conflicts(&self, equipment_id: i32, window: BookingWindow) -> AppResult<Vec<Booking>> {
        Ok(conflicts(&self.state(), equipment_id, window))
    }

    async fn create(&self, booking: NewBooking) -> AppResult<i32> {
        let mut state = self.state();
        if !conflicts(&state, booking.equipment_id, booking.window).is_empty() {
            return Err(AppError::Conflict(SLOT_TAKEN.to_string()));
        }
        let id = state.next_id();
        let created_at = state.stamp();
        state.bookings.push(Booking {
            id,
            equipment_id: booking.equipment_id,
            member_account: booking.member_account,
            member_name: booking.member_name,
            start_time: booking.window.start,
            end_time: booking.window.end,
            location_note: booking.location_note,
            status: BookingStatus::Active,
            created_at,
        });
        Ok(id)
    }

    async fn cancel(&self, booking_id: i32, member_account: i64) -> AppResult<bool> {
        let mut state = self.state();
        let Some(booking) = state
            .bookings
            .iter_mut()
            .find(|b| b.id == booking_id && b.member_account == member_account)
        else {
            return Ok(false);
        };
        match booking.status.cancel() {
            Ok(status) => {
                booking.status = status;
                Ok(true)
            }
            Err(_) => Ok(false),
        }
    }

    async fn list_upcoming_for_equipment(&self, equipment_id: i32, now: NaiveDateTime) -> AppResult<Vec<BookingView>> {
        let state = self.state();
        let mut rows: Vec<BookingView> = state
            .bookings
            .iter()
            .filter(|b| b.equipment_id == equipment_id && b.status.is_active() && b.end_time > now)
            .map(|b| state.view(b))
            .collect();
        rows.sort_by_key(|v| v.booking.start_time);
        Ok(rows)
    }

    async fn list_owned_active(&self, member_account: i64) -> AppResult<Vec<BookingView>> {
        let state = self.state();
        Ok(state
            .bookings
            .iter()
            .filter(|b| b.member_account == member_account && b.status.is_active())
            .map(|b| state.view(b))
            .collect())
    }

    async fn list_shared_active(&self, member_account: i64) -> AppResult<Vec<BookingView>> {
        let state = self.state();
        Ok(state
            .bookings
            .iter()
            .filter(|b| b.status.is_active())
            .filter(|b| {
                state.share_requests.iter().any(|r| {
                    r.booking_id == b.id
                        && r.requester_account == member_account
                        && r.status == ShareRequestStatus::Accepted
                })
            })
            .map(|b| {
                let mut view = state.view(b);
                view.booking_type = BookingAccess::Shared;
                view
            })
            .collect())
    }

    async fn get_view(&self, booking_id: i32) -> AppResult<Option<BookingView>> {
        let state = self.state();
        Ok(state
            .bookings
            .iter()
            .find(|b| b.id == booking_id)
            .map(|b| state.view(b)))
    }
}

#[async_trait]
impl ShareRequestStore for MemoryStore {
    async fn find_pending(&self, booking_id: i32, requester_account: i64) -> AppResult<Option<ShareRequest>> {
        Ok(self
            .state()
            .share_requests
            .iter()
            .find(|r| r.booking_id == booking_id && r.requester_account == requester_account && r.status.is_pending())
            .cloned())
    }

    async fn create(&self, booking_id: i32, requester_account: i64, requester_name: String) -> AppResult<i32> {
        let mut state = self.state();
        let duplicate = state
            .share_requests
            .iter()
            .any(|r| r.booking_id == booking_id && r.requester_account == requester_account && r.status.is_pending());
        if duplicate {
            return Err(AppError::Conflict(DUPLICATE_REQUEST.to_string()));
        }
        let id = state.next_id();
        let created_at = state.stamp();
        state.share_requests.push(ShareRequest {
            id,
            booking_id,
            requester_account,
            requester_name,
            status: ShareRequestStatus::Pending,
            created_at,
        });
        Ok(id)
    }

    async fn find_for_owner(&self, request_id: i32, owner_account: i64) -> AppResult<Option<ShareRequest>> {
        let state = self.state();
        Ok(state
            .share_requests
            .iter()
            .find(|r| {
                r.id == request_id
                    && state
                        .bookings
                        .iter()
                        .any(|b| b.id == r.booking_id && b.member_account == owner_account)
            })
            .cloned())
    }

    async fn set_status(&self, request_id: i32, status: ShareRequestStatus) -> AppResult<()> {
        if let Some(r) = self.state().share_requests.iter_mut().find(|r| r.id == request_id) {
            r.status = status;
        }
        Ok(())
    }

    async fn list_for_booking(&self, booking_id: i32) -> AppResult<Vec<ShareRequest>> {
        let mut rows: Vec<ShareRequest> = self
            .state()
            .share_requests
            .iter()
            .filter(|r| r.booking_id == booking_id)
            .cloned()
            .collect();
        newest_first(&mut rows, |r| (r.created_at, r.id));
        Ok(rows)
    }

    async fn list_received(&self, owner_account: i64) -> AppResult<Vec<ShareRequestDetails>> {
        let state = self.state();
        let mut rows: Vec<ShareRequestDetails> = state
            .share_requests
            .iter()
            .filter_map(|r| state.details(r))
            .filter(|d| d.owner_account == owner_account)
            .collect();
        newest_first(&mut rows, |d| (d.request.created_at, d.request.id));
        Ok(rows)
    }

    async fn list_sent(&self, requester_account: i64) -> AppResult<Vec<ShareRequestDetails>> {
        let state = self.state();
        let mut rows: Vec<ShareRequestDetails> = state
            .share_requests
            .iter()
            .filter(|r| r.requester_account == requester_account)
            .filter_map(|r| state.details(r))
            .collect();
        newest_first(&mut rows, |d| (d.request.created_at, d.request.id));
        Ok(rows)
    }

    async fn count_pending_received(&self, owner_account: i64) -> AppResult<i64> {
        let state = self.state();
        let count = state
            .share_requests
            .iter()
            .filter(|r| r.status.is_pending())
            .filter_map(|r| state.details(r))
            .filter(|d| d.owner_account == owner_account)
            .count();
        Ok(count as i64)
    }
}

#[async_trait]
impl TrainingStore for MemoryStore {
    async fn create_session(
        &self,
        booking_id: i32,
        status: SessionStatus,
        records: Vec<NewTrainingRecord>,
    ) -> AppResult<(TrainingSession, Vec<TrainingRecord>)> {
        let mut state = self.state();
        let session_id = state.next_id();
        let session = TrainingSession {
            id: session_id,
            booking_id,
            status,
            created_at: state.stamp(),
        };
        state.sessions.push(session.clone());

        let mut saved = Vec::with_capacity(records.len());
        for record in records {
            let id = state.next_id();
            let row = TrainingRecord {
                id,
                session_id: Some(session_id),
                booking_id,
                set_number: record.set_number,
                weight: record.weight,
                repetitions: record.repetitions,
                completed: record.completed,
                exercise_name: record.exercise_name,
                created_at: state.stamp(),
            };
            state.records.push(row.clone());
            saved.push(row);
        }
        Ok((session, saved))
    }

    async fn find_record_context(&self, record_id: i32) -> AppResult<Option<RecordContext>> {
        let state = self.state();
        Ok(state.records.iter().find(|r| r.id == record_id).map(|record| RecordContext {
            record: record.clone(),
            session_status: record
                .session_id
                .and_then(|sid| state.sessions.iter().find(|s| s.id == sid))
                .map(|s| s.status),
            booking_owner: state
                .bookings
                .iter()
                .find(|b| b.id == record.booking_id)
                .map(|b| b.member_account),
        }))
    }

    async fn set_record_completed(&self, record_id: i32, completed: bool) -> AppResult<bool> {
        let mut state = self.state();
        let editable_sessions: Vec<i32> = state
            .sessions
            .iter()
            .filter(|s| !s.status.is_locked())
            .map(|s| s.id)
            .collect();
        match state
            .records
            .iter_mut()
            .find(|r| r.id == record_id && r.session_id.is_some_and(|sid| editable_sessions.contains(&sid)))
        {
            Some(record) => {
                record.completed = completed;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn find_session(&self, booking_id: i32, session_id: i32) -> AppResult<Option<SessionContext>> {
        let state = self.state();
        let Some(session) = state
            .sessions
            .iter()
            .find(|s| s.id == session_id && s.booking_id == booking_id)
        else {
            return Ok(None);
        };
        Ok(state
            .bookings
            .iter()
            .find(|b| b.id == booking_id)
            .map(|b| SessionContext {
                session: session.clone(),
                booking_owner: b.member_account,
            }))
    }

    async fn complete_session(&self, booking_id: i32, session_id: i32) -> AppResult<bool> {
        let mut state = self.state();
        let Some(session) = state
            .sessions
            .iter_mut()
            .find(|s| s.id == session_id && s.booking_id == booking_id)
        else {
            return Ok(false);
        };
        match session.status.complete() {
            Ok(status) => {
                session.status = status;
                Ok(true)
            }
            Err(_) => Ok(false),
        }
    }

    async fn delete_session(&self, session_id: i32) -> AppResult<bool> {
        let mut state = self.state();
        state.records.retain(|r| r.session_id != Some(session_id));
        let before = state.sessions.len();
        state.sessions.retain(|s| s.id != session_id);
        Ok(state.sessions.len() < before)
    }

    async fn list_sessions(&self, booking_id: i32) -> AppResult<Vec<TrainingSession>> {
        let mut rows: Vec<TrainingSession> = self
            .state()
            .sessions
            .iter()
            .filter(|s| s.booking_id == booking_id)
            .cloned()
            .collect();
        newest_first(&mut rows, |s| (s.created_at, s.id));
        Ok(rows)
    }

    async fn list_records(&self, booking_id: i32) -> AppResult<Vec<TrainingRecord>> {
        let mut rows: Vec<TrainingRecord> = self
            .state()
            .records
            .iter()
            .filter(|r| r.booking_id == booking_id)
            .cloned()
            .collect();
        rows.sort_by_key(|r| (r.session_id.is_none(), r.session_id, r.set_number, r.id));
        Ok(rows)
    }
}
