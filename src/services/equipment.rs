//! Equipment directory service

use crate::{
    error::{AppError, AppResult},
    models::{BookingView, Equipment, EquipmentStatus},
    repository::Repository,
};

use super::Clock;

#[derive(Clone)]
pub struct EquipmentService {
    repository: Repository,
    clock: Clock,
}

impl EquipmentService {
    pub fn new(repository: Repository, clock: Clock) -> Self {
        Self { repository, clock }
    }

    /// Equipment members can book, ordered by id
    pub async fn list_bookable(&self) -> AppResult<Vec<Equipment>> {
        self.repository.equipment.list_by_status(EquipmentStatus::Normal).await
    }

    /// Storage is reachable
    pub async fn ping(&self) -> AppResult<()> {
        self.repository.equipment.ping().await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Equipment> {
        self.repository
            .equipment
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", id)))
    }

    /// Active bookings on one equipment that have not ended yet, earliest first
    pub async fn list_active_bookings_for(&self, equipment_id: i32) -> AppResult<Vec<BookingView>> {
        self.repository
            .bookings
            .list_upcoming_for_equipment(equipment_id, self.clock.now())
            .await
    }
}
