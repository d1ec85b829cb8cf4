//! Repository layer for database operations

pub mod bookings;
pub mod equipment;
pub mod legacy;
pub mod members;
pub mod share_requests;
pub mod training;

#[cfg(test)]
pub mod memory;

use sqlx::{Pool, Postgres};
use std::sync::Arc;

pub use bookings::BookingStore;
pub use equipment::EquipmentStore;
pub use members::MemberDirectory;
pub use share_requests::ShareRequestStore;
pub use training::TrainingStore;

/// Store handles shared by all services
#[derive(Clone)]
pub struct Repository {
    pub equipment: Arc<dyn EquipmentStore>,
    pub members: Arc<dyn MemberDirectory>,
    pub bookings: Arc<dyn BookingStore>,
    pub share_requests: Arc<dyn ShareRequestStore>,
    pub training: Arc<dyn TrainingStore>,
}

impl Repository {
    /// Create a PostgreSQL-backed repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            equipment: Arc::new(equipment::EquipmentRepository::new(pool.clone())),
            members: Arc::new(members::MembersRepository::new(pool.clone())),
            bookings: Arc::new(bookings::BookingsRepository::new(pool.clone())),
            share_requests: Arc::new(share_requests::ShareRequestsRepository::new(pool.clone())),
            training: Arc::new(training::TrainingRepository::new(pool)),
        }
    }
}
