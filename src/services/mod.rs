//! Business logic services

pub mod bookings;
pub mod equipment;
pub mod share_requests;
pub mod training;

use chrono::{Local, NaiveDateTime};

use crate::repository::Repository;

/// Source of "now" for time-dependent rules
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    /// Server-local wall clock
    #[default]
    System,
    Fixed(NaiveDateTime),
}

impl Clock {
    pub fn now(&self) -> NaiveDateTime {
        match self {
            Clock::System => Local::now().naive_local(),
            Clock::Fixed(at) => *at,
        }
    }
}

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub equipment: equipment::EquipmentService,
    pub bookings: bookings::BookingsService,
    pub share_requests: share_requests::ShareRequestsService,
    pub training: training::TrainingService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, clock: Clock) -> Self {
        Self {
            equipment: equipment::EquipmentService::new(repository.clone(), clock),
            bookings: bookings::BookingsService::new(repository.clone(), clock),
            share_requests: share_requests::ShareRequestsService::new(repository.clone()),
            training: training::TrainingService::new(repository),
        }
    }
}
