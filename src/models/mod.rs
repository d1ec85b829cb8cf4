//! Data models for the booking workflows

pub mod booking;
pub mod enums;
pub mod equipment;
pub mod member;
pub mod share_request;
pub mod training;

// Re-export commonly used types
pub use booking::{Booking, BookingDetails, BookingView, BookingWindow, NewBooking};
pub use enums::{BookingAccess, BookingStatus, EquipmentStatus, SessionStatus, ShareAction, ShareRequestStatus};
pub use equipment::Equipment;
pub use member::Member;
pub use share_request::{ShareRequest, ShareRequestDetails};
pub use training::{TrainingRecord, TrainingSession, TrainingSessionDetails};
