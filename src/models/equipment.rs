//! Equipment model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::enums::EquipmentStatus;

/// Equipment record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Equipment {
    pub id: i32,
    pub name: String,
    /// Where in the gym the equipment stands
    pub location: String,
    pub status: EquipmentStatus,
    /// Free-text description
    pub description: String,
    pub image_ref: Option<String>,
    /// What the equipment trains
    pub function_description: Option<String>,
}
