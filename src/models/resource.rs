use std::fmt;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Resource {
    pub id: String,
    pub name: String,
    pub category: ResourceCategory,
    pub subcategory: String,
    pub capacity: Option<i64>,
    pub hourly_rate: Decimal,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ResourceCategory {
    MeetingRoom,
    CraneService,
    ForkliftService,
}

impl ResourceCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceCategory::MeetingRoom => "meeting_room",
            ResourceCategory::CraneService => "crane_service",
            ResourceCategory::ForkliftService => "forklift_service",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "meeting_room" => Some(ResourceCategory::MeetingRoom),
            "crane_service" => Some(ResourceCategory::CraneService),
            "forklift_service" => Some(ResourceCategory::ForkliftService),
            _ => None,
        }
    }
}

impl fmt::Display for ResourceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_active() -> bool {
    true
}

/// Input for registering a resource in the catalogue.
#[derive(Debug, Clone, Deserialize)]
pub struct NewResource {
    pub name: String,
    pub category: ResourceCategory,
    pub subcategory: String,
    pub capacity: Option<i64>,
    pub hourly_rate: Decimal,
    pub description: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

impl NewResource {
    pub fn validate(&self) -> AppResult<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::Validation("name must not be empty".to_string()));
        }
        if self.subcategory.trim().is_empty() {
            return Err(AppError::Validation(
                "subcategory must not be empty".to_string(),
            ));
        }
        if self.hourly_rate <= Decimal::ZERO {
            return Err(AppError::Validation(format!(
                "hourly rate must be positive, got {}",
                self.hourly_rate
            )));
        }
        if let Some(capacity) = self.capacity {
            if capacity <= 0 {
                return Err(AppError::Validation(format!(
                    "capacity must be positive, got {capacity}"
                )));
            }
        }
        Ok(())
    }
}
