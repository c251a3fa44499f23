use std::fmt;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Rating, ResourceCategory};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Booking {
    pub id: String,
    pub user_id: String,
    pub resource_id: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub status: BookingStatus,
    pub total_amount: Decimal,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Lifecycle status of a booking. Transition rules live in
/// `services::lifecycle`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Ongoing,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub const ALL: [BookingStatus; 5] = [
        BookingStatus::Pending,
        BookingStatus::Confirmed,
        BookingStatus::Ongoing,
        BookingStatus::Completed,
        BookingStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Ongoing => "ongoing",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(BookingStatus::Pending),
            "confirmed" => Some(BookingStatus::Confirmed),
            "ongoing" => Some(BookingStatus::Ongoing),
            "completed" => Some(BookingStatus::Completed),
            "cancelled" => Some(BookingStatus::Cancelled),
            _ => None,
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A booking as shown in list views: the stored row plus what a reader
/// needs without further lookups.
#[derive(Debug, Clone, Serialize)]
pub struct BookingWithDetails {
    #[serde(flatten)]
    pub booking: Booking,
    pub resource: ResourceSummary,
    /// `None` when the requester has no directory entry.
    pub requester: Option<UserContact>,
    pub rating: Option<Rating>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ResourceSummary {
    pub name: String,
    pub category: ResourceCategory,
    pub subcategory: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UserContact {
    pub username: String,
    pub email: String,
}

/// Plain-value projection handed to export/notification collaborators.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BookingDetail {
    pub booking_id: String,
    pub resource_name: String,
    pub resource_category: ResourceCategory,
    pub resource_subcategory: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub user_id: String,
    pub username: Option<String>,
    pub email: Option<String>,
    pub total_amount: Decimal,
    pub status: BookingStatus,
    pub notes: Option<String>,
}
