pub mod booking;
pub mod rating;
pub mod resource;
pub mod stats;
pub mod user;

pub use booking::{
    Booking, BookingDetail, BookingStatus, BookingWithDetails, ResourceSummary, UserContact,
};
pub use rating::Rating;
pub use resource::{NewResource, Resource, ResourceCategory};
pub use stats::BookingStats;
pub use user::{User, UserRole};
