pub mod availability;
pub mod booking;
pub mod catalog;
pub mod clock;
pub mod lifecycle;
pub mod pricing;
pub mod stats;
