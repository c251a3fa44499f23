use rust_decimal::Decimal;
use serde::Serialize;

/// Derived aggregate over a set of bookings. Never persisted.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct BookingStats {
    pub total_bookings: u64,
    pub pending: u64,
    pub confirmed: u64,
    pub ongoing: u64,
    pub completed: u64,
    pub cancelled: u64,
    pub total_revenue: Decimal,
}

impl BookingStats {
    pub fn status_count_sum(&self) -> u64 {
        self.pending + self.confirmed + self.ongoing + self.completed + self.cancelled
    }
}
