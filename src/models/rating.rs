use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Rating {
    pub id: String,
    pub booking_id: String,
    pub user_id: String,
    pub score: i64,
    pub feedback: Option<String>,
    pub created_at: NaiveDateTime,
}
