use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

/// Persisted booking record. Created once with a snapshot of the session;
/// only `status` is mutable afterwards, and the record is never deleted.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// User-facing reference, distinct from the document id.
    pub booking_ref: String,
    pub user_id: String,
    pub movie_id: String,
    pub movie_title: String,
    /// Start time of the showing, e.g. "19:30".
    pub showtime: String,
    pub showtime_id: String,
    /// Concrete calendar date, "YYYY-MM-DD".
    pub date: String,
    pub theater: String,
    /// Seat ids, e.g. ["A1", "A2"].
    pub seats: Vec<String>,
    pub total_seats: u32,
    pub total_amount: f64,
    pub status: BookingStatus,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub snacks: HashMap<String, u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offer_id: Option<String>,
}
