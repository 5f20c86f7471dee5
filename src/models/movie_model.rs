use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: String,
    pub title: String,
    pub genre: String,
    /// Display runtime, e.g. "2h 49m".
    pub duration: String,
    pub rating: String,
    pub image_url: String,
    pub description: String,
}

/// Presentation variant of a showing.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum Experience {
    Standard,
    #[serde(rename = "IMAX")]
    Imax,
    Dolby,
}

/// Relative date label shown in the showtime picker. Resolved to a
/// concrete calendar date only at commit time.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum ShowDate {
    Today,
    Tomorrow,
}

impl ShowDate {
    pub fn resolve_on(&self, today: NaiveDate) -> NaiveDate {
        match self {
            ShowDate::Today => today,
            ShowDate::Tomorrow => today + Duration::days(1),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Showtime {
    pub id: String,
    /// Start time, e.g. "19:30".
    pub time: String,
    pub experience: Experience,
    pub date: ShowDate,
    pub theater: String,
}
