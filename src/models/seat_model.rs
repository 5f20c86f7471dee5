use std::collections::HashSet;

use serde::{Deserialize, Serialize};

pub const ROWS: [char; 6] = ['A', 'B', 'C', 'D', 'E', 'F'];
pub const COLS_PER_ROW: u32 = 8;
pub const SEAT_PRICE: f64 = 12.50;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SeatStatus {
    Available,
    Occupied,
    Selected,
    /// Visual tag only, carries no distinct business rule.
    Vip,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Seat {
    /// Row letter plus column, e.g. "A1".
    pub id: String,
    pub row: char,
    pub col: u32,
    pub status: SeatStatus,
    pub price: f64,
}

impl Seat {
    /// Builds a selected seat from an id like "B7". Returns `None` for ids
    /// outside the hall layout.
    pub fn from_id(id: &str) -> Option<Seat> {
        let mut chars = id.chars();
        let row = chars.next()?;
        let col: u32 = chars.as_str().parse().ok()?;
        if !ROWS.contains(&row) || col == 0 || col > COLS_PER_ROW {
            return None;
        }
        Some(Seat {
            id: id.to_string(),
            row,
            col,
            status: SeatStatus::Selected,
            price: SEAT_PRICE,
        })
    }
}

/// Generates the hall grid, marking ids present in `occupied` as taken.
/// Occupied seats are fixed at build time and never become selectable.
pub fn build_seat_map(occupied: &HashSet<String>) -> Vec<Seat> {
    let mut seats = Vec::with_capacity(ROWS.len() * COLS_PER_ROW as usize);
    for row in ROWS {
        for col in 1..=COLS_PER_ROW {
            let id = format!("{row}{col}");
            let status = if occupied.contains(&id) {
                SeatStatus::Occupied
            } else {
                SeatStatus::Available
            };
            seats.push(Seat {
                id,
                row,
                col,
                status,
                price: SEAT_PRICE,
            });
        }
    }
    seats
}

/// Persisted occupancy record for one showing, keyed by
/// `{movieId}_{date}_{showtimeId}`. The occupied set only grows; there is
/// no release path.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct SeatAvailability {
    #[serde(default)]
    pub movie_id: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub showtime_id: String,
    #[serde(default)]
    pub occupied_seats: Vec<String>,
}
