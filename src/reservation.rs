//! Seat reservation and booking persistence. The commit sequence is
//! strictly ordered: read availability, compare, write availability, write
//! booking — each await completes before the next begins.

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use mongodb::bson::{from_document, to_document};
use tracing::{info, warn};

use crate::errors::BookingError;
use crate::models::booking_model::{Booking, BookingStatus};
use crate::models::movie_model::{Movie, Showtime};
use crate::models::seat_model::{Seat, SeatAvailability};
use crate::models::snack_model::Offer;
use crate::store::{Condition, DocumentStore, Sort};

const SEATS_COLLECTION: &str = "seats";
const BOOKINGS_COLLECTION: &str = "bookings";

/// Composite identifier scoping seat occupancy to one showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowingKey {
    pub movie_id: String,
    /// Concrete calendar date, "YYYY-MM-DD".
    pub date: String,
    pub showtime_id: String,
}

impl ShowingKey {
    pub fn new(movie_id: &str, showtime: &Showtime, today: NaiveDate) -> Self {
        ShowingKey {
            movie_id: movie_id.to_string(),
            date: showtime.date.resolve_on(today).format("%Y-%m-%d").to_string(),
            showtime_id: showtime.id.to_string(),
        }
    }

    /// Resolves a path label: "Today"/"Tomorrow" become concrete dates,
    /// anything else is taken as an already-resolved date string.
    pub fn from_label(movie_id: &str, date_label: &str, showtime_id: &str, today: NaiveDate) -> Self {
        let date = match date_label {
            "Today" => today.format("%Y-%m-%d").to_string(),
            "Tomorrow" => (today + chrono::Duration::days(1)).format("%Y-%m-%d").to_string(),
            other => other.to_string(),
        };
        ShowingKey {
            movie_id: movie_id.to_string(),
            date,
            showtime_id: showtime_id.to_string(),
        }
    }

    pub fn doc_id(&self) -> String {
        format!("{}_{}_{}", self.movie_id, self.date, self.showtime_id)
    }
}

/// Time-derived user-facing booking reference.
fn generate_booking_ref() -> String {
    format!("BK{}", Utc::now().timestamp_millis())
}

/// Occupied seat ids for a showing. Store failures propagate; the commit
/// path must not guess at availability.
pub async fn occupied_seats<S: DocumentStore>(
    store: &S,
    key: &ShowingKey,
) -> Result<Vec<String>, BookingError> {
    match store.get(SEATS_COLLECTION, &key.doc_id()).await? {
        Some(document) => {
            let availability: SeatAvailability =
                from_document(document).map_err(crate::errors::StoreError::from)?;
            Ok(availability.occupied_seats)
        }
        None => Ok(Vec::new()),
    }
}

/// Lenient read used when building a seat map: an unreachable store shows
/// every seat as free instead of failing the screen.
pub async fn occupied_seats_or_empty<S: DocumentStore>(store: &S, key: &ShowingKey) -> Vec<String> {
    match occupied_seats(store, key).await {
        Ok(seats) => seats,
        Err(e) => {
            warn!("seat availability unavailable for {}: {e}", key.doc_id());
            Vec::new()
        }
    }
}

/// Marks the requested seats occupied for the showing, failing with the
/// exact contested ids when any are already taken.
///
/// This is a check-then-write sequence, not a compare-and-swap: two
/// sessions committing the same showing can both pass the conflict check
/// before either writes. Faithful to the source design; serializing
/// commits per showing key would close the gap.
pub async fn reserve_seats<S: DocumentStore>(
    store: &S,
    key: &ShowingKey,
    seats: &[String],
) -> Result<(), BookingError> {
    let current = occupied_seats(store, key).await?;

    let conflicts: Vec<String> = seats
        .iter()
        .filter(|seat| current.contains(seat))
        .cloned()
        .collect();
    if !conflicts.is_empty() {
        return Err(BookingError::SeatConflict { seats: conflicts });
    }

    let mut occupied = current;
    occupied.extend(seats.iter().cloned());
    let availability = SeatAvailability {
        movie_id: key.movie_id.clone(),
        date: key.date.clone(),
        showtime_id: key.showtime_id.clone(),
        occupied_seats: occupied,
    };
    let document = to_document(&availability).map_err(crate::errors::StoreError::from)?;
    store
        .put(SEATS_COLLECTION, &key.doc_id(), document, true)
        .await?;
    Ok(())
}

/// Full commit: reserve the seats, then persist a confirmed booking
/// snapshot. Any failure leaves the caller free to retry; a conflict
/// writes nothing.
#[allow(clippy::too_many_arguments)]
pub async fn commit_booking<S: DocumentStore>(
    store: &S,
    user_id: &str,
    movie: &Movie,
    showtime: &Showtime,
    seats: &[Seat],
    total_amount: f64,
    snacks: &HashMap<String, u32>,
    offer_id: Option<&str>,
    today: NaiveDate,
) -> Result<Booking, BookingError> {
    let key = ShowingKey::new(&movie.id, showtime, today);
    let seat_ids: Vec<String> = seats.iter().map(|seat| seat.id.clone()).collect();

    reserve_seats(store, &key, &seat_ids).await?;

    let booking = Booking {
        id: None,
        booking_ref: generate_booking_ref(),
        user_id: user_id.to_string(),
        movie_id: movie.id.clone(),
        movie_title: movie.title.clone(),
        showtime: showtime.time.clone(),
        showtime_id: showtime.id.clone(),
        date: key.date.clone(),
        theater: showtime.theater.clone(),
        seats: seat_ids,
        total_seats: seats.len() as u32,
        total_amount,
        status: BookingStatus::Confirmed,
        snacks: snacks.clone(),
        offer_id: offer_id.map(|id| id.to_string()),
    };
    let document = to_document(&booking).map_err(crate::errors::StoreError::from)?;
    let created = store.create(BOOKINGS_COLLECTION, document).await?;
    let stored: Booking = from_document(created).map_err(crate::errors::StoreError::from)?;
    info!(
        "booking {} confirmed for {} ({} seats)",
        stored.booking_ref,
        stored.movie_title,
        stored.total_seats
    );
    Ok(stored)
}

pub async fn booking_by_id<S: DocumentStore>(
    store: &S,
    booking_id: &str,
) -> Result<Booking, BookingError> {
    let document = store
        .get(BOOKINGS_COLLECTION, booking_id)
        .await?
        .ok_or_else(|| BookingError::NotFound("booking".to_string()))?;
    let booking = from_document(document).map_err(crate::errors::StoreError::from)?;
    Ok(booking)
}

/// Bookings for one user, newest first. Degrades to an empty list when the
/// store is unreachable.
pub async fn user_bookings<S: DocumentStore>(store: &S, user_id: &str) -> Vec<Booking> {
    let result = store
        .query(
            BOOKINGS_COLLECTION,
            &[Condition::eq("userId", user_id)],
            Some(Sort::desc("createdAt")),
            None,
        )
        .await;
    match result {
        Ok(documents) => documents
            .into_iter()
            .filter_map(|document| match from_document::<Booking>(document) {
                Ok(booking) => Some(booking),
                Err(e) => {
                    warn!("skipping malformed booking document: {e}");
                    None
                }
            })
            .collect(),
        Err(e) => {
            warn!("could not fetch bookings for {user_id}: {e}");
            Vec::new()
        }
    }
}

/// Cancels a booking after verifying ownership. Seats are not released;
/// the occupied set only grows.
pub async fn cancel_booking<S: DocumentStore>(
    store: &S,
    booking_id: &str,
    user_id: &str,
) -> Result<Booking, BookingError> {
    let booking = match booking_by_id(store, booking_id).await {
        Ok(booking) => booking,
        Err(BookingError::NotFound(_)) => return Err(BookingError::Unauthorized),
        Err(e) => return Err(e),
    };
    if booking.user_id != user_id {
        return Err(BookingError::Unauthorized);
    }

    let updated = store
        .update(
            BOOKINGS_COLLECTION,
            booking_id,
            mongodb::bson::doc! { "status": "cancelled" },
        )
        .await?;
    let booking = from_document(updated).map_err(crate::errors::StoreError::from)?;
    Ok(booking)
}
