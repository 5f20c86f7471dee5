use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Extension, Path, Query};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;

use crate::catalog;
use crate::errors::BookingError;
use crate::models::booking_model::Booking;
use crate::models::seat_model::Seat;
use crate::reservation;
use crate::store::MongoStore;
use crate::workflow::BookingSession;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub user_id: String,
    pub movie_id: String,
    pub showtime_id: String,
    /// Seat ids, e.g. ["A1", "A2"].
    pub seats: Vec<String>,
    #[serde(default)]
    pub snacks: HashMap<String, u32>,
    pub offer_code: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingsQuery {
    pub user_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelRequest {
    pub user_id: String,
}

/// Drives one full booking session from a request payload: movie,
/// showtime, seats, snacks, optional coupon, then the payment commit.
pub async fn create_booking(
    Extension(store): Extension<Arc<MongoStore>>,
    Json(request): Json<BookingRequest>,
) -> Result<(StatusCode, Json<Booking>), BookingError> {
    let movie = catalog::movie_by_id(store.as_ref(), &request.movie_id)
        .await
        .ok_or_else(|| BookingError::Validation(format!("unknown movie {}", request.movie_id)))?;
    let showtime = catalog::showtime_by_id(&request.showtime_id).ok_or_else(|| {
        BookingError::Validation(format!("unknown showtime {}", request.showtime_id))
    })?;

    let mut seats = Vec::with_capacity(request.seats.len());
    for id in &request.seats {
        let seat = Seat::from_id(id)
            .ok_or_else(|| BookingError::Validation(format!("invalid seat id {id}")))?;
        seats.push(seat);
    }

    let snack_catalog = catalog::snacks();
    let mut session = BookingSession::new();
    session.select_movie(movie)?;
    session.select_showtime(showtime)?;
    session.confirm_seats(seats)?;
    session.confirm_snacks(request.snacks)?;

    if let Some(code) = &request.offer_code {
        let offer = catalog::offer_by_code(code)
            .ok_or_else(|| BookingError::Validation("invalid coupon code".to_string()))?;
        session.apply_offer(Some(offer), &snack_catalog)?;
    }

    let booking = session
        .submit_payment(store.as_ref(), &request.user_id, &snack_catalog)
        .await?;
    Ok((StatusCode::CREATED, Json(booking)))
}

pub async fn list_bookings(
    Query(query): Query<BookingsQuery>,
    Extension(store): Extension<Arc<MongoStore>>,
) -> Json<Vec<Booking>> {
    Json(reservation::user_bookings(store.as_ref(), &query.user_id).await)
}

pub async fn get_booking(
    Path(id): Path<String>,
    Extension(store): Extension<Arc<MongoStore>>,
) -> Result<Json<Booking>, BookingError> {
    let booking = reservation::booking_by_id(store.as_ref(), &id).await?;
    Ok(Json(booking))
}

pub async fn cancel_booking(
    Path(id): Path<String>,
    Extension(store): Extension<Arc<MongoStore>>,
    Json(request): Json<CancelRequest>,
) -> Result<Json<Booking>, BookingError> {
    let booking = reservation::cancel_booking(store.as_ref(), &id, &request.user_id).await?;
    Ok(Json(booking))
}
