use std::sync::Arc;

use axum::extract::{Extension, Path};
use axum::response::Json;
use chrono::Utc;

use crate::catalog;
use crate::errors::BookingError;
use crate::models::movie_model::{Movie, Showtime};
use crate::models::seat_model::{build_seat_map, Seat};
use crate::models::snack_model::{Offer, Snack};
use crate::reservation::{self, ShowingKey};
use crate::store::MongoStore;

pub async fn list_movies(Extension(store): Extension<Arc<MongoStore>>) -> Json<Vec<Movie>> {
    Json(catalog::movies_with_fallback(store.as_ref()).await)
}

pub async fn get_movie(
    Path(id): Path<String>,
    Extension(store): Extension<Arc<MongoStore>>,
) -> Result<Json<Movie>, BookingError> {
    catalog::movie_by_id(store.as_ref(), &id)
        .await
        .map(Json)
        .ok_or_else(|| BookingError::NotFound("movie".to_string()))
}

pub async fn list_showtimes() -> Json<Vec<Showtime>> {
    Json(catalog::showtimes())
}

pub async fn list_snacks() -> Json<Vec<Snack>> {
    Json(catalog::snacks())
}

pub async fn list_offers() -> Json<Vec<Offer>> {
    Json(catalog::offers())
}

/// Seat map for one showing. The date segment accepts "Today", "Tomorrow"
/// or a concrete "YYYY-MM-DD". An unreachable store renders every seat
/// free rather than failing the screen.
pub async fn seat_map(
    Path((movie_id, date, showtime_id)): Path<(String, String, String)>,
    Extension(store): Extension<Arc<MongoStore>>,
) -> Json<Vec<Seat>> {
    let key = ShowingKey::from_label(&movie_id, &date, &showtime_id, Utc::now().date_naive());
    let occupied = reservation::occupied_seats_or_empty(store.as_ref(), &key)
        .await
        .into_iter()
        .collect();
    Json(build_seat_map(&occupied))
}
