use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Failures raised by the document store layer.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Backend(String),
    #[error("serialization error: {0}")]
    Serialization(#[from] mongodb::bson::ser::Error),
    #[error("deserialization error: {0}")]
    Deserialization(#[from] mongodb::bson::de::Error),
    #[error("document {collection}/{id} not found")]
    NotFound { collection: String, id: String },
}

impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        StoreError::Backend(err.to_string())
    }
}

/// Domain errors surfaced by the booking workflow and the reservation
/// protocol. Store failures propagate unchanged; the workflow never
/// swallows a conflict.
#[derive(Debug, Error)]
pub enum BookingError {
    #[error("{0}")]
    Validation(String),
    #[error("minimum order value of ${min_order} required for coupon {code}")]
    OfferBelowMinimum { code: String, min_order: f64 },
    #[error("seats {} are already taken", seats.join(", "))]
    SeatConflict { seats: Vec<String> },
    #[error("booking not found or unauthorized")]
    Unauthorized,
    #[error("{0} not found")]
    NotFound(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl BookingError {
    fn status(&self) -> StatusCode {
        match self {
            BookingError::Validation(_) | BookingError::OfferBelowMinimum { .. } => {
                StatusCode::BAD_REQUEST
            }
            BookingError::SeatConflict { .. } => StatusCode::CONFLICT,
            BookingError::Unauthorized => StatusCode::UNAUTHORIZED,
            BookingError::NotFound(_) => StatusCode::NOT_FOUND,
            BookingError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for BookingError {
    fn into_response(self) -> Response {
        let body = match &self {
            // Contested seat ids go out verbatim so the caller can
            // refresh its seat map.
            BookingError::SeatConflict { seats } => json!({
                "error": self.to_string(),
                "conflicts": seats,
            }),
            _ => json!({ "error": self.to_string() }),
        };
        (self.status(), Json(body)).into_response()
    }
}
