pub mod booking_model;
pub mod movie_model;
pub mod seat_model;
pub mod snack_model;
