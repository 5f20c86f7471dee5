//! The linear booking state machine. One session owns one `BookingSession`;
//! transitions are the only mutation path and reset discards everything.

use std::collections::{HashMap, HashSet};

use chrono::Utc;
use tracing::info;

use crate::errors::BookingError;
use crate::models::booking_model::Booking;
use crate::models::movie_model::{Movie, Showtime};
use crate::models::seat_model::Seat;
use crate::models::snack_model::{Offer, Snack};
use crate::pricing::{self, PriceBreakdown};
use crate::reservation;
use crate::store::DocumentStore;

/// Booking screens in strict linear order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Step {
    SelectMovie,
    SelectShowtime,
    SelectSeats,
    SelectSnacks,
    Payment,
    Confirmation,
}

impl Step {
    /// The step "back" returns to. `SelectMovie` has nothing before it and
    /// `Confirmation` is only left via reset.
    fn previous(self) -> Option<Step> {
        match self {
            Step::SelectMovie | Step::Confirmation => None,
            Step::SelectShowtime => Some(Step::SelectMovie),
            Step::SelectSeats => Some(Step::SelectShowtime),
            Step::SelectSnacks => Some(Step::SelectSeats),
            Step::Payment => Some(Step::SelectSnacks),
        }
    }
}

/// One user's in-progress booking selection. The booking id is set exactly
/// when the session reaches `Confirmation`.
#[derive(Debug, Clone)]
pub struct BookingSession {
    step: Step,
    movie: Option<Movie>,
    showtime: Option<Showtime>,
    seats: Vec<Seat>,
    snacks: HashMap<String, u32>,
    offer: Option<Offer>,
    booking_id: Option<String>,
}

impl Default for BookingSession {
    fn default() -> Self {
        BookingSession {
            step: Step::SelectMovie,
            movie: None,
            showtime: None,
            seats: Vec::new(),
            snacks: HashMap::new(),
            offer: None,
            booking_id: None,
        }
    }
}

impl BookingSession {
    pub fn new() -> Self {
        BookingSession::default()
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn movie(&self) -> Option<&Movie> {
        self.movie.as_ref()
    }

    pub fn showtime(&self) -> Option<&Showtime> {
        self.showtime.as_ref()
    }

    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    pub fn snacks(&self) -> &HashMap<String, u32> {
        &self.snacks
    }

    pub fn offer(&self) -> Option<&Offer> {
        self.offer.as_ref()
    }

    pub fn booking_id(&self) -> Option<&str> {
        self.booking_id.as_deref()
    }

    fn require_step(&self, expected: Step, action: &str) -> Result<(), BookingError> {
        if self.step != expected {
            return Err(BookingError::Validation(format!(
                "cannot {action} at step {:?}",
                self.step
            )));
        }
        Ok(())
    }

    pub fn select_movie(&mut self, movie: Movie) -> Result<(), BookingError> {
        self.require_step(Step::SelectMovie, "select a movie")?;
        self.movie = Some(movie);
        self.step = Step::SelectShowtime;
        Ok(())
    }

    pub fn select_showtime(&mut self, showtime: Showtime) -> Result<(), BookingError> {
        self.require_step(Step::SelectShowtime, "select a showtime")?;
        if self.movie.is_none() {
            return Err(BookingError::Validation("no movie selected".to_string()));
        }
        self.showtime = Some(showtime);
        self.step = Step::SelectSeats;
        Ok(())
    }

    /// Confirms the seat selection. At least one seat is required — a hard
    /// precondition, not a cosmetic one. Duplicate ids are dropped.
    pub fn confirm_seats(&mut self, seats: Vec<Seat>) -> Result<(), BookingError> {
        self.require_step(Step::SelectSeats, "confirm seats")?;
        if seats.is_empty() {
            return Err(BookingError::Validation(
                "at least one seat must be selected".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        self.seats = seats
            .into_iter()
            .filter(|seat| seen.insert(seat.id.clone()))
            .collect();
        self.step = Step::SelectSnacks;
        Ok(())
    }

    /// Confirms the snack selection; zero quantities are dropped.
    pub fn confirm_snacks(&mut self, snacks: HashMap<String, u32>) -> Result<(), BookingError> {
        self.require_step(Step::SelectSnacks, "confirm snacks")?;
        self.snacks = snacks.into_iter().filter(|(_, qty)| *qty > 0).collect();
        self.step = Step::Payment;
        Ok(())
    }

    /// Skipping is confirming with the mapping unchanged (possibly empty).
    pub fn skip_snacks(&mut self) -> Result<(), BookingError> {
        let current = self.snacks.clone();
        self.confirm_snacks(current)
    }

    /// Applies (or clears, with `None`) the session's single offer. Only
    /// legal at the payment step; an ineligible coupon changes nothing.
    pub fn apply_offer(
        &mut self,
        offer: Option<Offer>,
        snack_catalog: &[Snack],
    ) -> Result<(), BookingError> {
        self.require_step(Step::Payment, "apply an offer")?;
        match offer {
            None => {
                self.offer = None;
            }
            Some(offer) => {
                let sub_total =
                    pricing::price_order(&self.seats, &self.snacks, snack_catalog, None).sub_total;
                pricing::check_offer_eligibility(&offer, sub_total)?;
                self.offer = Some(offer);
            }
        }
        Ok(())
    }

    /// Current totals, recomputed from the raw selection.
    pub fn price(&self, snack_catalog: &[Snack]) -> PriceBreakdown {
        pricing::price_order(&self.seats, &self.snacks, snack_catalog, self.offer.as_ref())
    }

    /// Commits the reservation and booking. Only success advances to
    /// `Confirmation`; on any failure the session stays at `Payment` and
    /// the error is surfaced unchanged.
    pub async fn submit_payment<S: DocumentStore>(
        &mut self,
        store: &S,
        user_id: &str,
        snack_catalog: &[Snack],
    ) -> Result<Booking, BookingError> {
        self.require_step(Step::Payment, "submit payment")?;
        let movie = self
            .movie
            .as_ref()
            .ok_or_else(|| BookingError::Validation("no movie selected".to_string()))?;
        let showtime = self
            .showtime
            .as_ref()
            .ok_or_else(|| BookingError::Validation("no showtime selected".to_string()))?;

        let total = self.price(snack_catalog).total;
        let booking = reservation::commit_booking(
            store,
            user_id,
            movie,
            showtime,
            &self.seats,
            total,
            &self.snacks,
            self.offer.as_ref().map(|offer| offer.id.as_str()),
            Utc::now().date_naive(),
        )
        .await?;

        self.booking_id = booking.id.clone();
        self.step = Step::Confirmation;
        info!("session advanced to confirmation for booking {}", booking.booking_ref);
        Ok(booking)
    }

    /// Moves to the immediately preceding step. Illegal from the first
    /// step and from confirmation.
    pub fn back(&mut self) -> Result<(), BookingError> {
        match self.step.previous() {
            Some(previous) => {
                self.step = previous;
                Ok(())
            }
            None => Err(BookingError::Validation(format!(
                "cannot go back from {:?}",
                self.step
            ))),
        }
    }

    /// Discards every selection and returns to the initial state.
    pub fn reset(&mut self) {
        *self = BookingSession::new();
    }
}
