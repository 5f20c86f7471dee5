//! Pure pricing arithmetic, recomputed on demand from the raw selection so
//! derived totals can never go stale.

use std::collections::HashMap;

use serde::Serialize;

use crate::errors::BookingError;
use crate::models::seat_model::Seat;
use crate::models::snack_model::{Discount, Offer, Snack};

pub const CONVENIENCE_FEE: f64 = 1.50;
/// Demo-level ceiling on percent discounts.
pub const PERCENT_DISCOUNT_CAP: f64 = 10.0;

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    pub ticket_total: f64,
    pub snack_total: f64,
    pub sub_total: f64,
    pub discount: f64,
    pub convenience_fee: f64,
    pub total: f64,
}

pub fn price_order(
    seats: &[Seat],
    snacks: &HashMap<String, u32>,
    snack_catalog: &[Snack],
    offer: Option<&Offer>,
) -> PriceBreakdown {
    let ticket_total: f64 = seats.iter().map(|seat| seat.price).sum();
    // Quantities whose id is missing from the catalog contribute zero.
    let snack_total: f64 = snacks
        .iter()
        .map(|(id, qty)| {
            snack_catalog
                .iter()
                .find(|snack| &snack.id == id)
                .map_or(0.0, |snack| snack.price * f64::from(*qty))
        })
        .sum();
    let sub_total = ticket_total + snack_total;

    let discount = match offer.map(|o| o.discount) {
        None => 0.0,
        Some(Discount::Percent(value)) => (sub_total * value).min(PERCENT_DISCOUNT_CAP),
        Some(Discount::Fixed(value)) => value,
    };

    let total = (sub_total + CONVENIENCE_FEE - discount).max(0.0);
    PriceBreakdown {
        ticket_total,
        snack_total,
        sub_total,
        discount,
        convenience_fee: CONVENIENCE_FEE,
        total,
    }
}

/// Coupon eligibility against the current subtotal. Rejection leaves the
/// session untouched.
pub fn check_offer_eligibility(offer: &Offer, sub_total: f64) -> Result<(), BookingError> {
    if let Some(min_order) = offer.min_order_value {
        if sub_total < min_order {
            return Err(BookingError::OfferBelowMinimum {
                code: offer.code.clone(),
                min_order,
            });
        }
    }
    Ok(())
}
