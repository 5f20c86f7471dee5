use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Snack {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub description: String,
    pub image_url: String,
    pub category: String,
}

/// Coupon discount, tagged by type so a new kind cannot be silently
/// mishandled.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(tag = "discountType", content = "discountValue", rename_all = "lowercase")]
pub enum Discount {
    /// Fraction of the subtotal, capped at a configured ceiling.
    Percent(f64),
    /// Flat amount off.
    Fixed(f64),
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    pub id: String,
    /// Human-entered coupon code, unique in the catalog.
    pub code: String,
    pub description: String,
    #[serde(flatten)]
    pub discount: Discount,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_order_value: Option<f64>,
}
