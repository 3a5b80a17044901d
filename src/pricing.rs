//! Order price calculations.
//!
//! Shoe prices are whole euros; order amounts carry two decimal places.
//! Tax is applied over subtotal plus delivery, then rounded half-up.

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;

use crate::errors::{Result, StoreError};

/// Effective unit price: the offer price when one is set.
pub fn unit_price(price: i32, offer_price: Option<i32>) -> Decimal {
    Decimal::from(offer_price.unwrap_or(price))
}

/// Per-line discount against the regular price.
pub fn line_discount(price: i32, offer_price: Option<i32>, quantity: i32) -> Decimal {
    match offer_price {
        Some(offer) if offer < price => Decimal::from((price - offer) * quantity),
        _ => Decimal::ZERO,
    }
}

pub fn line_total(price: i32, offer_price: Option<i32>, quantity: i32) -> Decimal {
    unit_price(price, offer_price) * Decimal::from(quantity)
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderTotals {
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub delivery_cost: Decimal,
    pub total: Decimal,
}

/// Compute order totals from a subtotal and the configured rates.
pub fn order_totals(subtotal: Decimal, tax_rate: f64, delivery_cost: f64) -> Result<OrderTotals> {
    let tax_rate = Decimal::from_f64(tax_rate)
        .ok_or_else(|| StoreError::validation(format!("invalid tax rate: {}", tax_rate)))?;
    let delivery_cost = Decimal::from_f64(delivery_cost).ok_or_else(|| {
        StoreError::validation(format!("invalid delivery cost: {}", delivery_cost))
    })?;

    let subtotal = subtotal.round_dp(2);
    let delivery_cost = delivery_cost.round_dp(2);
    let tax = ((subtotal + delivery_cost) * tax_rate / Decimal::from(100)).round_dp(2);
    let total = (subtotal + delivery_cost + tax).round_dp(2);

    Ok(OrderTotals {
        subtotal,
        tax,
        delivery_cost,
        total,
    })
}
