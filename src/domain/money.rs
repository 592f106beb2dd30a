//! Checks for monetary values entering the ledger
//!
//! Stored JSON has no representation for NaN or infinity, so such values
//! are refused before they reach a record.

use crate::error::{PilarisError, Result};

/// A service price: finite and not negative
pub fn validate_price(price: f64) -> Result<f64> {
    if !price.is_finite() {
        return Err(PilarisError::InvalidAmount(format!(
            "price must be a finite number, got {}",
            price
        )));
    }
    if price < 0.0 {
        return Err(PilarisError::InvalidAmount(format!(
            "price cannot be negative, got {}",
            price
        )));
    }
    Ok(price)
}

/// An expense amount: any finite number; negative amounts record refunds
pub fn validate_amount(amount: f64) -> Result<f64> {
    if !amount.is_finite() {
        return Err(PilarisError::InvalidAmount(format!(
            "amount must be a finite number, got {}",
            amount
        )));
    }
    Ok(amount)
}
