//! Expenses recorded against a calendar date

use crate::domain::ids::generate_unique_id;
use crate::domain::money::validate_amount;
use crate::error::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: String,
    pub description: String,
    pub amount: f64,
    pub date: NaiveDate,
}

impl Expense {
    pub fn new(description: &str, amount: f64, date: NaiveDate) -> Result<Self> {
        Ok(Expense {
            id: generate_unique_id(),
            description: description.to_string(),
            amount: validate_amount(amount)?,
            date,
        })
    }
}
