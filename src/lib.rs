//! pilaris - Studio schedule and accounting ledger
//!
//! Keeps a per-day schedule of time slots and seats, daily expenses and
//! studio settings in a key-value store, and derives revenue, attendance
//! and yearly accounting figures from them.

pub mod application;
pub mod cli;
pub mod domain;
pub mod error;
pub mod infrastructure;

pub use application::DayStore;
pub use error::PilarisError;
