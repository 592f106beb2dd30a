//! Domain layer - Business logic and domain models

pub mod calculations;
pub mod date_ref;
pub mod expense;
pub mod ids;
pub mod money;
pub mod reminder;
pub mod schedule;
pub mod settings;

pub use date_ref::DateReference;
pub use expense::Expense;
pub use reminder::Reminder;
pub use schedule::{
    AttendanceStatus, DailySchedule, Student, StudentPatch, TimeSlot, TimeSlotPatch,
};
pub use settings::{AppSettings, Service};
