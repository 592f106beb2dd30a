//! Revenue, expense and attendance aggregates
//!
//! Everything here is a pure function of its inputs.

use crate::domain::expense::Expense;
use crate::domain::schedule::{AttendanceStatus, TimeSlot};
use crate::domain::settings::Service;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// Simplified tax estimate applied to gross revenue
pub const ESTIMATED_TAX_RATE: f64 = 0.06;

/// Seat counts for one schedule
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AttendanceStats {
    pub present: usize,
    pub absent: usize,
    pub vacant: usize,
    pub total_slots: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct YearlySummary {
    pub total_revenue: f64,
    pub total_expenses: f64,
    pub net_profit: f64,
    pub estimated_tax: f64,
}

fn price_of(services: &[Service], service_id: Option<&str>) -> f64 {
    service_id
        .and_then(|id| services.iter().find(|s| s.id == id))
        .map_or(0.0, |s| s.price)
}

/// Sum of the slot's service price for every present, non-trial seat
pub fn total_revenue(schedule: &[TimeSlot], services: &[Service]) -> f64 {
    schedule
        .iter()
        .map(|slot| {
            let billable = slot.students.iter().filter(|s| s.is_billable()).count();
            price_of(services, slot.service_id.as_deref()) * billable as f64
        })
        .fold(0.0, |acc, amount| acc + amount)
}

pub fn total_expenses(expenses: &[Expense]) -> f64 {
    expenses.iter().fold(0.0, |acc, e| acc + e.amount)
}

pub fn net_profit(total_revenue: f64, total_expenses: f64) -> f64 {
    total_revenue - total_expenses
}

pub fn attendance_stats(schedule: &[TimeSlot]) -> AttendanceStats {
    let mut stats = AttendanceStats::default();
    for student in schedule.iter().flat_map(|slot| &slot.students) {
        stats.total_slots += 1;
        match student.status {
            AttendanceStatus::Present => stats.present += 1,
            AttendanceStatus::Absent => stats.absent += 1,
            AttendanceStatus::Vacant => stats.vacant += 1,
        }
    }
    stats
}

/// Fold per-date schedules and expenses into yearly totals
pub fn yearly_summary(
    schedules: &BTreeMap<NaiveDate, Vec<TimeSlot>>,
    expenses: &BTreeMap<NaiveDate, Vec<Expense>>,
    services: &[Service],
) -> YearlySummary {
    let revenue = schedules
        .values()
        .fold(0.0, |acc, schedule| acc + total_revenue(schedule, services));
    let spent = expenses
        .values()
        .fold(0.0, |acc, list| acc + total_expenses(list));

    YearlySummary {
        total_revenue: revenue,
        total_expenses: spent,
        net_profit: net_profit(revenue, spent),
        estimated_tax: revenue * ESTIMATED_TAX_RATE,
    }
}
