//! Daily report and yearly accounting use cases

use crate::application::day_store::DayStore;
use crate::domain::calculations::{
    attendance_stats, net_profit, total_expenses, total_revenue, yearly_summary, AttendanceStats,
    YearlySummary,
};
use crate::domain::{AttendanceStatus, Expense};
use crate::infrastructure::KeyValueStore;
use chrono::NaiveDate;

/// One attended or missed seat, as listed on the daily report
#[derive(Debug, Clone, PartialEq)]
pub struct AttendanceLine {
    pub time: String,
    pub service_name: String,
    pub student_name: String,
    pub status: AttendanceStatus,
    pub is_trial: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DailyReport {
    pub date: NaiveDate,
    pub revenue: f64,
    pub expenses_total: f64,
    pub net_profit: f64,
    pub attendance: AttendanceStats,
    pub lines: Vec<AttendanceLine>,
    pub expenses: Vec<Expense>,
}

/// Summarize the active date of `store`; vacant seats are left off the listing
pub fn daily_report<S: KeyValueStore>(store: &DayStore<S>) -> DailyReport {
    let services = &store.settings().services;
    let revenue = total_revenue(store.schedule(), services);
    let spent = total_expenses(store.expenses());

    let lines = store
        .schedule()
        .iter()
        .flat_map(|slot| {
            let service_name = slot
                .service_id
                .as_deref()
                .and_then(|id| store.settings().service(id))
                .map_or_else(|| "N/A".to_string(), |s| s.name.clone());

            slot.students
                .iter()
                .filter(|s| s.status != AttendanceStatus::Vacant)
                .map(move |s| AttendanceLine {
                    time: slot.time.clone(),
                    service_name: service_name.clone(),
                    student_name: s.name.clone(),
                    status: s.status,
                    is_trial: s.is_trial,
                })
        })
        .collect();

    DailyReport {
        date: store.current_date(),
        revenue,
        expenses_total: spent,
        net_profit: net_profit(revenue, spent),
        attendance: attendance_stats(store.schedule()),
        lines,
        expenses: store.expenses().to_vec(),
    }
}

/// Yearly totals over every stored day of `year`, priced with the current services
pub fn yearly_report<S: KeyValueStore>(store: &DayStore<S>, year: i32) -> YearlySummary {
    let data = store.annual_data(year);
    yearly_summary(&data.schedules, &data.expenses, &store.settings().services)
}
