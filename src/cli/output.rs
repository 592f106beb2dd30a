//! Output formatting utilities

use crate::application::DailyReport;
use crate::domain::calculations::{YearlySummary, ESTIMATED_TAX_RATE};
use crate::domain::{AppSettings, Expense, Reminder, Service, TimeSlot};
use chrono::NaiveDate;

/// Format an amount with its currency code and two decimals
pub fn format_currency(value: f64, currency: &str) -> String {
    format!("{} {:.2}", currency, value)
}

fn service_label(settings: &AppSettings, service_id: Option<&str>) -> String {
    match service_id {
        None => "(no service)".to_string(),
        Some(id) => settings
            .service(id)
            .map_or_else(|| format!("(unknown service {})", id), |s| s.name.clone()),
    }
}

/// Format a day's schedule, one block per slot
pub fn format_schedule(date: NaiveDate, schedule: &[TimeSlot], settings: &AppSettings) -> String {
    let mut output = format!("Schedule for {}\n", date.format("%Y-%m-%d"));

    if schedule.is_empty() {
        output.push_str("No time slots\n");
        return output;
    }

    for slot in schedule {
        output.push_str(&format!(
            "\n{}  {}\n",
            slot.time,
            service_label(settings, slot.service_id.as_deref())
        ));
        if slot.students.is_empty() {
            output.push_str("  (no seats)\n");
        }
        for student in &slot.students {
            let mut line = format!("  {}  {:<7}", student.id, student.status.to_string());
            if !student.name.is_empty() {
                line.push_str(&format!("  {}", student.name));
            }
            if !student.tag.is_empty() {
                line.push_str(&format!(" [{}]", student.tag));
            }
            if student.is_trial {
                line.push_str(" (trial)");
            }
            if !student.notes.is_empty() {
                line.push_str(&format!("  # {}", student.notes));
            }
            output.push_str(line.trim_end());
            output.push('\n');
        }
    }
    output
}

pub fn format_expense_list(expenses: &[Expense], currency: &str) -> String {
    if expenses.is_empty() {
        return "No expenses recorded".to_string();
    }

    let mut output = String::new();
    for expense in expenses {
        output.push_str(&format!(
            "{}  {}  {}\n",
            expense.id,
            format_currency(expense.amount, currency),
            expense.description
        ));
    }
    output
}

pub fn format_service_list(services: &[Service], currency: &str) -> String {
    if services.is_empty() {
        return "No services configured".to_string();
    }

    let mut output = String::new();
    for service in services {
        output.push_str(&format!(
            "{}  {}  {}\n",
            service.id,
            format_currency(service.price, currency),
            service.name
        ));
    }
    output
}

/// Format a list of tags for display.
pub fn format_tag_list(tags: &[String]) -> String {
    if tags.is_empty() {
        return "No tags configured".to_string();
    }

    let mut output = String::new();
    for tag in tags {
        output.push_str(tag);
        output.push('\n');
    }
    output
}

pub fn format_daily_report(report: &DailyReport, currency: &str) -> String {
    let mut output = format!("Report for {}\n\n", report.date.format("%Y-%m-%d"));

    output.push_str(&format!(
        "Revenue:    {}\n",
        format_currency(report.revenue, currency)
    ));
    output.push_str(&format!(
        "Expenses:   {}\n",
        format_currency(report.expenses_total, currency)
    ));
    output.push_str(&format!(
        "Net profit: {}\n",
        format_currency(report.net_profit, currency)
    ));

    let stats = &report.attendance;
    output.push_str(&format!(
        "\nAttendance: {} present, {} absent, {} vacant ({} seats)\n",
        stats.present, stats.absent, stats.vacant, stats.total_slots
    ));

    for line in &report.lines {
        let name = if line.student_name.is_empty() {
            "(unnamed)"
        } else {
            line.student_name.as_str()
        };
        output.push_str(&format!(
            "  {}  {}  {}  {}{}\n",
            line.time,
            line.service_name,
            name,
            line.status,
            if line.is_trial { " (trial)" } else { "" }
        ));
    }

    output.push_str("\nExpenses:\n");
    if report.expenses.is_empty() {
        output.push_str("  none\n");
    }
    for expense in &report.expenses {
        output.push_str(&format!(
            "  {}  {}\n",
            format_currency(expense.amount, currency),
            expense.description
        ));
    }
    output
}

pub fn format_yearly_summary(year: i32, summary: &YearlySummary, currency: &str) -> String {
    format!(
        "Accounting for {}\n\n\
        Gross revenue:  {}\n\
        Expenses:       {}\n\
        Net profit:     {}\n\
        Estimated tax:  {} ({}% of gross revenue)\n",
        year,
        format_currency(summary.total_revenue, currency),
        format_currency(summary.total_expenses, currency),
        format_currency(summary.net_profit, currency),
        format_currency(summary.estimated_tax, currency),
        ESTIMATED_TAX_RATE * 100.0
    )
}

pub fn format_reminders(reminders: &[Reminder]) -> String {
    if reminders.is_empty() {
        return "No reminders due".to_string();
    }

    reminders
        .iter()
        .map(|r| format!("{}\n", r.message()))
        .collect()
}
