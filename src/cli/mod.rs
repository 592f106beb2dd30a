//! CLI layer - Command-line interface

pub mod commands;
pub mod output;

pub use commands::{
    Cli, Commands, ExpenseCommand, LedgerCommand, ServiceCommand, StudentCommand, TagCommand,
    TemplateCommand,
};
pub use output::{
    format_currency, format_daily_report, format_expense_list, format_reminders,
    format_schedule, format_service_list, format_tag_list, format_yearly_summary,
};
