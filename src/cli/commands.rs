//! CLI command definitions

use crate::domain::money::{validate_amount, validate_price};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

fn parse_number(s: &str) -> Result<f64, String> {
    s.trim()
        .parse::<f64>()
        .map_err(|_| format!("'{}' is not a number", s))
}

fn parse_price(s: &str) -> Result<f64, String> {
    validate_price(parse_number(s)?).map_err(|e| e.to_string())
}

fn parse_amount(s: &str) -> Result<f64, String> {
    validate_amount(parse_number(s)?).map_err(|e| e.to_string())
}

#[derive(Parser, Debug)]
#[command(name = "pilaris")]
#[command(about = "Studio schedule, attendance and expense ledger", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Day to work on (today, yesterday, tomorrow, +N, -N, YYYY-MM-DD)
    #[arg(short, long, global = true, default_value = "today", value_name = "DATE_REF")]
    pub date: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a new ledger
    Init {
        /// Directory to initialize (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Storage key namespace
        #[arg(short, long, default_value = "pilaris_control")]
        namespace: String,
    },

    /// View or modify configuration
    Config {
        /// Config key to get or set
        key: Option<String>,

        /// Value to set (if provided, sets the key)
        value: Option<String>,

        /// List all configuration
        #[arg(short, long)]
        list: bool,
    },

    #[command(flatten)]
    Ledger(LedgerCommand),
}

/// Commands that work on an existing ledger and its active date
#[derive(Subcommand, Debug)]
pub enum LedgerCommand {
    /// Print the schedule of the day
    Show,

    /// Edit seats of a time slot
    #[command(subcommand)]
    Student(StudentCommand),

    /// Set the service of a time slot
    Slot {
        /// Slot time (HH:MM)
        #[arg(short, long)]
        time: String,

        /// Service id, or "none" to clear
        #[arg(short, long)]
        service: String,
    },

    /// Manage expenses of the day
    #[command(subcommand)]
    Expense(ExpenseCommand),

    /// Manage offered services
    #[command(subcommand)]
    Service(ServiceCommand),

    /// Manage student tags
    #[command(subcommand)]
    Tag(TagCommand),

    /// Configure appointment reminders
    Notify {
        #[arg(long, conflicts_with = "disable")]
        enable: bool,

        #[arg(long)]
        disable: bool,

        /// Minutes before an appointment to remind
        #[arg(short, long)]
        minutes: Option<u32>,
    },

    /// Manage the schedule template used for new days
    #[command(subcommand)]
    Template(TemplateCommand),

    /// Daily revenue, expenses and attendance
    Report,

    /// Yearly revenue, expenses, profit and estimated tax
    Accounting {
        /// Year (default: year of --date)
        year: Option<i32>,
    },

    /// Print reminders due now and mark them as sent
    Remind,
}

#[derive(Args, Debug)]
pub struct SeatArgs {
    /// Slot time (HH:MM)
    #[arg(short, long)]
    pub time: String,

    /// Seat id (see `pilaris show`)
    #[arg(short, long)]
    pub id: String,
}

#[derive(Subcommand, Debug)]
pub enum StudentCommand {
    /// Add a seat to a slot
    Add {
        #[arg(short, long)]
        time: String,
    },

    /// Remove a seat from a slot
    Remove {
        #[command(flatten)]
        seat: SeatArgs,
    },

    /// Update fields of a seat
    Set {
        #[command(flatten)]
        seat: SeatArgs,

        #[arg(long)]
        name: Option<String>,

        /// present, absent or vacant
        #[arg(long)]
        status: Option<String>,

        #[arg(long)]
        tag: Option<String>,

        #[arg(long)]
        notes: Option<String>,

        /// Mark as a free trial session
        #[arg(long)]
        trial: Option<bool>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ExpenseCommand {
    /// Record an expense
    Add {
        description: String,
        #[arg(allow_negative_numbers = true, value_parser = parse_amount)]
        amount: f64,
    },

    /// Remove an expense by id
    Remove { id: String },

    /// List expenses of the day
    List,
}

#[derive(Subcommand, Debug)]
pub enum ServiceCommand {
    /// Add a service
    Add {
        name: String,
        #[arg(value_parser = parse_price)]
        price: f64,
    },

    /// Remove a service (the last one cannot be removed)
    Remove { id: String },

    /// Change the price of a service
    Price {
        id: String,
        #[arg(value_parser = parse_price)]
        price: f64,
    },

    /// Rename a service
    Rename { id: String, name: String },

    /// List services
    List,
}

#[derive(Subcommand, Debug)]
pub enum TagCommand {
    Add { tag: String },
    Remove { tag: String },
    List,
}

#[derive(Subcommand, Debug)]
pub enum TemplateCommand {
    /// Save the day's schedule as the template for new days
    Save,
}
