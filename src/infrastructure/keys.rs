//! Storage key scheme
//!
//! ```text
//! <ns>_settings
//! <ns>_<YYYY-MM-DD>_schedule
//! <ns>_<YYYY-MM-DD>_expenses
//! <ns>_template_schedule
//! <ns>_notified_<YYYY-MM-DD>_<HH:MM>
//! ```

use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

const DATE_FORMAT: &str = "%Y-%m-%d";

fn dated_key_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"^(.+)_(\d{4}-\d{2}-\d{2})_(schedule|expenses)$").unwrap()
    })
}

/// Kind of per-date record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayRecord {
    Schedule,
    Expenses,
}

impl DayRecord {
    fn suffix(self) -> &'static str {
        match self {
            DayRecord::Schedule => "schedule",
            DayRecord::Expenses => "expenses",
        }
    }
}

/// Formats and parses the keys of one namespace
#[derive(Debug, Clone)]
pub struct StorageKeys {
    namespace: String,
}

impl StorageKeys {
    pub fn new(namespace: &str) -> Self {
        StorageKeys {
            namespace: namespace.to_string(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn settings(&self) -> String {
        format!("{}_settings", self.namespace)
    }

    pub fn template(&self) -> String {
        format!("{}_template_schedule", self.namespace)
    }

    pub fn day(&self, date: NaiveDate, record: DayRecord) -> String {
        format!(
            "{}_{}_{}",
            self.namespace,
            date.format(DATE_FORMAT),
            record.suffix()
        )
    }

    pub fn schedule(&self, date: NaiveDate) -> String {
        self.day(date, DayRecord::Schedule)
    }

    pub fn expenses(&self, date: NaiveDate) -> String {
        self.day(date, DayRecord::Expenses)
    }

    pub fn notified(&self, date: NaiveDate, time: &str) -> String {
        format!(
            "{}_notified_{}_{}",
            self.namespace,
            date.format(DATE_FORMAT),
            time
        )
    }

    /// Split a per-date key of this namespace into its date and record kind
    pub fn parse_day_key(&self, key: &str) -> Option<(NaiveDate, DayRecord)> {
        let captures = dated_key_regex().captures(key)?;
        if &captures[1] != self.namespace {
            return None;
        }

        let date = NaiveDate::parse_from_str(&captures[2], DATE_FORMAT).ok()?;
        let record = match &captures[3] {
            "schedule" => DayRecord::Schedule,
            _ => DayRecord::Expenses,
        };
        Some((date, record))
    }
}
