//! Application layer - Use cases and orchestration

pub mod day_store;
pub mod init;
pub mod manage_config;
pub mod report;

pub use day_store::{AnnualData, DayData, DayStore, ScheduleSource};
pub use manage_config::ConfigService;
pub use report::{daily_report, yearly_report, DailyReport};

use crate::error::Result;
use crate::infrastructure::{Config, FileSystemStorage};
use chrono::NaiveDate;

/// Open the store of a discovered ledger on `date`
pub fn open_ledger(
    storage: FileSystemStorage,
    date: NaiveDate,
) -> Result<(DayStore<FileSystemStorage>, Config)> {
    let config = storage.load_config()?;
    let store = DayStore::open(storage, &config.namespace, date);
    Ok((store, config))
}
