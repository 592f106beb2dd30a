//! Per-day store for settings, schedule and expenses
//!
//! The store keeps exactly one calendar date in memory. Every mutation is
//! applied to that in-memory state and then written through to the
//! [`KeyValueStore`]. Persistence failures are logged and swallowed: the
//! in-memory state stays authoritative until a later write succeeds.

use crate::domain::reminder::{due_reminders, Reminder};
use crate::domain::schedule::{
    default_schedule, find_slot_mut, schedule_from_template, DailySchedule, Student, StudentPatch,
    TimeSlotPatch,
};
use crate::domain::{AppSettings, Expense, TimeSlot};
use crate::error::{PilarisError, Result};
use crate::infrastructure::{DayRecord, KeyValueStore, StorageKeys};
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use log::{debug, error, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;

/// Where a loaded schedule came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleSource {
    Persisted,
    Template,
    Default,
}

/// Schedule and expenses of one date
#[derive(Debug, Clone, PartialEq)]
pub struct DayData {
    pub schedule: DailySchedule,
    pub expenses: Vec<Expense>,
    pub source: ScheduleSource,
}

/// Non-empty per-date records of one year
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnualData {
    pub schedules: BTreeMap<NaiveDate, DailySchedule>,
    pub expenses: BTreeMap<NaiveDate, Vec<Expense>>,
}

pub struct DayStore<S: KeyValueStore> {
    storage: S,
    keys: StorageKeys,
    current_date: NaiveDate,
    settings: AppSettings,
    schedule: DailySchedule,
    expenses: Vec<Expense>,
}

fn read_json<S: KeyValueStore, T: DeserializeOwned>(storage: &S, key: &str) -> Option<T> {
    let raw = match storage.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            warn!("failed to read {}: {}", key, e);
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("ignoring malformed value at {}: {}", key, e);
            None
        }
    }
}

fn write_json<S: KeyValueStore, T: Serialize + ?Sized>(storage: &mut S, key: &str, value: &T) {
    let result = serde_json::to_string(value)
        .map_err(PilarisError::from)
        .and_then(|json| storage.set(key, &json));

    if let Err(e) = result {
        error!("failed to persist {}: {}", key, e);
    }
}

impl<S: KeyValueStore> DayStore<S> {
    /// Open the store on `date`, loading settings first
    ///
    /// Missing settings are replaced with defaults and written back. Settings
    /// that exist but cannot be read fall back to defaults in memory only, so
    /// the stored value survives until the next settings update.
    pub fn open(storage: S, namespace: &str, date: NaiveDate) -> Self {
        let keys = StorageKeys::new(namespace);

        let mut storage = storage;
        let settings = match storage.get(&keys.settings()) {
            Ok(None) => {
                debug!("no stored settings under {}, using defaults", keys.namespace());
                let settings = AppSettings::default();
                write_json(&mut storage, &keys.settings(), &settings);
                settings
            }
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!("keeping unreadable settings at {}: {}", keys.settings(), e);
                AppSettings::default()
            }),
            Err(e) => {
                warn!("failed to read {}: {}", keys.settings(), e);
                AppSettings::default()
            }
        };

        let mut store = DayStore {
            storage,
            keys,
            current_date: date,
            settings,
            schedule: Vec::new(),
            expenses: Vec::new(),
        };
        store.change_date(date);
        store
    }

    pub fn current_date(&self) -> NaiveDate {
        self.current_date
    }

    pub fn schedule(&self) -> &[TimeSlot] {
        &self.schedule
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Resolve the data of `date` without touching the active date
    ///
    /// Schedule resolution: stored schedule, else the template with fresh
    /// seat ids, else the default grid.
    pub fn load(&self, date: NaiveDate) -> DayData {
        let (schedule, source) = self.resolve_schedule(date);
        let expenses: Vec<Expense> =
            read_json(&self.storage, &self.keys.expenses(date)).unwrap_or_default();

        DayData {
            schedule,
            expenses,
            source,
        }
    }

    fn resolve_schedule(&self, date: NaiveDate) -> (DailySchedule, ScheduleSource) {
        if let Some(schedule) = read_json(&self.storage, &self.keys.schedule(date)) {
            return (schedule, ScheduleSource::Persisted);
        }

        if let Some(template) = read_json::<S, DailySchedule>(&self.storage, &self.keys.template())
        {
            debug!("seeding {} from template", date);
            return (schedule_from_template(&template), ScheduleSource::Template);
        }

        debug!("seeding {} with the default grid", date);
        (
            default_schedule(self.settings.default_service_id()),
            ScheduleSource::Default,
        )
    }

    /// Make `date` the active date
    ///
    /// A seeded schedule is written through at once so its seat ids stay
    /// stable for later edits.
    pub fn change_date(&mut self, date: NaiveDate) -> ScheduleSource {
        let data = self.load(date);

        self.current_date = date;
        self.schedule = data.schedule;
        self.expenses = data.expenses;

        if data.source != ScheduleSource::Persisted {
            self.persist_schedule();
        }
        data.source
    }

    fn persist_schedule(&mut self) {
        let key = self.keys.schedule(self.current_date);
        write_json(&mut self.storage, &key, &self.schedule);
    }

    fn persist_expenses(&mut self) {
        let key = self.keys.expenses(self.current_date);
        write_json(&mut self.storage, &key, &self.expenses);
    }

    /// Merge `patch` into one seat; false when the slot or seat is unknown
    pub fn update_student(&mut self, time: &str, student_id: &str, patch: &StudentPatch) -> bool {
        let Some(student) =
            find_slot_mut(&mut self.schedule, time).and_then(|slot| slot.student_mut(student_id))
        else {
            return false;
        };

        student.apply(patch);
        self.persist_schedule();
        true
    }

    /// Append a present seat to the slot at `time`, returning its id
    pub fn add_student_slot(&mut self, time: &str) -> Option<String> {
        let slot = find_slot_mut(&mut self.schedule, time)?;

        let student = Student::walk_in();
        let id = student.id.clone();
        slot.students.push(student);

        self.persist_schedule();
        Some(id)
    }

    /// Remove one seat. Removing the last seat of a slot is allowed.
    pub fn remove_student_slot(&mut self, time: &str, student_id: &str) -> bool {
        let Some(slot) = find_slot_mut(&mut self.schedule, time) else {
            return false;
        };

        let before = slot.students.len();
        slot.students.retain(|s| s.id != student_id);
        if slot.students.len() == before {
            return false;
        }

        self.persist_schedule();
        true
    }

    pub fn update_time_slot(&mut self, time: &str, patch: &TimeSlotPatch) -> bool {
        let Some(slot) = find_slot_mut(&mut self.schedule, time) else {
            return false;
        };

        slot.apply(patch);
        self.persist_schedule();
        true
    }

    /// Record an expense on the active date, returning its id
    ///
    /// Non-finite amounts are refused and leave the day untouched.
    pub fn add_expense(&mut self, description: &str, amount: f64) -> Result<String> {
        let expense = Expense::new(description, amount, self.current_date)?;
        let id = expense.id.clone();
        self.expenses.push(expense);

        self.persist_expenses();
        Ok(id)
    }

    pub fn remove_expense(&mut self, id: &str) -> bool {
        let before = self.expenses.len();
        self.expenses.retain(|e| e.id != id);
        if self.expenses.len() == before {
            return false;
        }

        self.persist_expenses();
        true
    }

    pub fn update_settings(&mut self, settings: AppSettings) {
        self.settings = settings;
        write_json(&mut self.storage, &self.keys.settings(), &self.settings);
    }

    /// Overwrite the template with the active schedule
    pub fn save_schedule_as_template(&mut self) {
        write_json(&mut self.storage, &self.keys.template(), &self.schedule);
    }

    /// Collect every non-empty schedule and expense list stored for `year`
    ///
    /// This walks the whole key space; unreadable and empty records are skipped.
    pub fn annual_data(&self, year: i32) -> AnnualData {
        let mut data = AnnualData::default();

        let keys = match self.storage.keys() {
            Ok(keys) => keys,
            Err(e) => {
                error!("failed to list storage keys: {}", e);
                return data;
            }
        };

        for key in keys {
            let Some((date, record)) = self.keys.parse_day_key(&key) else {
                continue;
            };
            if date.year() != year {
                continue;
            }

            match record {
                DayRecord::Schedule => {
                    if let Some(schedule) = read_json::<S, DailySchedule>(&self.storage, &key) {
                        if !schedule.is_empty() {
                            data.schedules.insert(date, schedule);
                        }
                    }
                }
                DayRecord::Expenses => {
                    if let Some(expenses) = read_json::<S, Vec<Expense>>(&self.storage, &key) {
                        if !expenses.is_empty() {
                            data.expenses.insert(date, expenses);
                        }
                    }
                }
            }
        }

        debug!(
            "annual scan {}: {} schedules, {} expense days",
            year,
            data.schedules.len(),
            data.expenses.len()
        );
        data
    }

    /// Whether a reminder for `time` on `date` was already delivered
    pub fn reminder_sent(&self, date: NaiveDate, time: &str) -> bool {
        match self.storage.get(&self.keys.notified(date, time)) {
            Ok(flag) => flag.is_some(),
            Err(e) => {
                warn!("failed to read reminder flag for {} {}: {}", date, time, e);
                false
            }
        }
    }

    /// Reminders of the active date that are due at `now` and not yet sent
    ///
    /// Returned reminders are flagged as sent. Flags are never cleared.
    pub fn take_due_reminders(&mut self, now: NaiveDateTime) -> Vec<Reminder> {
        let due: Vec<Reminder> =
            due_reminders(self.current_date, &self.schedule, &self.settings, now)
                .into_iter()
                .filter(|r| !self.reminder_sent(r.date, &r.time))
                .collect();

        for reminder in &due {
            let key = self.keys.notified(reminder.date, &reminder.time);
            if let Err(e) = self.storage.set(&key, "true") {
                error!("failed to persist {}: {}", key, e);
            }
        }
        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::schedule::{AttendanceStatus, DEFAULT_TIME_SLOTS};
    use crate::infrastructure::MemoryStorage;

    const NS: &str = "test_ns";

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    fn open() -> DayStore<MemoryStorage> {
        DayStore::open(MemoryStorage::new(), NS, day(1))
    }

    #[test]
    fn test_open_writes_default_settings() {
        let store = open();
        let stored = store.storage().get("test_ns_settings").unwrap().unwrap();
        let parsed: AppSettings = serde_json::from_str(&stored).unwrap();
        assert_eq!(&parsed, store.settings());
    }

    #[test]
    fn test_open_keeps_stored_settings() {
        let mut storage = MemoryStorage::new();
        let mut settings = AppSettings::default();
        settings.notification_minutes = 42;
        storage
            .set("test_ns_settings", &serde_json::to_string(&settings).unwrap())
            .unwrap();

        let store = DayStore::open(storage, NS, day(1));
        assert_eq!(store.settings().notification_minutes, 42);
    }

    #[test]
    fn test_default_day_is_written_through() {
        let store = open();
        assert_eq!(store.schedule().len(), DEFAULT_TIME_SLOTS.len());
        assert!(store
            .storage()
            .get("test_ns_2025-03-01_schedule")
            .unwrap()
            .is_some());
    }

    #[test]
    fn test_malformed_schedule_falls_back() {
        let mut storage = MemoryStorage::new();
        storage.set("test_ns_2025-03-02_schedule", "{not json").unwrap();
        storage.set("test_ns_2025-03-02_expenses", "nope").unwrap();

        let mut store = DayStore::open(storage, NS, day(1));
        let data = store.load(day(2));
        assert_eq!(data.source, ScheduleSource::Default);
        assert_eq!(data.schedule.len(), DEFAULT_TIME_SLOTS.len());
        assert!(data.expenses.is_empty());

        assert_eq!(store.change_date(day(2)), ScheduleSource::Default);
        assert_eq!(store.load(day(2)).source, ScheduleSource::Persisted);
    }

    #[test]
    fn test_unreadable_settings_are_not_overwritten() {
        let mut storage = MemoryStorage::new();
        let corrupt = r#"{"services":[{"id":"y","name":"Yoga","price":null}]}"#;
        storage.set("test_ns_settings", corrupt).unwrap();

        let store = DayStore::open(storage, NS, day(1));
        assert_eq!(store.settings(), &AppSettings::default());

        let stored = store.storage().get("test_ns_settings").unwrap();
        assert_eq!(stored.as_deref(), Some(corrupt));
    }

    #[test]
    fn test_non_finite_expense_rejected() {
        let mut store = open();
        let id = store.add_expense("Rent", 100.0).unwrap();

        let err = store.add_expense("Broken", f64::INFINITY).unwrap_err();
        assert!(matches!(err, PilarisError::InvalidAmount(_)));
        assert!(store.add_expense("Broken", f64::NAN).is_err());

        assert_eq!(store.expenses().len(), 1);
        let stored = store.storage().get("test_ns_2025-03-01_expenses").unwrap().unwrap();
        let parsed: Vec<Expense> = serde_json::from_str(&stored).unwrap();
        assert_eq!(parsed[0].id, id);
    }

    #[test]
    fn test_misses_are_noops() {
        let mut store = open();
        let before = store.schedule().to_vec();

        let patch = StudentPatch {
            name: Some("X".to_string()),
            ..Default::default()
        };
        assert!(!store.update_student("99:99", "x", &patch));
        assert!(!store.update_student("08:00", "x", &patch));
        assert!(!store.remove_student_slot("08:00", "x"));
        assert!(store.add_student_slot("99:99").is_none());
        assert!(!store.update_time_slot("99:99", &TimeSlotPatch::default()));
        assert!(!store.remove_expense("x"));

        assert_eq!(store.schedule(), before.as_slice());
    }

    #[test]
    fn test_add_student_slot_is_present() {
        let mut store = open();
        let id = store.add_student_slot("08:00").unwrap();

        let slot = store.schedule().iter().find(|s| s.time == "08:00").unwrap();
        let added = slot.students.last().unwrap();
        assert_eq!(added.id, id);
        assert_eq!(added.status, AttendanceStatus::Present);
        assert!(added.name.is_empty() && added.tag.is_empty() && added.notes.is_empty());
        assert!(!added.is_trial);
    }

    #[test]
    fn test_remove_last_seat_allowed() {
        let mut store = open();
        let ids: Vec<String> = store.schedule()[0]
            .students
            .iter()
            .map(|s| s.id.clone())
            .collect();
        let time = store.schedule()[0].time.clone();

        for id in &ids {
            assert!(store.remove_student_slot(&time, id));
        }
        assert!(store.schedule()[0].students.is_empty());
    }

    #[test]
    fn test_expenses_carry_active_date() {
        let mut store = open();
        store.change_date(day(5));
        let id = store.add_expense("Mats", 80.0).unwrap();

        assert_eq!(store.expenses()[0].date, day(5));
        assert!(store.remove_expense(&id));
        assert!(store.expenses().is_empty());

        let stored = store.storage().get("test_ns_2025-03-05_expenses").unwrap();
        assert_eq!(stored.as_deref(), Some("[]"));
    }

    #[test]
    fn test_reminders_flagged_once() {
        let mut store = open();
        let mut settings = store.settings().clone();
        settings.notifications_enabled = true;
        settings.notification_minutes = 30;
        store.update_settings(settings);

        let seat = store.schedule()[1].students[0].id.clone();
        let time = store.schedule()[1].time.clone();
        store.update_student(
            &time,
            &seat,
            &StudentPatch {
                name: Some("Ana".to_string()),
                status: Some(AttendanceStatus::Present),
                ..Default::default()
            },
        );

        let now = day(1).and_hms_opt(7, 45, 0).unwrap();
        let first = store.take_due_reminders(now);
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].time, "08:00");
        assert!(store.reminder_sent(day(1), "08:00"));

        assert!(store.take_due_reminders(now).is_empty());
    }
}
