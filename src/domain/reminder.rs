//! Appointment reminder rule

use crate::domain::schedule::{AttendanceStatus, TimeSlot};
use crate::domain::settings::AppSettings;
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

const FALLBACK_SERVICE_NAME: &str = "Appointment";

/// An appointment that is about to start
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    pub date: NaiveDate,
    pub time: String,
    pub service_name: String,
    pub student_name: String,
}

impl Reminder {
    pub fn message(&self) -> String {
        format!(
            "{} at {} with {} is about to start.",
            self.service_name, self.time, self.student_name
        )
    }
}

/// Reminders whose window `[start - lead, start)` contains `now`
///
/// A slot is announced for its first named, non-vacant seat. Nothing is due
/// while notifications are disabled.
pub fn due_reminders(
    date: NaiveDate,
    schedule: &[TimeSlot],
    settings: &AppSettings,
    now: NaiveDateTime,
) -> Vec<Reminder> {
    if !settings.notifications_enabled {
        return Vec::new();
    }

    let lead = Duration::minutes(i64::from(settings.notification_minutes));

    schedule
        .iter()
        .filter_map(|slot| {
            let student = slot
                .students
                .iter()
                .find(|s| !s.name.trim().is_empty() && s.status != AttendanceStatus::Vacant)?;
            let time = NaiveTime::parse_from_str(&slot.time, "%H:%M").ok()?;
            let start = date.and_time(time);

            if now < start - lead || now >= start {
                return None;
            }

            let service_name = slot
                .service_id
                .as_deref()
                .and_then(|id| settings.service(id))
                .map_or(FALLBACK_SERVICE_NAME, |s| s.name.as_str());

            Some(Reminder {
                date,
                time: slot.time.clone(),
                service_name: service_name.to_string(),
                student_name: student.name.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::schedule::Student;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 6).unwrap()
    }

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        date().and_hms_opt(hour, minute, 0).unwrap()
    }

    fn settings() -> AppSettings {
        AppSettings {
            notifications_enabled: true,
            notification_minutes: 15,
            ..AppSettings::default()
        }
    }

    fn booked_slot(settings: &AppSettings, time: &str, name: &str) -> TimeSlot {
        TimeSlot {
            time: time.to_string(),
            service_id: settings.default_service_id().map(str::to_string),
            students: vec![
                Student::vacant(),
                Student {
                    name: name.to_string(),
                    status: AttendanceStatus::Present,
                    ..Student::vacant()
                },
            ],
        }
    }

    #[test]
    fn test_due_inside_window() {
        let settings = settings();
        let schedule = vec![booked_slot(&settings, "09:00", "Ana")];

        let due = due_reminders(date(), &schedule, &settings, at(8, 45));
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].time, "09:00");
        assert_eq!(due[0].student_name, "Ana");
        assert_eq!(due[0].service_name, "Pilates");
        assert_eq!(due[0].message(), "Pilates at 09:00 with Ana is about to start.");
    }

    #[test]
    fn test_not_due_outside_window() {
        let settings = settings();
        let schedule = vec![booked_slot(&settings, "09:00", "Ana")];

        assert!(due_reminders(date(), &schedule, &settings, at(8, 44)).is_empty());
        assert!(due_reminders(date(), &schedule, &settings, at(9, 0)).is_empty());
    }

    #[test]
    fn test_disabled_means_nothing_due() {
        let mut settings = settings();
        let schedule = vec![booked_slot(&settings, "09:00", "Ana")];
        settings.notifications_enabled = false;

        assert!(due_reminders(date(), &schedule, &settings, at(8, 50)).is_empty());
    }

    #[test]
    fn test_unnamed_or_vacant_seats_skipped() {
        let settings = settings();
        let mut slot = booked_slot(&settings, "09:00", "   ");
        slot.students.push(Student {
            name: "Nobody".to_string(),
            ..Student::vacant()
        });

        assert!(due_reminders(date(), &[slot], &settings, at(8, 50)).is_empty());
    }

    #[test]
    fn test_unknown_service_uses_fallback_name() {
        let settings = settings();
        let mut slot = booked_slot(&settings, "09:00", "Ana");
        slot.service_id = Some("removed".to_string());

        let due = due_reminders(date(), &[slot], &settings, at(8, 50));
        assert_eq!(due[0].service_name, "Appointment");
    }

    #[test]
    fn test_malformed_time_skipped() {
        let settings = settings();
        let slot = booked_slot(&settings, "9h", "Ana");
        assert!(due_reminders(date(), &[slot], &settings, at(8, 50)).is_empty());
    }
}
