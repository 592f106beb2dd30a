//! Daily schedule model: time slots and the student seats inside them

use crate::domain::ids::generate_unique_id;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Time grid used when a day has neither a saved schedule nor a template
pub const DEFAULT_TIME_SLOTS: [&str; 14] = [
    "07:00", "08:00", "09:00", "10:00", "11:00", "12:00", "13:00", "14:00", "15:00", "16:00",
    "17:00", "18:00", "19:00", "20:00",
];

/// Number of vacant seats each default slot starts with
pub const INITIAL_STUDENTS_PER_SLOT: usize = 3;

/// Attendance state of one seat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AttendanceStatus {
    #[serde(rename = "Presente", alias = "Present")]
    Present,
    #[serde(rename = "Faltou", alias = "Absent")]
    Absent,
    #[default]
    #[serde(rename = "Vago", alias = "Vacant")]
    Vacant,
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AttendanceStatus::Present => "present",
            AttendanceStatus::Absent => "absent",
            AttendanceStatus::Vacant => "vacant",
        };
        f.write_str(label)
    }
}

impl FromStr for AttendanceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "present" => Ok(AttendanceStatus::Present),
            "absent" => Ok(AttendanceStatus::Absent),
            "vacant" => Ok(AttendanceStatus::Vacant),
            _ => Err(format!(
                "Invalid status: '{}'. Valid statuses are: present, absent, vacant",
                s
            )),
        }
    }
}

/// One seat within a time slot on one day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: AttendanceStatus,
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub is_trial: bool,
}

impl Student {
    /// An empty seat nobody has booked yet
    pub fn vacant() -> Self {
        Student::blank(AttendanceStatus::Vacant)
    }

    /// A seat added by hand to a slot; assumed attended until edited
    pub fn walk_in() -> Self {
        Student::blank(AttendanceStatus::Present)
    }

    fn blank(status: AttendanceStatus) -> Self {
        Student {
            id: generate_unique_id(),
            name: String::new(),
            status,
            tag: String::new(),
            notes: String::new(),
            is_trial: false,
        }
    }

    /// Whether this seat earns the slot's service price
    pub fn is_billable(&self) -> bool {
        self.status == AttendanceStatus::Present && !self.is_trial
    }

    /// Merge the fields set in `patch` into this seat
    pub fn apply(&mut self, patch: &StudentPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(tag) = &patch.tag {
            self.tag = tag.clone();
        }
        if let Some(notes) = &patch.notes {
            self.notes = notes.clone();
        }
        if let Some(is_trial) = patch.is_trial {
            self.is_trial = is_trial;
        }
    }
}

/// Partial update for a [`Student`]; unset fields are left untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudentPatch {
    pub name: Option<String>,
    pub status: Option<AttendanceStatus>,
    pub tag: Option<String>,
    pub notes: Option<String>,
    pub is_trial: Option<bool>,
}

impl StudentPatch {
    pub fn is_empty(&self) -> bool {
        *self == StudentPatch::default()
    }
}

/// A fixed time of day holding one or more seats
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    pub time: String,
    #[serde(default)]
    pub service_id: Option<String>,
    #[serde(default)]
    pub students: Vec<Student>,
}

impl TimeSlot {
    pub fn student_mut(&mut self, student_id: &str) -> Option<&mut Student> {
        self.students.iter_mut().find(|s| s.id == student_id)
    }

    /// Merge the fields set in `patch` into this slot
    pub fn apply(&mut self, patch: &TimeSlotPatch) {
        if let Some(service_id) = &patch.service_id {
            self.service_id = service_id.clone();
        }
    }

    /// Copy of this slot with every seat given a new identity
    fn restamped(&self) -> TimeSlot {
        TimeSlot {
            time: self.time.clone(),
            service_id: self.service_id.clone(),
            students: self
                .students
                .iter()
                .map(|student| Student {
                    id: generate_unique_id(),
                    ..student.clone()
                })
                .collect(),
        }
    }
}

/// Partial update for a [`TimeSlot`]
///
/// `service_id: Some(None)` clears the slot's service.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeSlotPatch {
    pub service_id: Option<Option<String>>,
}

/// All slots of one calendar date, in display order
pub type DailySchedule = Vec<TimeSlot>;

/// Build the default schedule: [`DEFAULT_TIME_SLOTS`] with
/// [`INITIAL_STUDENTS_PER_SLOT`] vacant seats each
pub fn default_schedule(service_id: Option<&str>) -> DailySchedule {
    DEFAULT_TIME_SLOTS
        .iter()
        .map(|time| TimeSlot {
            time: (*time).to_string(),
            service_id: service_id.map(str::to_string),
            students: (0..INITIAL_STUDENTS_PER_SLOT)
                .map(|_| Student::vacant())
                .collect(),
        })
        .collect()
}

/// Instantiate a template for a new day. Structure is preserved, seat ids are not.
pub fn schedule_from_template(template: &[TimeSlot]) -> DailySchedule {
    template.iter().map(TimeSlot::restamped).collect()
}

pub fn find_slot_mut<'a>(schedule: &'a mut [TimeSlot], time: &str) -> Option<&'a mut TimeSlot> {
    schedule.iter_mut().find(|slot| slot.time == time)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_default_schedule_shape() {
        let schedule = default_schedule(Some("svc"));
        assert_eq!(schedule.len(), DEFAULT_TIME_SLOTS.len());
        for (slot, time) in schedule.iter().zip(DEFAULT_TIME_SLOTS) {
            assert_eq!(slot.time, time);
            assert_eq!(slot.service_id.as_deref(), Some("svc"));
            assert_eq!(slot.students.len(), INITIAL_STUDENTS_PER_SLOT);
            assert!(slot
                .students
                .iter()
                .all(|s| s.status == AttendanceStatus::Vacant && s.name.is_empty()));
        }
    }

    #[test]
    fn test_default_schedule_ids_unique_per_slot() {
        let schedule = default_schedule(None);
        for slot in &schedule {
            let ids: HashSet<&str> = slot.students.iter().map(|s| s.id.as_str()).collect();
            assert_eq!(ids.len(), slot.students.len());
        }
    }

    #[test]
    fn test_template_restamps_ids_only() {
        let mut template = default_schedule(Some("svc"));
        template[0].students[0].name = "Ana".to_string();
        template[0].students[0].status = AttendanceStatus::Present;
        template[1].service_id = None;

        let day = schedule_from_template(&template);

        assert_eq!(day.len(), template.len());
        for (new_slot, old_slot) in day.iter().zip(&template) {
            assert_eq!(new_slot.time, old_slot.time);
            assert_eq!(new_slot.service_id, old_slot.service_id);
            for (new_seat, old_seat) in new_slot.students.iter().zip(&old_slot.students) {
                assert_ne!(new_seat.id, old_seat.id);
                assert_eq!(new_seat.name, old_seat.name);
                assert_eq!(new_seat.status, old_seat.status);
            }
        }
    }

    #[test]
    fn test_apply_patch_only_touches_set_fields() {
        let mut student = Student::vacant();
        student.notes = "keeps".to_string();

        student.apply(&StudentPatch {
            name: Some("Bea".to_string()),
            status: Some(AttendanceStatus::Absent),
            ..Default::default()
        });

        assert_eq!(student.name, "Bea");
        assert_eq!(student.status, AttendanceStatus::Absent);
        assert_eq!(student.notes, "keeps");
        assert!(!student.is_trial);
    }

    #[test]
    fn test_slot_patch_clears_service() {
        let mut slot = default_schedule(Some("svc")).remove(0);
        slot.apply(&TimeSlotPatch::default());
        assert_eq!(slot.service_id.as_deref(), Some("svc"));

        slot.apply(&TimeSlotPatch {
            service_id: Some(None),
        });
        assert_eq!(slot.service_id, None);
    }

    #[test]
    fn test_status_wire_names() {
        let json = serde_json::to_string(&AttendanceStatus::Present).unwrap();
        assert_eq!(json, "\"Presente\"");

        let parsed: AttendanceStatus = serde_json::from_str("\"Faltou\"").unwrap();
        assert_eq!(parsed, AttendanceStatus::Absent);
        let parsed: AttendanceStatus = serde_json::from_str("\"Vacant\"").unwrap();
        assert_eq!(parsed, AttendanceStatus::Vacant);
    }

    #[test]
    fn test_student_camel_case_fields() {
        let json = r#"{"id":"a","name":"Caio","status":"Presente","tag":"","notes":"","isTrial":true}"#;
        let student: Student = serde_json::from_str(json).unwrap();
        assert!(student.is_trial);
        assert!(!student.is_billable());

        let slot_json = r#"{"time":"08:00","serviceId":null,"students":[]}"#;
        let slot: TimeSlot = serde_json::from_str(slot_json).unwrap();
        assert_eq!(slot.service_id, None);
    }

    #[test]
    fn test_status_from_str() {
        assert_eq!(
            "Present".parse::<AttendanceStatus>().unwrap(),
            AttendanceStatus::Present
        );
        assert!("late".parse::<AttendanceStatus>().is_err());
    }
}
