use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::UNRESOLVED;
use crate::ids::{lenient, RecordId};

pub const DEFAULT_MEDIUM: &str = "English";

/// Timetable and exam columns, in display order.
pub const SCHOOL_DAYS: [&str; 6] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassRecord {
    pub id: RecordId,
    #[serde(default, deserialize_with = "lenient::string")]
    pub class_name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub division: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub medium: String,
}

impl ClassRecord {
    /// "10-A (English)"
    pub fn label(&self) -> String {
        let medium = if self.medium.trim().is_empty() {
            "-"
        } else {
            self.medium.as_str()
        };
        format!("{}-{} ({})", self.class_name, self.division, medium)
    }
}

pub fn class_label(classes: &[ClassRecord], class_id: &str) -> String {
    classes
        .iter()
        .find(|c| c.id.matches(class_id))
        .map(ClassRecord::label)
        .unwrap_or_else(|| UNRESOLVED.to_string())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: RecordId,
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
}

/// Which teacher takes which subject in which class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassSubjectTeacher {
    pub id: RecordId,
    #[serde(deserialize_with = "lenient::string")]
    pub class_id: String,
    #[serde(deserialize_with = "lenient::string")]
    pub subject_id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub teacher_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Homework {
    #[serde(deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(deserialize_with = "lenient::string")]
    pub class_id: String,
    #[serde(deserialize_with = "lenient::string")]
    pub subject_id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub due_date: String,
    #[serde(default, deserialize_with = "lenient::vec")]
    pub attachments: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub created_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
}

impl AttendanceStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "present" => Some(Self::Present),
            "absent" => Some(Self::Absent),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceEntry {
    #[serde(deserialize_with = "lenient::string")]
    pub student_id: String,
    pub status: AttendanceStatus,
}

/// date (YYYY-MM-DD) -> class id -> entries
pub type AttendanceBook = BTreeMap<String, BTreeMap<String, Vec<AttendanceEntry>>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamSchedule {
    #[serde(deserialize_with = "lenient::i64")]
    pub id: i64,
    pub class_id: RecordId,
    #[serde(default, deserialize_with = "lenient::string")]
    pub exam_name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub term: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub subject: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub date: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub start_time: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub end_time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Period {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimetableCell {
    #[serde(default, deserialize_with = "lenient::string")]
    pub subject: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub teacher: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassTimetable {
    #[serde(default, deserialize_with = "lenient::vec")]
    pub periods: Vec<Period>,
    /// period name -> day -> cell
    #[serde(default)]
    pub data: BTreeMap<String, BTreeMap<String, TimetableCell>>,
}

impl ClassTimetable {
    pub fn cell(&self, period: &str, day: &str) -> Option<&TimetableCell> {
        self.data.get(period).and_then(|row| row.get(day))
    }
}

/// class name -> timetable
pub type Timetables = BTreeMap<String, ClassTimetable>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectResult {
    #[serde(default, deserialize_with = "lenient::string")]
    pub subject: String,
    pub marks: f64,
    #[serde(default, deserialize_with = "lenient::string")]
    pub grade: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub remarks: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentResult {
    pub student_id: RecordId,
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub class_name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub roll_no: String,
    #[serde(default, deserialize_with = "lenient::vec")]
    pub results: Vec<SubjectResult>,
}

/// class name -> results
pub type ResultsBook = BTreeMap<String, Vec<StudentResult>>;
