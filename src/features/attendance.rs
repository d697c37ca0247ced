use serde::{Deserialize, Serialize};

use super::{invalid, parse_date, required, Result};
use crate::ids::lenient;
use crate::model::{AttendanceEntry, AttendanceStatus};
use crate::repo::Repos;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRow {
    pub student_id: String,
    pub name: String,
    pub roll_no: Option<String>,
    pub status: AttendanceStatus,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AttendanceSummary {
    pub present: usize,
    pub absent: usize,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceSheet {
    pub date: String,
    pub class_id: String,
    pub rows: Vec<AttendanceRow>,
    pub summary: AttendanceSummary,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkInput {
    #[serde(deserialize_with = "lenient::string")]
    pub student_id: String,
    pub status: String,
}

fn summarize<'a>(statuses: impl Iterator<Item = &'a AttendanceStatus>) -> AttendanceSummary {
    let mut s = AttendanceSummary::default();
    for status in statuses {
        s.total += 1;
        match status {
            AttendanceStatus::Present => s.present += 1,
            AttendanceStatus::Absent => s.absent += 1,
        }
    }
    s
}

/// Every student of the class with their status for the day; unmarked students
/// count as absent.
pub fn get_sheet(repos: &Repos, date: &str, class_id: &str) -> Result<AttendanceSheet> {
    let day = parse_date(date, "date")?;
    let class_id = required(class_id, "classId is required")?;
    let date = day.format("%Y-%m-%d").to_string();

    let book = repos.read_attendance();
    let stored = book.get(&date).and_then(|by_class| by_class.get(&class_id));
    let rows: Vec<AttendanceRow> = repos
        .read_students()
        .into_iter()
        .filter(|s| s.in_class(&class_id))
        .map(|s| {
            let student_id = s.id.to_string();
            let status = stored
                .and_then(|entries| entries.iter().find(|e| e.student_id == student_id))
                .map(|e| e.status)
                .unwrap_or(AttendanceStatus::Absent);
            AttendanceRow {
                name: s.display_name(),
                roll_no: s.roll_no.clone(),
                student_id,
                status,
            }
        })
        .collect();
    let summary = summarize(rows.iter().map(|r| &r.status));
    Ok(AttendanceSheet {
        date,
        class_id,
        rows,
        summary,
    })
}

/// Replaces the stored list for that date and class.
pub fn save(
    repos: &Repos,
    date: &str,
    class_id: &str,
    marks: Vec<MarkInput>,
) -> Result<AttendanceSummary> {
    let day = parse_date(date, "date")?;
    let class_id = required(class_id, "classId is required")?;

    let mut entries = Vec::with_capacity(marks.len());
    for m in marks {
        let student_id = required(&m.student_id, "studentId is required")?;
        let status = AttendanceStatus::parse(&m.status)
            .ok_or_else(|| invalid(format!("status must be present or absent: {}", m.status)))?;
        entries.push(AttendanceEntry { student_id, status });
    }
    let summary = summarize(entries.iter().map(|e| &e.status));

    let mut book = repos.read_attendance();
    book.entry(day.format("%Y-%m-%d").to_string())
        .or_default()
        .insert(class_id, entries);
    repos.write_attendance(&book)?;
    Ok(summary)
}
