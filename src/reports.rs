//! Printable document models. Clients render these to PDF or screen; the sidecar only
//! lays out the table and the school header.

use serde::{Deserialize, Serialize};

use crate::features::{exams, not_found, results, timetable, Result};
use crate::model::{class_label, Settings, SCHOOL_DAYS, UNRESOLVED};
use crate::repo::Repos;
use crate::transport;

const HEADER_NAME_FALLBACK: &str = "School Name";
const HEADER_ADDRESS_FALLBACK: &str = "School Address";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocHeader {
    pub school_name: String,
    pub school_address: String,
    pub logo: Option<String>,
}

impl DocHeader {
    fn from_settings(s: &Settings) -> Self {
        let or = |v: &str, d: &str| match v.trim() {
            "" => d.to_string(),
            t => t.to_string(),
        };
        Self {
            school_name: or(&s.school_name, HEADER_NAME_FALLBACK),
            school_address: or(&s.school_address, HEADER_ADDRESS_FALLBACK),
            logo: s.logo.clone().filter(|l| !l.trim().is_empty()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Document<M: Serialize> {
    pub title: String,
    pub file_name: String,
    pub header: DocHeader,
    pub head: Vec<String>,
    pub body: Vec<Vec<String>>,
    #[serde(flatten)]
    pub meta: M,
}

fn document<M: Serialize>(
    repos: &Repos,
    title: String,
    file_name: String,
    head: &[&str],
    body: Vec<Vec<String>>,
    meta: M,
) -> Document<M> {
    Document {
        title,
        file_name,
        header: DocHeader::from_settings(&repos.read_settings()),
        head: head.iter().map(|h| h.to_string()).collect(),
        body,
        meta,
    }
}

fn file_safe(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join("_")
}

fn or_dash(v: &str) -> String {
    match v.trim() {
        "" => UNRESOLVED.to_string(),
        t => t.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableMeta {
    pub class_name: String,
}

pub fn timetable(repos: &Repos, class_name: &str) -> Result<Document<TimetableMeta>> {
    let class_name = class_name.trim();
    let Some(tt) = timetable::get(repos, class_name) else {
        return Err(not_found("timetable", class_name));
    };
    let mut head = vec!["Period (Time)"];
    head.extend(SCHOOL_DAYS);
    let body = tt
        .periods
        .iter()
        .map(|p| {
            let mut row = vec![format!("{}\n{}", p.name, p.time)];
            row.extend(SCHOOL_DAYS.iter().map(|day| {
                tt.cell(&p.name, day)
                    .map(|c| format!("{}\n({})", c.subject, c.teacher))
                    .unwrap_or_default()
            }));
            row
        })
        .collect();
    Ok(document(
        repos,
        format!("Class Timetable - {class_name}"),
        format!("{}_Timetable.pdf", file_safe(class_name)),
        &head,
        body,
        TimetableMeta {
            class_name: class_name.to_string(),
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamScheduleMeta {
    pub class_id: String,
    pub class_label: String,
}

pub fn exam_schedule(repos: &Repos, class_id: &str) -> Result<Document<ExamScheduleMeta>> {
    let class_id = class_id.trim();
    let label = class_label(&repos.read_classes(), class_id);
    let body = exams::list(repos, Some(class_id))
        .into_iter()
        .map(|e| vec![e.exam_name, e.term, e.subject, e.date, e.start_time, e.end_time])
        .collect();
    Ok(document(
        repos,
        format!("Exam Schedule - Class {label}"),
        format!("Exam_Schedule_{}.pdf", file_safe(&label)),
        &["Exam", "Term", "Subject", "Date", "Start", "End"],
        body,
        ExamScheduleMeta {
            class_id: class_id.to_string(),
            class_label: label,
        },
    ))
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExamInfo {
    pub exam_name: String,
    pub term: String,
    pub academic_year: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentInfo {
    pub name: String,
    pub class_name: String,
    pub roll_no: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportCardMeta {
    pub student: StudentInfo,
    pub exam: ExamInfo,
    pub signatures: Vec<String>,
}

fn format_marks(marks: f64) -> String {
    if marks.fract() == 0.0 {
        format!("{marks:.0}")
    } else {
        format!("{marks}")
    }
}

pub fn report_card(
    repos: &Repos,
    class_name: &str,
    student_id: &str,
    exam: Option<ExamInfo>,
) -> Result<Document<ReportCardMeta>> {
    let class_name = class_name.trim();
    let Some(entry) = results::find(repos, class_name, student_id) else {
        return Err(not_found("result", student_id));
    };
    let body = entry
        .results
        .iter()
        .map(|r| {
            vec![
                r.subject.clone(),
                format_marks(r.marks),
                r.grade.clone(),
                r.remarks.clone(),
            ]
        })
        .collect();
    let student = StudentInfo {
        name: or_dash(&entry.name),
        class_name: or_dash(if entry.class_name.is_empty() {
            class_name
        } else {
            &entry.class_name
        }),
        roll_no: or_dash(&entry.roll_no),
    };
    Ok(document(
        repos,
        format!("Report Card - {}", student.name),
        format!("{}_Result.pdf", file_safe(&student.name)),
        &["Subject", "Marks", "Grade", "Remarks"],
        body,
        ReportCardMeta {
            student,
            exam: exam.unwrap_or_default(),
            signatures: ["Class Teacher", "Principal", "Parent/Guardian"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportSlipMeta {
    pub student_id: String,
}

pub fn transport_slip(repos: &Repos, student_id: &str) -> Result<Document<TransportSlipMeta>> {
    let Some(view) = transport::student_view(repos, student_id) else {
        return Err(not_found("transport mapping", student_id.trim()));
    };
    let row = |k: &str, v: &str| vec![k.to_string(), or_dash(v)];
    let body = vec![
        row("Name", &view.student_name),
        row("Class", &view.class_name),
        row("Route", &view.route_name),
        row("Vehicle", &view.vehicle_no),
        row("Driver", &view.driver_name),
        row("Driver Phone", &view.driver_phone),
        row("Pickup Stop", &view.pickup_stop),
        row("Pickup Time", &view.pickup_time),
        row("Drop Stop", &view.drop_stop),
        row("Drop Time", &view.drop_time),
    ];
    Ok(document(
        repos,
        "Student Transport Details".to_string(),
        format!("Transport_{}.pdf", file_safe(&view.student_name)),
        &["Field", "Details"],
        body,
        TransportSlipMeta {
            student_id: view.student_id,
        },
    ))
}
