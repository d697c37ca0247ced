use serde::Deserialize;

use super::{not_found, parse_date, required, Result};
use crate::ids::{lenient, timestamp_id, RecordId};
use crate::model::ExamSchedule;
use crate::repo::Repos;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExamInput {
    #[serde(deserialize_with = "lenient::opt_i64")]
    pub id: Option<i64>,
    #[serde(deserialize_with = "lenient::string")]
    pub class_id: String,
    #[serde(deserialize_with = "lenient::string")]
    pub exam_name: String,
    #[serde(deserialize_with = "lenient::string")]
    pub term: String,
    #[serde(deserialize_with = "lenient::string")]
    pub subject: String,
    #[serde(deserialize_with = "lenient::string")]
    pub date: String,
    #[serde(deserialize_with = "lenient::string")]
    pub start_time: String,
    #[serde(deserialize_with = "lenient::string")]
    pub end_time: String,
}

const MSG: &str = "Please fill all fields (including start & end time).";

/// Sorted by date, then start time.
pub fn list(repos: &Repos, class_id: Option<&str>) -> Vec<ExamSchedule> {
    let class_id = class_id.map(str::trim).filter(|c| !c.is_empty());
    let mut list: Vec<ExamSchedule> = repos
        .read_exam_schedules()
        .into_iter()
        .filter(|e| class_id.map(|c| e.class_id.matches(c)).unwrap_or(true))
        .collect();
    list.sort_by(|a, b| (&a.date, &a.start_time).cmp(&(&b.date, &b.start_time)));
    list
}

pub fn upsert(repos: &Repos, input: ExamInput) -> Result<ExamSchedule> {
    let class_id = required(&input.class_id, MSG)?;
    let exam_name = required(&input.exam_name, MSG)?;
    let term = required(&input.term, MSG)?;
    let subject = required(&input.subject, MSG)?;
    let date = required(&input.date, MSG)?;
    let date = parse_date(&date, "date")?.format("%Y-%m-%d").to_string();
    let start_time = required(&input.start_time, MSG)?;
    let end_time = required(&input.end_time, MSG)?;
    let class_id = RecordId::parse(&class_id).unwrap_or(RecordId::Text(class_id));

    let mut schedules = repos.read_exam_schedules();
    let id = match input.id {
        Some(id) => {
            if !schedules.iter().any(|s| s.id == id) {
                return Err(not_found("exam schedule", id));
            }
            id
        }
        None => timestamp_id(schedules.iter().map(|s| s.id)),
    };
    let record = ExamSchedule {
        id,
        class_id,
        exam_name,
        term,
        subject,
        date,
        start_time,
        end_time,
    };
    match schedules.iter_mut().find(|s| s.id == id) {
        Some(existing) => *existing = record.clone(),
        None => schedules.push(record.clone()),
    }
    repos.write_exam_schedules(&schedules)?;
    Ok(record)
}

pub fn delete(repos: &Repos, id: i64) -> Result<()> {
    let mut schedules = repos.read_exam_schedules();
    let before = schedules.len();
    schedules.retain(|s| s.id != id);
    if schedules.len() == before {
        return Err(not_found("exam schedule", id));
    }
    repos.write_exam_schedules(&schedules)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WireError;
    use crate::store::KvStore;
    use pretty_assertions::assert_eq;

    fn exam(class_id: &str, subject: &str, date: &str, start: &str) -> ExamInput {
        ExamInput {
            id: None,
            class_id: class_id.into(),
            exam_name: "Unit Test 1".into(),
            term: "Term 1".into(),
            subject: subject.into(),
            date: date.into(),
            start_time: start.into(),
            end_time: "12:00".into(),
        }
    }

    #[test]
    fn every_field_is_required() {
        let store = KvStore::memory();
        let repos = Repos::new(&store);
        let e = upsert(
            &repos,
            ExamInput {
                end_time: String::new(),
                ..exam("7", "Maths", "2025-09-01", "10:00")
            },
        )
        .expect_err("missing end time");
        assert_eq!(e.to_string(), MSG);
        assert_eq!(e.code(), "bad_params");
    }

    #[test]
    fn upsert_edits_in_place_and_list_sorts_by_date() {
        let store = KvStore::memory();
        let repos = Repos::new(&store);
        let late = upsert(&repos, exam("7", "Maths", "2025-09-03", "10:00")).expect("late");
        upsert(&repos, exam("7", "English", "2025-09-01", "10:00")).expect("early");
        upsert(&repos, exam("8", "Hindi", "2025-09-02", "10:00")).expect("other class");

        let subjects: Vec<String> = list(&repos, Some("7")).into_iter().map(|e| e.subject).collect();
        assert_eq!(subjects, vec!["English", "Maths"]);
        assert_eq!(late.class_id, RecordId::Num(7));

        upsert(
            &repos,
            ExamInput {
                id: Some(late.id),
                ..exam("7", "Mathematics", "2025-09-03", "09:00")
            },
        )
        .expect("edit");
        assert_eq!(repos.read_exam_schedules().len(), 3);
        assert!(list(&repos, Some("7"))
            .iter()
            .any(|e| e.subject == "Mathematics"));

        delete(&repos, late.id).expect("delete");
        assert_eq!(delete(&repos, late.id).expect_err("gone").code(), "not_found");
    }
}
