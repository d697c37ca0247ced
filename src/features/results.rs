use serde::Deserialize;

use super::{invalid, required, Result};
use crate::ids::{lenient, RecordId};
use crate::model::{StudentResult, SubjectResult};
use crate::repo::Repos;

/// Letter grade for a percentage mark.
pub fn grade_for(marks: f64) -> &'static str {
    match marks {
        m if m >= 90.0 => "A+",
        m if m >= 80.0 => "A",
        m if m >= 70.0 => "B+",
        m if m >= 60.0 => "B",
        m if m >= 50.0 => "C",
        m if m >= 40.0 => "D",
        _ => "F",
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectResultInput {
    pub subject: String,
    pub marks: f64,
    #[serde(default)]
    pub grade: Option<String>,
    #[serde(default)]
    pub remarks: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultInput {
    pub student_id: RecordId,
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub roll_no: String,
    #[serde(default)]
    pub results: Vec<SubjectResultInput>,
}

pub fn list(repos: &Repos, class_name: &str) -> Vec<StudentResult> {
    repos
        .read_results()
        .remove(class_name.trim())
        .unwrap_or_default()
}

pub fn find(repos: &Repos, class_name: &str, student_id: &str) -> Option<StudentResult> {
    list(repos, class_name)
        .into_iter()
        .find(|r| r.student_id.matches(student_id))
}

/// Replaces the student's entry in the class (matched by student id).
pub fn upsert(repos: &Repos, class_name: &str, input: ResultInput) -> Result<StudentResult> {
    let class_name = required(class_name, "className is required")?;
    let mut results = Vec::with_capacity(input.results.len());
    for r in input.results {
        let subject = required(&r.subject, "subject is required")?;
        if !(0.0..=100.0).contains(&r.marks) {
            return Err(invalid(format!("marks for {subject} must be in 0..=100")));
        }
        let grade = r
            .grade
            .map(|g| g.trim().to_string())
            .filter(|g| !g.is_empty())
            .unwrap_or_else(|| grade_for(r.marks).to_string());
        results.push(SubjectResult {
            subject,
            marks: r.marks,
            grade,
            remarks: r.remarks.trim().to_string(),
        });
    }

    let entry = StudentResult {
        student_id: input.student_id,
        name: input.name.trim().to_string(),
        class_name: class_name.clone(),
        roll_no: input.roll_no.trim().to_string(),
        results,
    };
    let mut book = repos.read_results();
    let class = book.entry(class_name).or_default();
    match class.iter_mut().find(|r| r.student_id == entry.student_id) {
        Some(existing) => *existing = entry.clone(),
        None => class.push(entry.clone()),
    }
    repos.write_results(&book)?;
    Ok(entry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WireError;
    use crate::store::KvStore;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn grade_boundaries() {
        let grades: Vec<&str> = [95.0, 90.0, 89.5, 80.0, 70.0, 60.0, 50.0, 40.0, 39.9]
            .iter()
            .map(|m| grade_for(*m))
            .collect();
        assert_eq!(grades, vec!["A+", "A+", "A", "A", "B+", "B", "C", "D", "F"]);
    }

    #[test]
    fn upsert_derives_missing_grades_and_replaces_by_student() {
        let store = KvStore::memory();
        let repos = Repos::new(&store);
        let input: ResultInput = serde_json::from_value(json!({
            "studentId": 1, "name": "Aarav Mehta", "rollNo": 12,
            "results": [
                { "subject": "Math", "marks": 92, "remarks": "Excellent" },
                { "subject": "Science", "marks": 85, "grade": "A" }
            ]
        }))
        .expect("input");
        let saved = upsert(&repos, "1A", input.clone()).expect("save");
        assert_eq!(saved.results[0].grade, "A+");
        assert_eq!(saved.roll_no, "12");

        let mut again = input;
        again.results.truncate(1);
        upsert(&repos, "1A", again).expect("replace");
        let list = list(&repos, "1A");
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].results.len(), 1);
        assert!(find(&repos, "1A", "1").is_some());
        assert!(find(&repos, "2B", "1").is_none());
    }

    #[test]
    fn marks_outside_range_are_rejected() {
        let store = KvStore::memory();
        let repos = Repos::new(&store);
        let input: ResultInput = serde_json::from_value(json!({
            "studentId": "s1", "results": [{ "subject": "Math", "marks": 101 }]
        }))
        .expect("input");
        assert_eq!(upsert(&repos, "1A", input).expect_err("range").code(), "bad_params");
        assert!(repos.read_results().is_empty());
    }
}
