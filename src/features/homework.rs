use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{not_found, now_rfc3339, parse_date, required, today, Result};
use crate::ids::{lenient, make_id};
use crate::model::{class_label, Homework, UNRESOLVED};
use crate::repo::Repos;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HomeworkInput {
    #[serde(deserialize_with = "lenient::string")]
    pub class_id: String,
    #[serde(deserialize_with = "lenient::string")]
    pub subject_id: String,
    #[serde(deserialize_with = "lenient::string")]
    pub description: String,
    #[serde(deserialize_with = "lenient::string")]
    pub due_date: String,
    /// File names only; contents are not stored.
    pub attachments: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DueBadge {
    Overdue,
    Today,
    Upcoming,
}

impl DueBadge {
    /// Dates that do not parse are treated as upcoming.
    pub fn for_date(due: &str, today: NaiveDate) -> Self {
        match NaiveDate::parse_from_str(due.trim(), "%Y-%m-%d") {
            Ok(d) if d < today => Self::Overdue,
            Ok(d) if d == today => Self::Today,
            _ => Self::Upcoming,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeworkListing {
    #[serde(flatten)]
    pub homework: Homework,
    pub class_label: String,
    pub subject_name: String,
    pub due: DueBadge,
}

const MSG: &str = "Please fill all fields";

pub fn create(repos: &Repos, input: HomeworkInput) -> Result<Homework> {
    let class_id = required(&input.class_id, MSG)?;
    let subject_id = required(&input.subject_id, MSG)?;
    let description = required(&input.description, MSG)?;
    let due = required(&input.due_date, MSG)?;
    let due_date = parse_date(&due, "dueDate")?.format("%Y-%m-%d").to_string();

    let homework = Homework {
        id: make_id("hw"),
        class_id,
        subject_id,
        description,
        due_date,
        attachments: input
            .attachments
            .into_iter()
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty())
            .collect(),
        created_at: now_rfc3339(),
    };
    let mut list = repos.read_assignments();
    list.insert(0, homework.clone());
    repos.write_assignments(&list)?;
    info!(homework_id = %homework.id, class_id = %homework.class_id, "homework assigned");
    Ok(homework)
}

pub fn delete(repos: &Repos, id: &str) -> Result<()> {
    let mut list = repos.read_assignments();
    let before = list.len();
    list.retain(|h| h.id != id);
    if list.len() == before {
        return Err(not_found("homework", id));
    }
    repos.write_assignments(&list)?;
    Ok(())
}

pub fn list(
    repos: &Repos,
    class_id: Option<&str>,
    today_override: Option<NaiveDate>,
) -> Vec<HomeworkListing> {
    let today = today_override.unwrap_or_else(today);
    let classes = repos.read_classes();
    let subjects = repos.read_subjects();
    let class_id = class_id.map(str::trim).filter(|c| !c.is_empty());
    repos
        .read_assignments()
        .into_iter()
        .filter(|h| class_id.map(|c| h.class_id == c).unwrap_or(true))
        .map(|h| HomeworkListing {
            class_label: class_label(&classes, &h.class_id),
            subject_name: subjects
                .iter()
                .find(|s| s.id.matches(&h.subject_id))
                .map(|s| s.name.clone())
                .unwrap_or_else(|| UNRESOLVED.to_string()),
            due: DueBadge::for_date(&h.due_date, today),
            homework: h,
        })
        .collect()
}
