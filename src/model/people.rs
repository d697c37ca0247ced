use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::UNRESOLVED;
use crate::ids::{lenient, RecordId};

pub const STUDENT_ROLE: &str = "Student";

/// A directory entry: staff member, student or parent. Admission forms carry many
/// more fields than the ones typed here; they ride along in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: RecordId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub role: String,
    /// Free-text class name ("1A"), used by the user editor and birthday cards.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cls: Option<String>,
    /// Class master id, set by the admission form.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_id: Option<RecordId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dob: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub roll_no: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    pub fn is_student(&self) -> bool {
        self.role.trim().eq_ignore_ascii_case(STUDENT_ROLE)
    }

    /// "First Middle Last" with blanks collapsed, else `name`, else the placeholder.
    pub fn display_name(&self) -> String {
        let joined = [&self.first_name, &self.middle_name, &self.last_name]
            .iter()
            .filter_map(|p| p.as_deref())
            .flat_map(|p| p.split_whitespace())
            .collect::<Vec<_>>()
            .join(" ");
        if !joined.is_empty() {
            return joined;
        }
        match self.name.as_deref().map(str::trim) {
            Some(n) if !n.is_empty() => n.to_string(),
            _ => UNRESOLVED.to_string(),
        }
    }

    /// Class label used by name-keyed stores (timetables, results, birthdays).
    pub fn class_name(&self) -> Option<String> {
        self.cls
            .clone()
            .or_else(|| {
                self.extra
                    .get("className")
                    .and_then(|v| v.as_str())
                    .map(str::to_string)
            })
            .filter(|c| !c.trim().is_empty())
    }

    pub fn in_class(&self, class_id: &str) -> bool {
        self.class_id
            .as_ref()
            .map(|c| c.matches(class_id))
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    pub id: RecordId,
    #[serde(default, deserialize_with = "lenient::string")]
    pub salutation: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub first_name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub middle_name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t_subject: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Teacher {
    pub fn label(&self) -> String {
        let mut out = String::new();
        if !self.salutation.trim().is_empty() {
            out.push_str(self.salutation.trim());
            out.push(' ');
        }
        out.push_str(self.first_name.trim());
        out.push(' ');
        out.push_str(self.last_name.trim());
        let label = out.trim().to_string();
        if label.is_empty() {
            UNRESOLVED.to_string()
        } else {
            label
        }
    }
}
