//! One service per dashboard view. Each service re-reads its keys through
//! [`Repos`](crate::repo::Repos), validates, mutates and writes back.

pub mod attendance;
pub mod birthdays;
pub mod calendar;
pub mod circulars;
pub mod exams;
pub mod feedback;
pub mod homework;
pub mod lost_found;
pub mod masters;
pub mod queries;
pub mod results;
pub mod settings;
pub mod timetable;
pub mod users;

use chrono::{Local, NaiveDate, SecondsFormat, Utc};
use serde_json::Value;
use thiserror::Error;

use crate::error::WireError;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum FeatureError {
    #[error("{0}")]
    Validation(String),
    #[error("{what} not found: {id}")]
    NotFound { what: &'static str, id: String },
    /// Delete blocked by records that still reference the target.
    #[error("{message}")]
    InUse {
        code: &'static str,
        message: String,
        details: Value,
    },
    #[error("{message}")]
    Duplicate { message: String, details: Value },
    #[error("{0}")]
    InvalidState(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl WireError for FeatureError {
    fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "bad_params",
            Self::NotFound { .. } => "not_found",
            Self::InUse { code, .. } => *code,
            Self::Duplicate { .. } => "duplicate_mapping",
            Self::InvalidState(_) => "invalid_state",
            Self::Store(e) => e.code(),
        }
    }

    fn details(&self) -> Option<Value> {
        match self {
            Self::InUse { details, .. } | Self::Duplicate { details, .. } => Some(details.clone()),
            Self::Store(e) => e.details(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, FeatureError>;

pub(crate) fn invalid(message: impl Into<String>) -> FeatureError {
    FeatureError::Validation(message.into())
}

pub(crate) fn not_found(what: &'static str, id: impl ToString) -> FeatureError {
    FeatureError::NotFound {
        what,
        id: id.to_string(),
    }
}

/// Trimmed value, or a validation error carrying `message` when blank.
pub(crate) fn required(value: &str, message: &str) -> Result<String> {
    let v = value.trim();
    if v.is_empty() {
        return Err(invalid(message));
    }
    Ok(v.to_string())
}

pub(crate) fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub(crate) fn parse_date(value: &str, field: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| invalid(format!("{field} must be YYYY-MM-DD")))
}

pub(crate) fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub(crate) fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Case-insensitive match of `needle` against any non-empty field. An empty needle
/// matches everything.
pub(crate) fn text_matches<'a, I>(needle: &str, fields: I) -> bool
where
    I: IntoIterator<Item = &'a str>,
{
    let q = needle.trim().to_lowercase();
    if q.is_empty() {
        return true;
    }
    fields
        .into_iter()
        .any(|f| !f.is_empty() && f.to_lowercase().contains(&q))
}

/// `"all"` and blank mean no filter.
pub(crate) fn filter_value(value: Option<&str>) -> Option<&str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("all"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_matches_is_case_insensitive_and_skips_blanks() {
        assert!(text_matches("BOTTLE", ["", "Blue bottle"]));
        assert!(text_matches("  ", ["anything"]));
        assert!(!text_matches("pen", ["", "Blue bottle"]));
    }

    #[test]
    fn filter_value_treats_all_as_unset() {
        assert_eq!(filter_value(Some("All")), None);
        assert_eq!(filter_value(Some(" claimed ")), Some("claimed"));
        assert_eq!(filter_value(None), None);
    }

    #[test]
    fn parse_date_requires_iso_day() {
        assert!(parse_date("2025-02-28", "date").is_ok());
        let e = parse_date("28/02/2025", "date").expect_err("wrong format");
        assert_eq!(e.to_string(), "date must be YYYY-MM-DD");
        assert_eq!(e.code(), "bad_params");
    }
}
