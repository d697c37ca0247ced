use serde::{Deserialize, Serialize};

use crate::ids::lenient;

pub const DEFAULT_BACK_COLOR: &str = "#0C3C78";
pub const DEFAULT_FORE_COLOR: &str = "#F15A24";
pub const DEFAULT_LIGHT_COLOR: &str = "#F7FAFC";
pub const DEFAULT_SCHOOL_NAME: &str = "iQubiz School";

/// School branding. Missing fields in a stored object are filled from the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    #[serde(deserialize_with = "lenient::string")]
    pub back_color: String,
    #[serde(deserialize_with = "lenient::string")]
    pub fore_color: String,
    #[serde(deserialize_with = "lenient::string")]
    pub light_color: String,
    /// Data URL.
    pub logo: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub school_name: String,
    #[serde(deserialize_with = "lenient::string")]
    pub school_address: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            back_color: DEFAULT_BACK_COLOR.to_string(),
            fore_color: DEFAULT_FORE_COLOR.to_string(),
            light_color: DEFAULT_LIGHT_COLOR.to_string(),
            logo: None,
            school_name: DEFAULT_SCHOOL_NAME.to_string(),
            school_address: String::new(),
        }
    }
}

/// Colors and identity handed to every view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Brand {
    pub blue: String,
    pub orange: String,
    pub light: String,
    pub logo: Option<String>,
    pub school_name: String,
    pub school_address: String,
}

impl Brand {
    pub fn from_settings(s: &Settings) -> Self {
        fn or(v: &str, d: &str) -> String {
            if v.trim().is_empty() {
                d.to_string()
            } else {
                v.to_string()
            }
        }
        Self {
            blue: or(&s.back_color, DEFAULT_BACK_COLOR),
            orange: or(&s.fore_color, DEFAULT_FORE_COLOR),
            light: or(&s.light_color, DEFAULT_LIGHT_COLOR),
            logo: s.logo.clone().filter(|l| !l.is_empty()),
            school_name: or(&s.school_name, DEFAULT_SCHOOL_NAME),
            school_address: s.school_address.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    #[default]
    Event,
    Holiday,
    Exam,
    Meeting,
}

impl EventKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "event" => Some(Self::Event),
            "holiday" => Some(Self::Holiday),
            "exam" => Some(Self::Exam),
            "meeting" => Some(Self::Meeting),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    #[serde(deserialize_with = "lenient::i64")]
    pub id: i64,
    #[serde(default, deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub description: String,
    #[serde(rename = "type", default)]
    pub kind: EventKind,
    /// RFC 3339.
    #[serde(default, deserialize_with = "lenient::string")]
    pub start: String,
    /// RFC 3339.
    #[serde(default, deserialize_with = "lenient::string")]
    pub end: String,
    #[serde(default = "all_day_default")]
    pub all_day: bool,
}

fn all_day_default() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Circular {
    #[serde(deserialize_with = "lenient::i64")]
    pub id: i64,
    #[serde(default, deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub description: String,
    /// Data URL of the attached document.
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub file_name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub date: String,
}
