//! Weekly timetables keyed by free-text class name ("1A").

use serde::Deserialize;

use super::{invalid, not_found, required, Result};
use crate::ids::lenient;
use crate::model::{ClassTimetable, Period, TimetableCell, SCHOOL_DAYS};
use crate::repo::Repos;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CellInput {
    #[serde(deserialize_with = "lenient::string")]
    pub class_name: String,
    #[serde(deserialize_with = "lenient::string")]
    pub day: String,
    #[serde(deserialize_with = "lenient::string")]
    pub period: String,
    #[serde(deserialize_with = "lenient::string")]
    pub subject: String,
    #[serde(deserialize_with = "lenient::string")]
    pub teacher: String,
}

fn school_day(day: &str) -> Result<&'static str> {
    SCHOOL_DAYS
        .iter()
        .find(|d| d.eq_ignore_ascii_case(day.trim()))
        .copied()
        .ok_or_else(|| invalid(format!("day must be Monday to Saturday: {day}")))
}

pub fn list_classes(repos: &Repos) -> Vec<String> {
    repos.read_timetables().into_keys().collect()
}

pub fn get(repos: &Repos, class_name: &str) -> Option<ClassTimetable> {
    repos.read_timetables().remove(class_name.trim())
}

/// Creates the class timetable on first use. A period name already present is left
/// as it is.
pub fn add_period(
    repos: &Repos,
    class_name: &str,
    name: &str,
    time: &str,
) -> Result<ClassTimetable> {
    let class_name = required(class_name, "class is required")?;
    let name = required(name, "period name and time are required")?;
    let time = required(time, "period name and time are required")?;

    let mut all = repos.read_timetables();
    let table = all.entry(class_name.clone()).or_default();
    if !table.periods.iter().any(|p| p.name == name) {
        table.periods.push(Period {
            name: name.clone(),
            time,
        });
        table.data.entry(name).or_default();
    }
    let snapshot = table.clone();
    repos.write_timetables(&all)?;
    Ok(snapshot)
}

pub fn set_cell(repos: &Repos, input: CellInput) -> Result<ClassTimetable> {
    const MSG: &str = "class, day, period and subject are required";
    let class_name = required(&input.class_name, MSG)?;
    let day = school_day(&required(&input.day, MSG)?)?;
    let period = required(&input.period, MSG)?;
    let subject = required(&input.subject, MSG)?;

    let mut all = repos.read_timetables();
    let Some(table) = all.get_mut(&class_name) else {
        return Err(not_found("timetable", &class_name));
    };
    if !table.periods.iter().any(|p| p.name == period) {
        return Err(not_found("period", &period));
    }
    table.data.entry(period).or_default().insert(
        day.to_string(),
        TimetableCell {
            subject,
            teacher: input.teacher.trim().to_string(),
        },
    );
    let snapshot = table.clone();
    repos.write_timetables(&all)?;
    Ok(snapshot)
}

pub fn clear_cell(repos: &Repos, class_name: &str, day: &str, period: &str) -> Result<bool> {
    let day = school_day(day)?;
    let mut all = repos.read_timetables();
    let Some(table) = all.get_mut(class_name.trim()) else {
        return Err(not_found("timetable", class_name));
    };
    let removed = table
        .data
        .get_mut(period.trim())
        .and_then(|row| row.remove(day))
        .is_some();
    if removed {
        repos.write_timetables(&all)?;
    }
    Ok(removed)
}
