use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use super::today;
use crate::ids::RecordId;
use crate::model::User;
use crate::repo::Repos;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BirthdayCard {
    pub student_id: RecordId,
    pub name: String,
    pub class_name: String,
    pub dob: String,
}

/// Month and day of a `dob` written `YYYY-MM-DD` or `YYYY/MM/DD`.
fn month_day(dob: &str) -> Option<(u32, u32)> {
    let parts: Vec<&str> = dob.trim().split(['-', '/']).collect();
    if parts.len() < 3 {
        return None;
    }
    let month = parts[1].trim().parse().ok()?;
    let day = parts[2].trim().parse().ok()?;
    Some((month, day))
}

pub(crate) fn is_birthday(dob: &str, on: NaiveDate) -> bool {
    let Some((month, day)) = month_day(dob) else {
        return false;
    };
    if (month, day) == (2, 29) {
        let leap = NaiveDate::from_ymd_opt(on.year(), 2, 29).is_some();
        let shown = if leap { (2, 29) } else { (2, 28) };
        return (on.month(), on.day()) == shown;
    }
    (on.month(), on.day()) == (month, day)
}

/// Distinct class names that have at least one student, sorted.
pub fn classes(repos: &Repos) -> Vec<String> {
    let mut names: Vec<String> = repos
        .read_students()
        .iter()
        .filter_map(User::class_name)
        .collect();
    names.sort();
    names.dedup();
    names
}

/// Students of `class_name` whose birthday falls on `on` (default today). Without a
/// class there is nothing to show.
pub fn today_in_class(
    repos: &Repos,
    class_name: Option<&str>,
    exclude_student_id: Option<&str>,
    on: Option<NaiveDate>,
) -> Vec<BirthdayCard> {
    let Some(class_name) = class_name.map(str::trim).filter(|c| !c.is_empty()) else {
        return Vec::new();
    };
    let on = on.unwrap_or_else(today);
    repos
        .read_students()
        .into_iter()
        .filter(|s| s.class_name().as_deref() == Some(class_name))
        .filter(|s| exclude_student_id.map(|id| !s.id.matches(id)).unwrap_or(true))
        .filter_map(|s| {
            let dob = s.dob.clone().filter(|d| is_birthday(d, on))?;
            Some(BirthdayCard {
                name: s.display_name(),
                class_name: class_name.to_string(),
                student_id: s.id,
                dob,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::KvStore;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn seed(repos: &Repos) {
        let users: Vec<User> = serde_json::from_value(json!([
            {"id": 1, "name": "Aarav", "role": "Student", "cls": "5A", "dob": "2014-10-18"},
            {"id": 2, "name": "Diya", "role": "Student", "cls": "5A", "dob": "2014/10/18"},
            {"id": 3, "name": "Leap", "role": "Student", "cls": "5A", "dob": "2016-02-29"},
            {"id": 4, "name": "Kabir", "role": "Student", "cls": "4B", "dob": "2015-10-18"},
            {"id": 5, "name": "Ms. Rao", "role": "Teacher", "cls": "5A", "dob": "1990-10-18"},
            {"id": 6, "name": "NoDob", "role": "Student", "cls": "5A"}
        ]))
        .expect("users");
        repos.write_users(&users).expect("write");
    }

    fn day(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn matches_either_separator_and_excludes_the_viewer() {
        let store = KvStore::memory();
        let repos = Repos::new(&store);
        seed(&repos);
        let names = |exclude: Option<&str>| -> Vec<String> {
            today_in_class(&repos, Some("5A"), exclude, day(2026, 10, 18))
                .into_iter()
                .map(|c| c.name)
                .collect()
        };
        assert_eq!(names(None), vec!["Aarav", "Diya"]);
        assert_eq!(names(Some("1")), vec!["Diya"]);
        assert!(today_in_class(&repos, None, None, day(2026, 10, 18)).is_empty());
    }

    #[test]
    fn leap_day_birthdays_show_on_feb_28_in_common_years() {
        assert!(is_birthday("2016-02-29", NaiveDate::from_ymd_opt(2027, 2, 28).expect("d")));
        assert!(!is_birthday("2016-02-29", NaiveDate::from_ymd_opt(2028, 2, 28).expect("d")));
        assert!(is_birthday("2016-02-29", NaiveDate::from_ymd_opt(2028, 2, 29).expect("d")));
        assert!(!is_birthday("29-02", NaiveDate::from_ymd_opt(2028, 2, 29).expect("d")));
    }

    #[test]
    fn classes_are_distinct_and_sorted() {
        let store = KvStore::memory();
        let repos = Repos::new(&store);
        seed(&repos);
        assert_eq!(classes(&repos), vec!["4B", "5A"]);
    }
}
