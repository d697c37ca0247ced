use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::Deserialize;

use super::{invalid, not_found, required, Result};
use crate::ids::{lenient, timestamp_id};
use crate::model::{CalendarEvent, EventKind};
use crate::repo::Repos;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EventInput {
    #[serde(deserialize_with = "lenient::opt_i64")]
    pub id: Option<i64>,
    #[serde(deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(deserialize_with = "lenient::string")]
    pub description: String,
    #[serde(rename = "type", deserialize_with = "lenient::string")]
    pub kind: String,
    #[serde(deserialize_with = "lenient::string")]
    pub start: String,
    #[serde(deserialize_with = "lenient::string")]
    pub end: String,
}

/// RFC 3339, `datetime-local` input (`YYYY-MM-DDTHH:MM[:SS]`), or a bare date.
/// Values without an offset are taken as UTC.
pub fn parse_instant(raw: &str, field: &str) -> Result<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Ok(naive.and_utc());
        }
    }
    if let Ok(day) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(naive) = day.and_hms_opt(0, 0, 0) {
            return Ok(naive.and_utc());
        }
    }
    Err(invalid(format!("{field} must be a date-time, got {raw:?}")))
}

fn stored_instant(raw: &str) -> Option<DateTime<Utc>> {
    parse_instant(raw, "stored").ok()
}

/// Events overlapping `[from, to]`, ordered by start.
pub fn list(repos: &Repos, from: Option<&str>, to: Option<&str>) -> Result<Vec<CalendarEvent>> {
    let from = from
        .filter(|v| !v.trim().is_empty())
        .map(|v| parse_instant(v, "from"))
        .transpose()?;
    let to = to
        .filter(|v| !v.trim().is_empty())
        .map(|v| parse_instant(v, "to"))
        .transpose()?;

    let mut events: Vec<CalendarEvent> = repos
        .read_calendar_events()
        .into_iter()
        .filter(|e| {
            let (Some(start), Some(end)) = (stored_instant(&e.start), stored_instant(&e.end))
            else {
                return from.is_none() && to.is_none();
            };
            from.map(|f| end >= f).unwrap_or(true) && to.map(|t| start <= t).unwrap_or(true)
        })
        .collect();
    events.sort_by_key(|e| stored_instant(&e.start));
    Ok(events)
}

pub fn upsert(repos: &Repos, input: EventInput) -> Result<CalendarEvent> {
    const MSG: &str = "Please fill in required fields";
    let title = required(&input.title, MSG)?;
    let start = parse_instant(&required(&input.start, MSG)?, "start")?;
    let end = parse_instant(&required(&input.end, MSG)?, "end")?;
    if end < start {
        return Err(invalid("end must not be before start"));
    }
    let kind = match input.kind.trim() {
        "" => EventKind::default(),
        k => EventKind::parse(k)
            .ok_or_else(|| invalid(format!("type must be Event, Holiday, Exam or Meeting: {k}")))?,
    };

    let mut events = repos.read_calendar_events();
    let id = match input.id {
        Some(id) if events.iter().any(|e| e.id == id) => id,
        Some(id) => return Err(not_found("event", id)),
        None => timestamp_id(events.iter().map(|e| e.id)),
    };
    let event = CalendarEvent {
        id,
        title,
        description: input.description.trim().to_string(),
        kind,
        start: start.to_rfc3339_opts(SecondsFormat::Millis, true),
        end: end.to_rfc3339_opts(SecondsFormat::Millis, true),
        all_day: true,
    };
    match events.iter_mut().find(|e| e.id == id) {
        Some(existing) => *existing = event.clone(),
        None => events.push(event.clone()),
    }
    repos.write_calendar_events(&events)?;
    Ok(event)
}

pub fn delete(repos: &Repos, id: i64) -> Result<()> {
    let mut events = repos.read_calendar_events();
    let before = events.len();
    events.retain(|e| e.id != id);
    if events.len() == before {
        return Err(not_found("event", id));
    }
    repos.write_calendar_events(&events)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WireError;
    use crate::store::KvStore;
    use pretty_assertions::assert_eq;

    fn event(title: &str, start: &str, end: &str, kind: &str) -> EventInput {
        EventInput {
            title: title.into(),
            start: start.into(),
            end: end.into(),
            kind: kind.into(),
            ..Default::default()
        }
    }

    #[test]
    fn datetime_local_input_is_stored_as_rfc3339_utc() {
        let store = KvStore::memory();
        let repos = Repos::new(&store);
        let e = upsert(&repos, event("Sports Day", "2025-12-05T09:00", "2025-12-05T15:30", ""))
            .expect("create");
        assert_eq!(e.start, "2025-12-05T09:00:00.000Z");
        assert_eq!(e.end, "2025-12-05T15:30:00.000Z");
        assert_eq!(e.kind, EventKind::Event);
        assert!(e.all_day);
    }

    #[test]
    fn rejects_end_before_start_and_unknown_types() {
        let store = KvStore::memory();
        let repos = Repos::new(&store);
        let e = upsert(&repos, event("X", "2025-12-05T09:00", "2025-12-04T09:00", "Event"))
            .expect_err("end before start");
        assert_eq!(e.code(), "bad_params");
        let e = upsert(&repos, event("X", "2025-12-05", "2025-12-05", "Party"))
            .expect_err("type");
        assert_eq!(e.code(), "bad_params");
        assert!(repos.read_calendar_events().is_empty());
    }

    #[test]
    fn list_filters_by_overlap_and_sorts_by_start() {
        let store = KvStore::memory();
        let repos = Repos::new(&store);
        upsert(&repos, event("Diwali", "2025-10-20", "2025-10-24", "holiday")).expect("a");
        upsert(&repos, event("PTM", "2025-10-11T10:00", "2025-10-11T12:00", "Meeting"))
            .expect("b");
        upsert(&repos, event("Finals", "2026-03-01", "2026-03-10", "Exam")).expect("c");

        let titles = |from: Option<&str>, to: Option<&str>| -> Vec<String> {
            list(&repos, from, to)
                .expect("list")
                .into_iter()
                .map(|e| e.title)
                .collect()
        };
        assert_eq!(titles(None, None), vec!["PTM", "Diwali", "Finals"]);
        assert_eq!(
            titles(Some("2025-10-22"), Some("2025-10-31")),
            vec!["Diwali"]
        );
        assert!(list(&repos, Some("yesterday"), None).is_err());
    }

    #[test]
    fn edit_keeps_id_and_delete_removes() {
        let store = KvStore::memory();
        let repos = Repos::new(&store);
        let e = upsert(&repos, event("PTM", "2025-10-11", "2025-10-11", "Meeting")).expect("a");
        let edited = upsert(
            &repos,
            EventInput {
                id: Some(e.id),
                ..event("PTM (moved)", "2025-10-12", "2025-10-12", "Meeting")
            },
        )
        .expect("edit");
        assert_eq!(edited.id, e.id);
        assert_eq!(repos.read_calendar_events().len(), 1);
        delete(&repos, e.id).expect("delete");
        assert_eq!(delete(&repos, e.id).expect_err("gone").code(), "not_found");
    }
}
