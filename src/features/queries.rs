use serde::Deserialize;

use super::feedback::parse_status;
use super::{filter_value, not_found, now_rfc3339, required, Result};
use crate::ids::{lenient, timestamp_id};
use crate::model::{Query, QueryReply, TicketStatus};
use crate::repo::Repos;

const UNKNOWN: &str = "Unknown";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QueryInput {
    #[serde(deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(deserialize_with = "lenient::string")]
    pub description: String,
    #[serde(deserialize_with = "lenient::string")]
    pub raised_by: String,
    #[serde(deserialize_with = "lenient::string")]
    pub class: String,
}

/// `raised_by` narrows to one student's own queries.
pub fn list(repos: &Repos, status: Option<&str>, raised_by: Option<&str>) -> Result<Vec<Query>> {
    let status = filter_value(status).map(parse_status).transpose()?;
    let raised_by = raised_by.map(str::trim).filter(|r| !r.is_empty());
    Ok(repos
        .read_queries()
        .into_iter()
        .filter(|q| status.map(|s| q.status == s).unwrap_or(true))
        .filter(|q| raised_by.map(|r| q.raised_by == r).unwrap_or(true))
        .collect())
}

pub fn create(repos: &Repos, input: QueryInput) -> Result<Query> {
    const MSG: &str = "Title and description are required";
    let title = required(&input.title, MSG)?;
    let description = required(&input.description, MSG)?;
    let or_unknown = |v: &str| match v.trim() {
        "" => UNKNOWN.to_string(),
        t => t.to_string(),
    };

    let mut queries = repos.read_queries();
    let query = Query {
        id: timestamp_id(queries.iter().map(|q| q.id)),
        title,
        description,
        raised_by: or_unknown(&input.raised_by),
        class: or_unknown(&input.class),
        date: now_rfc3339(),
        status: TicketStatus::New,
        replies: Vec::new(),
    };
    queries.push(query.clone());
    repos.write_queries(&queries)?;
    Ok(query)
}

fn update<F>(repos: &Repos, id: i64, apply: F) -> Result<Query>
where
    F: FnOnce(&mut Query),
{
    let mut queries = repos.read_queries();
    let Some(query) = queries.iter_mut().find(|q| q.id == id) else {
        return Err(not_found("query", id));
    };
    apply(query);
    let updated = query.clone();
    repos.write_queries(&queries)?;
    Ok(updated)
}

/// The reply author is the responder's role.
pub fn reply(repos: &Repos, id: i64, role: &str, text: &str) -> Result<Query> {
    let text = required(text, "reply text is required")?;
    let author = match role.trim() {
        "" => UNKNOWN.to_string(),
        r => r.to_string(),
    };
    update(repos, id, |q| {
        q.replies.push(QueryReply {
            author,
            text,
            date: now_rfc3339(),
        })
    })
}

pub fn set_status(repos: &Repos, id: i64, status: &str) -> Result<Query> {
    let status = parse_status(status)?;
    update(repos, id, |q| q.status = status)
}
