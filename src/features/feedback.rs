use serde::Deserialize;

use super::{filter_value, invalid, not_found, now_rfc3339, required, text_matches, Result};
use crate::ids::{lenient, timestamp_id};
use crate::model::{FeedbackItem, FeedbackReply, TicketStatus, FEEDBACK_CATEGORIES};
use crate::repo::Repos;

pub const DEFAULT_REPLY_AUTHOR: &str = "Principal/Owner";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FeedbackInput {
    #[serde(deserialize_with = "lenient::string")]
    pub subject: String,
    #[serde(deserialize_with = "lenient::string")]
    pub message: String,
    #[serde(deserialize_with = "lenient::string")]
    pub category: String,
    #[serde(deserialize_with = "lenient::string")]
    pub raised_by: String,
    #[serde(deserialize_with = "lenient::string")]
    pub class: String,
    #[serde(deserialize_with = "lenient::string")]
    pub contact: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FeedbackFilter {
    pub status: Option<String>,
    pub category: Option<String>,
    pub query: Option<String>,
}

pub(crate) fn parse_status(raw: &str) -> Result<TicketStatus> {
    TicketStatus::parse(raw)
        .ok_or_else(|| invalid(format!("status must be New, In Progress or Closed: {raw}")))
}

pub fn list(repos: &Repos, filter: &FeedbackFilter) -> Result<Vec<FeedbackItem>> {
    let status = filter_value(filter.status.as_deref())
        .map(parse_status)
        .transpose()?;
    let category = filter_value(filter.category.as_deref());
    Ok(repos
        .read_feedback()
        .into_iter()
        .filter(|f| status.map(|s| f.status == s).unwrap_or(true))
        .filter(|f| category.map(|c| f.category == c).unwrap_or(true))
        .filter(|f| {
            text_matches(
                filter.query.as_deref().unwrap_or(""),
                [
                    f.subject.as_str(),
                    f.message.as_str(),
                    f.raised_by.as_str(),
                    f.class.as_str(),
                    f.contact.as_str(),
                ],
            )
        })
        .collect())
}

pub fn create(repos: &Repos, input: FeedbackInput) -> Result<FeedbackItem> {
    const MSG: &str = "Subject and message are required";
    let subject = required(&input.subject, MSG)?;
    let message = required(&input.message, MSG)?;
    let category = match input.category.trim() {
        "" => FEEDBACK_CATEGORIES[0].to_string(),
        c => FEEDBACK_CATEGORIES
            .iter()
            .find(|known| known.eq_ignore_ascii_case(c))
            .map(|known| known.to_string())
            .ok_or_else(|| invalid(format!("unknown category: {c}")))?,
    };

    let mut items = repos.read_feedback();
    let item = FeedbackItem {
        id: timestamp_id(items.iter().map(|f| f.id)),
        subject,
        message,
        category,
        raised_by: input.raised_by.trim().to_string(),
        class: input.class.trim().to_string(),
        contact: input.contact.trim().to_string(),
        status: TicketStatus::New,
        created_at: now_rfc3339(),
        replies: Vec::new(),
    };
    items.insert(0, item.clone());
    repos.write_feedback(&items)?;
    Ok(item)
}

fn update<F>(repos: &Repos, id: i64, apply: F) -> Result<FeedbackItem>
where
    F: FnOnce(&mut FeedbackItem),
{
    let mut items = repos.read_feedback();
    let Some(item) = items.iter_mut().find(|f| f.id == id) else {
        return Err(not_found("feedback", id));
    };
    apply(item);
    let updated = item.clone();
    repos.write_feedback(&items)?;
    Ok(updated)
}

pub fn reply(repos: &Repos, id: i64, text: &str, by: Option<&str>) -> Result<FeedbackItem> {
    let text = required(text, "reply text is required")?;
    let by = by
        .map(str::trim)
        .filter(|b| !b.is_empty())
        .unwrap_or(DEFAULT_REPLY_AUTHOR)
        .to_string();
    update(repos, id, |item| {
        item.replies.push(FeedbackReply {
            text,
            date: now_rfc3339(),
            by,
        })
    })
}

pub fn set_status(repos: &Repos, id: i64, status: &str) -> Result<FeedbackItem> {
    let status = parse_status(status)?;
    update(repos, id, |item| item.status = status)
}

pub fn delete(repos: &Repos, id: i64) -> Result<()> {
    let mut items = repos.read_feedback();
    let before = items.len();
    items.retain(|f| f.id != id);
    if items.len() == before {
        return Err(not_found("feedback", id));
    }
    repos.write_feedback(&items)?;
    Ok(())
}
