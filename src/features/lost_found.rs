//! Lost & found desk. Items move `unclaimed → claimed → returned` and never back.

use serde::Deserialize;
use tracing::info;

use super::{
    filter_value, invalid, not_found, now_rfc3339, parse_date, required, text_matches, trimmed,
    FeatureError, Result,
};
use crate::ids::{lenient, timestamp_id};
use crate::model::{Claim, LostFoundItem, LostFoundStatus};
use crate::repo::Repos;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ItemInput {
    #[serde(deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(deserialize_with = "lenient::string")]
    pub description: String,
    #[serde(deserialize_with = "lenient::string")]
    pub date_found: String,
    #[serde(deserialize_with = "lenient::string")]
    pub location: String,
    #[serde(deserialize_with = "lenient::string")]
    pub owner_hint: String,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub photo: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub found_by: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ClaimInput {
    #[serde(deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(deserialize_with = "lenient::string")]
    pub class: String,
    #[serde(deserialize_with = "lenient::string")]
    pub contact: String,
    #[serde(deserialize_with = "lenient::string")]
    pub note: String,
}

pub fn list(
    repos: &Repos,
    status: Option<&str>,
    query: Option<&str>,
) -> Result<Vec<LostFoundItem>> {
    let status = match filter_value(status) {
        Some(s) => Some(
            LostFoundStatus::parse(s)
                .ok_or_else(|| invalid(format!("unknown status filter: {s}")))?,
        ),
        None => None,
    };
    Ok(repos
        .read_lost_found()
        .into_iter()
        .filter(|it| status.map(|s| it.status == s).unwrap_or(true))
        .filter(|it| {
            text_matches(
                query.unwrap_or(""),
                [
                    it.title.as_str(),
                    it.description.as_str(),
                    it.location.as_str(),
                    it.found_by.as_str(),
                    it.owner_hint.as_str(),
                ],
            )
        })
        .collect())
}

pub fn create(repos: &Repos, input: ItemInput) -> Result<LostFoundItem> {
    const MSG: &str = "Title, Date Found, and Location are required.";
    let title = required(&input.title, MSG)?;
    let date_found = parse_date(&required(&input.date_found, MSG)?, "dateFound")?;
    let location = required(&input.location, MSG)?;

    let mut items = repos.read_lost_found();
    let item = LostFoundItem {
        id: timestamp_id(items.iter().map(|i| i.id)),
        title,
        description: input.description.trim().to_string(),
        date_found: date_found.format("%Y-%m-%d").to_string(),
        location,
        owner_hint: input.owner_hint.trim().to_string(),
        photo: trimmed(input.photo),
        found_by: input.found_by.trim().to_string(),
        status: LostFoundStatus::Unclaimed,
        claim: None,
        returned_at: None,
        returned_to: None,
    };
    items.insert(0, item.clone());
    repos.write_lost_found(&items)?;
    info!(item_id = item.id, "lost & found item logged");
    Ok(item)
}

fn transition<F>(
    repos: &Repos,
    id: i64,
    from: LostFoundStatus,
    apply: F,
) -> Result<LostFoundItem>
where
    F: FnOnce(&mut LostFoundItem),
{
    let mut items = repos.read_lost_found();
    let Some(item) = items.iter_mut().find(|i| i.id == id) else {
        return Err(not_found("item", id));
    };
    if item.status != from {
        return Err(FeatureError::InvalidState(format!(
            "item is {}, expected {}",
            item.status.as_str(),
            from.as_str()
        )));
    }
    apply(item);
    let updated = item.clone();
    repos.write_lost_found(&items)?;
    info!(item_id = id, status = updated.status.as_str(), "lost & found item updated");
    Ok(updated)
}

pub fn claim(repos: &Repos, id: i64, input: ClaimInput) -> Result<LostFoundItem> {
    const MSG: &str = "Name and Contact are required to claim.";
    let name = required(&input.name, MSG)?;
    let contact = required(&input.contact, MSG)?;
    let claim = Claim {
        name,
        class: input.class.trim().to_string(),
        contact,
        note: input.note.trim().to_string(),
        date: now_rfc3339(),
    };
    transition(repos, id, LostFoundStatus::Unclaimed, |item| {
        item.status = LostFoundStatus::Claimed;
        item.claim = Some(claim);
    })
}

/// Receiver defaults to the claimant, then `Unknown`.
pub fn mark_returned(repos: &Repos, id: i64, receiver: Option<&str>) -> Result<LostFoundItem> {
    let receiver = receiver.map(str::trim).filter(|r| !r.is_empty());
    transition(repos, id, LostFoundStatus::Claimed, |item| {
        let to = receiver
            .map(str::to_string)
            .or_else(|| {
                item.claim
                    .as_ref()
                    .map(|c| c.name.clone())
                    .filter(|n| !n.is_empty())
            })
            .unwrap_or_else(|| "Unknown".to_string());
        item.status = LostFoundStatus::Returned;
        item.returned_at = Some(now_rfc3339());
        item.returned_to = Some(to);
    })
}

pub fn delete(repos: &Repos, id: i64) -> Result<()> {
    let mut items = repos.read_lost_found();
    let before = items.len();
    items.retain(|i| i.id != id);
    if items.len() == before {
        return Err(not_found("item", id));
    }
    repos.write_lost_found(&items)?;
    Ok(())
}
