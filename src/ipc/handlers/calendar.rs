use serde_json::json;

use crate::features::calendar::{self, EventInput};
use crate::ipc::error::HandlerResult;
use crate::ipc::params;
use crate::ipc::types::{AppState, Request};

fn handle_calendar_list(state: &mut AppState, req: &Request) -> HandlerResult {
    let Some(repos) = state.repos() else {
        return Ok(json!({ "events": [] }));
    };
    let from = params::opt_str(req, "from");
    let to = params::opt_str(req, "to");
    Ok(json!({
        "events": calendar::list(&repos, from.as_deref(), to.as_deref())?
    }))
}

fn handle_calendar_upsert(state: &mut AppState, req: &Request) -> HandlerResult {
    let repos = state.require_repos()?;
    let input: EventInput = params::parse(req)?;
    Ok(json!({ "event": calendar::upsert(&repos, input)? }))
}

fn handle_calendar_delete(state: &mut AppState, req: &Request) -> HandlerResult {
    let repos = state.require_repos()?;
    let id = params::i64(req, "id")?;
    calendar::delete(&repos, id)?;
    Ok(json!({ "ok": true }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<HandlerResult> {
    match req.method.as_str() {
        "calendar.list" => Some(handle_calendar_list(state, req)),
        "calendar.upsert" => Some(handle_calendar_upsert(state, req)),
        "calendar.delete" => Some(handle_calendar_delete(state, req)),
        _ => None,
    }
}
