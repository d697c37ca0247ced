use serde_json::json;

use crate::features::lost_found::{self, ClaimInput, ItemInput};
use crate::ipc::error::HandlerResult;
use crate::ipc::params;
use crate::ipc::types::{AppState, Request};

fn handle_lost_found_list(state: &mut AppState, req: &Request) -> HandlerResult {
    let Some(repos) = state.repos() else {
        return Ok(json!({ "items": [] }));
    };
    let status = params::opt_str(req, "status");
    let query = params::opt_str(req, "query");
    Ok(json!({
        "items": lost_found::list(&repos, status.as_deref(), query.as_deref())?
    }))
}

fn handle_lost_found_create(state: &mut AppState, req: &Request) -> HandlerResult {
    let repos = state.require_repos()?;
    let input: ItemInput = params::parse(req)?;
    Ok(json!({ "item": lost_found::create(&repos, input)? }))
}

fn handle_lost_found_claim(state: &mut AppState, req: &Request) -> HandlerResult {
    let repos = state.require_repos()?;
    let id = params::i64(req, "id")?;
    let input: ClaimInput = params::parse(req)?;
    Ok(json!({ "item": lost_found::claim(&repos, id, input)? }))
}

fn handle_lost_found_mark_returned(state: &mut AppState, req: &Request) -> HandlerResult {
    let repos = state.require_repos()?;
    let id = params::i64(req, "id")?;
    let receiver = params::opt_str(req, "receiver");
    Ok(json!({
        "item": lost_found::mark_returned(&repos, id, receiver.as_deref())?
    }))
}

fn handle_lost_found_delete(state: &mut AppState, req: &Request) -> HandlerResult {
    let repos = state.require_repos()?;
    let id = params::i64(req, "id")?;
    lost_found::delete(&repos, id)?;
    Ok(json!({ "ok": true }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<HandlerResult> {
    match req.method.as_str() {
        "lostFound.list" => Some(handle_lost_found_list(state, req)),
        "lostFound.create" => Some(handle_lost_found_create(state, req)),
        "lostFound.claim" => Some(handle_lost_found_claim(state, req)),
        "lostFound.markReturned" => Some(handle_lost_found_mark_returned(state, req)),
        "lostFound.delete" => Some(handle_lost_found_delete(state, req)),
        _ => None,
    }
}
