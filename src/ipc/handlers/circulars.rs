use serde_json::json;

use crate::features::circulars::{self, CircularInput};
use crate::ipc::error::HandlerResult;
use crate::ipc::params;
use crate::ipc::types::{AppState, Request};

fn handle_circulars_list(state: &mut AppState, _req: &Request) -> HandlerResult {
    let Some(repos) = state.repos() else {
        return Ok(json!({ "circulars": [] }));
    };
    Ok(json!({ "circulars": circulars::list(&repos) }))
}

fn handle_circulars_create(state: &mut AppState, req: &Request) -> HandlerResult {
    let repos = state.require_repos()?;
    let input: CircularInput = params::parse(req)?;
    Ok(json!({ "circular": circulars::create(&repos, input)? }))
}

fn handle_circulars_delete(state: &mut AppState, req: &Request) -> HandlerResult {
    let repos = state.require_repos()?;
    let id = params::i64(req, "id")?;
    circulars::delete(&repos, id)?;
    Ok(json!({ "ok": true }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<HandlerResult> {
    match req.method.as_str() {
        "circulars.list" => Some(handle_circulars_list(state, req)),
        "circulars.create" => Some(handle_circulars_create(state, req)),
        "circulars.delete" => Some(handle_circulars_delete(state, req)),
        _ => None,
    }
}
