use serde_json::json;

use crate::features::queries::{self, QueryInput};
use crate::ipc::error::HandlerResult;
use crate::ipc::params;
use crate::ipc::types::{AppState, Request};

fn handle_queries_list(state: &mut AppState, req: &Request) -> HandlerResult {
    let Some(repos) = state.repos() else {
        return Ok(json!({ "queries": [] }));
    };
    let status = params::opt_str(req, "status");
    let raised_by = params::opt_str(req, "raisedBy");
    Ok(json!({
        "queries": queries::list(&repos, status.as_deref(), raised_by.as_deref())?
    }))
}

fn handle_queries_create(state: &mut AppState, req: &Request) -> HandlerResult {
    let repos = state.require_repos()?;
    let input: QueryInput = params::parse(req)?;
    Ok(json!({ "query": queries::create(&repos, input)? }))
}

fn handle_queries_reply(state: &mut AppState, req: &Request) -> HandlerResult {
    let repos = state.require_repos()?;
    let id = params::i64(req, "id")?;
    let role = params::opt_str(req, "role").unwrap_or_default();
    let text = params::opt_str(req, "text").unwrap_or_default();
    Ok(json!({ "query": queries::reply(&repos, id, &role, &text)? }))
}

fn handle_queries_set_status(state: &mut AppState, req: &Request) -> HandlerResult {
    let repos = state.require_repos()?;
    let id = params::i64(req, "id")?;
    let status = params::str(req, "status")?;
    Ok(json!({ "query": queries::set_status(&repos, id, &status)? }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<HandlerResult> {
    match req.method.as_str() {
        "queries.list" => Some(handle_queries_list(state, req)),
        "queries.create" => Some(handle_queries_create(state, req)),
        "queries.reply" => Some(handle_queries_reply(state, req)),
        "queries.setStatus" => Some(handle_queries_set_status(state, req)),
        _ => None,
    }
}
