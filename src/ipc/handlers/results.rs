use serde_json::json;

use crate::features::results::{self, ResultInput};
use crate::ipc::error::HandlerResult;
use crate::ipc::params;
use crate::ipc::types::{AppState, Request};

fn handle_results_list(state: &mut AppState, req: &Request) -> HandlerResult {
    let class_name = params::str(req, "className")?;
    let Some(repos) = state.repos() else {
        return Ok(json!({ "results": [] }));
    };
    Ok(json!({ "results": results::list(&repos, &class_name) }))
}

fn handle_results_get(state: &mut AppState, req: &Request) -> HandlerResult {
    let class_name = params::str(req, "className")?;
    let student_id = params::str(req, "studentId")?;
    let Some(repos) = state.repos() else {
        return Ok(json!({ "result": null }));
    };
    Ok(json!({ "result": results::find(&repos, &class_name, &student_id) }))
}

fn handle_results_upsert(state: &mut AppState, req: &Request) -> HandlerResult {
    let repos = state.require_repos()?;
    let class_name = params::opt_str(req, "className").unwrap_or_default();
    let input: ResultInput = params::parse(req)?;
    Ok(json!({ "result": results::upsert(&repos, &class_name, input)? }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<HandlerResult> {
    match req.method.as_str() {
        "results.list" => Some(handle_results_list(state, req)),
        "results.get" => Some(handle_results_get(state, req)),
        "results.upsert" => Some(handle_results_upsert(state, req)),
        _ => None,
    }
}
