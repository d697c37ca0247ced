use serde_json::json;

use crate::features::homework::{self, HomeworkInput};
use crate::features::parse_date;
use crate::ipc::error::HandlerResult;
use crate::ipc::params;
use crate::ipc::types::{AppState, Request};

fn handle_homework_list(state: &mut AppState, req: &Request) -> HandlerResult {
    let Some(repos) = state.repos() else {
        return Ok(json!({ "homework": [] }));
    };
    let class_id = params::opt_str(req, "classId");
    let today = params::opt_str(req, "today")
        .map(|d| parse_date(&d, "today"))
        .transpose()?;
    Ok(json!({ "homework": homework::list(&repos, class_id.as_deref(), today) }))
}

fn handle_homework_create(state: &mut AppState, req: &Request) -> HandlerResult {
    let repos = state.require_repos()?;
    let input: HomeworkInput = params::parse(req)?;
    Ok(json!({ "homework": homework::create(&repos, input)? }))
}

fn handle_homework_delete(state: &mut AppState, req: &Request) -> HandlerResult {
    let repos = state.require_repos()?;
    let id = params::str(req, "id")?;
    homework::delete(&repos, &id)?;
    Ok(json!({ "ok": true }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<HandlerResult> {
    match req.method.as_str() {
        "homework.list" => Some(handle_homework_list(state, req)),
        "homework.create" => Some(handle_homework_create(state, req)),
        "homework.delete" => Some(handle_homework_delete(state, req)),
        _ => None,
    }
}
