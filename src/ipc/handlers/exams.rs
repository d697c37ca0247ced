use serde_json::json;

use crate::features::exams::{self, ExamInput};
use crate::ipc::error::HandlerResult;
use crate::ipc::params;
use crate::ipc::types::{AppState, Request};

fn handle_exams_list(state: &mut AppState, req: &Request) -> HandlerResult {
    let Some(repos) = state.repos() else {
        return Ok(json!({ "exams": [] }));
    };
    let class_id = params::opt_str(req, "classId");
    Ok(json!({ "exams": exams::list(&repos, class_id.as_deref()) }))
}

fn handle_exams_upsert(state: &mut AppState, req: &Request) -> HandlerResult {
    let repos = state.require_repos()?;
    let input: ExamInput = params::parse(req)?;
    Ok(json!({ "exam": exams::upsert(&repos, input)? }))
}

fn handle_exams_delete(state: &mut AppState, req: &Request) -> HandlerResult {
    let repos = state.require_repos()?;
    let id = params::i64(req, "id")?;
    exams::delete(&repos, id)?;
    Ok(json!({ "ok": true }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<HandlerResult> {
    match req.method.as_str() {
        "exams.list" => Some(handle_exams_list(state, req)),
        "exams.upsert" => Some(handle_exams_upsert(state, req)),
        "exams.delete" => Some(handle_exams_delete(state, req)),
        _ => None,
    }
}
