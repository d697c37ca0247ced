use serde_json::json;

use crate::features::attendance::{self, MarkInput};
use crate::ipc::error::HandlerResult;
use crate::ipc::params;
use crate::ipc::types::{AppState, Request};

fn handle_attendance_get(state: &mut AppState, req: &Request) -> HandlerResult {
    let date = params::str(req, "date")?;
    let class_id = params::str(req, "classId")?;
    let Some(repos) = state.repos() else {
        return Ok(json!({
            "date": date,
            "classId": class_id,
            "rows": [],
            "summary": { "present": 0, "absent": 0, "total": 0 }
        }));
    };
    Ok(json!(attendance::get_sheet(&repos, &date, &class_id)?))
}

fn handle_attendance_save(state: &mut AppState, req: &Request) -> HandlerResult {
    let repos = state.require_repos()?;
    let date = params::str(req, "date")?;
    let class_id = params::str(req, "classId")?;
    let marks: Vec<MarkInput> = params::parse_key(req, "marks")?;
    Ok(json!({ "summary": attendance::save(&repos, &date, &class_id, marks)? }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<HandlerResult> {
    match req.method.as_str() {
        "attendance.get" => Some(handle_attendance_get(state, req)),
        "attendance.save" => Some(handle_attendance_save(state, req)),
        _ => None,
    }
}
