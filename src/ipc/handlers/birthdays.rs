use serde_json::json;

use crate::features::{birthdays, parse_date};
use crate::ipc::error::HandlerResult;
use crate::ipc::params;
use crate::ipc::types::{AppState, Request};

fn handle_birthdays_today(state: &mut AppState, req: &Request) -> HandlerResult {
    let Some(repos) = state.repos() else {
        return Ok(json!({ "birthdays": [] }));
    };
    let class_name = params::opt_str(req, "className");
    let exclude = params::opt_str(req, "excludeStudentId");
    let on = params::opt_str(req, "date")
        .map(|d| parse_date(&d, "date"))
        .transpose()?;
    Ok(json!({
        "birthdays": birthdays::today_in_class(&repos, class_name.as_deref(), exclude.as_deref(), on)
    }))
}

fn handle_birthdays_classes(state: &mut AppState, _req: &Request) -> HandlerResult {
    let Some(repos) = state.repos() else {
        return Ok(json!({ "classes": [] }));
    };
    Ok(json!({ "classes": birthdays::classes(&repos) }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<HandlerResult> {
    match req.method.as_str() {
        "birthdays.today" => Some(handle_birthdays_today(state, req)),
        "birthdays.classes" => Some(handle_birthdays_classes(state, req)),
        _ => None,
    }
}
