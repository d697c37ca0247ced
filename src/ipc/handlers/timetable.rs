use serde_json::json;

use crate::features::timetable::{self, CellInput};
use crate::ipc::error::HandlerResult;
use crate::ipc::params;
use crate::ipc::types::{AppState, Request};

fn handle_timetable_classes(state: &mut AppState, _req: &Request) -> HandlerResult {
    let Some(repos) = state.repos() else {
        return Ok(json!({ "classes": [] }));
    };
    Ok(json!({ "classes": timetable::list_classes(&repos) }))
}

fn handle_timetable_get(state: &mut AppState, req: &Request) -> HandlerResult {
    let class_name = params::str(req, "className")?;
    let Some(repos) = state.repos() else {
        return Ok(json!({ "timetable": null }));
    };
    Ok(json!({ "timetable": timetable::get(&repos, &class_name) }))
}

fn handle_timetable_add_period(state: &mut AppState, req: &Request) -> HandlerResult {
    let repos = state.require_repos()?;
    let class_name = params::opt_str(req, "className").unwrap_or_default();
    let name = params::opt_str(req, "name").unwrap_or_default();
    let time = params::opt_str(req, "time").unwrap_or_default();
    Ok(json!({
        "timetable": timetable::add_period(&repos, &class_name, &name, &time)?
    }))
}

fn handle_timetable_set_cell(state: &mut AppState, req: &Request) -> HandlerResult {
    let repos = state.require_repos()?;
    let input: CellInput = params::parse(req)?;
    Ok(json!({ "timetable": timetable::set_cell(&repos, input)? }))
}

fn handle_timetable_clear_cell(state: &mut AppState, req: &Request) -> HandlerResult {
    let repos = state.require_repos()?;
    let class_name = params::str(req, "className")?;
    let day = params::str(req, "day")?;
    let period = params::str(req, "period")?;
    let cleared = timetable::clear_cell(&repos, &class_name, &day, &period)?;
    Ok(json!({ "cleared": cleared }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<HandlerResult> {
    match req.method.as_str() {
        "timetable.classes" => Some(handle_timetable_classes(state, req)),
        "timetable.get" => Some(handle_timetable_get(state, req)),
        "timetable.addPeriod" => Some(handle_timetable_add_period(state, req)),
        "timetable.setCell" => Some(handle_timetable_set_cell(state, req)),
        "timetable.clearCell" => Some(handle_timetable_clear_cell(state, req)),
        _ => None,
    }
}
