use serde_json::json;

use crate::ipc::error::HandlerResult;
use crate::ipc::params;
use crate::ipc::types::{AppState, Request};
use crate::transport::{self, AssignInput, DriverInput, RouteInput, StopInput};

fn handle_list_drivers(state: &mut AppState, _req: &Request) -> HandlerResult {
    let Some(repos) = state.repos() else {
        return Ok(json!({ "drivers": [] }));
    };
    Ok(json!({ "drivers": transport::list_drivers(&repos) }))
}

fn handle_add_driver(state: &mut AppState, req: &Request) -> HandlerResult {
    let repos = state.require_repos()?;
    let input: DriverInput = params::parse(req)?;
    Ok(json!({ "driver": transport::add_driver(&repos, input)? }))
}

fn handle_update_driver(state: &mut AppState, req: &Request) -> HandlerResult {
    let repos = state.require_repos()?;
    let id = params::i64(req, "id")?;
    let input: DriverInput = params::parse(req)?;
    Ok(json!({ "driver": transport::update_driver(&repos, id, input)? }))
}

fn handle_delete_driver(state: &mut AppState, req: &Request) -> HandlerResult {
    let repos = state.require_repos()?;
    let id = params::i64(req, "id")?;
    transport::delete_driver(&repos, id)?;
    Ok(json!({ "ok": true }))
}

fn handle_list_routes(state: &mut AppState, _req: &Request) -> HandlerResult {
    let Some(repos) = state.repos() else {
        return Ok(json!({ "routes": [] }));
    };
    Ok(json!({ "routes": transport::list_routes(&repos) }))
}

fn handle_create_route(state: &mut AppState, req: &Request) -> HandlerResult {
    let repos = state.require_repos()?;
    let input: RouteInput = params::parse(req)?;
    Ok(json!({ "route": transport::create_route(&repos, input)? }))
}

fn handle_update_route(state: &mut AppState, req: &Request) -> HandlerResult {
    let repos = state.require_repos()?;
    let id = params::i64(req, "id")?;
    let input: RouteInput = params::parse(req)?;
    Ok(json!({ "route": transport::update_route(&repos, id, input)? }))
}

fn handle_add_stop(state: &mut AppState, req: &Request) -> HandlerResult {
    let repos = state.require_repos()?;
    let route_id = params::i64(req, "routeId")?;
    let input: StopInput = params::parse(req)?;
    Ok(json!({ "stop": transport::add_stop(&repos, route_id, input)? }))
}

fn handle_remove_stop(state: &mut AppState, req: &Request) -> HandlerResult {
    let repos = state.require_repos()?;
    let route_id = params::i64(req, "routeId")?;
    let stop_id = params::i64(req, "stopId")?;
    Ok(json!(transport::remove_stop(&repos, route_id, stop_id)?))
}

fn handle_delete_route(state: &mut AppState, req: &Request) -> HandlerResult {
    let repos = state.require_repos()?;
    let id = params::i64(req, "id")?;
    transport::delete_route(&repos, id)?;
    Ok(json!({ "ok": true }))
}

fn handle_list_mappings(state: &mut AppState, _req: &Request) -> HandlerResult {
    let Some(repos) = state.repos() else {
        return Ok(json!({ "mappings": [] }));
    };
    Ok(json!({ "mappings": transport::list_mappings(&repos) }))
}

fn handle_assign(state: &mut AppState, req: &Request) -> HandlerResult {
    let repos = state.require_repos()?;
    let input: AssignInput = params::parse(req)?;
    Ok(json!({ "mapping": transport::assign(&repos, input)? }))
}

fn handle_remove_mapping(state: &mut AppState, req: &Request) -> HandlerResult {
    let repos = state.require_repos()?;
    let student_id = params::str(req, "studentId")?;
    let removed = transport::remove_mapping(&repos, &student_id)?;
    Ok(json!({ "removed": removed }))
}

fn handle_student_view(state: &mut AppState, req: &Request) -> HandlerResult {
    let student_id = params::str(req, "studentId")?;
    let Some(repos) = state.repos() else {
        return Ok(json!({ "view": null }));
    };
    Ok(json!({ "view": transport::student_view(&repos, &student_id) }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<HandlerResult> {
    match req.method.as_str() {
        "transport.listDrivers" => Some(handle_list_drivers(state, req)),
        "transport.addDriver" => Some(handle_add_driver(state, req)),
        "transport.updateDriver" => Some(handle_update_driver(state, req)),
        "transport.deleteDriver" => Some(handle_delete_driver(state, req)),
        "transport.listRoutes" => Some(handle_list_routes(state, req)),
        "transport.createRoute" => Some(handle_create_route(state, req)),
        "transport.updateRoute" => Some(handle_update_route(state, req)),
        "transport.addStopToRoute" => Some(handle_add_stop(state, req)),
        "transport.removeStopFromRoute" => Some(handle_remove_stop(state, req)),
        "transport.deleteRoute" => Some(handle_delete_route(state, req)),
        "transport.listMappings" => Some(handle_list_mappings(state, req)),
        "transport.assignStudentToRoute" => Some(handle_assign(state, req)),
        "transport.removeMapping" => Some(handle_remove_mapping(state, req)),
        "transport.studentView" => Some(handle_student_view(state, req)),
        _ => None,
    }
}
