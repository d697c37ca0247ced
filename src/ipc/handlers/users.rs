use serde_json::json;

use crate::features::users::{self, UserInput};
use crate::ipc::error::HandlerResult;
use crate::ipc::params;
use crate::ipc::types::{AppState, Request};

fn handle_users_list(state: &mut AppState, req: &Request) -> HandlerResult {
    let Some(repos) = state.repos() else {
        return Ok(json!({ "users": [] }));
    };
    let role = params::opt_str(req, "role");
    let query = params::opt_str(req, "query");
    Ok(json!({
        "users": users::list_users(&repos, role.as_deref(), query.as_deref())
    }))
}

fn handle_users_create(state: &mut AppState, req: &Request) -> HandlerResult {
    let repos = state.require_repos()?;
    let input: UserInput = params::parse(req)?;
    Ok(json!({ "user": users::create_user(&repos, input)? }))
}

fn handle_users_update(state: &mut AppState, req: &Request) -> HandlerResult {
    let repos = state.require_repos()?;
    let id = params::str(req, "id")?;
    let input: UserInput = params::parse(req)?;
    Ok(json!({ "user": users::update_user(&repos, &id, input)? }))
}

fn handle_users_delete(state: &mut AppState, req: &Request) -> HandlerResult {
    let repos = state.require_repos()?;
    let id = params::str(req, "id")?;
    users::delete_user(&repos, &id)?;
    Ok(json!({ "ok": true }))
}

fn handle_students_list(state: &mut AppState, req: &Request) -> HandlerResult {
    let Some(repos) = state.repos() else {
        return Ok(json!({ "students": [] }));
    };
    let class_id = params::opt_str(req, "classId");
    Ok(json!({ "students": users::list_students(&repos, class_id.as_deref()) }))
}

fn handle_students_create(state: &mut AppState, req: &Request) -> HandlerResult {
    let repos = state.require_repos()?;
    let fields = params::fields(req)?;
    Ok(json!({ "student": users::create_student(&repos, fields)? }))
}

fn handle_students_update(state: &mut AppState, req: &Request) -> HandlerResult {
    let repos = state.require_repos()?;
    let id = params::str(req, "id")?;
    let fields = params::fields(req)?;
    Ok(json!({ "student": users::update_student(&repos, &id, fields)? }))
}

fn handle_students_delete(state: &mut AppState, req: &Request) -> HandlerResult {
    let repos = state.require_repos()?;
    let id = params::str(req, "id")?;
    users::delete_student(&repos, &id)?;
    Ok(json!({ "ok": true }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<HandlerResult> {
    match req.method.as_str() {
        "users.list" => Some(handle_users_list(state, req)),
        "users.create" => Some(handle_users_create(state, req)),
        "users.update" => Some(handle_users_update(state, req)),
        "users.delete" => Some(handle_users_delete(state, req)),
        "students.list" => Some(handle_students_list(state, req)),
        "students.create" => Some(handle_students_create(state, req)),
        "students.update" => Some(handle_students_update(state, req)),
        "students.delete" => Some(handle_students_delete(state, req)),
        _ => None,
    }
}
