use serde_json::json;

use crate::features::users;
use crate::ipc::error::HandlerResult;
use crate::ipc::params;
use crate::ipc::types::{AppState, Request};
use crate::repo::default_roles;
use crate::shell;

fn handle_shell_nav(_state: &mut AppState, req: &Request) -> HandlerResult {
    let role = params::str(req, "role")?;
    Ok(json!(shell::nav(&role)))
}

fn handle_roles_list(state: &mut AppState, _req: &Request) -> HandlerResult {
    let Some(repos) = state.repos() else {
        let roles: Vec<_> = default_roles()
            .into_iter()
            .map(|name| json!({ "name": name, "userCount": 0 }))
            .collect();
        return Ok(json!({ "roles": roles }));
    };
    Ok(json!({ "roles": users::list_roles(&repos) }))
}

fn handle_roles_create(state: &mut AppState, req: &Request) -> HandlerResult {
    let repos = state.require_repos()?;
    let name = params::opt_str(req, "name").unwrap_or_default();
    Ok(json!({ "roles": users::create_role(&repos, &name)? }))
}

fn handle_roles_rename(state: &mut AppState, req: &Request) -> HandlerResult {
    let repos = state.require_repos()?;
    let from = params::str(req, "from")?;
    let to = params::opt_str(req, "to").unwrap_or_default();
    Ok(json!({ "roles": users::rename_role(&repos, &from, &to)? }))
}

fn handle_roles_delete(state: &mut AppState, req: &Request) -> HandlerResult {
    let repos = state.require_repos()?;
    let name = params::str(req, "name")?;
    Ok(json!({ "roles": users::delete_role(&repos, &name)? }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<HandlerResult> {
    match req.method.as_str() {
        "shell.nav" => Some(handle_shell_nav(state, req)),
        "roles.list" => Some(handle_roles_list(state, req)),
        "roles.create" => Some(handle_roles_create(state, req)),
        "roles.rename" => Some(handle_roles_rename(state, req)),
        "roles.delete" => Some(handle_roles_delete(state, req)),
        _ => None,
    }
}
