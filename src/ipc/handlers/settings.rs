use serde_json::json;

use crate::features::settings;
use crate::ipc::error::HandlerResult;
use crate::ipc::params;
use crate::ipc::types::{AppState, Request};
use crate::model::{Brand, Settings};

fn settings_result(s: &Settings) -> serde_json::Value {
    json!({ "settings": s, "brand": Brand::from_settings(s) })
}

fn handle_settings_get(state: &mut AppState, _req: &Request) -> HandlerResult {
    let Some(repos) = state.repos() else {
        return Ok(settings_result(&Settings::default()));
    };
    Ok(settings_result(&settings::get(&repos)))
}

fn handle_settings_brand(state: &mut AppState, _req: &Request) -> HandlerResult {
    let Some(repos) = state.repos() else {
        return Ok(json!({ "brand": Brand::from_settings(&Settings::default()) }));
    };
    Ok(json!({ "brand": settings::brand(&repos) }))
}

fn handle_settings_update(state: &mut AppState, req: &Request) -> HandlerResult {
    let repos = state.require_repos()?;
    let patch = params::object(req, "patch")?;
    Ok(settings_result(&settings::update(&repos, &patch)?))
}

fn handle_settings_reset_colors(state: &mut AppState, _req: &Request) -> HandlerResult {
    let repos = state.require_repos()?;
    Ok(settings_result(&settings::reset_colors(&repos)?))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<HandlerResult> {
    match req.method.as_str() {
        "settings.get" => Some(handle_settings_get(state, req)),
        "settings.brand" => Some(handle_settings_brand(state, req)),
        "settings.update" => Some(handle_settings_update(state, req)),
        "settings.resetColors" => Some(handle_settings_reset_colors(state, req)),
        _ => None,
    }
}
