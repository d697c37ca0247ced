use serde_json::json;
use std::path::PathBuf;

use crate::backup;
use crate::ipc::error::{HandlerErr, HandlerResult};
use crate::ipc::params;
use crate::ipc::types::{AppState, Request};

fn io_failed(e: anyhow::Error, path: &str) -> HandlerErr {
    HandlerErr::new("io_failed", format!("{e:#}"), Some(json!({ "path": path })))
}

fn handle_backup_export(state: &mut AppState, req: &Request) -> HandlerResult {
    let out_path = params::str(req, "outPath")?;
    let Some(store) = state.store.as_ref() else {
        return Err(HandlerErr::no_workspace());
    };
    let summary = backup::export_workspace_bundle(store, &PathBuf::from(&out_path))
        .map_err(|e| io_failed(e, &out_path))?;
    Ok(json!({
        "ok": true,
        "path": out_path,
        "bundleFormat": summary.bundle_format,
        "entryCount": summary.entry_count,
        "sha256": summary.sha256,
    }))
}

fn handle_backup_import(state: &mut AppState, req: &Request) -> HandlerResult {
    let in_path = params::str(req, "inPath")?;
    let Some(store) = state.store.as_ref() else {
        return Err(HandlerErr::no_workspace());
    };
    let summary = backup::import_workspace_bundle(store, &PathBuf::from(&in_path))
        .map_err(|e| io_failed(e, &in_path))?;
    Ok(json!({
        "ok": true,
        "bundleFormatDetected": summary.bundle_format_detected,
        "entryCount": summary.entry_count,
    }))
}

fn handle_storage_keys(state: &mut AppState, _req: &Request) -> HandlerResult {
    let Some(store) = state.store.as_ref() else {
        return Ok(json!({ "keys": [] }));
    };
    Ok(json!({ "keys": store.keys()? }))
}

fn handle_storage_remove(state: &mut AppState, req: &Request) -> HandlerResult {
    let key = params::str(req, "key")?;
    let Some(store) = state.store.as_ref() else {
        return Err(HandlerErr::no_workspace());
    };
    store.remove(&key)?;
    Ok(json!({ "ok": true }))
}

fn handle_storage_clear(state: &mut AppState, _req: &Request) -> HandlerResult {
    let Some(store) = state.store.as_ref() else {
        return Err(HandlerErr::no_workspace());
    };
    store.clear()?;
    Ok(json!({ "ok": true }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<HandlerResult> {
    match req.method.as_str() {
        "backup.exportWorkspace" => Some(handle_backup_export(state, req)),
        "backup.importWorkspace" => Some(handle_backup_import(state, req)),
        "storage.keys" => Some(handle_storage_keys(state, req)),
        "storage.remove" => Some(handle_storage_remove(state, req)),
        "storage.clear" => Some(handle_storage_clear(state, req)),
        _ => None,
    }
}
