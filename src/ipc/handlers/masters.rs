use serde_json::json;

use crate::features::masters::{self, ClassInput, MappingInput};
use crate::ids::RecordId;
use crate::ipc::error::HandlerResult;
use crate::ipc::params;
use crate::ipc::types::{AppState, Request};

fn handle_classes_list(state: &mut AppState, req: &Request) -> HandlerResult {
    let Some(repos) = state.repos() else {
        return Ok(json!({ "classes": [] }));
    };
    let filter = params::opt_str(req, "filter");
    Ok(json!({ "classes": masters::list_classes(&repos, filter.as_deref()) }))
}

fn handle_classes_upsert(state: &mut AppState, req: &Request) -> HandlerResult {
    let repos = state.require_repos()?;
    let input: ClassInput = params::parse(req)?;
    Ok(json!({ "class": masters::upsert_class(&repos, input)? }))
}

fn handle_classes_delete(state: &mut AppState, req: &Request) -> HandlerResult {
    let repos = state.require_repos()?;
    let id = params::str(req, "id")?;
    masters::delete_class(&repos, &id)?;
    Ok(json!({ "ok": true }))
}

fn handle_teachers_list(state: &mut AppState, req: &Request) -> HandlerResult {
    let Some(repos) = state.repos() else {
        return Ok(json!({ "teachers": [] }));
    };
    let filter = params::opt_str(req, "filter");
    Ok(json!({ "teachers": masters::list_teachers(&repos, filter.as_deref()) }))
}

fn handle_teachers_upsert(state: &mut AppState, req: &Request) -> HandlerResult {
    let repos = state.require_repos()?;
    let fields = params::fields(req)?;
    Ok(json!({ "teacher": masters::upsert_teacher(&repos, fields)? }))
}

fn handle_teachers_delete(state: &mut AppState, req: &Request) -> HandlerResult {
    let repos = state.require_repos()?;
    let id = params::str(req, "id")?;
    masters::delete_teacher(&repos, &id)?;
    Ok(json!({ "ok": true }))
}

fn handle_subjects_list(state: &mut AppState, _req: &Request) -> HandlerResult {
    let Some(repos) = state.repos() else {
        return Ok(json!({ "subjects": [] }));
    };
    Ok(json!({ "subjects": masters::list_subjects(&repos) }))
}

fn handle_subjects_upsert(state: &mut AppState, req: &Request) -> HandlerResult {
    let repos = state.require_repos()?;
    let id = req.params.get("id").and_then(RecordId::from_value);
    let name = params::opt_str(req, "name").unwrap_or_default();
    Ok(json!({ "subject": masters::upsert_subject(&repos, id, &name)? }))
}

fn handle_subjects_delete(state: &mut AppState, req: &Request) -> HandlerResult {
    let repos = state.require_repos()?;
    let id = params::str(req, "id")?;
    let removed = masters::delete_subject(&repos, &id, params::bool(req, "force"))?;
    Ok(json!({ "ok": true, "removedMappings": removed }))
}

fn handle_subjects_for_class(state: &mut AppState, req: &Request) -> HandlerResult {
    let Some(repos) = state.repos() else {
        return Ok(json!({ "subjects": [] }));
    };
    let class_id = params::str(req, "classId")?;
    Ok(json!({ "subjects": masters::subjects_for_class(&repos, &class_id) }))
}

fn handle_mappings_list(state: &mut AppState, req: &Request) -> HandlerResult {
    let Some(repos) = state.repos() else {
        return Ok(json!({ "mappings": [] }));
    };
    let class_id = params::opt_str(req, "classId");
    Ok(json!({ "mappings": masters::list_mappings(&repos, class_id.as_deref()) }))
}

fn handle_mappings_upsert(state: &mut AppState, req: &Request) -> HandlerResult {
    let repos = state.require_repos()?;
    let input: MappingInput = params::parse(req)?;
    Ok(json!({ "mapping": masters::upsert_mapping(&repos, input)? }))
}

fn handle_mappings_delete(state: &mut AppState, req: &Request) -> HandlerResult {
    let repos = state.require_repos()?;
    let id = params::str(req, "id")?;
    masters::delete_mapping(&repos, &id)?;
    Ok(json!({ "ok": true }))
}

fn handle_my_teachers_list(state: &mut AppState, req: &Request) -> HandlerResult {
    let Some(repos) = state.repos() else {
        return Ok(json!({ "teachers": [] }));
    };
    let class_id = params::str(req, "classId")?;
    Ok(json!({ "teachers": masters::my_teachers(&repos, &class_id) }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<HandlerResult> {
    match req.method.as_str() {
        "classes.list" => Some(handle_classes_list(state, req)),
        "classes.upsert" => Some(handle_classes_upsert(state, req)),
        "classes.delete" => Some(handle_classes_delete(state, req)),
        "teachers.list" => Some(handle_teachers_list(state, req)),
        "teachers.upsert" => Some(handle_teachers_upsert(state, req)),
        "teachers.delete" => Some(handle_teachers_delete(state, req)),
        "subjects.list" => Some(handle_subjects_list(state, req)),
        "subjects.upsert" => Some(handle_subjects_upsert(state, req)),
        "subjects.delete" => Some(handle_subjects_delete(state, req)),
        "subjects.forClass" => Some(handle_subjects_for_class(state, req)),
        "subjectMappings.list" => Some(handle_mappings_list(state, req)),
        "subjectMappings.upsert" => Some(handle_mappings_upsert(state, req)),
        "subjectMappings.delete" => Some(handle_mappings_delete(state, req)),
        "myTeachers.list" => Some(handle_my_teachers_list(state, req)),
        _ => None,
    }
}
