use serde_json::json;

use crate::features::feedback::{self, FeedbackFilter, FeedbackInput};
use crate::ipc::error::HandlerResult;
use crate::ipc::params;
use crate::ipc::types::{AppState, Request};

fn handle_feedback_list(state: &mut AppState, req: &Request) -> HandlerResult {
    let Some(repos) = state.repos() else {
        return Ok(json!({ "feedback": [] }));
    };
    let filter = FeedbackFilter {
        status: params::opt_str(req, "status"),
        category: params::opt_str(req, "category"),
        query: params::opt_str(req, "query"),
    };
    Ok(json!({ "feedback": feedback::list(&repos, &filter)? }))
}

fn handle_feedback_create(state: &mut AppState, req: &Request) -> HandlerResult {
    let repos = state.require_repos()?;
    let input: FeedbackInput = params::parse(req)?;
    Ok(json!({ "feedback": feedback::create(&repos, input)? }))
}

fn handle_feedback_reply(state: &mut AppState, req: &Request) -> HandlerResult {
    let repos = state.require_repos()?;
    let id = params::i64(req, "id")?;
    let text = params::opt_str(req, "text").unwrap_or_default();
    let by = params::opt_str(req, "by");
    Ok(json!({
        "feedback": feedback::reply(&repos, id, &text, by.as_deref())?
    }))
}

fn handle_feedback_set_status(state: &mut AppState, req: &Request) -> HandlerResult {
    let repos = state.require_repos()?;
    let id = params::i64(req, "id")?;
    let status = params::str(req, "status")?;
    Ok(json!({ "feedback": feedback::set_status(&repos, id, &status)? }))
}

fn handle_feedback_delete(state: &mut AppState, req: &Request) -> HandlerResult {
    let repos = state.require_repos()?;
    let id = params::i64(req, "id")?;
    feedback::delete(&repos, id)?;
    Ok(json!({ "ok": true }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<HandlerResult> {
    match req.method.as_str() {
        "feedback.list" => Some(handle_feedback_list(state, req)),
        "feedback.create" => Some(handle_feedback_create(state, req)),
        "feedback.reply" => Some(handle_feedback_reply(state, req)),
        "feedback.setStatus" => Some(handle_feedback_set_status(state, req)),
        "feedback.delete" => Some(handle_feedback_delete(state, req)),
        _ => None,
    }
}
