use tracing::debug;

use super::error::{err, ok, HandlerResult};
use super::handlers;
use super::types::{AppState, Request};

type Family = fn(&mut AppState, &Request) -> Option<HandlerResult>;

const FAMILIES: &[Family] = &[
    handlers::core::try_handle,
    handlers::shell::try_handle,
    handlers::settings::try_handle,
    handlers::users::try_handle,
    handlers::masters::try_handle,
    handlers::attendance::try_handle,
    handlers::homework::try_handle,
    handlers::exams::try_handle,
    handlers::timetable::try_handle,
    handlers::results::try_handle,
    handlers::calendar::try_handle,
    handlers::circulars::try_handle,
    handlers::lost_found::try_handle,
    handlers::feedback::try_handle,
    handlers::queries::try_handle,
    handlers::birthdays::try_handle,
    handlers::transport::try_handle,
    handlers::reports::try_handle,
    handlers::backup::try_handle,
];

pub fn handle_request(state: &mut AppState, req: Request) -> serde_json::Value {
    debug!(id = %req.id, method = %req.method, "request");
    for family in FAMILIES {
        if let Some(result) = family(state, &req) {
            return match result {
                Ok(v) => ok(&req.id, v),
                Err(e) => e.response(&req.id, &req.method),
            };
        }
    }

    err(
        &req.id,
        "not_implemented",
        format!("unknown method: {}", req.method),
        None,
    )
}
