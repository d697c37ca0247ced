use serde_json::json;

use crate::ipc::error::HandlerResult;
use crate::ipc::params;
use crate::ipc::types::{AppState, Request};
use crate::reports::{self, ExamInfo};

fn handle_reports_timetable(state: &mut AppState, req: &Request) -> HandlerResult {
    let repos = state.require_repos()?;
    let class_name = params::str(req, "className")?;
    Ok(json!(reports::timetable(&repos, &class_name)?))
}

fn handle_reports_exam_schedule(state: &mut AppState, req: &Request) -> HandlerResult {
    let repos = state.require_repos()?;
    let class_id = params::str(req, "classId")?;
    Ok(json!(reports::exam_schedule(&repos, &class_id)?))
}

fn handle_reports_report_card(state: &mut AppState, req: &Request) -> HandlerResult {
    let repos = state.require_repos()?;
    let class_name = params::str(req, "className")?;
    let student_id = params::str(req, "studentId")?;
    let exam: Option<ExamInfo> = match req.params.get("exam") {
        Some(v) if !v.is_null() => Some(params::parse_key(req, "exam")?),
        _ => None,
    };
    Ok(json!(reports::report_card(&repos, &class_name, &student_id, exam)?))
}

fn handle_reports_transport_slip(state: &mut AppState, req: &Request) -> HandlerResult {
    let repos = state.require_repos()?;
    let student_id = params::str(req, "studentId")?;
    Ok(json!(reports::transport_slip(&repos, &student_id)?))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<HandlerResult> {
    match req.method.as_str() {
        "reports.timetable" => Some(handle_reports_timetable(state, req)),
        "reports.examSchedule" => Some(handle_reports_exam_schedule(state, req)),
        "reports.reportCard" => Some(handle_reports_report_card(state, req)),
        "reports.transportSlip" => Some(handle_reports_transport_slip(state, req)),
        _ => None,
    }
}
