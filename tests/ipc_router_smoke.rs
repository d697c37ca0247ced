use serde_json::json;

mod test_support;
use test_support::{error_code, request, request_ok, send_line, spawn_sidecar, temp_dir};

#[test]
fn router_dispatch_smoke_covers_handler_families() {
    let workspace = temp_dir("schoold-router-smoke");
    let bundle_out = workspace.join("smoke-backup.zip");

    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let health = request_ok(&mut stdin, &mut reader, "1", "health", json!({}));
    assert!(health.get("workspacePath").map(|v| v.is_null()).unwrap_or(false));
    request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );

    let calls: Vec<(&str, serde_json::Value)> = vec![
        ("shell.nav", json!({ "role": "Owner" })),
        ("roles.list", json!({})),
        ("roles.create", json!({ "name": "Librarian" })),
        ("roles.rename", json!({ "from": "Librarian", "to": "Archivist" })),
        ("roles.delete", json!({ "name": "Archivist" })),
        ("settings.get", json!({})),
        ("settings.brand", json!({})),
        ("settings.update", json!({ "patch": { "schoolName": "Smoke School" } })),
        ("settings.resetColors", json!({})),
        ("users.list", json!({})),
        ("users.create", json!({ "name": "Asha", "role": "Teacher" })),
        ("users.update", json!({ "id": "missing", "name": "X" })),
        ("users.delete", json!({ "id": "missing" })),
        ("students.list", json!({})),
        ("students.create", json!({ "firstName": "Ravi", "class": "1A" })),
        ("students.update", json!({ "id": "missing", "firstName": "X" })),
        ("students.delete", json!({ "id": "missing" })),
        ("classes.list", json!({})),
        ("classes.upsert", json!({ "name": "1", "section": "A" })),
        ("classes.delete", json!({ "id": "missing" })),
        ("teachers.list", json!({})),
        ("teachers.upsert", json!({ "name": "Meera" })),
        ("teachers.delete", json!({ "id": "missing" })),
        ("subjects.list", json!({})),
        ("subjects.upsert", json!({ "name": "Maths" })),
        ("subjects.delete", json!({ "id": "missing" })),
        ("subjects.forClass", json!({ "classId": "missing" })),
        ("subjectMappings.list", json!({})),
        ("subjectMappings.upsert", json!({})),
        ("subjectMappings.delete", json!({ "id": "missing" })),
        ("myTeachers.list", json!({ "classId": "missing" })),
        ("attendance.get", json!({ "date": "2024-06-03", "classId": "1" })),
        ("attendance.save", json!({ "date": "2024-06-03", "classId": "1", "marks": [] })),
        ("homework.list", json!({})),
        ("homework.create", json!({})),
        ("homework.delete", json!({ "id": "missing" })),
        ("exams.list", json!({})),
        ("exams.upsert", json!({})),
        ("exams.delete", json!({ "id": 1 })),
        ("timetable.classes", json!({})),
        ("timetable.get", json!({ "className": "1A" })),
        ("timetable.addPeriod", json!({ "className": "1A", "name": "P1", "time": "09:00" })),
        ("timetable.setCell", json!({ "className": "1A" })),
        ("timetable.clearCell", json!({ "className": "1A", "day": "Mon", "period": "P1" })),
        ("results.list", json!({ "className": "1A" })),
        ("results.get", json!({ "className": "1A", "studentId": "missing" })),
        ("results.upsert", json!({ "className": "1A" })),
        ("calendar.list", json!({})),
        ("calendar.upsert", json!({})),
        ("calendar.delete", json!({ "id": 1 })),
        ("circulars.list", json!({})),
        ("circulars.create", json!({})),
        ("circulars.delete", json!({ "id": 1 })),
        ("lostFound.list", json!({})),
        ("lostFound.create", json!({})),
        ("lostFound.claim", json!({ "id": 1 })),
        ("lostFound.markReturned", json!({ "id": 1 })),
        ("lostFound.delete", json!({ "id": 1 })),
        ("feedback.list", json!({})),
        ("feedback.create", json!({ "subject": "Bus", "message": "Late twice" })),
        ("feedback.reply", json!({ "id": 1, "text": "Noted" })),
        ("feedback.setStatus", json!({ "id": 1, "status": "Resolved" })),
        ("feedback.delete", json!({ "id": 1 })),
        ("queries.list", json!({})),
        ("queries.create", json!({ "title": "Fees", "description": "Due date?" })),
        ("queries.reply", json!({ "id": 1, "role": "Admin", "text": "Friday" })),
        ("queries.setStatus", json!({ "id": 1, "status": "Resolved" })),
        ("birthdays.today", json!({ "className": "1A" })),
        ("birthdays.classes", json!({})),
        ("transport.listDrivers", json!({})),
        ("transport.addDriver", json!({ "name": "Ravi", "phone": "98200 11111" })),
        ("transport.updateDriver", json!({ "id": 1, "name": "Ravi", "phone": "1" })),
        ("transport.deleteDriver", json!({ "id": 1 })),
        ("transport.listRoutes", json!({})),
        ("transport.createRoute", json!({ "name": "Route A" })),
        ("transport.updateRoute", json!({ "id": 1, "name": "Route B" })),
        ("transport.addStopToRoute", json!({ "routeId": 1, "name": "Gate" })),
        ("transport.removeStopFromRoute", json!({ "routeId": 1, "stopId": 1 })),
        ("transport.deleteRoute", json!({ "id": 1 })),
        ("transport.listMappings", json!({})),
        ("transport.assignStudentToRoute", json!({ "studentId": "s1", "routeId": 1 })),
        ("transport.removeMapping", json!({ "studentId": "s1" })),
        ("transport.studentView", json!({ "studentId": "s1" })),
        ("reports.timetable", json!({ "className": "1A" })),
        ("reports.examSchedule", json!({ "classId": "1" })),
        ("reports.reportCard", json!({ "className": "1A", "studentId": "missing" })),
        ("reports.transportSlip", json!({ "studentId": "missing" })),
        ("storage.keys", json!({})),
        ("backup.exportWorkspace", json!({ "outPath": bundle_out.to_string_lossy() })),
        ("backup.importWorkspace", json!({ "inPath": bundle_out.to_string_lossy() })),
        ("storage.remove", json!({ "key": "feedback_items" })),
    ];

    for (i, (method, params)) in calls.into_iter().enumerate() {
        let id = format!("s{}", i);
        let resp = request(&mut stdin, &mut reader, &id, method, params);
        if resp.get("ok").and_then(|v| v.as_bool()) == Some(false) {
            // Missing records are fine here; the router reached the handler.
            assert_ne!(error_code(&resp), "no_workspace", "{} lost the workspace", method);
        }
    }

    let unknown = send_line(
        &mut stdin,
        &mut reader,
        r#"{"id":"u1","method":"grid.get","params":{}}"#,
    );
    assert_eq!(unknown["id"], json!("u1"));
    assert_eq!(unknown["ok"], json!(false));
    assert_eq!(error_code(&unknown), "not_implemented");

    drop(stdin);
    let _ = child.wait();
}
