use pretty_assertions::assert_eq;
use serde_json::json;

mod test_support;
use test_support::{request_err, request_ok, spawn_sidecar, temp_dir};

#[test]
fn transport_routes_mappings_and_referential_guards() {
    let workspace = temp_dir("schoold-transport-flow");
    let (mut child, mut stdin, mut reader) = spawn_sidecar();
    request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );

    let student = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "students.create",
        json!({ "firstName": "Aarav", "lastName": "Mehta", "cls": "1A" }),
    );
    let student_id = student["student"]["id"]
        .as_str()
        .expect("student id")
        .to_string();

    let driver = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "transport.addDriver",
        json!({ "name": "Ravi", "phone": "98200 11111", "vehicleNo": "MH-01-1234" }),
    );
    let driver_id = driver["driver"]["id"].as_i64().expect("driver id");

    let route = request_ok(
        &mut stdin,
        &mut reader,
        "4",
        "transport.createRoute",
        json!({
            "name": "Route A",
            "driverId": driver_id,
            "stops": [
                { "name": "Gate", "pickupTime": "07:30", "dropTime": "14:10" },
                { "name": "Market", "pickupTime": "07:40" }
            ]
        }),
    );
    let route_id = route["route"]["id"].as_i64().expect("route id");
    let stop_ids: Vec<i64> = route["route"]["stops"]
        .as_array()
        .expect("stops")
        .iter()
        .map(|s| s["id"].as_i64().expect("stop id"))
        .collect();
    assert_eq!(stop_ids, vec![1, 2]);

    let blank = request_err(
        &mut stdin,
        &mut reader,
        "5",
        "transport.addDriver",
        json!({ "name": "  ", "phone": "1" }),
    );
    assert_eq!(blank["code"], json!("bad_params"));
    assert_eq!(blank["message"], json!("Name & Phone are required"));

    let in_use = request_err(
        &mut stdin,
        &mut reader,
        "6",
        "transport.deleteDriver",
        json!({ "id": driver_id }),
    );
    assert_eq!(in_use["code"], json!("driver_in_use"));
    assert_eq!(in_use["details"]["routeIds"], json!([route_id]));

    request_ok(
        &mut stdin,
        &mut reader,
        "7",
        "transport.assignStudentToRoute",
        json!({
            "studentId": student_id,
            "routeId": route_id,
            "pickupStopId": 2,
            "dropStopId": 1
        }),
    );

    let view = request_ok(
        &mut stdin,
        &mut reader,
        "8",
        "transport.studentView",
        json!({ "studentId": student_id }),
    );
    assert_eq!(view["view"]["studentName"], json!("Aarav Mehta"));
    assert_eq!(view["view"]["className"], json!("1A"));
    assert_eq!(view["view"]["routeName"], json!("Route A"));
    assert_eq!(view["view"]["vehicleNo"], json!("MH-01-1234"));
    assert_eq!(view["view"]["driverName"], json!("Ravi"));
    assert_eq!(view["view"]["pickupStop"], json!("Market"));
    assert_eq!(view["view"]["pickupTime"], json!("07:40"));
    assert_eq!(view["view"]["dropStop"], json!("Gate"));
    assert_eq!(view["view"]["dropTime"], json!("14:10"));

    let routes = request_ok(&mut stdin, &mut reader, "9", "transport.listRoutes", json!({}));
    assert_eq!(routes["routes"][0]["studentCount"], json!(1));
    assert_eq!(routes["routes"][0]["driverName"], json!("Ravi"));

    let route_in_use = request_err(
        &mut stdin,
        &mut reader,
        "10",
        "transport.deleteRoute",
        json!({ "id": route_id }),
    );
    assert_eq!(route_in_use["code"], json!("route_in_use"));
    assert_eq!(route_in_use["details"]["studentIds"], json!([student_id.clone()]));

    let removal = request_ok(
        &mut stdin,
        &mut reader,
        "11",
        "transport.removeStopFromRoute",
        json!({ "routeId": route_id, "stopId": 2 }),
    );
    assert_eq!(removal["removed"], json!(true));
    assert_eq!(removal["danglingStudentIds"], json!([student_id.clone()]));

    let mappings = request_ok(&mut stdin, &mut reader, "12", "transport.listMappings", json!({}));
    assert_eq!(mappings["mappings"][0]["pickupStop"], json!("—"));
    assert_eq!(mappings["mappings"][0]["dropStop"], json!("Gate"));

    let removed = request_ok(
        &mut stdin,
        &mut reader,
        "13",
        "transport.removeMapping",
        json!({ "studentId": student_id }),
    );
    assert_eq!(removed["removed"], json!(true));

    request_ok(
        &mut stdin,
        &mut reader,
        "14",
        "transport.deleteRoute",
        json!({ "id": route_id }),
    );
    request_ok(
        &mut stdin,
        &mut reader,
        "15",
        "transport.deleteDriver",
        json!({ "id": driver_id }),
    );
    let view = request_ok(
        &mut stdin,
        &mut reader,
        "16",
        "transport.studentView",
        json!({ "studentId": student_id }),
    );
    assert!(view["view"].is_null());

    drop(stdin);
    let _ = child.wait();
}
