use pretty_assertions::assert_eq;
use serde_json::json;

mod test_support;
use test_support::{request_err, request_ok, spawn_sidecar, temp_dir};

#[test]
fn lost_found_items_move_forward_only() {
    let workspace = temp_dir("schoold-lost-found");
    let (mut child, mut stdin, mut reader) = spawn_sidecar();
    request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );

    let missing = request_err(
        &mut stdin,
        &mut reader,
        "2",
        "lostFound.create",
        json!({ "title": "Water bottle", "dateFound": "2024-06-03" }),
    );
    assert_eq!(missing["code"], json!("bad_params"));
    assert_eq!(
        missing["message"],
        json!("Title, Date Found, and Location are required.")
    );

    let created = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "lostFound.create",
        json!({
            "title": "Water bottle",
            "description": "Blue, steel",
            "dateFound": "2024-06-03",
            "location": "Playground",
            "foundBy": "Peon"
        }),
    );
    let id = created["item"]["id"].as_i64().expect("item id");
    assert_eq!(created["item"]["status"], json!("unclaimed"));

    let early = request_err(
        &mut stdin,
        &mut reader,
        "4",
        "lostFound.markReturned",
        json!({ "id": id }),
    );
    assert_eq!(early["code"], json!("invalid_state"));

    let no_contact = request_err(
        &mut stdin,
        &mut reader,
        "5",
        "lostFound.claim",
        json!({ "id": id, "name": "Aarav" }),
    );
    assert_eq!(no_contact["code"], json!("bad_params"));

    let claimed = request_ok(
        &mut stdin,
        &mut reader,
        "6",
        "lostFound.claim",
        json!({ "id": id, "name": "Aarav", "class": "1A", "contact": "98200 22222" }),
    );
    assert_eq!(claimed["item"]["status"], json!("claimed"));
    assert_eq!(claimed["item"]["claim"]["name"], json!("Aarav"));

    let again = request_err(
        &mut stdin,
        &mut reader,
        "7",
        "lostFound.claim",
        json!({ "id": id, "name": "Other", "contact": "1" }),
    );
    assert_eq!(again["code"], json!("invalid_state"));

    let returned = request_ok(
        &mut stdin,
        &mut reader,
        "8",
        "lostFound.markReturned",
        json!({ "id": id }),
    );
    assert_eq!(returned["item"]["status"], json!("returned"));
    assert_eq!(returned["item"]["returnedTo"], json!("Aarav"));

    let filtered = request_ok(
        &mut stdin,
        &mut reader,
        "9",
        "lostFound.list",
        json!({ "status": "returned", "query": "playground" }),
    );
    assert_eq!(filtered["items"].as_array().map(Vec::len), Some(1));
    let none = request_ok(
        &mut stdin,
        &mut reader,
        "10",
        "lostFound.list",
        json!({ "status": "unclaimed" }),
    );
    assert_eq!(none["items"], json!([]));

    request_ok(&mut stdin, &mut reader, "11", "lostFound.delete", json!({ "id": id }));
    let gone = request_err(
        &mut stdin,
        &mut reader,
        "12",
        "lostFound.delete",
        json!({ "id": id }),
    );
    assert_eq!(gone["code"], json!("not_found"));

    drop(stdin);
    let _ = child.wait();
}
