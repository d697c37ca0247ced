use pretty_assertions::assert_eq;
use serde_json::json;
use std::io::Read;

mod test_support;
use test_support::{request_err, request_ok, spawn_sidecar, temp_dir};

#[test]
fn workspace_bundle_moves_data_between_workspaces() {
    let source = temp_dir("schoold-backup-src");
    let target = temp_dir("schoold-backup-dst");
    let bundle_path = source.join("workspace-backup.zip");

    let (mut child, mut stdin, mut reader) = spawn_sidecar();
    request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": source.to_string_lossy() }),
    );
    request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "circulars.create",
        json!({
            "title": "Sports Day",
            "description": "Friday, main ground",
            "file": "data:application/pdf;base64,JVBERi0=",
            "fileName": "sports-day.pdf",
            "date": "2024-06-07"
        }),
    );
    request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "settings.update",
        json!({ "patch": { "schoolName": "Green Valley High" } }),
    );

    let exported = request_ok(
        &mut stdin,
        &mut reader,
        "4",
        "backup.exportWorkspace",
        json!({ "outPath": bundle_path.to_string_lossy() }),
    );
    assert_eq!(exported["bundleFormat"], json!("schoold-kv-v1"));
    let entry_count = exported["entryCount"].as_u64().expect("entryCount");
    assert!(entry_count >= 2);

    let f = std::fs::File::open(&bundle_path).expect("open bundle");
    let mut archive = zip::ZipArchive::new(f).expect("open zip archive");
    let mut manifest = String::new();
    archive
        .by_name("manifest.json")
        .expect("manifest entry")
        .read_to_string(&mut manifest)
        .expect("read manifest");
    let manifest: serde_json::Value = serde_json::from_str(&manifest).expect("manifest json");
    assert_eq!(manifest["format"], json!("schoold-kv-v1"));
    assert_eq!(manifest["sha256"], exported["sha256"]);
    assert!(archive.by_name("data/kv.json").is_ok());

    request_ok(
        &mut stdin,
        &mut reader,
        "5",
        "workspace.select",
        json!({ "path": target.to_string_lossy() }),
    );
    let before = request_ok(&mut stdin, &mut reader, "6", "storage.keys", json!({}));
    assert_eq!(before["keys"], json!([]));

    let imported = request_ok(
        &mut stdin,
        &mut reader,
        "7",
        "backup.importWorkspace",
        json!({ "inPath": bundle_path.to_string_lossy() }),
    );
    assert_eq!(imported["bundleFormatDetected"], json!("schoold-kv-v1"));
    assert_eq!(imported["entryCount"].as_u64(), Some(entry_count));

    let circulars = request_ok(&mut stdin, &mut reader, "8", "circulars.list", json!({}));
    assert_eq!(circulars["circulars"][0]["title"], json!("Sports Day"));
    let brand = request_ok(&mut stdin, &mut reader, "9", "settings.brand", json!({}));
    assert_eq!(brand["brand"]["schoolName"], json!("Green Valley High"));

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn rejected_bundle_leaves_store_untouched() {
    let workspace = temp_dir("schoold-backup-bad");
    let garbage = workspace.join("not-a-bundle.zip");
    std::fs::write(&garbage, b"definitely not a zip").expect("write garbage");

    let (mut child, mut stdin, mut reader) = spawn_sidecar();
    request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );
    request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "settings.update",
        json!({ "patch": { "schoolName": "Keep Me" } }),
    );

    let error = request_err(
        &mut stdin,
        &mut reader,
        "3",
        "backup.importWorkspace",
        json!({ "inPath": garbage.to_string_lossy() }),
    );
    assert_eq!(error["code"], json!("io_failed"));
    assert_eq!(error["details"]["path"], json!(garbage.to_string_lossy()));

    let brand = request_ok(&mut stdin, &mut reader, "4", "settings.brand", json!({}));
    assert_eq!(brand["brand"]["schoolName"], json!("Keep Me"));

    let missing = request_err(
        &mut stdin,
        &mut reader,
        "5",
        "backup.exportWorkspace",
        json!({}),
    );
    assert_eq!(missing["code"], json!("bad_params"));

    drop(stdin);
    let _ = child.wait();
}
