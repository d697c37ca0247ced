use anyhow::{anyhow, Context};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{json, Map, Value};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::{info, warn};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::store::KvStore;

const MANIFEST_ENTRY: &str = "manifest.json";
const DATA_ENTRY: &str = "data/kv.json";
pub const BUNDLE_FORMAT: &str = "schoold-kv-v1";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSummary {
    pub bundle_format: String,
    pub entry_count: usize,
    pub sha256: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub bundle_format_detected: String,
    pub entry_count: usize,
}

fn sha256_hex(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// Writes every stored key into a zip bundle. Values that are not valid JSON are
/// carried as JSON strings.
pub fn export_workspace_bundle(store: &KvStore, out_path: &Path) -> anyhow::Result<ExportSummary> {
    let mut data = Map::new();
    for (key, raw) in store.entries().context("failed to read key-value store")? {
        let value = serde_json::from_str(&raw).unwrap_or_else(|_| {
            warn!(key = %key, "exporting non-JSON value as a string");
            Value::String(raw)
        });
        data.insert(key, value);
    }
    let entry_count = data.len();
    let data_bytes =
        serde_json::to_vec_pretty(&Value::Object(data)).context("failed to serialize data")?;
    let digest = sha256_hex(&data_bytes);

    if let Some(parent) = out_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.to_string_lossy()))?;
    }
    let out_file = File::create(out_path).with_context(|| {
        format!(
            "failed to create output file {}",
            out_path.to_string_lossy()
        )
    })?;
    let mut zip = ZipWriter::new(out_file);
    let opts = FileOptions::default().compression_method(CompressionMethod::Deflated);

    let manifest = json!({
        "format": BUNDLE_FORMAT,
        "appVersion": env!("CARGO_PKG_VERSION"),
        "exportedAt": Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        "entryCount": entry_count,
        "sha256": digest,
    });
    zip.start_file(MANIFEST_ENTRY, opts)
        .context("failed to start manifest entry")?;
    zip.write_all(
        serde_json::to_string_pretty(&manifest)
            .context("failed to serialize manifest")?
            .as_bytes(),
    )
    .context("failed to write manifest entry")?;

    zip.start_file(DATA_ENTRY, opts)
        .context("failed to start data entry")?;
    zip.write_all(&data_bytes)
        .context("failed to write data entry")?;

    zip.finish().context("failed to finalize zip bundle")?;

    info!(path = %out_path.display(), entry_count, "workspace exported");
    Ok(ExportSummary {
        bundle_format: BUNDLE_FORMAT.to_string(),
        entry_count,
        sha256: digest,
    })
}

/// Replaces the whole store with the bundle's contents. The bundle is fully read and
/// verified before the store is touched.
pub fn import_workspace_bundle(store: &KvStore, in_path: &Path) -> anyhow::Result<ImportSummary> {
    let in_file = File::open(in_path)
        .with_context(|| format!("failed to open bundle {}", in_path.to_string_lossy()))?;
    let mut archive = ZipArchive::new(in_file).context("invalid zip archive")?;

    let mut manifest_text = String::new();
    archive
        .by_name(MANIFEST_ENTRY)
        .context("bundle missing manifest.json")?
        .read_to_string(&mut manifest_text)
        .context("failed to read manifest.json")?;
    let manifest: Value =
        serde_json::from_str(&manifest_text).context("manifest.json is invalid JSON")?;
    let format = manifest
        .get("format")
        .and_then(|v| v.as_str())
        .unwrap_or("");
    if format != BUNDLE_FORMAT {
        return Err(anyhow!("unsupported bundle format: {}", format));
    }
    let expected = manifest
        .get("sha256")
        .and_then(|v| v.as_str())
        .ok_or_else(|| anyhow!("manifest.json has no sha256"))?;

    let mut data_bytes = Vec::new();
    archive
        .by_name(DATA_ENTRY)
        .context("bundle missing data/kv.json")?
        .read_to_end(&mut data_bytes)
        .context("failed to read data/kv.json")?;
    let actual = sha256_hex(&data_bytes);
    if !actual.eq_ignore_ascii_case(expected) {
        return Err(anyhow!(
            "bundle digest mismatch: manifest {}, data {}",
            expected,
            actual
        ));
    }
    let data: Map<String, Value> =
        serde_json::from_slice(&data_bytes).context("data/kv.json must be a JSON object")?;

    let mut entries = Vec::with_capacity(data.len());
    for (key, value) in &data {
        let raw = serde_json::to_string(value)
            .with_context(|| format!("failed to encode key {key}"))?;
        entries.push((key.clone(), raw));
    }
    store
        .replace_all(&entries)
        .context("failed to restore key-value store")?;

    info!(path = %in_path.display(), entry_count = data.len(), "workspace imported");
    Ok(ImportSummary {
        bundle_format_detected: BUNDLE_FORMAT.to_string(),
        entry_count: data.len(),
    })
}
