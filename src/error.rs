use serde_json::Value;

use crate::store::StoreError;

/// Domain errors that travel to the client as `{code, message, details?}`.
pub trait WireError: std::error::Error {
    fn code(&self) -> &'static str;

    fn details(&self) -> Option<Value> {
        None
    }
}

impl WireError for StoreError {
    fn code(&self) -> &'static str {
        match self {
            StoreError::Corrupt { .. } => "store_corrupt",
            _ => "store_write_failed",
        }
    }

    fn details(&self) -> Option<Value> {
        let key = match self {
            StoreError::Serialize { key, .. }
            | StoreError::Backend { key, .. }
            | StoreError::Corrupt { key, .. } => key,
        };
        Some(serde_json::json!({ "key": key }))
    }
}
