use serde_json::{json, Value};
use tracing::{debug, error};

use crate::error::WireError;

pub fn ok(id: &str, result: Value) -> Value {
    json!({
        "id": id,
        "ok": true,
        "result": result
    })
}

pub fn err(id: &str, code: &str, message: impl Into<String>, details: Option<Value>) -> Value {
    let mut error = json!({
        "code": code,
        "message": message.into(),
    });
    if let Some(d) = details {
        error["details"] = d;
    }
    json!({
        "id": id,
        "ok": false,
        "error": error,
    })
}

/// A failed request, before it is wrapped in the response envelope.
#[derive(Debug)]
pub struct HandlerErr {
    pub code: &'static str,
    pub message: String,
    pub details: Option<Value>,
}

impl HandlerErr {
    pub fn new(code: &'static str, message: impl Into<String>, details: Option<Value>) -> Self {
        Self {
            code,
            message: message.into(),
            details,
        }
    }

    pub fn bad_params(message: impl Into<String>) -> Self {
        Self::new("bad_params", message, None)
    }

    pub fn no_workspace() -> Self {
        Self::new("no_workspace", "select a workspace first", None)
    }

    pub fn response(self, id: &str, method: &str) -> Value {
        if matches!(self.code, "store_write_failed" | "store_corrupt" | "io_failed") {
            error!(id, method, code = self.code, message = %self.message, "request failed");
        } else {
            debug!(id, method, code = self.code, message = %self.message, "request rejected");
        }
        err(id, self.code, self.message, self.details)
    }
}

impl<E: WireError> From<E> for HandlerErr {
    fn from(e: E) -> Self {
        Self {
            code: e.code(),
            details: e.details(),
            message: e.to_string(),
        }
    }
}

pub type HandlerResult = Result<Value, HandlerErr>;
