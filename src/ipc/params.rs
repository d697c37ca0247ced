//! Typed access to `req.params`. Every failure is a `bad_params` error.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::error::HandlerErr;
use super::types::Request;

/// Trimmed string or number, `None` when absent or blank.
pub fn opt_str(req: &Request, key: &str) -> Option<String> {
    match req.params.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub fn str(req: &Request, key: &str) -> Result<String, HandlerErr> {
    opt_str(req, key).ok_or_else(|| HandlerErr::bad_params(format!("missing {key}")))
}

pub fn i64(req: &Request, key: &str) -> Result<i64, HandlerErr> {
    let v = req
        .params
        .get(key)
        .ok_or_else(|| HandlerErr::bad_params(format!("missing {key}")))?;
    v.as_i64()
        .or_else(|| v.as_str().and_then(|s| s.trim().parse().ok()))
        .ok_or_else(|| HandlerErr::bad_params(format!("{key} must be integer")))
}

pub fn bool(req: &Request, key: &str) -> bool {
    req.params.get(key).and_then(Value::as_bool).unwrap_or(false)
}

pub fn object(req: &Request, key: &str) -> Result<Map<String, Value>, HandlerErr> {
    match req.params.get(key) {
        Some(Value::Object(m)) => Ok(m.clone()),
        Some(_) => Err(HandlerErr::bad_params(format!("{key} must be an object"))),
        None => Err(HandlerErr::bad_params(format!("missing {key}"))),
    }
}

/// The whole params object, for record-shaped payloads.
pub fn fields(req: &Request) -> Result<Map<String, Value>, HandlerErr> {
    match &req.params {
        Value::Object(m) => Ok(m.clone()),
        Value::Null => Ok(Map::new()),
        _ => Err(HandlerErr::bad_params("params must be an object")),
    }
}

pub fn parse<T: DeserializeOwned>(req: &Request) -> Result<T, HandlerErr> {
    let v = match &req.params {
        Value::Null => Value::Object(Map::new()),
        v => v.clone(),
    };
    serde_json::from_value(v).map_err(|e| HandlerErr::bad_params(format!("invalid params: {e}")))
}

pub fn parse_key<T: DeserializeOwned>(req: &Request, key: &str) -> Result<T, HandlerErr> {
    let v = req
        .params
        .get(key)
        .cloned()
        .ok_or_else(|| HandlerErr::bad_params(format!("missing {key}")))?;
    serde_json::from_value(v).map_err(|e| HandlerErr::bad_params(format!("invalid {key}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn req(params: Value) -> Request {
        Request {
            id: "1".into(),
            method: "x".into(),
            params,
        }
    }

    #[test]
    fn ids_accept_numbers_and_numeric_strings() {
        let r = req(json!({"id": 3, "routeId": " 12 ", "name": "  "}));
        assert_eq!(i64(&r, "id").expect("id"), 3);
        assert_eq!(i64(&r, "routeId").expect("routeId"), 12);
        assert_eq!(opt_str(&r, "id").as_deref(), Some("3"));
        assert_eq!(opt_str(&r, "name"), None);
        assert_eq!(str(&r, "name").expect_err("blank").code, "bad_params");
    }

    #[test]
    fn null_params_parse_as_empty_object() {
        let r = req(Value::Null);
        assert!(fields(&r).expect("fields").is_empty());
        assert!(object(&r, "patch").is_err());
    }
}
