use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ids::lenient;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Driver {
    #[serde(deserialize_with = "lenient::i64")]
    pub id: i64,
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_no: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A stop belongs to exactly one route; its id is only unique inside that route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stop {
    #[serde(deserialize_with = "lenient::i64")]
    pub id: i64,
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pickup_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drop_time: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    #[serde(deserialize_with = "lenient::i64")]
    pub id: i64,
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_no: Option<String>,
    /// Weak reference to a [`Driver`].
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub driver_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient::vec")]
    pub stops: Vec<Stop>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Route {
    pub fn stop(&self, stop_id: i64) -> Option<&Stop> {
        self.stops.iter().find(|s| s.id == stop_id)
    }
}

/// Assignment of one student to one route. Route and stop ids are weak references:
/// removing a stop leaves the id in place and readers treat it as unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentTransportMapping {
    #[serde(deserialize_with = "lenient::i64")]
    pub route_id: i64,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub pickup_stop_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub drop_stop_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pickup_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drop_time: Option<String>,
}

/// Keyed by student id.
pub type TransportMappings = BTreeMap<String, StudentTransportMapping>;
