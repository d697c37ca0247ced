//! Transport routing: drivers, routes with ordered stops, and one route mapping per
//! student.
//!
//! References between these records are weak. Deletes of drivers and routes are
//! blocked while something points at them; stops can be removed freely and any
//! mapping left pointing at a missing stop renders as [`UNRESOLVED`].

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use thiserror::Error;
use tracing::info;

use crate::error::WireError;
use crate::ids::{lenient, next_local_id, timestamp_id};
use crate::model::{Driver, Route, Stop, StudentTransportMapping, User, UNRESOLVED};
use crate::repo::Repos;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("{0}")]
    Validation(String),
    #[error("{what} not found: {id}")]
    NotFound { what: &'static str, id: String },
    #[error("Driver is assigned to a route. Reassign before deleting.")]
    DriverInUse { driver_id: i64, route_ids: Vec<i64> },
    #[error("Some students are mapped to this route. Unmap before deleting.")]
    RouteInUse {
        route_id: i64,
        student_ids: Vec<String>,
    },
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl WireError for TransportError {
    fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "bad_params",
            Self::NotFound { .. } => "not_found",
            Self::DriverInUse { .. } => "driver_in_use",
            Self::RouteInUse { .. } => "route_in_use",
            Self::Store(e) => e.code(),
        }
    }

    fn details(&self) -> Option<Value> {
        match self {
            Self::DriverInUse {
                driver_id,
                route_ids,
            } => Some(json!({ "driverId": driver_id, "routeIds": route_ids })),
            Self::RouteInUse {
                route_id,
                student_ids,
            } => Some(json!({ "routeId": route_id, "studentIds": student_ids })),
            Self::Store(e) => e.details(),
            _ => None,
        }
    }
}

type Result<T> = std::result::Result<T, TransportError>;

fn required(v: &str, message: &str) -> Result<String> {
    let t = v.trim();
    if t.is_empty() {
        return Err(TransportError::Validation(message.to_string()));
    }
    Ok(t.to_string())
}

fn trimmed(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DriverInput {
    #[serde(deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(deserialize_with = "lenient::string")]
    pub phone: String,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub alt_phone: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub license: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub vehicle_no: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StopInput {
    #[serde(deserialize_with = "lenient::opt_i64")]
    pub id: Option<i64>,
    #[serde(deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub pickup_time: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub drop_time: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RouteInput {
    #[serde(deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub vehicle_no: Option<String>,
    #[serde(deserialize_with = "lenient::opt_i64")]
    pub driver_id: Option<i64>,
    /// Draft stops attached on creation; ignored by [`update_route`].
    pub stops: Vec<StopInput>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AssignInput {
    #[serde(deserialize_with = "lenient::string")]
    pub student_id: String,
    #[serde(deserialize_with = "lenient::opt_i64")]
    pub route_id: Option<i64>,
    #[serde(deserialize_with = "lenient::opt_i64")]
    pub pickup_stop_id: Option<i64>,
    #[serde(deserialize_with = "lenient::opt_i64")]
    pub drop_stop_id: Option<i64>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub pickup_time: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub drop_time: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverListing {
    #[serde(flatten)]
    pub driver: Driver,
    pub route_ids: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteListing {
    #[serde(flatten)]
    pub route: Route,
    pub driver_name: String,
    pub student_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingListing {
    pub student_id: String,
    pub student_name: String,
    #[serde(flatten)]
    pub mapping: StudentTransportMapping,
    pub route_name: String,
    pub pickup_stop: String,
    pub drop_stop: String,
}

/// Result of removing a stop. Mappings that still point at the stop are left alone.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StopRemoval {
    pub removed: bool,
    pub dangling_student_ids: Vec<String>,
}

/// Everything a student (or a slip) shows about their transport, fully resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentTransportView {
    pub student_id: String,
    pub student_name: String,
    pub class_name: String,
    pub route_id: i64,
    pub route_name: String,
    pub vehicle_no: String,
    pub driver_name: String,
    pub driver_phone: String,
    pub pickup_stop: String,
    pub pickup_time: String,
    pub drop_stop: String,
    pub drop_time: String,
}

fn or_unresolved(v: Option<&str>) -> String {
    match v.map(str::trim) {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => UNRESOLVED.to_string(),
    }
}

fn find_student<'u>(users: &'u [User], student_id: &str) -> Option<&'u User> {
    users.iter().find(|u| u.id.matches(student_id))
}

pub fn list_drivers(repos: &Repos) -> Vec<DriverListing> {
    let routes = repos.read_routes();
    repos
        .read_drivers()
        .into_iter()
        .map(|driver| {
            let route_ids = routes
                .iter()
                .filter(|r| r.driver_id == Some(driver.id))
                .map(|r| r.id)
                .collect();
            DriverListing { driver, route_ids }
        })
        .collect()
}

pub fn add_driver(repos: &Repos, input: DriverInput) -> Result<Driver> {
    const MSG: &str = "Name & Phone are required";
    let name = required(&input.name, MSG)?;
    let phone = required(&input.phone, MSG)?;
    let mut drivers = repos.read_drivers();
    let driver = Driver {
        id: timestamp_id(drivers.iter().map(|d| d.id)),
        name,
        phone,
        alt_phone: trimmed(input.alt_phone),
        license: trimmed(input.license),
        vehicle_no: trimmed(input.vehicle_no),
        extra: Map::new(),
    };
    drivers.push(driver.clone());
    repos.write_drivers(&drivers)?;
    info!(driver_id = driver.id, "driver added");
    Ok(driver)
}

pub fn update_driver(repos: &Repos, id: i64, input: DriverInput) -> Result<Driver> {
    const MSG: &str = "Name & Phone are required";
    let name = required(&input.name, MSG)?;
    let phone = required(&input.phone, MSG)?;
    let mut drivers = repos.read_drivers();
    let Some(driver) = drivers.iter_mut().find(|d| d.id == id) else {
        return Err(TransportError::NotFound {
            what: "driver",
            id: id.to_string(),
        });
    };
    driver.name = name;
    driver.phone = phone;
    driver.alt_phone = trimmed(input.alt_phone);
    driver.license = trimmed(input.license);
    driver.vehicle_no = trimmed(input.vehicle_no);
    let updated = driver.clone();
    repos.write_drivers(&drivers)?;
    Ok(updated)
}

pub fn delete_driver(repos: &Repos, id: i64) -> Result<()> {
    let route_ids: Vec<i64> = repos
        .read_routes()
        .iter()
        .filter(|r| r.driver_id == Some(id))
        .map(|r| r.id)
        .collect();
    if !route_ids.is_empty() {
        return Err(TransportError::DriverInUse {
            driver_id: id,
            route_ids,
        });
    }
    let mut drivers = repos.read_drivers();
    let before = drivers.len();
    drivers.retain(|d| d.id != id);
    if drivers.len() == before {
        return Err(TransportError::NotFound {
            what: "driver",
            id: id.to_string(),
        });
    }
    repos.write_drivers(&drivers)?;
    info!(driver_id = id, "driver deleted");
    Ok(())
}

pub fn list_routes(repos: &Repos) -> Vec<RouteListing> {
    let drivers = repos.read_drivers();
    let mappings = repos.read_transport_mappings();
    repos
        .read_routes()
        .into_iter()
        .map(|route| {
            let driver_name = or_unresolved(
                route
                    .driver_id
                    .and_then(|id| drivers.iter().find(|d| d.id == id))
                    .map(|d| d.name.as_str()),
            );
            let student_count = mappings.values().filter(|m| m.route_id == route.id).count();
            RouteListing {
                route,
                driver_name,
                student_count,
            }
        })
        .collect()
}

/// Draft stops keep a positive id when given one, else their 1-based position. A
/// repeated id is bumped past the largest id seen so far.
fn draft_stops(drafts: Vec<StopInput>) -> Result<Vec<Stop>> {
    let mut stops: Vec<Stop> = Vec::with_capacity(drafts.len());
    for (idx, draft) in drafts.into_iter().enumerate() {
        let name = required(&draft.name, "Stop name is required")?;
        let wanted = draft.id.filter(|id| *id > 0).unwrap_or(idx as i64 + 1);
        let id = if stops.iter().any(|s| s.id == wanted) {
            next_local_id(stops.iter().map(|s| s.id))
        } else {
            wanted
        };
        stops.push(Stop {
            id,
            name,
            pickup_time: trimmed(draft.pickup_time),
            drop_time: trimmed(draft.drop_time),
        });
    }
    Ok(stops)
}

pub fn create_route(repos: &Repos, input: RouteInput) -> Result<Route> {
    let name = required(&input.name, "Route name is required")?;
    let stops = draft_stops(input.stops)?;
    let mut routes = repos.read_routes();
    let route = Route {
        id: timestamp_id(routes.iter().map(|r| r.id)),
        name,
        vehicle_no: trimmed(input.vehicle_no),
        driver_id: input.driver_id,
        stops,
        extra: Map::new(),
    };
    routes.push(route.clone());
    repos.write_routes(&routes)?;
    info!(route_id = route.id, stops = route.stops.len(), "route created");
    Ok(route)
}

pub fn update_route(repos: &Repos, id: i64, input: RouteInput) -> Result<Route> {
    let name = required(&input.name, "Route name is required")?;
    let mut routes = repos.read_routes();
    let Some(route) = routes.iter_mut().find(|r| r.id == id) else {
        return Err(TransportError::NotFound {
            what: "route",
            id: id.to_string(),
        });
    };
    route.name = name;
    route.vehicle_no = trimmed(input.vehicle_no);
    route.driver_id = input.driver_id;
    let updated = route.clone();
    repos.write_routes(&routes)?;
    Ok(updated)
}

pub fn add_stop(repos: &Repos, route_id: i64, input: StopInput) -> Result<Stop> {
    let mut routes = repos.read_routes();
    let Some(route) = routes.iter_mut().find(|r| r.id == route_id) else {
        return Err(TransportError::NotFound {
            what: "route",
            id: route_id.to_string(),
        });
    };
    let name = required(&input.name, "Stop name is required")?;
    let stop = Stop {
        id: next_local_id(route.stops.iter().map(|s| s.id)),
        name,
        pickup_time: trimmed(input.pickup_time),
        drop_time: trimmed(input.drop_time),
    };
    route.stops.push(stop.clone());
    repos.write_routes(&routes)?;
    Ok(stop)
}

pub fn remove_stop(repos: &Repos, route_id: i64, stop_id: i64) -> Result<StopRemoval> {
    let mut routes = repos.read_routes();
    let Some(route) = routes.iter_mut().find(|r| r.id == route_id) else {
        return Err(TransportError::NotFound {
            what: "route",
            id: route_id.to_string(),
        });
    };
    let before = route.stops.len();
    route.stops.retain(|s| s.id != stop_id);
    let removed = route.stops.len() != before;
    if removed {
        repos.write_routes(&routes)?;
    }

    let dangling_student_ids = repos
        .read_transport_mappings()
        .into_iter()
        .filter(|(_, m)| {
            m.route_id == route_id
                && (m.pickup_stop_id == Some(stop_id) || m.drop_stop_id == Some(stop_id))
        })
        .map(|(student_id, _)| student_id)
        .collect();
    Ok(StopRemoval {
        removed,
        dangling_student_ids,
    })
}

pub fn delete_route(repos: &Repos, id: i64) -> Result<()> {
    let student_ids: Vec<String> = repos
        .read_transport_mappings()
        .into_iter()
        .filter(|(_, m)| m.route_id == id)
        .map(|(student_id, _)| student_id)
        .collect();
    if !student_ids.is_empty() {
        return Err(TransportError::RouteInUse {
            route_id: id,
            student_ids,
        });
    }
    let mut routes = repos.read_routes();
    let before = routes.len();
    routes.retain(|r| r.id != id);
    if routes.len() == before {
        return Err(TransportError::NotFound {
            what: "route",
            id: id.to_string(),
        });
    }
    repos.write_routes(&routes)?;
    info!(route_id = id, "route deleted");
    Ok(())
}

pub fn list_mappings(repos: &Repos) -> Vec<MappingListing> {
    let users = repos.read_users();
    let routes = repos.read_routes();
    repos
        .read_transport_mappings()
        .into_iter()
        .map(|(student_id, mapping)| {
            let route = routes.iter().find(|r| r.id == mapping.route_id);
            let stop_name = |stop_id: Option<i64>| {
                or_unresolved(
                    route
                        .zip(stop_id)
                        .and_then(|(r, id)| r.stop(id))
                        .map(|s| s.name.as_str()),
                )
            };
            MappingListing {
                student_name: find_student(&users, &student_id)
                    .map(User::display_name)
                    .unwrap_or_else(|| UNRESOLVED.to_string()),
                route_name: or_unresolved(route.map(|r| r.name.as_str())),
                pickup_stop: stop_name(mapping.pickup_stop_id),
                drop_stop: stop_name(mapping.drop_stop_id),
                student_id,
                mapping,
            }
        })
        .collect()
}

/// Replaces any earlier mapping for the student. Stop ids are not checked against
/// the route; unknown ones simply render unresolved.
pub fn assign(repos: &Repos, input: AssignInput) -> Result<StudentTransportMapping> {
    const MSG: &str = "Student and Route are required";
    let student_id = required(&input.student_id, MSG)?;
    let route_id = input
        .route_id
        .ok_or_else(|| TransportError::Validation(MSG.to_string()))?;
    if !repos.read_routes().iter().any(|r| r.id == route_id) {
        return Err(TransportError::Validation("Invalid route".to_string()));
    }

    let mapping = StudentTransportMapping {
        route_id,
        pickup_stop_id: input.pickup_stop_id,
        drop_stop_id: input.drop_stop_id,
        pickup_time: trimmed(input.pickup_time),
        drop_time: trimmed(input.drop_time),
    };
    let mut mappings = repos.read_transport_mappings();
    mappings.insert(student_id.clone(), mapping.clone());
    repos.write_transport_mappings(&mappings)?;
    info!(student_id = %student_id, route_id, "student assigned to route");
    Ok(mapping)
}

pub fn remove_mapping(repos: &Repos, student_id: &str) -> Result<bool> {
    let mut mappings = repos.read_transport_mappings();
    if mappings.remove(student_id.trim()).is_none() {
        return Ok(false);
    }
    repos.write_transport_mappings(&mappings)?;
    Ok(true)
}

/// `None` when the student has no mapping. A mapping whose route is gone still
/// yields a view, with every route-derived field unresolved.
pub fn student_view(repos: &Repos, student_id: &str) -> Option<StudentTransportView> {
    let student_id = student_id.trim();
    let mappings = repos.read_transport_mappings();
    let mapping = mappings.get(student_id)?;
    let users = repos.read_users();
    let student = find_student(&users, student_id);
    let routes = repos.read_routes();
    let route = routes.iter().find(|r| r.id == mapping.route_id);
    let drivers = repos.read_drivers();
    let driver = route
        .and_then(|r| r.driver_id)
        .and_then(|id| drivers.iter().find(|d| d.id == id));
    let pickup = route
        .zip(mapping.pickup_stop_id)
        .and_then(|(r, id)| r.stop(id));
    let drop = route.zip(mapping.drop_stop_id).and_then(|(r, id)| r.stop(id));

    let effective = |over: &Option<String>, stop_time: Option<&String>| {
        or_unresolved(over.as_deref().or(stop_time.map(String::as_str)))
    };

    Some(StudentTransportView {
        student_id: student_id.to_string(),
        student_name: student
            .map(User::display_name)
            .unwrap_or_else(|| UNRESOLVED.to_string()),
        class_name: or_unresolved(student.and_then(User::class_name).as_deref()),
        route_id: mapping.route_id,
        route_name: or_unresolved(route.map(|r| r.name.as_str())),
        vehicle_no: or_unresolved(
            route
                .and_then(|r| r.vehicle_no.as_deref())
                .or(driver.and_then(|d| d.vehicle_no.as_deref())),
        ),
        driver_name: or_unresolved(driver.map(|d| d.name.as_str())),
        driver_phone: or_unresolved(driver.map(|d| d.phone.as_str())),
        pickup_stop: or_unresolved(pickup.map(|s| s.name.as_str())),
        pickup_time: effective(
            &mapping.pickup_time,
            pickup.and_then(|s| s.pickup_time.as_ref()),
        ),
        drop_stop: or_unresolved(drop.map(|s| s.name.as_str())),
        drop_time: effective(&mapping.drop_time, drop.and_then(|s| s.drop_time.as_ref())),
    })
}
