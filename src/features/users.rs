//! Directory of users, student admissions and the role list.

use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::info;

use super::{filter_value, invalid, not_found, required, text_matches, FeatureError, Result};
use crate::ids::{lenient, new_uuid, next_local_id, RecordId};
use crate::model::{User, STUDENT_ROLE};
use crate::repo::Repos;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserInput {
    #[serde(deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(deserialize_with = "lenient::string")]
    pub email: String,
    #[serde(deserialize_with = "lenient::string")]
    pub role: String,
    #[serde(deserialize_with = "lenient::string")]
    pub cls: String,
}

pub fn list_users(repos: &Repos, role: Option<&str>, query: Option<&str>) -> Vec<User> {
    let role = filter_value(role);
    repos
        .read_users()
        .into_iter()
        .filter(|u| role.map(|r| u.role.eq_ignore_ascii_case(r)).unwrap_or(true))
        .filter(|u| {
            text_matches(
                query.unwrap_or(""),
                [
                    u.display_name().as_str(),
                    u.email.as_deref().unwrap_or(""),
                    u.role.as_str(),
                ],
            )
        })
        .collect()
}

fn role_or_first(repos: &Repos, role: &str) -> String {
    let role = role.trim();
    if !role.is_empty() {
        return role.to_string();
    }
    repos
        .read_roles()
        .into_iter()
        .next()
        .unwrap_or_else(|| STUDENT_ROLE.to_string())
}

pub fn create_user(repos: &Repos, input: UserInput) -> Result<User> {
    let name = required(&input.name, "Enter name and email")?;
    let email = required(&input.email, "Enter name and email")?;
    let mut users = repos.read_users();
    let id = next_local_id(users.iter().filter_map(|u| u.id.as_i64()));
    let user = User {
        id: RecordId::Num(id),
        name: Some(name),
        first_name: None,
        middle_name: None,
        last_name: None,
        email: Some(email),
        role: role_or_first(repos, &input.role),
        cls: Some(input.cls.trim().to_string()),
        class_id: None,
        dob: None,
        roll_no: None,
        extra: Map::new(),
    };
    users.push(user.clone());
    repos.write_users(&users)?;
    info!(user_id = %user.id, role = %user.role, "user created");
    Ok(user)
}

pub fn update_user(repos: &Repos, id: &str, input: UserInput) -> Result<User> {
    let name = required(&input.name, "Enter name and email")?;
    let email = required(&input.email, "Enter name and email")?;
    let role = role_or_first(repos, &input.role);
    let mut users = repos.read_users();
    let Some(user) = users.iter_mut().find(|u| u.id.matches(id)) else {
        return Err(not_found("user", id));
    };
    user.name = Some(name);
    user.email = Some(email);
    user.role = role;
    user.cls = Some(input.cls.trim().to_string());
    let updated = user.clone();
    repos.write_users(&users)?;
    Ok(updated)
}

pub fn delete_user(repos: &Repos, id: &str) -> Result<()> {
    let mut users = repos.read_users();
    let before = users.len();
    users.retain(|u| !u.id.matches(id));
    if users.len() == before {
        return Err(not_found("user", id));
    }
    repos.write_users(&users)?;
    Ok(())
}

/// Students are users with role `Student`, matched case-insensitively.
pub fn list_students(repos: &Repos, class_id: Option<&str>) -> Vec<User> {
    let class_id = filter_value(class_id);
    repos
        .read_students()
        .into_iter()
        .filter(|s| class_id.map(|c| s.in_class(c)).unwrap_or(true))
        .collect()
}

/// Admission form record: every submitted field is kept as is.
fn student_from_fields(id: RecordId, mut fields: Map<String, Value>) -> Result<User> {
    let first = fields
        .get("firstName")
        .and_then(Value::as_str)
        .unwrap_or("");
    required(first, "First name is required")?;
    fields.insert("id".into(), json!(id));
    fields.insert("role".into(), json!(STUDENT_ROLE));
    serde_json::from_value(Value::Object(fields))
        .map_err(|e| invalid(format!("invalid student record: {e}")))
}

pub fn create_student(repos: &Repos, fields: Map<String, Value>) -> Result<User> {
    let student = student_from_fields(RecordId::Text(new_uuid()), fields)?;
    let mut users = repos.read_users();
    users.push(student.clone());
    repos.write_users(&users)?;
    info!(student_id = %student.id, "student admitted");
    Ok(student)
}

pub fn update_student(repos: &Repos, id: &str, fields: Map<String, Value>) -> Result<User> {
    let mut users = repos.read_users();
    let Some(slot) = users
        .iter_mut()
        .find(|u| u.is_student() && u.id.matches(id))
    else {
        return Err(not_found("student", id));
    };
    let updated = student_from_fields(slot.id.clone(), fields)?;
    *slot = updated.clone();
    repos.write_users(&users)?;
    Ok(updated)
}

pub fn delete_student(repos: &Repos, id: &str) -> Result<()> {
    let mut users = repos.read_users();
    let before = users.len();
    users.retain(|u| !(u.is_student() && u.id.matches(id)));
    if users.len() == before {
        return Err(not_found("student", id));
    }
    repos.write_users(&users)?;
    Ok(())
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleListing {
    pub name: String,
    pub user_count: usize,
}

pub fn list_roles(repos: &Repos) -> Vec<RoleListing> {
    let users = repos.read_users();
    repos
        .read_roles()
        .into_iter()
        .map(|name| RoleListing {
            user_count: users.iter().filter(|u| u.role == name).count(),
            name,
        })
        .collect()
}

pub fn create_role(repos: &Repos, name: &str) -> Result<Vec<String>> {
    let name = required(name, "Enter role")?;
    let mut roles = repos.read_roles();
    if roles.contains(&name) {
        return Err(invalid(format!("role already exists: {name}")));
    }
    roles.push(name);
    repos.write_roles(&roles)?;
    Ok(roles)
}

/// Renames the role and moves every user holding it to the new name.
pub fn rename_role(repos: &Repos, from: &str, to: &str) -> Result<Vec<String>> {
    let to = required(to, "Enter name")?;
    let mut roles = repos.read_roles();
    let Some(pos) = roles.iter().position(|r| r == from) else {
        return Err(not_found("role", from));
    };
    if to == from {
        return Ok(roles);
    }
    if roles.contains(&to) {
        return Err(invalid(format!("role already exists: {to}")));
    }
    roles[pos] = to.clone();
    repos.write_roles(&roles)?;

    let mut users = repos.read_users();
    let mut moved = 0usize;
    for u in users.iter_mut().filter(|u| u.role == from) {
        u.role = to.clone();
        moved += 1;
    }
    if moved > 0 {
        repos.write_users(&users)?;
    }
    info!(from, to = %to, moved, "role renamed");
    Ok(roles)
}

pub fn delete_role(repos: &Repos, name: &str) -> Result<Vec<String>> {
    let holders: Vec<String> = repos
        .read_users()
        .iter()
        .filter(|u| u.role == name)
        .map(|u| u.id.to_string())
        .collect();
    if !holders.is_empty() {
        return Err(FeatureError::InUse {
            code: "role_in_use",
            message: "Cannot delete role with users".to_string(),
            details: json!({ "role": name, "userIds": holders }),
        });
    }
    let mut roles = repos.read_roles();
    let before = roles.len();
    roles.retain(|r| r != name);
    if roles.len() == before {
        return Err(not_found("role", name));
    }
    repos.write_roles(&roles)?;
    Ok(roles)
}
