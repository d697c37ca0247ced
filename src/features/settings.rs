use serde_json::{Map, Value};
use tracing::info;

use super::{invalid, Result};
use crate::model::{
    Brand, Settings, DEFAULT_BACK_COLOR, DEFAULT_FORE_COLOR, DEFAULT_LIGHT_COLOR,
};
use crate::repo::Repos;

const SCHOOL_NAME_MAX: usize = 120;
const SCHOOL_ADDRESS_MAX: usize = 500;
/// Logos are stored inline as data URLs.
const LOGO_MAX: usize = 4 * 1024 * 1024;

pub fn get(repos: &Repos) -> Settings {
    repos.read_settings()
}

pub fn brand(repos: &Repos) -> Brand {
    Brand::from_settings(&repos.read_settings())
}

fn parse_string_max(v: &Value, key: &str, max_len: usize) -> Result<String> {
    let s = v
        .as_str()
        .ok_or_else(|| invalid(format!("{key} must be string")))?
        .trim();
    if s.chars().count() > max_len {
        return Err(invalid(format!("{key} length must be <= {max_len}")));
    }
    Ok(s.to_string())
}

fn parse_color(v: &Value, key: &str) -> Result<String> {
    let s = parse_string_max(v, key, 7)?;
    let hex = s.strip_prefix('#').unwrap_or("");
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid(format!("{key} must be a #RRGGBB color")));
    }
    Ok(s.to_ascii_uppercase())
}

fn parse_logo(v: &Value) -> Result<Option<String>> {
    if v.is_null() {
        return Ok(None);
    }
    let s = parse_string_max(v, "logo", LOGO_MAX)?;
    if s.is_empty() {
        return Ok(None);
    }
    if !s.starts_with("data:image/") {
        return Err(invalid("logo must be an image data URL"));
    }
    Ok(Some(s))
}

fn merge_patch(current: &mut Settings, patch: &Map<String, Value>) -> Result<()> {
    for (k, v) in patch {
        match k.as_str() {
            "backColor" => current.back_color = parse_color(v, k)?,
            "foreColor" => current.fore_color = parse_color(v, k)?,
            "lightColor" => current.light_color = parse_color(v, k)?,
            "schoolName" => current.school_name = parse_string_max(v, k, SCHOOL_NAME_MAX)?,
            "schoolAddress" => {
                current.school_address = parse_string_max(v, k, SCHOOL_ADDRESS_MAX)?
            }
            "logo" => current.logo = parse_logo(v)?,
            _ => return Err(invalid(format!("unknown settings field: {k}"))),
        }
    }
    Ok(())
}

/// Applies a partial patch. Nothing is written unless every field validates.
pub fn update(repos: &Repos, patch: &Map<String, Value>) -> Result<Settings> {
    let mut settings = repos.read_settings();
    merge_patch(&mut settings, patch)?;
    repos.write_settings(&settings)?;
    info!(fields = patch.len(), "settings updated");
    Ok(settings)
}

pub fn reset_colors(repos: &Repos) -> Result<Settings> {
    let mut settings = repos.read_settings();
    settings.back_color = DEFAULT_BACK_COLOR.to_string();
    settings.fore_color = DEFAULT_FORE_COLOR.to_string();
    settings.light_color = DEFAULT_LIGHT_COLOR.to_string();
    repos.write_settings(&settings)?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WireError;
    use crate::store::KvStore;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn patch(v: Value) -> Map<String, Value> {
        v.as_object().cloned().expect("object patch")
    }

    #[test]
    fn update_validates_every_field_before_writing() {
        let store = KvStore::memory();
        let repos = Repos::new(&store);
        let s = update(
            &repos,
            &patch(json!({"backColor": "#112233", "schoolName": "  Green Valley High  "})),
        )
        .expect("update");
        assert_eq!(s.back_color, "#112233");
        assert_eq!(s.school_name, "Green Valley High");

        for bad in [
            json!({"foreColor": "red"}),
            json!({"lightColor": "#12345"}),
            json!({"schoolName": "x".repeat(121)}),
            json!({"logo": "https://example.com/logo.png"}),
            json!({"motto": "Learn"}),
            json!({"schoolName": "Ok", "backColor": 7}),
        ] {
            let e = update(&repos, &patch(bad)).expect_err("rejected");
            assert_eq!(e.code(), "bad_params");
        }
        assert_eq!(get(&repos).school_name, "Green Valley High");
    }

    #[test]
    fn logo_can_be_cleared_and_colors_reset() {
        let store = KvStore::memory();
        let repos = Repos::new(&store);
        update(
            &repos,
            &patch(json!({"logo": "data:image/png;base64,AAAA", "foreColor": "#abcdef"})),
        )
        .expect("update");
        assert_eq!(brand(&repos).orange, "#ABCDEF");
        assert_eq!(
            brand(&repos).logo.as_deref(),
            Some("data:image/png;base64,AAAA")
        );

        let s = update(&repos, &patch(json!({"logo": null}))).expect("clear logo");
        assert_eq!(s.logo, None);
        let s = reset_colors(&repos).expect("reset");
        assert_eq!(s.fore_color, DEFAULT_FORE_COLOR);
        assert_eq!(s.school_name, Settings::default().school_name);
    }
}
