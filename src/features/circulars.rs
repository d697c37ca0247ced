use serde::Deserialize;

use super::{invalid, not_found, parse_date, required, today, trimmed, Result};
use crate::ids::{lenient, timestamp_id};
use crate::model::Circular;
use crate::repo::Repos;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CircularInput {
    #[serde(deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(deserialize_with = "lenient::string")]
    pub description: String,
    /// Data URL of the uploaded document.
    #[serde(deserialize_with = "lenient::opt_string")]
    pub file: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub file_name: String,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub date: Option<String>,
}

pub fn list(repos: &Repos) -> Vec<Circular> {
    repos.read_circulars()
}

pub fn create(repos: &Repos, input: CircularInput) -> Result<Circular> {
    const MSG: &str = "Please provide a title and file.";
    let title = required(&input.title, MSG)?;
    let file = trimmed(input.file).ok_or_else(|| invalid(MSG))?;
    if !file.starts_with("data:") {
        return Err(invalid("file must be a data URL"));
    }
    let date = match trimmed(input.date) {
        Some(d) => parse_date(&d, "date")?,
        None => today(),
    };

    let mut circulars = repos.read_circulars();
    let circular = Circular {
        id: timestamp_id(circulars.iter().map(|c| c.id)),
        title,
        description: input.description.trim().to_string(),
        file: Some(file),
        file_name: input.file_name.trim().to_string(),
        date: date.format("%Y-%m-%d").to_string(),
    };
    circulars.insert(0, circular.clone());
    repos.write_circulars(&circulars)?;
    Ok(circular)
}

pub fn delete(repos: &Repos, id: i64) -> Result<()> {
    let mut circulars = repos.read_circulars();
    let before = circulars.len();
    circulars.retain(|c| c.id != id);
    if circulars.len() == before {
        return Err(not_found("circular", id));
    }
    repos.write_circulars(&circulars)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WireError;
    use crate::store::KvStore;
    use pretty_assertions::assert_eq;

    fn circular(title: &str, file: Option<&str>) -> CircularInput {
        CircularInput {
            title: title.into(),
            file: file.map(str::to_string),
            file_name: "notice.pdf".into(),
            ..Default::default()
        }
    }

    #[test]
    fn title_and_file_are_required() {
        let store = KvStore::memory();
        let repos = Repos::new(&store);
        let e = create(&repos, circular("Holiday notice", None)).expect_err("no file");
        assert_eq!(e.to_string(), "Please provide a title and file.");
        let e = create(&repos, circular("Holiday notice", Some("notice.pdf")))
            .expect_err("not a data url");
        assert_eq!(e.code(), "bad_params");
    }

    #[test]
    fn newest_first_with_default_date() {
        let store = KvStore::memory();
        let repos = Repos::new(&store);
        let first = create(&repos, circular("First", Some("data:application/pdf;base64,AA")))
            .expect("first");
        assert_eq!(first.date, today().format("%Y-%m-%d").to_string());
        create(
            &repos,
            CircularInput {
                date: Some("2025-04-01".into()),
                ..circular("Second", Some("data:application/pdf;base64,AA"))
            },
        )
        .expect("second");
        let titles: Vec<String> = list(&repos).into_iter().map(|c| c.title).collect();
        assert_eq!(titles, vec!["Second", "First"]);

        delete(&repos, first.id).expect("delete");
        assert_eq!(list(&repos).len(), 1);
    }
}
