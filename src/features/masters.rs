//! Master data: classes, teachers, subjects and who teaches what where.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::info;

use super::{invalid, not_found, required, text_matches, FeatureError, Result};
use crate::ids::{lenient, make_id, timestamp_id, RecordId};
use crate::model::{
    class_label, ClassRecord, ClassSubjectTeacher, Subject, Teacher, DEFAULT_MEDIUM, UNRESOLVED,
};
use crate::repo::Repos;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClassInput {
    pub id: Option<RecordId>,
    #[serde(deserialize_with = "lenient::string")]
    pub class_name: String,
    #[serde(deserialize_with = "lenient::string")]
    pub division: String,
    #[serde(deserialize_with = "lenient::string")]
    pub medium: String,
}

pub fn list_classes(repos: &Repos, filter: Option<&str>) -> Vec<ClassRecord> {
    repos
        .read_classes()
        .into_iter()
        .filter(|c| {
            text_matches(
                filter.unwrap_or(""),
                [c.class_name.as_str(), c.division.as_str(), c.medium.as_str()],
            )
        })
        .collect()
}

pub fn upsert_class(repos: &Repos, input: ClassInput) -> Result<ClassRecord> {
    const MSG: &str = "Class name and division are required";
    let class_name = required(&input.class_name, MSG)?;
    let division = required(&input.division, MSG)?;
    let medium = match input.medium.trim() {
        "" => DEFAULT_MEDIUM.to_string(),
        m => m.to_string(),
    };

    let mut classes = repos.read_classes();
    let record = match input.id {
        Some(id) => {
            let Some(existing) = classes.iter_mut().find(|c| c.id == id) else {
                return Err(not_found("class", id));
            };
            existing.class_name = class_name;
            existing.division = division;
            existing.medium = medium;
            existing.clone()
        }
        None => {
            let id = timestamp_id(classes.iter().filter_map(|c| c.id.as_i64()));
            let record = ClassRecord {
                id: RecordId::Num(id),
                class_name,
                division,
                medium,
            };
            classes.push(record.clone());
            record
        }
    };
    repos.write_classes(&classes)?;
    Ok(record)
}

pub fn delete_class(repos: &Repos, id: &str) -> Result<()> {
    let mut classes = repos.read_classes();
    let before = classes.len();
    classes.retain(|c| !c.id.matches(id));
    if classes.len() == before {
        return Err(not_found("class", id));
    }
    repos.write_classes(&classes)?;
    Ok(())
}

pub fn list_teachers(repos: &Repos, filter: Option<&str>) -> Vec<Teacher> {
    repos
        .read_teachers()
        .into_iter()
        .filter(|t| {
            text_matches(
                filter.unwrap_or(""),
                [
                    t.label().as_str(),
                    t.email.as_deref().unwrap_or(""),
                    t.mobile1.as_deref().unwrap_or(""),
                    t.t_subject.as_deref().unwrap_or(""),
                ],
            )
        })
        .collect()
}

/// Teacher form payload; any extra form fields (photo, address, …) are kept.
pub fn upsert_teacher(repos: &Repos, mut fields: Map<String, Value>) -> Result<Teacher> {
    let name_part = |k: &str| {
        fields
            .get(k)
            .and_then(Value::as_str)
            .map(str::trim)
            .unwrap_or("")
            .to_string()
    };
    if name_part("firstName").is_empty() || name_part("lastName").is_empty() {
        return Err(invalid("Please enter teacher's full name."));
    }
    let given_id = fields.get("id").and_then(RecordId::from_value);
    let id = given_id
        .clone()
        .unwrap_or_else(|| RecordId::Text(make_id("teacher")));
    fields.insert("id".into(), json!(id));
    let teacher: Teacher = serde_json::from_value(Value::Object(fields))
        .map_err(|e| invalid(format!("invalid teacher record: {e}")))?;

    let mut teachers = repos.read_teachers();
    match teachers.iter_mut().find(|t| t.id == teacher.id) {
        Some(existing) => *existing = teacher.clone(),
        None if given_id.is_some() => return Err(not_found("teacher", id)),
        None => teachers.insert(0, teacher.clone()),
    }
    repos.write_teachers(&teachers)?;
    Ok(teacher)
}

pub fn delete_teacher(repos: &Repos, id: &str) -> Result<()> {
    let mut teachers = repos.read_teachers();
    let before = teachers.len();
    teachers.retain(|t| !t.id.matches(id));
    if teachers.len() == before {
        return Err(not_found("teacher", id));
    }
    repos.write_teachers(&teachers)?;
    Ok(())
}

pub fn list_subjects(repos: &Repos) -> Vec<Subject> {
    repos.read_subjects()
}

pub fn upsert_subject(repos: &Repos, id: Option<RecordId>, name: &str) -> Result<Subject> {
    let name = required(name, "Please enter subject name.")?;
    let mut subjects = repos.read_subjects();
    let subject = match id {
        Some(id) => {
            let Some(existing) = subjects.iter_mut().find(|s| s.id == id) else {
                return Err(not_found("subject", id));
            };
            existing.name = name;
            existing.clone()
        }
        None => {
            let subject = Subject {
                id: RecordId::Text(make_id("sub")),
                name,
            };
            subjects.insert(0, subject.clone());
            subject
        }
    };
    repos.write_subjects(&subjects)?;
    Ok(subject)
}

/// Blocked while mappings use the subject, unless `force`, which drops those
/// mappings too.
pub fn delete_subject(repos: &Repos, id: &str, force: bool) -> Result<usize> {
    let mut mappings = repos.read_class_subject_teacher();
    let used: Vec<String> = mappings
        .iter()
        .filter(|m| m.subject_id == id)
        .map(|m| m.id.to_string())
        .collect();
    if !used.is_empty() && !force {
        return Err(FeatureError::InUse {
            code: "subject_in_use",
            message: "This subject is used in mappings.".to_string(),
            details: json!({ "subjectId": id, "mappingIds": used }),
        });
    }

    let mut subjects = repos.read_subjects();
    let before = subjects.len();
    subjects.retain(|s| !s.id.matches(id));
    if subjects.len() == before {
        return Err(not_found("subject", id));
    }
    repos.write_subjects(&subjects)?;
    if !used.is_empty() {
        mappings.retain(|m| m.subject_id != id);
        repos.write_class_subject_teacher(&mappings)?;
        info!(subject_id = id, removed = used.len(), "subject mappings removed");
    }
    Ok(used.len())
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MappingInput {
    pub id: Option<RecordId>,
    #[serde(deserialize_with = "lenient::string")]
    pub class_id: String,
    #[serde(deserialize_with = "lenient::string")]
    pub subject_id: String,
    #[serde(deserialize_with = "lenient::string")]
    pub teacher_id: String,
    pub allow_duplicate: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingListing {
    #[serde(flatten)]
    pub mapping: ClassSubjectTeacher,
    pub class_label: String,
    pub subject_name: String,
    pub teacher_name: String,
}

fn subject_name(subjects: &[Subject], id: &str) -> String {
    subjects
        .iter()
        .find(|s| s.id.matches(id))
        .map(|s| s.name.clone())
        .unwrap_or_else(|| UNRESOLVED.to_string())
}

fn teacher_label(teachers: &[Teacher], id: &str) -> Option<String> {
    teachers.iter().find(|t| t.id.matches(id)).map(Teacher::label)
}

pub fn list_mappings(repos: &Repos, class_id: Option<&str>) -> Vec<MappingListing> {
    let classes = repos.read_classes();
    let subjects = repos.read_subjects();
    let teachers = repos.read_teachers();
    let class_id = class_id.map(str::trim).filter(|c| !c.is_empty());

    let mut list: Vec<ClassSubjectTeacher> = repos
        .read_class_subject_teacher()
        .into_iter()
        .filter(|m| class_id.map(|c| m.class_id == c).unwrap_or(true))
        .collect();
    list.sort_by(|a, b| match a.class_id.cmp(&b.class_id) {
        Ordering::Equal => a.subject_id.cmp(&b.subject_id),
        other => other,
    });
    list.into_iter()
        .map(|m| MappingListing {
            class_label: class_label(&classes, &m.class_id),
            subject_name: subject_name(&subjects, &m.subject_id),
            teacher_name: teacher_label(&teachers, &m.teacher_id)
                .unwrap_or_else(|| UNRESOLVED.to_string()),
            mapping: m,
        })
        .collect()
}

pub fn upsert_mapping(repos: &Repos, input: MappingInput) -> Result<ClassSubjectTeacher> {
    let class_id = required(&input.class_id, "Please select a class.")?;
    let subject_id = required(&input.subject_id, "Please select a subject.")?;
    let mut mappings = repos.read_class_subject_teacher();

    let duplicate = mappings.iter().find(|m| {
        m.class_id == class_id && m.subject_id == subject_id && Some(&m.id) != input.id.as_ref()
    });
    if let Some(dup) = duplicate {
        if !input.allow_duplicate {
            return Err(FeatureError::Duplicate {
                message: "This class already has that subject mapped.".to_string(),
                details: json!({ "existingId": dup.id }),
            });
        }
    }

    let mapping = ClassSubjectTeacher {
        id: input
            .id
            .clone()
            .unwrap_or_else(|| RecordId::Text(make_id("cst"))),
        class_id,
        subject_id,
        teacher_id: input.teacher_id.trim().to_string(),
    };
    match mappings.iter_mut().find(|m| m.id == mapping.id) {
        Some(existing) => *existing = mapping.clone(),
        None if input.id.is_some() => return Err(not_found("mapping", &mapping.id)),
        None => mappings.insert(0, mapping.clone()),
    }
    repos.write_class_subject_teacher(&mappings)?;
    Ok(mapping)
}

pub fn delete_mapping(repos: &Repos, id: &str) -> Result<()> {
    let mut mappings = repos.read_class_subject_teacher();
    let before = mappings.len();
    mappings.retain(|m| !m.id.matches(id));
    if mappings.len() == before {
        return Err(not_found("mapping", id));
    }
    repos.write_class_subject_teacher(&mappings)?;
    Ok(())
}

/// Subjects mapped to the class, in subject-list order, each once.
pub fn subjects_for_class(repos: &Repos, class_id: &str) -> Vec<Subject> {
    let mappings = repos.read_class_subject_teacher();
    repos
        .read_subjects()
        .into_iter()
        .filter(|s| {
            mappings
                .iter()
                .any(|m| m.class_id == class_id && s.id.matches(&m.subject_id))
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassTeacherEntry {
    pub subject_id: String,
    pub subject_name: String,
    pub teacher_id: String,
    pub teacher_name: String,
    pub email: Option<String>,
    pub mobile: Option<String>,
}

/// Subjects of a class with their teachers. Mappings without a resolvable teacher
/// are left out.
pub fn my_teachers(repos: &Repos, class_id: &str) -> Vec<ClassTeacherEntry> {
    let subjects = repos.read_subjects();
    let teachers = repos.read_teachers();
    list_mappings(repos, Some(class_id))
        .into_iter()
        .filter_map(|l| {
            let teacher = teachers
                .iter()
                .find(|t| t.id.matches(&l.mapping.teacher_id))?;
            Some(ClassTeacherEntry {
                subject_name: subject_name(&subjects, &l.mapping.subject_id),
                subject_id: l.mapping.subject_id,
                teacher_id: l.mapping.teacher_id,
                teacher_name: teacher.label(),
                email: teacher.email.clone(),
                mobile: teacher.mobile1.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WireError;
    use crate::store::KvStore;
    use pretty_assertions::assert_eq;

    fn class(name: &str, division: &str, medium: &str) -> ClassInput {
        ClassInput {
            id: None,
            class_name: name.into(),
            division: division.into(),
            medium: medium.into(),
        }
    }

    fn fields(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(m) => m,
            _ => panic!("fixture must be an object"),
        }
    }

    #[test]
    fn class_medium_defaults_to_english_and_filter_is_case_insensitive() {
        let store = KvStore::memory();
        let repos = Repos::new(&store);
        let c = upsert_class(&repos, class("10", "A", "")).expect("class");
        assert_eq!(c.medium, "English");
        assert_eq!(c.label(), "10-A (English)");
        upsert_class(&repos, class("9", "B", "Hindi")).expect("class");
        assert_eq!(list_classes(&repos, Some("hindi")).len(), 1);
        assert_eq!(list_classes(&repos, None).len(), 2);

        let edited = upsert_class(
            &repos,
            ClassInput {
                id: Some(c.id.clone()),
                ..class("10", "C", "Marathi")
            },
        )
        .expect("edit");
        assert_eq!(edited.id, c.id);
        assert_eq!(repos.read_classes()[0].division, "C");
        assert_eq!(
            upsert_class(&repos, class("", "A", "")).expect_err("blank").code(),
            "bad_params"
        );
    }

    #[test]
    fn new_teachers_go_first_and_keep_extra_fields() {
        let store = KvStore::memory();
        let repos = Repos::new(&store);
        upsert_teacher(&repos, fields(json!({ "firstName": "Ravi", "lastName": "Shah" })))
            .expect("first");
        let t = upsert_teacher(
            &repos,
            fields(json!({ "salutation": "Ms.", "firstName": "Meera", "lastName": "Iyer", "photo": "data:x" })),
        )
        .expect("second");
        assert!(t.id.to_string().starts_with("teacher_"));
        let all = list_teachers(&repos, None);
        assert_eq!(all[0].label(), "Ms. Meera Iyer");
        assert_eq!(all[0].extra.get("photo"), Some(&json!("data:x")));

        let e = upsert_teacher(&repos, fields(json!({ "firstName": "Solo" })))
            .expect_err("needs last name");
        assert_eq!(e.to_string(), "Please enter teacher's full name.");
    }

    #[test]
    fn subject_in_use_needs_force_and_force_removes_mappings() {
        let store = KvStore::memory();
        let repos = Repos::new(&store);
        let math = upsert_subject(&repos, None, "Maths").expect("subject");
        let sid = math.id.to_string();
        upsert_mapping(
            &repos,
            MappingInput {
                class_id: "17".into(),
                subject_id: sid.clone(),
                ..Default::default()
            },
        )
        .expect("mapping");

        let e = delete_subject(&repos, &sid, false).expect_err("in use");
        assert_eq!(e.code(), "subject_in_use");
        assert_eq!(repos.read_subjects().len(), 1);

        assert_eq!(delete_subject(&repos, &sid, true).expect("forced"), 1);
        assert!(repos.read_subjects().is_empty());
        assert!(repos.read_class_subject_teacher().is_empty());
    }

    #[test]
    fn duplicate_class_subject_pair_needs_allow_duplicate() {
        let store = KvStore::memory();
        let repos = Repos::new(&store);
        let input = MappingInput {
            class_id: "17".into(),
            subject_id: "sub_1".into(),
            teacher_id: "teacher_1".into(),
            ..Default::default()
        };
        let first = upsert_mapping(&repos, input.clone()).expect("first");
        let e = upsert_mapping(&repos, input.clone()).expect_err("duplicate");
        assert_eq!(e.code(), "duplicate_mapping");
        assert_eq!(e.details(), Some(json!({ "existingId": first.id })));

        // Editing the same mapping is not a duplicate of itself.
        upsert_mapping(
            &repos,
            MappingInput {
                id: Some(first.id.clone()),
                teacher_id: "teacher_2".into(),
                ..input.clone()
            },
        )
        .expect("edit");

        upsert_mapping(
            &repos,
            MappingInput {
                allow_duplicate: true,
                ..input
            },
        )
        .expect("allowed");
        assert_eq!(repos.read_class_subject_teacher().len(), 2);
    }

    #[test]
    fn mappings_sort_by_class_then_subject_and_resolve_names() {
        let store = KvStore::memory();
        store
            .write(
                "iq_subjects_v1",
                &json!([{ "id": "sub_a", "name": "Art" }, { "id": "sub_b", "name": "Biology" }]),
            )
            .expect("seed subjects");
        store
            .write(
                "iq_teachers_v1",
                &json!([{ "id": "teacher_1", "firstName": "Ravi", "lastName": "Shah", "email": "r@s" }]),
            )
            .expect("seed teachers");
        store
            .write(
                "iq_class_subject_teacher_v1",
                &json!([
                    { "id": "cst_3", "classId": "2", "subjectId": "sub_a", "teacherId": "teacher_1" },
                    { "id": "cst_2", "classId": 1, "subjectId": "sub_b", "teacherId": "teacher_9" },
                    { "id": "cst_1", "classId": "1", "subjectId": "sub_a", "teacherId": "teacher_1" }
                ]),
            )
            .expect("seed mappings");
        let repos = Repos::new(&store);

        let ids: Vec<String> = list_mappings(&repos, None)
            .iter()
            .map(|l| l.mapping.id.to_string())
            .collect();
        assert_eq!(ids, vec!["cst_1", "cst_2", "cst_3"]);

        let names: Vec<String> = subjects_for_class(&repos, "1")
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["Art", "Biology"]);

        let mine = my_teachers(&repos, "1");
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].subject_name, "Art");
        assert_eq!(mine[0].teacher_name, "Ravi Shah");
        assert_eq!(mine[0].email.as_deref(), Some("r@s"));
    }
}
