//! Response Normalizer — turns provisional provider JSON into a `ResumeDocument`.
//!
//! Repair is driven by `schema::RESUME_FIELDS`:
//! - required list absent or not a list → `[]`
//! - required object absent or not an object → `{}`, then repaired (so a
//!   missing `skills` becomes `{ "core": [] }`)
//! - required text absent → `""`
//! - string lists keep strings, stringify numbers/booleans, drop the rest
//! - object lists drop non-object items
//! - optional fields of the wrong type and unknown fields are dropped
//!
//! Pure and idempotent. No bullet-count or length policy lives here.

use serde_json::{Map, Value};
use tracing::warn;

use crate::generation::schema::{FieldKind, FieldSpec, RESUME_FIELDS};
use crate::models::resume::ResumeDocument;

/// Normalizes raw provider output into a strictly typed resume.
pub fn normalize(raw: Value) -> ResumeDocument {
    let repaired = repair(raw);
    match serde_json::from_value(repaired) {
        Ok(resume) => resume,
        Err(e) => {
            // Unreachable while schema and model agree (see tests).
            warn!("Repaired resume did not match the typed model: {e}");
            ResumeDocument::default()
        }
    }
}

/// Schema-driven repair of an untyped value. Exposed for callers that need the
/// repaired JSON rather than the typed document.
pub fn repair(raw: Value) -> Value {
    let input = match raw {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    Value::Object(repair_object(input, RESUME_FIELDS))
}

fn repair_object(mut input: Map<String, Value>, fields: &[FieldSpec]) -> Map<String, Value> {
    let mut output = Map::new();
    for field in fields {
        if let Some(value) = repair_field(field, input.remove(field.name)) {
            output.insert(field.name.to_string(), value);
        }
    }
    output
}

fn repair_field(field: &FieldSpec, value: Option<Value>) -> Option<Value> {
    let repaired = match (field.kind, value) {
        (_, None) | (_, Some(Value::Null)) => None,
        (FieldKind::Text, Some(value)) => scalar_text(value).map(Value::String),
        (FieldKind::TextList, Some(Value::Array(items))) => Some(Value::Array(
            items
                .into_iter()
                .filter_map(scalar_text)
                .map(Value::String)
                .collect(),
        )),
        (FieldKind::Object(inner), Some(Value::Object(map))) => {
            Some(Value::Object(repair_object(map, inner)))
        }
        (FieldKind::ObjectList(inner), Some(Value::Array(items))) => Some(Value::Array(
            items
                .into_iter()
                .filter_map(|item| match item {
                    Value::Object(map) => Some(Value::Object(repair_object(map, inner))),
                    _ => None,
                })
                .collect(),
        )),
        _ => None,
    };

    match repaired {
        Some(value) => Some(value),
        None if field.required => Some(empty_value(field.kind)),
        None => None,
    }
}

fn empty_value(kind: FieldKind) -> Value {
    match kind {
        FieldKind::Text => Value::String(String::new()),
        FieldKind::TextList | FieldKind::ObjectList(_) => Value::Array(Vec::new()),
        FieldKind::Object(inner) => Value::Object(repair_object(Map::new(), inner)),
    }
}

fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::testing::sample_resume_json;
    use crate::models::resume::{Contact, EducationEntry, ExperienceEntry, ProjectEntry, Skills};
    use serde_json::json;

    fn renormalize(resume: &ResumeDocument) -> ResumeDocument {
        normalize(serde_json::to_value(resume).unwrap())
    }

    #[test]
    fn test_missing_required_collections_get_empty_defaults() {
        let resume = normalize(json!({
            "name": "Ada",
            "title": "Engineer",
            "summary": "Builds things."
        }));
        assert!(resume.experience.is_empty());
        assert!(resume.skills.core.is_empty());
        assert_eq!(resume.contact, Contact::default());
        assert!(resume.projects.is_none());
    }

    #[test]
    fn test_wrong_typed_required_fields_are_replaced() {
        let repaired = repair(json!({
            "name": "Ada",
            "title": "Engineer",
            "summary": "S",
            "skills": "Rust, Go",
            "experience": {"company": "X"}
        }));
        assert_eq!(repaired["skills"], json!({"core": []}));
        assert_eq!(repaired["experience"], json!([]));
    }

    #[test]
    fn test_skills_without_core_gets_core() {
        let resume = normalize(json!({
            "name": "A", "title": "B", "summary": "C",
            "skills": {"tools": ["Docker"]}
        }));
        assert!(resume.skills.core.is_empty());
        assert_eq!(resume.skills.tools, Some(vec!["Docker".to_string()]));
    }

    #[test]
    fn test_string_lists_hold_only_strings() {
        let resume = normalize(json!({
            "name": "A", "title": "B", "summary": "C",
            "skills": {"core": ["Rust", 42, true, {"nested": "x"}, ["y"], null]},
            "certifications": ["CKA", {"name": "AWS"}]
        }));
        assert_eq!(resume.skills.core, vec!["Rust", "42", "true"]);
        assert_eq!(resume.certifications, Some(vec!["CKA".to_string()]));
    }

    #[test]
    fn test_experience_entries_are_repaired() {
        let resume = normalize(json!({
            "name": "A", "title": "B", "summary": "C",
            "experience": [
                {"company": "Acme", "role": "SRE"},
                "not an entry",
                {"company": "Initech", "role": "Dev", "bullets": ["Shipped v2"], "extra": 1}
            ]
        }));
        assert_eq!(resume.experience.len(), 2);
        assert!(resume.experience[0].bullets.is_empty());
        assert_eq!(resume.experience[1].bullets, vec!["Shipped v2"]);
    }

    #[test]
    fn test_missing_required_text_becomes_empty_string() {
        let resume = normalize(json!({"experience": [{"bullets": ["x"]}]}));
        assert_eq!(resume.name, "");
        assert_eq!(resume.experience[0].company, "");
        assert_eq!(resume.experience[0].role, "");
    }

    #[test]
    fn test_optional_fields_of_wrong_type_are_dropped() {
        let resume = normalize(json!({
            "name": "A", "title": "B", "summary": "C",
            "contact": {"email": "a@b.dev", "phone": ["nope"], "fax": "123"},
            "projects": "none",
            "education": null
        }));
        assert_eq!(resume.contact.email.as_deref(), Some("a@b.dev"));
        assert!(resume.contact.phone.is_none());
        assert!(resume.projects.is_none());
        assert!(resume.education.is_none());
    }

    #[test]
    fn test_non_object_input_yields_empty_document() {
        let resume = normalize(json!(["not", "a", "resume"]));
        assert_eq!(resume, ResumeDocument::default());
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let inputs = vec![
            sample_resume_json(),
            json!({}),
            json!({"skills": null, "experience": [1, {"bullets": [2]}]}),
            json!({"name": 7, "contact": "x", "education": [{"details": ["a", {}]}]}),
        ];
        for input in inputs {
            let once = normalize(input.clone());
            assert_eq!(renormalize(&once), once, "not idempotent for {input}");
        }
    }

    #[test]
    fn test_well_formed_document_passes_through_unchanged() {
        let resume = ResumeDocument {
            name: "Ada Lovelace".to_string(),
            title: "Engineer".to_string(),
            contact: Contact {
                email: Some("ada@example.com".to_string()),
                ..Default::default()
            },
            summary: "Builds engines.".to_string(),
            skills: Skills {
                core: vec!["Rust".to_string()],
                tools: Some(vec!["Git".to_string()]),
                other: None,
            },
            experience: vec![ExperienceEntry {
                company: "Acme".to_string(),
                role: "Engineer".to_string(),
                location: Some("Remote".to_string()),
                start_date: Some("2020".to_string()),
                end_date: None,
                bullets: vec!["Cut latency 40%".to_string()],
            }],
            projects: Some(vec![ProjectEntry {
                name: "Engine".to_string(),
                description: "A difference engine".to_string(),
                bullets: None,
                link: Some("https://example.com".to_string()),
                technologies: Some(vec!["Brass".to_string()]),
            }]),
            education: Some(vec![EducationEntry {
                school: "Home".to_string(),
                degree: Some("BSc".to_string()),
                graduation_date: Some("1835".to_string()),
                details: Some(vec!["Honors".to_string()]),
            }]),
            certifications: Some(vec!["CKA".to_string()]),
        };
        assert_eq!(renormalize(&resume), resume);
    }

    /// Every schema field must survive a serialize → repair cycle of a fully
    /// populated document; a rename on one side only would drop it here.
    #[test]
    fn test_schema_and_model_agree_on_field_names() {
        let full = sample_resume_json();
        let resume = normalize(full.clone());
        let value = serde_json::to_value(&resume).unwrap();
        assert_eq!(value, full);
    }
}
