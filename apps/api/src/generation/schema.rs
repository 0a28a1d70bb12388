//! Resume schema — the one declaration of the `ResumeDocument` shape.
//!
//! The prompt template, the JSON Schema sent with schema-constrained calls,
//! and the normalizer's repair rules are all derived from `RESUME_FIELDS`.
//! Editing a field here changes what we ask the model for and what we accept
//! back, together.

use serde_json::{json, Map, Value};

/// Name attached to the schema in provider requests.
pub const SCHEMA_NAME: &str = "resume_document";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    TextList,
    Object(&'static [FieldSpec]),
    ObjectList(&'static [FieldSpec]),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub hint: &'static str,
}

const fn required(name: &'static str, kind: FieldKind, hint: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        kind,
        required: true,
        hint,
    }
}

const fn optional(name: &'static str, kind: FieldKind, hint: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        kind,
        required: false,
        hint,
    }
}

const CONTACT_FIELDS: &[FieldSpec] = &[
    optional("email", FieldKind::Text, "email address"),
    optional("phone", FieldKind::Text, "phone number"),
    optional("location", FieldKind::Text, "city, region"),
    optional("website", FieldKind::Text, "personal site URL"),
    optional("linkedin", FieldKind::Text, "LinkedIn URL"),
    optional("github", FieldKind::Text, "GitHub URL"),
];

const SKILLS_FIELDS: &[FieldSpec] = &[
    required("core", FieldKind::TextList, "skills most relevant to the target job"),
    optional("tools", FieldKind::TextList, "tools, frameworks, platforms"),
    optional("other", FieldKind::TextList, "anything else worth listing"),
];

const EXPERIENCE_FIELDS: &[FieldSpec] = &[
    required("company", FieldKind::Text, "employer name"),
    required("role", FieldKind::Text, "job title held"),
    optional("location", FieldKind::Text, "city or Remote"),
    optional("startDate", FieldKind::Text, "e.g. Jan 2021"),
    optional("endDate", FieldKind::Text, "e.g. Present"),
    required(
        "bullets",
        FieldKind::TextList,
        "one short verb-led accomplishment per item",
    ),
];

const PROJECT_FIELDS: &[FieldSpec] = &[
    required("name", FieldKind::Text, "project name"),
    required("description", FieldKind::Text, "one sentence"),
    optional("bullets", FieldKind::TextList, "verb-led highlights"),
    optional("link", FieldKind::Text, "URL"),
    optional("technologies", FieldKind::TextList, "technologies used"),
];

const EDUCATION_FIELDS: &[FieldSpec] = &[
    required("school", FieldKind::Text, "institution name"),
    optional("degree", FieldKind::Text, "degree and field"),
    optional("graduationDate", FieldKind::Text, "e.g. May 2019"),
    optional("details", FieldKind::TextList, "honors, coursework, GPA"),
];

pub const RESUME_FIELDS: &[FieldSpec] = &[
    required("name", FieldKind::Text, "candidate full name"),
    required("title", FieldKind::Text, "headline aligned with the target role"),
    required("contact", FieldKind::Object(CONTACT_FIELDS), ""),
    required("summary", FieldKind::Text, "2-3 sentences"),
    required("skills", FieldKind::Object(SKILLS_FIELDS), ""),
    required(
        "experience",
        FieldKind::ObjectList(EXPERIENCE_FIELDS),
        "most relevant roles first",
    ),
    optional("projects", FieldKind::ObjectList(PROJECT_FIELDS), ""),
    optional("education", FieldKind::ObjectList(EDUCATION_FIELDS), ""),
    optional("certifications", FieldKind::TextList, "certification names"),
];

/// JSON Schema for the resume, used as the formal constraint on tier-1 calls.
pub fn json_schema() -> Value {
    object_schema(RESUME_FIELDS)
}

fn object_schema(fields: &[FieldSpec]) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();
    for field in fields {
        properties.insert(field.name.to_string(), field_schema(field));
        if field.required {
            required.push(Value::from(field.name));
        }
    }
    json!({
        "type": "object",
        "properties": properties,
        "required": required,
        "additionalProperties": false,
    })
}

fn field_schema(field: &FieldSpec) -> Value {
    let mut schema = match field.kind {
        FieldKind::Text => json!({"type": "string"}),
        FieldKind::TextList => json!({"type": "array", "items": {"type": "string"}}),
        FieldKind::Object(inner) => object_schema(inner),
        FieldKind::ObjectList(inner) => json!({"type": "array", "items": object_schema(inner)}),
    };
    if !field.hint.is_empty() {
        schema["description"] = Value::from(field.hint);
    }
    schema
}

/// Structural template embedded in prompts: every field name with its type,
/// requiredness, and hint in place of a value.
pub fn template() -> Value {
    object_template(RESUME_FIELDS)
}

/// `template()` pretty-printed for prompt embedding.
pub fn template_text() -> String {
    format!("{:#}", template())
}

fn object_template(fields: &[FieldSpec]) -> Value {
    let map: Map<String, Value> = fields
        .iter()
        .map(|field| (field.name.to_string(), field_template(field)))
        .collect();
    Value::Object(map)
}

fn field_template(field: &FieldSpec) -> Value {
    let marker = if field.required { "required" } else { "optional" };
    let describe = |kind: &str| {
        if field.hint.is_empty() {
            format!("{kind} ({marker})")
        } else {
            format!("{kind} ({marker}): {}", field.hint)
        }
    };
    match field.kind {
        FieldKind::Text => Value::String(describe("string")),
        FieldKind::TextList => json!([describe("string")]),
        FieldKind::Object(inner) => object_template(inner),
        FieldKind::ObjectList(inner) => json!([object_template(inner)]),
    }
}
