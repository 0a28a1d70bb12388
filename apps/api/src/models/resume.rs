use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The structured, normalized resume returned by every generation call.
///
/// Field layout mirrors `generation::schema::RESUME_FIELDS`; the two are kept in
/// agreement by tests. Never mutated after generation: refinement produces a
/// new document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeDocument {
    pub name: String,
    pub title: String,
    #[serde(default)]
    pub contact: Contact,
    pub summary: String,
    #[serde(default)]
    pub skills: Skills,
    #[serde(default)]
    pub experience: Vec<ExperienceEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projects: Option<Vec<ProjectEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education: Option<Vec<EducationEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certifications: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
}

impl Contact {
    /// Present contact values in display order.
    pub fn items(&self) -> Vec<&str> {
        [
            &self.email,
            &self.phone,
            &self.location,
            &self.website,
            &self.linkedin,
            &self.github,
        ]
        .into_iter()
        .filter_map(|v| v.as_deref())
        .filter(|v| !v.trim().is_empty())
        .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Skills {
    #[serde(default)]
    pub core: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceEntry {
    pub company: String,
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default)]
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectEntry {
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bullets: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technologies: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationEntry {
    pub school: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub degree: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graduation_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

/// One user action against the generation pipeline. Never persisted.
///
/// `prior_resume` stays untyped until the service has shape-checked it, so a
/// malformed client payload surfaces as a refinement error instead of a body
/// rejection.
#[derive(Debug, Clone)]
pub enum GenerationRequest {
    Fresh {
        about_me: String,
        target_text: String,
    },
    Refine {
        prior_resume: Value,
        feedback: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resume_deserializes_camel_case_fields() {
        let resume: ResumeDocument = serde_json::from_value(json!({
            "name": "Ada Lovelace",
            "title": "Analytical Engineer",
            "summary": "Builds engines.",
            "experience": [{
                "company": "Babbage & Co",
                "role": "Programmer",
                "startDate": "1842",
                "endDate": "1843",
                "bullets": ["Wrote the first published algorithm"]
            }],
            "education": [{"school": "Home", "graduationDate": "1835"}]
        }))
        .unwrap();

        assert_eq!(resume.experience[0].start_date.as_deref(), Some("1842"));
        assert_eq!(
            resume.education.unwrap()[0].graduation_date.as_deref(),
            Some("1835")
        );
        assert!(resume.skills.core.is_empty());
    }

    #[test]
    fn test_absent_optionals_are_omitted_when_serialized() {
        let resume = ResumeDocument {
            name: "A".to_string(),
            title: "B".to_string(),
            summary: "C".to_string(),
            ..Default::default()
        };
        let value = serde_json::to_value(&resume).unwrap();

        assert_eq!(value["contact"], json!({}));
        assert_eq!(value["skills"], json!({"core": []}));
        assert_eq!(value["experience"], json!([]));
        assert!(value.get("projects").is_none());
        assert!(value.get("certifications").is_none());
    }

    #[test]
    fn test_contact_items_skip_absent_and_blank() {
        let contact = Contact {
            email: Some("a@b.dev".to_string()),
            phone: Some("  ".to_string()),
            github: Some("github.com/a".to_string()),
            ..Default::default()
        };
        assert_eq!(contact.items(), vec!["a@b.dev", "github.com/a"]);
    }

    #[test]
    fn test_resume_requires_name_when_deserialized() {
        let result: Result<ResumeDocument, _> =
            serde_json::from_value(json!({"title": "T", "summary": "S"}));
        assert!(result.is_err());
    }
}
