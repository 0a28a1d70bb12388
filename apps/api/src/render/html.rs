use serde::Serialize;
use tera::{Context, Tera};

use crate::models::resume::{EducationEntry, ExperienceEntry, ProjectEntry, ResumeDocument};
use crate::render::ExportError;

/// Template name; the `.html` suffix turns on tera's autoescaping.
const TEMPLATE_NAME: &str = "resume.html";

const RESUME_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{{ name }}</title>
<style>
  @page { size: letter; margin: 0.5in; }
  body { font-family: "Helvetica Neue", Arial, sans-serif; font-size: 10.5pt; line-height: 1.3; color: #222; margin: 0; }
  header { text-align: center; margin-bottom: 8px; }
  h1 { font-size: 20pt; margin: 0; }
  h2 { font-size: 11pt; text-transform: uppercase; letter-spacing: 0.05em; border-bottom: 1px solid #999; margin: 10px 0 4px; }
  .title { font-size: 11.5pt; color: #444; }
  .contact { font-size: 9.5pt; color: #555; margin-top: 2px; }
  .entry-head, .entry-sub { display: flex; justify-content: space-between; }
  .entry-head { font-weight: 600; }
  .entry-sub { font-style: italic; color: #444; }
  ul { margin: 2px 0 6px 18px; padding: 0; }
  p { margin: 0 0 4px; }
</style>
</head>
<body>
<header>
  <h1>{{ name }}</h1>
  {% if title %}<div class="title">{{ title }}</div>{% endif %}
  {% if contact %}<div class="contact">{{ contact | join(sep=" | ") }}</div>{% endif %}
</header>
{% if summary %}
<section class="summary">
  <h2>Summary</h2>
  <p>{{ summary }}</p>
</section>
{% endif %}
{% if skill_groups %}
<section class="skills">
  <h2>Skills</h2>
  {% for group in skill_groups %}<p><strong>{{ group.label }}:</strong> {{ group.items }}</p>
  {% endfor %}
</section>
{% endif %}
{% if experience %}
<section class="experience">
  <h2>Experience</h2>
  {% for job in experience %}
  <div class="entry">
    <div class="entry-head"><span>{{ job.role }}{% if job.company %}, {{ job.company }}{% endif %}</span><span>{{ job.dates }}</span></div>
    {% if job.location %}<div class="entry-sub"><span>{{ job.location }}</span></div>{% endif %}
    {% if job.bullets %}<ul>{% for bullet in job.bullets %}<li>{{ bullet }}</li>{% endfor %}</ul>{% endif %}
  </div>
  {% endfor %}
</section>
{% endif %}
{% if projects %}
<section class="projects">
  <h2>Projects</h2>
  {% for project in projects %}
  <div class="entry">
    <div class="entry-head"><span>{{ project.name }}</span><span>{{ project.link }}</span></div>
    <p>{{ project.description }}{% if project.technologies %} ({{ project.technologies }}){% endif %}</p>
    {% if project.bullets %}<ul>{% for bullet in project.bullets %}<li>{{ bullet }}</li>{% endfor %}</ul>{% endif %}
  </div>
  {% endfor %}
</section>
{% endif %}
{% if education %}
<section class="education">
  <h2>Education</h2>
  {% for school in education %}
  <div class="entry">
    <div class="entry-head"><span>{{ school.school }}</span><span>{{ school.graduation_date }}</span></div>
    {% if school.degree %}<div class="entry-sub"><span>{{ school.degree }}</span></div>{% endif %}
    {% if school.details %}<ul>{% for detail in school.details %}<li>{{ detail }}</li>{% endfor %}</ul>{% endif %}
  </div>
  {% endfor %}
</section>
{% endif %}
{% if certifications %}
<section class="certifications">
  <h2>Certifications</h2>
  <p>{{ certifications | join(sep=", ") }}</p>
</section>
{% endif %}
</body>
</html>
"#;

// Flattened view handed to the template. Every key is always present so the
// template only branches on emptiness, never on existence.

#[derive(Serialize)]
struct ResumeView<'a> {
    name: &'a str,
    title: &'a str,
    contact: Vec<&'a str>,
    summary: &'a str,
    skill_groups: Vec<SkillGroup>,
    experience: Vec<ExperienceView<'a>>,
    projects: Vec<ProjectView<'a>>,
    education: Vec<EducationView<'a>>,
    certifications: &'a [String],
}

#[derive(Serialize)]
struct SkillGroup {
    label: &'static str,
    items: String,
}

#[derive(Serialize)]
struct ExperienceView<'a> {
    company: &'a str,
    role: &'a str,
    location: &'a str,
    dates: String,
    bullets: &'a [String],
}

#[derive(Serialize)]
struct ProjectView<'a> {
    name: &'a str,
    description: &'a str,
    link: &'a str,
    technologies: String,
    bullets: &'a [String],
}

#[derive(Serialize)]
struct EducationView<'a> {
    school: &'a str,
    degree: &'a str,
    graduation_date: &'a str,
    details: &'a [String],
}

impl<'a> From<&'a ResumeDocument> for ResumeView<'a> {
    fn from(resume: &'a ResumeDocument) -> Self {
        let skills = &resume.skills;
        let skill_groups = [
            ("Core", Some(&skills.core)),
            ("Tools", skills.tools.as_ref()),
            ("Other", skills.other.as_ref()),
        ]
        .into_iter()
        .filter_map(|(label, items)| {
            let items = join_nonempty(items?);
            (!items.is_empty()).then_some(SkillGroup { label, items })
        })
        .collect();

        Self {
            name: &resume.name,
            title: &resume.title,
            contact: resume.contact.items(),
            summary: &resume.summary,
            skill_groups,
            experience: resume.experience.iter().map(ExperienceView::from).collect(),
            projects: resume
                .projects
                .iter()
                .flatten()
                .map(ProjectView::from)
                .collect(),
            education: resume
                .education
                .iter()
                .flatten()
                .map(EducationView::from)
                .collect(),
            certifications: resume.certifications.as_deref().unwrap_or_default(),
        }
    }
}

impl<'a> From<&'a ExperienceEntry> for ExperienceView<'a> {
    fn from(entry: &'a ExperienceEntry) -> Self {
        let dates = match (entry.start_date.as_deref(), entry.end_date.as_deref()) {
            (Some(start), Some(end)) => format!("{start} - {end}"),
            (Some(only), None) | (None, Some(only)) => only.to_string(),
            (None, None) => String::new(),
        };
        Self {
            company: &entry.company,
            role: &entry.role,
            location: entry.location.as_deref().unwrap_or_default(),
            dates,
            bullets: &entry.bullets,
        }
    }
}

impl<'a> From<&'a ProjectEntry> for ProjectView<'a> {
    fn from(entry: &'a ProjectEntry) -> Self {
        Self {
            name: &entry.name,
            description: &entry.description,
            link: entry.link.as_deref().unwrap_or_default(),
            technologies: entry
                .technologies
                .as_ref()
                .map(|t| join_nonempty(t))
                .unwrap_or_default(),
            bullets: entry.bullets.as_deref().unwrap_or_default(),
        }
    }
}

impl<'a> From<&'a EducationEntry> for EducationView<'a> {
    fn from(entry: &'a EducationEntry) -> Self {
        Self {
            school: &entry.school,
            degree: entry.degree.as_deref().unwrap_or_default(),
            graduation_date: entry.graduation_date.as_deref().unwrap_or_default(),
            details: entry.details.as_deref().unwrap_or_default(),
        }
    }
}

fn join_nonempty(items: &[String]) -> String {
    items
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Renders a resume to a standalone, print-ready HTML page.
pub fn render_resume_html(resume: &ResumeDocument) -> Result<String, ExportError> {
    let mut tera = Tera::default();
    tera.add_raw_template(TEMPLATE_NAME, RESUME_TEMPLATE)?;

    let context = Context::from_serialize(ResumeView::from(resume))?;
    Ok(tera.render(TEMPLATE_NAME, &context)?)
}
