use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::models::resume::{
    CertificationFields, EducationFields, ExperienceFields, LanguageFields, ProjectFields, Resume,
    ResumeEntry, ResumeRecord, ResumeSection,
};

/// Decodes a section body (no `section` tag, the URL names it) and checks the
/// fields every section shares: mandatory text and chronological dates.
pub fn parse_entry(section: ResumeSection, body: Value) -> Result<ResumeEntry> {
    let entry = match section {
        ResumeSection::Experience => {
            let f: ExperienceFields = serde_json::from_value(body)?;
            require(&[("job_title", &f.job_title), ("company_name", &f.company_name)])?;
            if !f.is_current_job {
                ordered("start_date", f.start_date, "end_date", f.end_date)?;
            }
            ResumeEntry::Experience(f)
        }
        ResumeSection::Education => {
            let f: EducationFields = serde_json::from_value(body)?;
            require(&[
                ("degree_name", &f.degree_name),
                ("major", &f.major),
                ("institution_name", &f.institution_name),
            ])?;
            ordered("start_date", f.start_date, "completion_date", f.completion_date)?;
            ResumeEntry::Education(f)
        }
        ResumeSection::Certification => {
            let f: CertificationFields = serde_json::from_value(body)?;
            require(&[
                ("name", &f.name),
                ("issuing_organization", &f.issuing_organization),
            ])?;
            ordered("issue_date", f.issue_date, "expiration_date", f.expiration_date)?;
            ResumeEntry::Certification(f)
        }
        ResumeSection::Project => {
            let f: ProjectFields = serde_json::from_value(body)?;
            require(&[("name", &f.name), ("description", &f.description)])?;
            if !f.is_current {
                ordered("start_date", f.start_date, "end_date", f.end_date)?;
            }
            ResumeEntry::Project(f)
        }
        ResumeSection::Language => {
            let f: LanguageFields = serde_json::from_value(body)?;
            require(&[("name", &f.name)])?;
            ResumeEntry::Language(f)
        }
    };
    Ok(entry)
}

fn require(fields: &[(&str, &String)]) -> Result<()> {
    for (name, value) in fields {
        if value.trim().is_empty() {
            return Err(Error::BadRequest(format!("{} is required", name)));
        }
    }
    Ok(())
}

fn ordered(
    start_name: &str,
    start: Option<NaiveDate>,
    end_name: &str,
    end: Option<NaiveDate>,
) -> Result<()> {
    if let (Some(start), Some(end)) = (start, end) {
        if end < start {
            return Err(Error::BadRequest(format!(
                "{} must not be before {}",
                end_name, start_name
            )));
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeEntryResponse {
    pub message: String,
    pub entry: ResumeRecord,
}

/// `GET /api/resume/complete`: every section plus a completeness summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompleteResumeResponse {
    #[serde(flatten)]
    pub resume: Resume,
    pub sections_filled: usize,
}

impl From<Resume> for CompleteResumeResponse {
    fn from(resume: Resume) -> Self {
        let sections_filled = [
            !resume.experiences.is_empty(),
            !resume.educations.is_empty(),
            !resume.certifications.is_empty(),
            !resume.projects.is_empty(),
            !resume.languages.is_empty(),
        ]
        .into_iter()
        .filter(|filled| *filled)
        .count();
        Self {
            resume,
            sections_filled,
        }
    }
}
