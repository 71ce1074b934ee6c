use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Experience {
    pub id: i64,
    pub candidate_id: i64,
    pub job_title: String,
    pub company_name: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub is_current_job: bool,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Education {
    pub id: i64,
    pub candidate_id: i64,
    pub degree_name: String,
    pub major: String,
    pub institution_name: String,
    pub start_date: Option<NaiveDate>,
    pub completion_date: Option<NaiveDate>,
    pub grade: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Certification {
    pub id: i64,
    pub candidate_id: i64,
    pub name: String,
    pub issuing_organization: String,
    pub issue_date: Option<NaiveDate>,
    pub expiration_date: Option<NaiveDate>,
    pub credential_id: Option<String>,
    pub credential_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Project {
    pub id: i64,
    pub candidate_id: i64,
    pub name: String,
    pub description: String,
    pub role: Option<String>,
    pub technologies: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub is_current: bool,
    pub project_url: Option<String>,
    pub repository_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Language {
    pub id: i64,
    pub candidate_id: i64,
    pub name: String,
    pub proficiency: Option<String>,
    pub can_read: bool,
    pub can_write: bool,
    pub can_speak: bool,
    pub created_at: DateTime<Utc>,
}

/// Section payloads as accepted by the store. Each variant carries the
/// fields of one resume table, without ids or timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "section", rename_all = "snake_case")]
pub enum ResumeEntry {
    Experience(ExperienceFields),
    Education(EducationFields),
    Certification(CertificationFields),
    Project(ProjectFields),
    Language(LanguageFields),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResumeSection {
    Experience,
    Education,
    Certification,
    Project,
    Language,
}

impl ResumeEntry {
    pub fn section(&self) -> ResumeSection {
        match self {
            ResumeEntry::Experience(_) => ResumeSection::Experience,
            ResumeEntry::Education(_) => ResumeSection::Education,
            ResumeEntry::Certification(_) => ResumeSection::Certification,
            ResumeEntry::Project(_) => ResumeSection::Project,
            ResumeEntry::Language(_) => ResumeSection::Language,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperienceFields {
    pub job_title: String,
    pub company_name: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_current_job: bool,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EducationFields {
    pub degree_name: String,
    pub major: String,
    pub institution_name: String,
    pub start_date: Option<NaiveDate>,
    pub completion_date: Option<NaiveDate>,
    pub grade: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CertificationFields {
    pub name: String,
    pub issuing_organization: String,
    pub issue_date: Option<NaiveDate>,
    pub expiration_date: Option<NaiveDate>,
    pub credential_id: Option<String>,
    pub credential_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectFields {
    pub name: String,
    pub description: String,
    pub role: Option<String>,
    pub technologies: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_current: bool,
    pub project_url: Option<String>,
    pub repository_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageFields {
    pub name: String,
    pub proficiency: Option<String>,
    #[serde(default = "yes")]
    pub can_read: bool,
    #[serde(default = "yes")]
    pub can_write: bool,
    #[serde(default = "yes")]
    pub can_speak: bool,
}

fn yes() -> bool {
    true
}

/// Every resume section of one candidate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Resume {
    pub experiences: Vec<Experience>,
    pub educations: Vec<Education>,
    pub certifications: Vec<Certification>,
    pub projects: Vec<Project>,
    pub languages: Vec<Language>,
}

/// A stored row of any resume section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResumeRecord {
    Experience(Experience),
    Education(Education),
    Certification(Certification),
    Project(Project),
    Language(Language),
}

impl ResumeRecord {
    pub fn id(&self) -> i64 {
        match self {
            ResumeRecord::Experience(r) => r.id,
            ResumeRecord::Education(r) => r.id,
            ResumeRecord::Certification(r) => r.id,
            ResumeRecord::Project(r) => r.id,
            ResumeRecord::Language(r) => r.id,
        }
    }
}

impl ResumeSection {
    pub fn table(&self) -> &'static str {
        match self {
            ResumeSection::Experience => "experiences",
            ResumeSection::Education => "educations",
            ResumeSection::Certification => "certifications",
            ResumeSection::Project => "projects",
            ResumeSection::Language => "languages",
        }
    }
}

impl std::str::FromStr for ResumeSection {
    type Err = String;

    /// Accepts the plural URL segment (`experiences`) as well as the singular.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "experiences" | "experience" => Ok(ResumeSection::Experience),
            "educations" | "education" => Ok(ResumeSection::Education),
            "certifications" | "certification" => Ok(ResumeSection::Certification),
            "projects" | "project" => Ok(ResumeSection::Project),
            "languages" | "language" => Ok(ResumeSection::Language),
            other => Err(format!("unknown resume section '{}'", other)),
        }
    }
}
