use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use validator::{Validate, ValidationError};

use crate::models::job::{Job, JobChanges, JobDetails, JobSkill, NewJob, NewJobSkill};
use crate::services::job_filter::JobSort;
use crate::utils::pagination::Page;
use crate::utils::salary::salary_problem;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct JobSkillPayload {
    pub skill_id: i64,
    #[serde(default)]
    pub is_required: bool,
    #[validate(range(min = 1, max = 5))]
    #[serde(default = "default_proficiency")]
    pub proficiency_level: i16,
}

fn default_proficiency() -> i16 {
    3
}

impl From<JobSkillPayload> for NewJobSkill {
    fn from(value: JobSkillPayload) -> Self {
        Self {
            skill_id: value.skill_id,
            is_required: value.is_required,
            proficiency_level: value.proficiency_level,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_create_salary_range"))]
pub struct CreateJobPayload {
    #[validate(length(min = 1, max = 100))]
    pub title: String,
    #[validate(length(min = 1))]
    pub description: String,
    pub requirements: Option<String>,
    pub responsibilities: Option<String>,
    pub benefits: Option<String>,
    pub area: Option<String>,
    pub area_id: Option<i64>,
    pub seniority_level: Option<String>,
    pub work_modality: Option<String>,
    pub contract_type: Option<String>,
    pub min_salary: Option<Decimal>,
    pub max_salary: Option<Decimal>,
    #[validate(length(min = 3, max = 10))]
    pub salary_currency: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    #[serde(default)]
    pub is_company_hidden: bool,
    pub expires_at: Option<DateTime<Utc>>,
    #[validate(nested)]
    #[serde(default)]
    pub skills: Vec<JobSkillPayload>,
}

/// Present-but-null fields deserialize to `Some(None)` so they can clear a column.
fn nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
#[validate(schema(function = "validate_update_salary_range"))]
pub struct UpdateJobPayload {
    #[validate(length(min = 1, max = 100))]
    pub title: Option<String>,
    #[validate(length(min = 1))]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub requirements: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub responsibilities: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub benefits: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub area: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub area_id: Option<Option<i64>>,
    #[serde(default, deserialize_with = "nullable")]
    pub seniority_level: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub work_modality: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub contract_type: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub min_salary: Option<Option<Decimal>>,
    #[serde(default, deserialize_with = "nullable")]
    pub max_salary: Option<Option<Decimal>>,
    #[validate(length(min = 3, max = 10))]
    pub salary_currency: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub city: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub state: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub country: Option<Option<String>>,
    pub is_company_hidden: Option<bool>,
    #[serde(default, deserialize_with = "nullable")]
    pub expires_at: Option<Option<DateTime<Utc>>>,
    #[validate(nested)]
    pub skills: Option<Vec<JobSkillPayload>>,
}

fn check_salary_range(min: Option<Decimal>, max: Option<Decimal>) -> Result<(), ValidationError> {
    if let Some(problem) = [min, max].into_iter().flatten().find_map(salary_problem) {
        return Err(ValidationError::new(problem.code()));
    }
    if let (Some(min), Some(max)) = (min, max) {
        if min > max {
            return Err(ValidationError::new("min_salary_exceeds_max_salary"));
        }
    }
    Ok(())
}

fn validate_create_salary_range(payload: &CreateJobPayload) -> Result<(), ValidationError> {
    check_salary_range(payload.min_salary, payload.max_salary)
}

fn validate_update_salary_range(payload: &UpdateJobPayload) -> Result<(), ValidationError> {
    check_salary_range(payload.min_salary.flatten(), payload.max_salary.flatten())
}

impl CreateJobPayload {
    pub fn into_new_job(self, company_id: i64) -> NewJob {
        NewJob {
            company_id,
            title: self.title,
            description: self.description,
            requirements: self.requirements,
            responsibilities: self.responsibilities,
            benefits: self.benefits,
            area: self.area,
            area_id: self.area_id,
            seniority_level: self.seniority_level,
            work_modality: self.work_modality,
            contract_type: self.contract_type,
            min_salary: self.min_salary,
            max_salary: self.max_salary,
            salary_currency: self.salary_currency,
            city: self.city,
            state: self.state,
            country: self.country,
            is_company_hidden: self.is_company_hidden,
            expires_at: self.expires_at,
            skills: self.skills.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<UpdateJobPayload> for JobChanges {
    fn from(value: UpdateJobPayload) -> Self {
        Self {
            title: value.title,
            description: value.description,
            requirements: value.requirements,
            responsibilities: value.responsibilities,
            benefits: value.benefits,
            area: value.area,
            area_id: value.area_id,
            seniority_level: value.seniority_level,
            work_modality: value.work_modality,
            contract_type: value.contract_type,
            min_salary: value.min_salary,
            max_salary: value.max_salary,
            salary_currency: value.salary_currency,
            city: value.city,
            state: value.state,
            country: value.country,
            is_active: None,
            is_company_hidden: value.is_company_hidden,
            expires_at: value.expires_at,
            skills: value
                .skills
                .map(|skills| skills.into_iter().map(Into::into).collect()),
        }
    }
}

/// Query string of `GET /api/jobs`. Every filter is optional and filters are
/// AND-combined.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct JobSearchQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub q: Option<String>,
    pub technology: Option<String>,
    pub area: Option<String>,
    pub seniority_level: Option<String>,
    pub company_id: Option<i64>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub contract_type: Option<String>,
    pub work_modality: Option<String>,
    pub min_salary: Option<Decimal>,
    pub max_salary: Option<Decimal>,
    pub salary_exact_min: Option<Decimal>,
    pub salary_exact_max: Option<Decimal>,
    pub sort: Option<JobSort>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CompanyJobsQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSummary {
    pub id: i64,
    pub company_id: Option<i64>,
    pub title: String,
    pub area: Option<String>,
    pub area_id: Option<i64>,
    pub seniority_level: Option<String>,
    pub work_modality: Option<String>,
    pub contract_type: Option<String>,
    pub min_salary: Option<Decimal>,
    pub max_salary: Option<Decimal>,
    pub salary_currency: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub location: String,
    pub is_active: bool,
    pub summary: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobResponse {
    pub id: i64,
    /// `None` when the company chose to stay hidden from the public.
    pub company_id: Option<i64>,
    pub title: String,
    pub description: String,
    pub requirements: Option<String>,
    pub responsibilities: Option<String>,
    pub benefits: Option<String>,
    pub area: Option<String>,
    pub area_id: Option<i64>,
    pub seniority_level: Option<String>,
    pub work_modality: Option<String>,
    pub contract_type: Option<String>,
    pub min_salary: Option<Decimal>,
    pub max_salary: Option<Decimal>,
    pub salary_currency: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub location: String,
    pub is_active: bool,
    pub is_company_hidden: bool,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub skills: Vec<JobSkill>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobListResponse {
    pub items: Vec<JobSummary>,
    pub total: i64,
    pub page: u32,
    pub per_page: u32,
    pub total_pages: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobMutationResponse {
    pub message: String,
    pub job: JobResponse,
}

fn format_location(job: &Job) -> String {
    match (job.city.as_deref(), job.state.as_deref()) {
        (Some(city), Some(state)) => format!("{}, {}", city, state),
        (Some(city), None) => city.to_string(),
        _ if job.work_modality.as_deref() == Some("remote") => "Remote".to_string(),
        _ => String::new(),
    }
}

impl From<Job> for JobSummary {
    fn from(value: Job) -> Self {
        Self::new(value, false)
    }
}

impl JobSummary {
    pub fn new(value: Job, reveal_company: bool) -> Self {
        let location = format_location(&value);
        let summary = {
            let trimmed = value.description.trim();
            if trimmed.chars().count() > 320 {
                Some(format!("{}…", trimmed.chars().take(320).collect::<String>()))
            } else if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        };

        Self {
            id: value.id,
            company_id: (reveal_company || !value.is_company_hidden).then_some(value.company_id),
            title: value.title,
            area: value.area,
            area_id: value.area_id,
            seniority_level: value.seniority_level,
            work_modality: value.work_modality,
            contract_type: value.contract_type,
            min_salary: value.min_salary,
            max_salary: value.max_salary,
            salary_currency: value.salary_currency,
            city: value.city,
            state: value.state,
            location,
            is_active: value.is_active,
            summary,
            created_at: value.created_at,
        }
    }
}

impl JobResponse {
    /// Owners always see their company id; the public view respects the
    /// hidden-company flag.
    pub fn new(details: JobDetails, reveal_company: bool) -> Self {
        let location = format_location(&details.job);
        let job = details.job;
        let company_id = if reveal_company || !job.is_company_hidden {
            Some(job.company_id)
        } else {
            None
        };
        Self {
            id: job.id,
            company_id,
            title: job.title,
            description: job.description,
            requirements: job.requirements,
            responsibilities: job.responsibilities,
            benefits: job.benefits,
            area: job.area,
            area_id: job.area_id,
            seniority_level: job.seniority_level,
            work_modality: job.work_modality,
            contract_type: job.contract_type,
            min_salary: job.min_salary,
            max_salary: job.max_salary,
            salary_currency: job.salary_currency,
            city: job.city,
            state: job.state,
            country: job.country,
            location,
            is_active: job.is_active,
            is_company_hidden: job.is_company_hidden,
            expires_at: job.expires_at,
            created_at: job.created_at,
            updated_at: job.updated_at,
            skills: details.skills,
        }
    }
}

impl From<Page<Job>> for JobListResponse {
    fn from(value: Page<Job>) -> Self {
        Self::new(value, false)
    }
}

impl JobListResponse {
    pub fn new(value: Page<Job>, reveal_company: bool) -> Self {
        Self {
            items: value
                .items
                .into_iter()
                .map(|job| JobSummary::new(job, reveal_company))
                .collect(),
            total: value.total,
            page: value.page,
            per_page: value.per_page,
            total_pages: value.total_pages,
        }
    }
}
