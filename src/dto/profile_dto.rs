use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::candidate::{CandidateFields, CandidateProfile};
use crate::models::company::CompanyFields;
use crate::utils::salary::salary_problem;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
#[serde(default)]
#[validate(schema(function = "validate_expected_salary"))]
pub struct CandidateProfilePayload {
    #[validate(length(min = 1, max = 50))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub last_name: Option<String>,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub current_title: Option<String>,
    pub professional_summary: Option<String>,
    #[validate(range(min = 0, max = 70))]
    pub years_experience: Option<i32>,
    pub expected_salary: Option<Decimal>,
    pub salary_currency: Option<String>,
    #[validate(url)]
    pub linkedin_url: Option<String>,
    #[validate(url)]
    pub github_url: Option<String>,
    pub is_actively_looking: Option<bool>,
}

fn validate_expected_salary(payload: &CandidateProfilePayload) -> Result<(), ValidationError> {
    match payload.expected_salary.and_then(salary_problem) {
        Some(problem) => Err(ValidationError::new(problem.code())),
        None => Ok(()),
    }
}

impl From<CandidateProfilePayload> for CandidateFields {
    fn from(value: CandidateProfilePayload) -> Self {
        Self {
            first_name: value.first_name,
            last_name: value.last_name,
            phone: value.phone,
            city: value.city,
            state: value.state,
            country: value.country,
            current_title: value.current_title,
            professional_summary: value.professional_summary,
            years_experience: value.years_experience,
            expected_salary: value.expected_salary,
            salary_currency: value.salary_currency,
            linkedin_url: value.linkedin_url,
            github_url: value.github_url,
            is_actively_looking: value.is_actively_looking,
        }
    }
}

/// Query string of `GET /api/candidates/search`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CandidateSearchQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub q: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub min_salary: Option<Decimal>,
    pub max_salary: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CandidateSkillPayload {
    pub skill_id: i64,
    #[validate(range(min = 1, max = 5))]
    pub proficiency_level: i16,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CandidateSkillsPayload {
    #[validate(nested)]
    pub skills: Vec<CandidateSkillPayload>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateProfileResponse {
    pub message: Option<String>,
    pub candidate: CandidateProfile,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
#[serde(default)]
pub struct CompanyProfilePayload {
    #[validate(length(min = 1, max = 100))]
    pub company_name: Option<String>,
    pub description: Option<String>,
    #[validate(url)]
    pub website: Option<String>,
    pub sector: Option<String>,
    pub company_size: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}

impl From<CompanyProfilePayload> for CompanyFields {
    fn from(value: CompanyProfilePayload) -> Self {
        Self {
            company_name: value.company_name,
            description: value.description,
            website: value.website,
            sector: value.sector,
            company_size: value.company_size,
            city: value.city,
            state: value.state,
            country: value.country,
        }
    }
}

/// Dashboard counters of the authenticated company.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyStatsResponse {
    pub company_name: String,
    pub total_jobs: i64,
    pub active_jobs: i64,
    pub paused_jobs: i64,
    pub total_applications: i64,
    /// Applications per active job, two decimals; zero without active jobs.
    pub conversion_rate: f64,
}
