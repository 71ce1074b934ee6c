use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Job {
    pub id: i64,
    pub company_id: i64,
    pub title: String,
    pub description: String,
    pub requirements: Option<String>,
    pub responsibilities: Option<String>,
    pub benefits: Option<String>,
    /// Legacy free-text label, kept alongside the structured `area_id`.
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
    pub is_active: bool,
    pub is_company_hidden: bool,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct JobSkill {
    pub job_id: i64,
    pub skill_id: i64,
    pub is_required: bool,
    pub proficiency_level: i16,
}

/// A job together with its skill requirements.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobDetails {
    #[serde(flatten)]
    pub job: Job,
    pub skills: Vec<JobSkill>,
}

impl JobDetails {
    pub fn required_skill_ids(&self) -> impl Iterator<Item = i64> + '_ {
        self.skills
            .iter()
            .filter(|s| s.is_required)
            .map(|s| s.skill_id)
    }
}

#[derive(Debug, Clone, Default)]
pub struct NewJob {
    pub company_id: i64,
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
    pub salary_currency: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub is_company_hidden: bool,
    pub expires_at: Option<DateTime<Utc>>,
    pub skills: Vec<NewJobSkill>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewJobSkill {
    pub skill_id: i64,
    pub is_required: bool,
    pub proficiency_level: i16,
}

/// Partial update; `None` leaves the column untouched. Nullable columns use
/// `Some(None)` to clear the stored value.
#[derive(Debug, Clone, Default)]
pub struct JobChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub requirements: Option<Option<String>>,
    pub responsibilities: Option<Option<String>>,
    pub benefits: Option<Option<String>>,
    pub area: Option<Option<String>>,
    pub area_id: Option<Option<i64>>,
    pub seniority_level: Option<Option<String>>,
    pub work_modality: Option<Option<String>>,
    pub contract_type: Option<Option<String>>,
    pub min_salary: Option<Option<Decimal>>,
    pub max_salary: Option<Option<Decimal>>,
    pub salary_currency: Option<String>,
    pub city: Option<Option<String>>,
    pub state: Option<Option<String>>,
    pub country: Option<Option<String>>,
    pub is_active: Option<bool>,
    pub is_company_hidden: Option<bool>,
    pub expires_at: Option<Option<DateTime<Utc>>>,
    pub skills: Option<Vec<NewJobSkill>>,
}
