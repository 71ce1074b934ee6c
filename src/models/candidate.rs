use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Candidate {
    pub id: i64,
    pub user_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub current_title: Option<String>,
    pub professional_summary: Option<String>,
    pub years_experience: Option<i32>,
    pub expected_salary: Option<Decimal>,
    pub salary_currency: String,
    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
    pub is_actively_looking: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct CandidateSkill {
    pub candidate_id: i64,
    pub skill_id: i64,
    pub proficiency_level: i16,
}

/// A candidate together with the skills used for matching.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateProfile {
    #[serde(flatten)]
    pub candidate: Candidate,
    pub skills: Vec<CandidateSkill>,
}

#[derive(Debug, Clone, Default)]
pub struct CandidateFields {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub current_title: Option<String>,
    pub professional_summary: Option<String>,
    pub years_experience: Option<i32>,
    pub expected_salary: Option<Decimal>,
    pub salary_currency: Option<String>,
    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
    pub is_actively_looking: Option<bool>,
}
