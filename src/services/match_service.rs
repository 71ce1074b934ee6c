//! Candidate/job compatibility scoring.
//!
//! The score is a weighted sum out of 100 points:
//! location (20), salary expectation (20) and required skills (60).
//! A factor only counts when both sides carry the data it needs; when no factor
//! applies at all the score is [`FALLBACK_SCORE`]. Location needs a city on
//! both sides; the state is only consulted when the cities differ.

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::candidate::CandidateProfile;
use crate::models::job::JobDetails;
use crate::utils::text::eq_ci;

pub const LOCATION_WEIGHT: f64 = 20.0;
pub const SALARY_WEIGHT: f64 = 20.0;
pub const SKILL_WEIGHT: f64 = 60.0;
pub const FALLBACK_SCORE: u8 = 50;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoreError {
    #[error("salary arithmetic overflowed for job max salary {0}")]
    SalaryOverflow(Decimal),
    #[error("score is not a finite number")]
    NonFinite,
}

/// Per-factor contributions; `None` means the factor did not apply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchBreakdown {
    pub location: Option<f64>,
    pub salary: Option<f64>,
    pub skills: Option<f64>,
    pub matched_skill_ids: Vec<i64>,
    pub missing_skill_ids: Vec<i64>,
    pub score: u8,
}

pub fn score(candidate: &CandidateProfile, job: &JobDetails) -> Result<u8, ScoreError> {
    breakdown(candidate, job).map(|b| b.score)
}

/// Scores and degrades to [`FALLBACK_SCORE`] on an internal fault, so a
/// scoring problem never blocks an application.
pub fn score_or_fallback(candidate: &CandidateProfile, job: &JobDetails) -> u8 {
    match score(candidate, job) {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!(
                candidate_id = candidate.candidate.id,
                job_id = job.job.id,
                error = %err,
                "match scoring failed, using fallback score"
            );
            FALLBACK_SCORE
        }
    }
}

/// Breakdown variant of [`score_or_fallback`]: a fault yields a breakdown with
/// no applicable factor and the fallback score.
pub fn breakdown_or_fallback(candidate: &CandidateProfile, job: &JobDetails) -> MatchBreakdown {
    match breakdown(candidate, job) {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!(
                candidate_id = candidate.candidate.id,
                job_id = job.job.id,
                error = %err,
                "match breakdown failed, using fallback score"
            );
            MatchBreakdown {
                location: None,
                salary: None,
                skills: None,
                matched_skill_ids: Vec::new(),
                missing_skill_ids: Vec::new(),
                score: FALLBACK_SCORE,
            }
        }
    }
}

pub fn breakdown(candidate: &CandidateProfile, job: &JobDetails) -> Result<MatchBreakdown, ScoreError> {
    let location = location_factor(candidate, job);
    let salary = salary_factor(candidate, job)?;
    let (skills, matched_skill_ids, missing_skill_ids) = skill_factor(candidate, job);

    let applicable: Vec<f64> = [location, salary, skills].into_iter().flatten().collect();
    let score = if applicable.is_empty() {
        FALLBACK_SCORE
    } else {
        let total: f64 = applicable.iter().sum();
        if !total.is_finite() {
            return Err(ScoreError::NonFinite);
        }
        total.floor().clamp(0.0, 100.0) as u8
    };

    Ok(MatchBreakdown {
        location,
        salary,
        skills,
        matched_skill_ids,
        missing_skill_ids,
        score,
    })
}

fn has_text(value: Option<&str>) -> bool {
    value.map(|v| !v.trim().is_empty()).unwrap_or(false)
}

fn location_factor(candidate: &CandidateProfile, job: &JobDetails) -> Option<f64> {
    let c = &candidate.candidate;
    let j = &job.job;
    if !has_text(c.city.as_deref()) || !has_text(j.city.as_deref()) {
        return None;
    }
    if eq_ci(c.city.as_deref(), j.city.as_deref()) {
        Some(LOCATION_WEIGHT)
    } else if eq_ci(c.state.as_deref(), j.state.as_deref()) {
        Some(LOCATION_WEIGHT / 2.0)
    } else {
        Some(0.0)
    }
}

fn salary_factor(candidate: &CandidateProfile, job: &JobDetails) -> Result<Option<f64>, ScoreError> {
    let (Some(expected), Some(min), Some(max)) = (
        candidate.candidate.expected_salary,
        job.job.min_salary,
        job.job.max_salary,
    ) else {
        return Ok(None);
    };
    if expected >= min && expected <= max {
        return Ok(Some(SALARY_WEIGHT));
    }
    let tolerance = max
        .checked_mul(Decimal::new(12, 1))
        .ok_or(ScoreError::SalaryOverflow(max))?;
    if expected <= tolerance {
        Ok(Some(SALARY_WEIGHT / 2.0))
    } else {
        Ok(Some(0.0))
    }
}

fn skill_factor(candidate: &CandidateProfile, job: &JobDetails) -> (Option<f64>, Vec<i64>, Vec<i64>) {
    let mut required: Vec<i64> = job.required_skill_ids().collect();
    required.sort_unstable();
    required.dedup();
    if required.is_empty() {
        return (None, Vec::new(), Vec::new());
    }
    let owned: HashSet<i64> = candidate.skills.iter().map(|s| s.skill_id).collect();
    let (matched, missing): (Vec<i64>, Vec<i64>) =
        required.iter().partition(|id| owned.contains(*id));
    let ratio = matched.len() as f64 / required.len() as f64;
    (Some(SKILL_WEIGHT * ratio), matched, missing)
}
