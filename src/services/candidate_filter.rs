//! Recruiter-side candidate search.
//!
//! Like [`crate::services::job_filter::JobFilter`], a [`CandidateFilter`] is
//! evaluated in memory by [`CandidateFilter::matches`] and rendered to SQL by
//! [`CandidateFilter::push_where`]. Only actively looking candidates match.

use rust_decimal::Decimal;
use sqlx::{Postgres, QueryBuilder};

use crate::dto::profile_dto::CandidateSearchQuery;
use crate::error::{Error, Result};
use crate::models::candidate::Candidate;
use crate::utils::salary::salary_problem;
use crate::utils::text::{contains_ci, like_pattern, non_blank};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateFilter {
    /// Matched against first name, last name and current title.
    pub text: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub salary_floor: Option<Decimal>,
    pub salary_ceiling: Option<Decimal>,
}

impl CandidateFilter {
    pub fn from_query(query: &CandidateSearchQuery) -> Result<Self> {
        for (name, value) in [("min_salary", query.min_salary), ("max_salary", query.max_salary)] {
            if let Some(problem) = value.and_then(salary_problem) {
                return Err(Error::BadRequest(format!("{} {}", name, problem)));
            }
        }
        Ok(Self {
            text: non_blank(query.q.as_deref()),
            city: non_blank(query.city.as_deref()),
            state: non_blank(query.state.as_deref()),
            salary_floor: query.min_salary,
            salary_ceiling: query.max_salary,
        })
    }

    pub fn matches(&self, candidate: &Candidate) -> bool {
        if !candidate.is_actively_looking {
            return false;
        }
        if let Some(q) = &self.text {
            let hit = contains_ci(Some(&candidate.first_name), q)
                || contains_ci(Some(&candidate.last_name), q)
                || contains_ci(candidate.current_title.as_deref(), q);
            if !hit {
                return false;
            }
        }
        if let Some(city) = &self.city {
            if !contains_ci(candidate.city.as_deref(), city) {
                return false;
            }
        }
        if let Some(state) = &self.state {
            if !contains_ci(candidate.state.as_deref(), state) {
                return false;
            }
        }
        if let Some(floor) = self.salary_floor {
            if !candidate.expected_salary.map(|s| s >= floor).unwrap_or(false) {
                return false;
            }
        }
        if let Some(ceiling) = self.salary_ceiling {
            if !candidate.expected_salary.map(|s| s <= ceiling).unwrap_or(false) {
                return false;
            }
        }
        true
    }

    /// Appends ` WHERE ...` for the `candidates` table.
    pub fn push_where(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        qb.push(" WHERE is_actively_looking = TRUE");
        if let Some(q) = &self.text {
            let pattern = like_pattern(q);
            qb.push(" AND (first_name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR last_name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR current_title ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
        if let Some(city) = &self.city {
            qb.push(" AND city ILIKE ").push_bind(like_pattern(city));
        }
        if let Some(state) = &self.state {
            qb.push(" AND state ILIKE ").push_bind(like_pattern(state));
        }
        if let Some(floor) = self.salary_floor {
            qb.push(" AND expected_salary >= ").push_bind(floor);
        }
        if let Some(ceiling) = self.salary_ceiling {
            qb.push(" AND expected_salary <= ").push_bind(ceiling);
        }
    }
}
