//! Composable job search criteria.
//!
//! A [`JobFilter`] is built once from the raw query parameters and can then be
//! rendered two ways: pushed onto a Postgres `QueryBuilder` as a `WHERE` clause,
//! or evaluated directly against a [`Job`] by the in-memory store. Both
//! renderings must stay in lockstep; the tests at the bottom pin the in-memory
//! semantics.

use std::cmp::Ordering;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{Postgres, QueryBuilder};

use crate::dto::job_dto::JobSearchQuery;
use crate::error::{Error, Result};
use crate::models::job::Job;
use crate::utils::salary::salary_problem;
use crate::utils::text::{contains_ci, like_pattern, non_blank};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobSort {
    #[default]
    Newest,
    Oldest,
    SalaryDesc,
    SalaryAsc,
}

impl JobSort {
    fn order_by(&self) -> &'static str {
        match self {
            JobSort::Newest => "created_at DESC, id DESC",
            JobSort::Oldest => "created_at ASC, id ASC",
            JobSort::SalaryDesc => "max_salary DESC NULLS LAST, created_at DESC, id DESC",
            JobSort::SalaryAsc => "min_salary ASC NULLS LAST, created_at DESC, id DESC",
        }
    }

    pub fn compare(&self, a: &Job, b: &Job) -> Ordering {
        let newest = || {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        };
        match self {
            JobSort::Newest => newest(),
            JobSort::Oldest => a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)),
            JobSort::SalaryDesc => nulls_last(a.max_salary, b.max_salary, |x, y| y.cmp(&x))
                .then_with(newest),
            JobSort::SalaryAsc => nulls_last(a.min_salary, b.min_salary, |x, y| x.cmp(&y))
                .then_with(newest),
        }
    }
}

fn nulls_last(
    a: Option<Decimal>,
    b: Option<Decimal>,
    cmp: impl Fn(Decimal, Decimal) -> Ordering,
) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => cmp(x, y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Area criterion: a structured id when the value parses as an integer,
/// otherwise the legacy free-text label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AreaFilter {
    Id(i64),
    Label(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobFilter {
    pub text: Option<String>,
    /// Matched as free text against title, description and requirements.
    pub technology: Option<String>,
    pub area: Option<AreaFilter>,
    pub seniority_level: Option<String>,
    pub company_id: Option<i64>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub contract_type: Option<String>,
    pub work_modality: Option<String>,
    pub salary_floor: Option<Decimal>,
    pub salary_ceiling: Option<Decimal>,
    pub exact_min: Option<Decimal>,
    pub exact_max: Option<Decimal>,
    pub sort: JobSort,
}

impl JobFilter {
    pub fn from_query(query: &JobSearchQuery) -> Result<Self> {
        let area = non_blank(query.area.as_deref()).map(|raw| match raw.parse::<i64>() {
            Ok(id) => AreaFilter::Id(id),
            Err(_) => AreaFilter::Label(raw),
        });

        for (name, value) in [
            ("min_salary", query.min_salary),
            ("max_salary", query.max_salary),
            ("salary_exact_min", query.salary_exact_min),
            ("salary_exact_max", query.salary_exact_max),
        ] {
            if let Some(problem) = value.and_then(salary_problem) {
                return Err(Error::BadRequest(format!("{} {}", name, problem)));
            }
        }
        if let (Some(lo), Some(hi)) = (query.salary_exact_min, query.salary_exact_max) {
            if lo > hi {
                return Err(Error::BadRequest(
                    "salary_exact_min must not exceed salary_exact_max".to_string(),
                ));
            }
        }

        Ok(Self {
            text: non_blank(query.q.as_deref()),
            technology: non_blank(query.technology.as_deref()),
            area,
            seniority_level: non_blank(query.seniority_level.as_deref()),
            company_id: query.company_id,
            city: non_blank(query.city.as_deref()),
            state: non_blank(query.state.as_deref()),
            contract_type: non_blank(query.contract_type.as_deref()),
            work_modality: non_blank(query.work_modality.as_deref()),
            salary_floor: query.min_salary,
            salary_ceiling: query.max_salary,
            exact_min: query.salary_exact_min,
            exact_max: query.salary_exact_max,
            sort: query.sort.unwrap_or_default(),
        })
    }

    /// In-memory evaluation. Inactive jobs never match.
    pub fn matches(&self, job: &Job) -> bool {
        if !job.is_active {
            return false;
        }
        let free_text = |needle: &str| {
            contains_ci(Some(&job.title), needle)
                || contains_ci(Some(&job.description), needle)
                || contains_ci(job.requirements.as_deref(), needle)
        };
        if let Some(q) = &self.text {
            if !free_text(q) {
                return false;
            }
        }
        if let Some(tech) = &self.technology {
            if !free_text(tech) {
                return false;
            }
        }
        match &self.area {
            Some(AreaFilter::Id(id)) if job.area_id != Some(*id) => return false,
            Some(AreaFilter::Label(label)) if !contains_ci(job.area.as_deref(), label) => {
                return false
            }
            _ => {}
        }
        if let Some(level) = &self.seniority_level {
            if !contains_ci(job.seniority_level.as_deref(), level) {
                return false;
            }
        }
        // Searching by company must not reveal which confidential jobs it owns.
        if let Some(company_id) = self.company_id {
            if job.company_id != company_id || job.is_company_hidden {
                return false;
            }
        }
        if let Some(city) = &self.city {
            if !contains_ci(job.city.as_deref(), city) {
                return false;
            }
        }
        if let Some(state) = &self.state {
            if !contains_ci(job.state.as_deref(), state) {
                return false;
            }
        }
        if let Some(contract) = &self.contract_type {
            if job.contract_type.as_deref() != Some(contract.as_str()) {
                return false;
            }
        }
        if let Some(modality) = &self.work_modality {
            if !contains_ci(job.work_modality.as_deref(), modality) {
                return false;
            }
        }
        for floor in [self.salary_floor, self.exact_min].into_iter().flatten() {
            if !job.min_salary.map(|m| m >= floor).unwrap_or(false) {
                return false;
            }
        }
        for ceiling in [self.salary_ceiling, self.exact_max].into_iter().flatten() {
            if !job.max_salary.map(|m| m <= ceiling).unwrap_or(false) {
                return false;
            }
        }
        true
    }

    /// Appends ` WHERE ...` for the `jobs` table.
    pub fn push_where(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        qb.push(" WHERE is_active = TRUE");

        for needle in [&self.text, &self.technology].into_iter().flatten() {
            let pattern = like_pattern(needle);
            qb.push(" AND (title ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR description ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR requirements ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
        match &self.area {
            Some(AreaFilter::Id(id)) => {
                qb.push(" AND area_id = ").push_bind(*id);
            }
            Some(AreaFilter::Label(label)) => {
                qb.push(" AND area ILIKE ").push_bind(like_pattern(label));
            }
            None => {}
        }
        if let Some(level) = &self.seniority_level {
            qb.push(" AND seniority_level ILIKE ")
                .push_bind(like_pattern(level));
        }
        if let Some(company_id) = self.company_id {
            qb.push(" AND company_id = ")
                .push_bind(company_id)
                .push(" AND is_company_hidden = FALSE");
        }
        if let Some(city) = &self.city {
            qb.push(" AND city ILIKE ").push_bind(like_pattern(city));
        }
        if let Some(state) = &self.state {
            qb.push(" AND state ILIKE ").push_bind(like_pattern(state));
        }
        if let Some(contract) = &self.contract_type {
            qb.push(" AND contract_type = ").push_bind(contract.clone());
        }
        if let Some(modality) = &self.work_modality {
            qb.push(" AND work_modality ILIKE ")
                .push_bind(like_pattern(modality));
        }
        for floor in [self.salary_floor, self.exact_min].into_iter().flatten() {
            qb.push(" AND min_salary >= ").push_bind(floor);
        }
        for ceiling in [self.salary_ceiling, self.exact_max].into_iter().flatten() {
            qb.push(" AND max_salary <= ").push_bind(ceiling);
        }
    }

    pub fn push_order_by(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        qb.push(" ORDER BY ").push(self.sort.order_by());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::time::now;
    use chrono::Duration;

    fn job(id: i64) -> Job {
        Job {
            id,
            company_id: 1,
            title: "Rust Developer".into(),
            description: "Build backend services".into(),
            requirements: Some("Tokio, SQL".into()),
            responsibilities: None,
            benefits: None,
            area: Some("Desenvolvimento".into()),
            area_id: None,
            seniority_level: Some("senior".into()),
            work_modality: Some("remote".into()),
            contract_type: Some("clt".into()),
            min_salary: Some(Decimal::from(7000)),
            max_salary: Some(Decimal::from(9000)),
            salary_currency: "BRL".into(),
            city: Some("São Paulo".into()),
            state: Some("SP".into()),
            country: Some("Brasil".into()),
            is_active: true,
            is_company_hidden: false,
            expires_at: None,
            created_at: now(),
            updated_at: now(),
        }
    }

    fn filter(query: JobSearchQuery) -> JobFilter {
        JobFilter::from_query(&query).unwrap()
    }

    #[test]
    fn empty_filter_matches_active_jobs_only() {
        let f = filter(JobSearchQuery::default());
        assert!(f.matches(&job(1)));
        let mut inactive = job(2);
        inactive.is_active = false;
        assert!(!f.matches(&inactive));
    }

    #[test]
    fn free_text_searches_title_description_and_requirements() {
        for q in ["rust", "BACKEND", "tokio"] {
            let f = filter(JobSearchQuery {
                q: Some(q.into()),
                ..Default::default()
            });
            assert!(f.matches(&job(1)), "query {}", q);
        }
        let f = filter(JobSearchQuery {
            q: Some("cobol".into()),
            ..Default::default()
        });
        assert!(!f.matches(&job(1)));
    }

    #[test]
    fn blank_values_are_ignored() {
        let f = filter(JobSearchQuery {
            q: Some("  ".into()),
            city: Some("".into()),
            area: Some(" ".into()),
            ..Default::default()
        });
        assert_eq!(f.text, None);
        assert_eq!(f.city, None);
        assert_eq!(f.area, None);
    }

    #[test]
    fn numeric_area_uses_structured_reference_only() {
        let f = filter(JobSearchQuery {
            area: Some("5".into()),
            ..Default::default()
        });
        assert_eq!(f.area, Some(AreaFilter::Id(5)));

        let mut labelled_five = job(1);
        labelled_five.area = Some("5".into());
        assert!(!f.matches(&labelled_five));

        let mut structured = job(2);
        structured.area_id = Some(5);
        assert!(f.matches(&structured));
    }

    #[test]
    fn textual_area_falls_back_to_label() {
        let f = filter(JobSearchQuery {
            area: Some("desenvolv".into()),
            ..Default::default()
        });
        assert!(f.matches(&job(1)));
    }

    #[test]
    fn contract_type_is_exact_while_modality_is_substring() {
        let exact = filter(JobSearchQuery {
            contract_type: Some("CLT".into()),
            ..Default::default()
        });
        assert!(!exact.matches(&job(1)));

        let modality = filter(JobSearchQuery {
            work_modality: Some("REM".into()),
            ..Default::default()
        });
        assert!(modality.matches(&job(1)));
    }

    #[test]
    fn salary_floor_and_ceiling_are_independent() {
        let floor = filter(JobSearchQuery {
            min_salary: Some(Decimal::from(7000)),
            ..Default::default()
        });
        assert!(floor.matches(&job(1)));

        let too_high = filter(JobSearchQuery {
            min_salary: Some(Decimal::from(7500)),
            ..Default::default()
        });
        assert!(!too_high.matches(&job(1)));

        let ceiling = filter(JobSearchQuery {
            max_salary: Some(Decimal::from(8500)),
            ..Default::default()
        });
        assert!(!ceiling.matches(&job(1)));
    }

    #[test]
    fn exact_range_requires_containment() {
        let contained = filter(JobSearchQuery {
            salary_exact_min: Some(Decimal::from(6000)),
            salary_exact_max: Some(Decimal::from(10000)),
            ..Default::default()
        });
        assert!(contained.matches(&job(1)));

        let narrower = filter(JobSearchQuery {
            salary_exact_min: Some(Decimal::from(7500)),
            salary_exact_max: Some(Decimal::from(10000)),
            ..Default::default()
        });
        assert!(!narrower.matches(&job(1)));

        let mut no_salary = job(2);
        no_salary.min_salary = None;
        no_salary.max_salary = None;
        assert!(!contained.matches(&no_salary));
    }

    #[test]
    fn inverted_exact_range_is_rejected() {
        let err = JobFilter::from_query(&JobSearchQuery {
            salary_exact_min: Some(Decimal::from(9000)),
            salary_exact_max: Some(Decimal::from(1000)),
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(err, Error::BadRequest(_)));
    }

    #[test]
    fn newest_first_with_id_tiebreak() {
        let mut older = job(1);
        older.created_at = older.created_at - Duration::days(1);
        let newer = job(2);
        let mut jobs = vec![older.clone(), newer.clone()];
        jobs.sort_by(|a, b| JobSort::Newest.compare(a, b));
        assert_eq!(jobs[0].id, 2);

        jobs.sort_by(|a, b| JobSort::Oldest.compare(a, b));
        assert_eq!(jobs[0].id, 1);
    }

    #[test]
    fn salary_sort_puts_missing_salaries_last() {
        let mut unpaid = job(1);
        unpaid.max_salary = None;
        let mut rich = job(2);
        rich.max_salary = Some(Decimal::from(20000));
        let mut jobs = vec![unpaid, job(3), rich];
        jobs.sort_by(|a, b| JobSort::SalaryDesc.compare(a, b));
        let ids: Vec<i64> = jobs.iter().map(|j| j.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn sql_rendering_binds_every_criterion() {
        let f = filter(JobSearchQuery {
            q: Some("rust".into()),
            area: Some("5".into()),
            company_id: Some(3),
            min_salary: Some(Decimal::from(1000)),
            ..Default::default()
        });
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM jobs");
        f.push_where(&mut qb);
        f.push_order_by(&mut qb);
        let sql = qb.sql();
        assert!(sql.contains("is_active = TRUE"));
        assert!(sql.contains("title ILIKE $1"));
        assert!(sql.contains("area_id = $4"));
        assert!(sql.contains("company_id = $5 AND is_company_hidden = FALSE"));
        assert!(sql.contains("min_salary >= $6"));
        assert!(sql.ends_with("ORDER BY created_at DESC, id DESC"));
    }

    #[test]
    fn company_filter_skips_confidential_jobs() {
        let f = filter(JobSearchQuery {
            company_id: Some(1),
            ..Default::default()
        });
        let mut hidden = job(1);
        hidden.is_company_hidden = true;
        assert!(!f.matches(&hidden));
        assert!(f.matches(&job(2)));

        // Without a company criterion the confidential job is still listed.
        assert!(filter(JobSearchQuery::default()).matches(&hidden));
    }

    #[test]
    fn oversized_salary_filter_is_rejected() {
        let err = JobFilter::from_query(&JobSearchQuery {
            min_salary: Some(Decimal::from(10_000_000_000i64)),
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(err, Error::BadRequest(_)));
    }
}
