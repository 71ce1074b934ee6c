use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder, Transaction};

use super::{CompanyStats, EntityStore, PlatformStats};
use crate::error::{Error, Result};
use crate::models::application::{Application, ApplicationStatus, NewApplication};
use crate::models::candidate::{Candidate, CandidateFields, CandidateProfile, CandidateSkill};
use crate::models::catalog::{Area, Skill};
use crate::models::company::{Company, CompanyFields};
use crate::models::job::{Job, JobChanges, JobDetails, JobSkill, NewJob, NewJobSkill};
use crate::models::resume::{
    Certification, Education, Experience, Language, Project, Resume, ResumeEntry, ResumeRecord,
    ResumeSection,
};
use crate::models::user::{NewUser, User};
use crate::services::candidate_filter::CandidateFilter;
use crate::services::job_filter::JobFilter;
use crate::utils::pagination::{Page, PageRequest};

const CANDIDATE_COLUMNS: &str = "id, user_id, first_name, last_name, phone, city, state, country, \
    current_title, professional_summary, years_experience, expected_salary, salary_currency, \
    linkedin_url, github_url, is_actively_looking, created_at, updated_at";

const COMPANY_COLUMNS: &str = "id, user_id, company_name, description, website, sector, \
    company_size, city, state, country, created_at, updated_at";

const JOB_COLUMNS: &str = "id, company_id, title, description, requirements, responsibilities, \
    benefits, area, area_id, seniority_level, work_modality, contract_type, min_salary, max_salary, \
    salary_currency, city, state, country, is_active, is_company_hidden, expires_at, created_at, \
    updated_at";

const APPLICATION_COLUMNS: &str =
    "id, job_id, candidate_id, status, match_score, cover_letter, applied_at, updated_at";

#[derive(FromRow)]
struct UserRow {
    id: i64,
    email: String,
    role: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = Error;

    fn try_from(row: UserRow) -> Result<Self> {
        Ok(User {
            id: row.id,
            email: row.email,
            role: row.role.parse().map_err(Error::Internal)?,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(FromRow)]
struct ApplicationRow {
    id: i64,
    job_id: i64,
    candidate_id: i64,
    status: String,
    match_score: i16,
    cover_letter: Option<String>,
    applied_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ApplicationRow> for Application {
    type Error = Error;

    fn try_from(row: ApplicationRow) -> Result<Self> {
        Ok(Application {
            id: row.id,
            job_id: row.job_id,
            candidate_id: row.candidate_id,
            status: row.status.parse().map_err(Error::Internal)?,
            match_score: row.match_score,
            cover_letter: row.cover_letter,
            applied_at: row.applied_at,
            updated_at: row.updated_at,
        })
    }
}

fn into_applications(rows: Vec<ApplicationRow>) -> Result<Vec<Application>> {
    rows.into_iter().map(Application::try_from).collect()
}

/// PostgreSQL-backed [`EntityStore`].
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Internal(format!("migration failed: {}", e)))
    }

    async fn candidate_skills(&self, candidate_id: i64) -> Result<Vec<CandidateSkill>> {
        let skills = sqlx::query_as::<_, CandidateSkill>(
            "SELECT candidate_id, skill_id, proficiency_level FROM candidate_skills \
             WHERE candidate_id = $1 ORDER BY skill_id",
        )
        .bind(candidate_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(skills)
    }

    async fn job_skills(&self, job_id: i64) -> Result<Vec<JobSkill>> {
        let skills = sqlx::query_as::<_, JobSkill>(
            "SELECT job_id, skill_id, is_required, proficiency_level FROM job_skills \
             WHERE job_id = $1 ORDER BY skill_id",
        )
        .bind(job_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(skills)
    }

    async fn replace_job_skills(
        tx: &mut Transaction<'_, Postgres>,
        job_id: i64,
        skills: &[NewJobSkill],
    ) -> Result<()> {
        sqlx::query("DELETE FROM job_skills WHERE job_id = $1")
            .bind(job_id)
            .execute(&mut **tx)
            .await?;
        for skill in skills {
            sqlx::query(
                "INSERT INTO job_skills (job_id, skill_id, is_required, proficiency_level) \
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(job_id)
            .bind(skill.skill_id)
            .bind(skill.is_required)
            .bind(skill.proficiency_level)
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }

    async fn count(&self, mut qb: QueryBuilder<'_, Postgres>) -> Result<i64> {
        let total: i64 = qb.build_query_scalar().fetch_one(&self.pool).await?;
        Ok(total)
    }
}

/// Appends `, column = $n` when the change is present. For nullable columns
/// `value` is itself an `Option`, so `Some(None)` writes NULL.
fn push_set<'args, T>(qb: &mut QueryBuilder<'args, Postgres>, column: &str, value: Option<T>)
where
    T: 'args + sqlx::Encode<'args, Postgres> + sqlx::Type<Postgres> + Send,
{
    if let Some(value) = value {
        qb.push(format!(", {} = ", column)).push_bind(value);
    }
}

#[async_trait]
impl EntityStore for PgStore {
    async fn create_user(&self, user: NewUser) -> Result<User> {
        let row = sqlx::query_as::<_, UserRow>(
            "INSERT INTO users (email, role) VALUES ($1, $2) \
             RETURNING id, email, role, is_active, created_at, updated_at",
        )
        .bind(&user.email)
        .bind(user.role.as_str())
        .fetch_one(&self.pool)
        .await?;
        row.try_into()
    }

    async fn get_candidate(&self, id: i64) -> Result<CandidateProfile> {
        let candidate = sqlx::query_as::<_, Candidate>(&format!(
            "SELECT {} FROM candidates WHERE id = $1",
            CANDIDATE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Candidate {} not found", id)))?;
        let skills = self.candidate_skills(candidate.id).await?;
        Ok(CandidateProfile { candidate, skills })
    }

    async fn find_candidate_by_user(&self, user_id: i64) -> Result<Option<CandidateProfile>> {
        let candidate = sqlx::query_as::<_, Candidate>(&format!(
            "SELECT {} FROM candidates WHERE user_id = $1",
            CANDIDATE_COLUMNS
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        match candidate {
            Some(candidate) => {
                let skills = self.candidate_skills(candidate.id).await?;
                Ok(Some(CandidateProfile { candidate, skills }))
            }
            None => Ok(None),
        }
    }

    async fn upsert_candidate(&self, user_id: i64, fields: CandidateFields) -> Result<Candidate> {
        let mut tx = self.pool.begin().await?;
        let exists: Option<i64> =
            sqlx::query_scalar("SELECT id FROM candidates WHERE user_id = $1 FOR UPDATE")
                .bind(user_id)
                .fetch_optional(&mut *tx)
                .await?;

        let sql = if exists.is_some() {
            format!(
                r#"
                UPDATE candidates SET
                    first_name = COALESCE($2, first_name),
                    last_name = COALESCE($3, last_name),
                    phone = COALESCE($4, phone),
                    city = COALESCE($5, city),
                    state = COALESCE($6, state),
                    country = COALESCE($7, country),
                    current_title = COALESCE($8, current_title),
                    professional_summary = COALESCE($9, professional_summary),
                    years_experience = COALESCE($10, years_experience),
                    expected_salary = COALESCE($11, expected_salary),
                    salary_currency = COALESCE($12, salary_currency),
                    linkedin_url = COALESCE($13, linkedin_url),
                    github_url = COALESCE($14, github_url),
                    is_actively_looking = COALESCE($15, is_actively_looking),
                    updated_at = NOW()
                WHERE user_id = $1
                RETURNING {}
                "#,
                CANDIDATE_COLUMNS
            )
        } else {
            format!(
                r#"
                INSERT INTO candidates (
                    user_id, first_name, last_name, phone, city, state, country,
                    current_title, professional_summary, years_experience, expected_salary,
                    salary_currency, linkedin_url, github_url, is_actively_looking
                ) VALUES (
                    $1, COALESCE($2, ''), COALESCE($3, ''), $4, $5, $6, $7,
                    $8, $9, $10, $11,
                    COALESCE($12, 'BRL'), $13, $14, COALESCE($15, TRUE)
                )
                RETURNING {}
                "#,
                CANDIDATE_COLUMNS
            )
        };

        let candidate = sqlx::query_as::<_, Candidate>(&sql)
            .bind(user_id)
            .bind(fields.first_name)
            .bind(fields.last_name)
            .bind(fields.phone)
            .bind(fields.city)
            .bind(fields.state)
            .bind(fields.country)
            .bind(fields.current_title)
            .bind(fields.professional_summary)
            .bind(fields.years_experience)
            .bind(fields.expected_salary)
            .bind(fields.salary_currency)
            .bind(fields.linkedin_url)
            .bind(fields.github_url)
            .bind(fields.is_actively_looking)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(candidate)
    }

    async fn set_candidate_skills(
        &self,
        candidate_id: i64,
        skills: Vec<(i64, i16)>,
    ) -> Result<Vec<CandidateSkill>> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM candidate_skills WHERE candidate_id = $1")
            .bind(candidate_id)
            .execute(&mut *tx)
            .await?;
        let mut rows = Vec::with_capacity(skills.len());
        for (skill_id, proficiency_level) in skills {
            let row = sqlx::query_as::<_, CandidateSkill>(
                "INSERT INTO candidate_skills (candidate_id, skill_id, proficiency_level) \
                 VALUES ($1, $2, $3) RETURNING candidate_id, skill_id, proficiency_level",
            )
            .bind(candidate_id)
            .bind(skill_id)
            .bind(proficiency_level)
            .fetch_one(&mut *tx)
            .await?;
            rows.push(row);
        }
        tx.commit().await?;
        Ok(rows)
    }

    async fn search_candidates(
        &self,
        filter: &CandidateFilter,
        page: PageRequest,
    ) -> Result<Page<Candidate>> {
        let mut count_qb = QueryBuilder::new("SELECT COUNT(*) FROM candidates");
        filter.push_where(&mut count_qb);
        let total = self.count(count_qb).await?;

        let mut qb = QueryBuilder::new(format!("SELECT {} FROM candidates", CANDIDATE_COLUMNS));
        filter.push_where(&mut qb);
        qb.push(" ORDER BY created_at DESC, id DESC LIMIT ")
            .push_bind(page.limit())
            .push(" OFFSET ")
            .push_bind(page.offset());
        let items = qb.build_query_as::<Candidate>().fetch_all(&self.pool).await?;

        Ok(Page::new(items, total, page))
    }

    async fn get_company(&self, id: i64) -> Result<Company> {
        let company = sqlx::query_as::<_, Company>(&format!(
            "SELECT {} FROM companies WHERE id = $1",
            COMPANY_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Company {} not found", id)))?;
        Ok(company)
    }

    async fn find_company_by_user(&self, user_id: i64) -> Result<Option<Company>> {
        let company = sqlx::query_as::<_, Company>(&format!(
            "SELECT {} FROM companies WHERE user_id = $1",
            COMPANY_COLUMNS
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(company)
    }

    async fn upsert_company(&self, user_id: i64, fields: CompanyFields) -> Result<Company> {
        let mut tx = self.pool.begin().await?;
        let exists: Option<i64> =
            sqlx::query_scalar("SELECT id FROM companies WHERE user_id = $1 FOR UPDATE")
                .bind(user_id)
                .fetch_optional(&mut *tx)
                .await?;

        let sql = if exists.is_some() {
            format!(
                r#"
                UPDATE companies SET
                    company_name = COALESCE($2, company_name),
                    description = COALESCE($3, description),
                    website = COALESCE($4, website),
                    sector = COALESCE($5, sector),
                    company_size = COALESCE($6, company_size),
                    city = COALESCE($7, city),
                    state = COALESCE($8, state),
                    country = COALESCE($9, country),
                    updated_at = NOW()
                WHERE user_id = $1
                RETURNING {}
                "#,
                COMPANY_COLUMNS
            )
        } else {
            format!(
                r#"
                INSERT INTO companies (
                    user_id, company_name, description, website, sector, company_size,
                    city, state, country
                ) VALUES ($1, COALESCE($2, ''), $3, $4, $5, $6, $7, $8, $9)
                RETURNING {}
                "#,
                COMPANY_COLUMNS
            )
        };

        let company = sqlx::query_as::<_, Company>(&sql)
            .bind(user_id)
            .bind(fields.company_name)
            .bind(fields.description)
            .bind(fields.website)
            .bind(fields.sector)
            .bind(fields.company_size)
            .bind(fields.city)
            .bind(fields.state)
            .bind(fields.country)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(company)
    }

    async fn create_job(&self, job: NewJob) -> Result<JobDetails> {
        let mut tx = self.pool.begin().await?;
        let row = sqlx::query_as::<_, Job>(&format!(
            r#"
            INSERT INTO jobs (
                company_id, title, description, requirements, responsibilities, benefits,
                area, area_id, seniority_level, work_modality, contract_type,
                min_salary, max_salary, salary_currency, city, state, country,
                is_company_hidden, expires_at
            ) VALUES (
                $1, $2, $3, $4, $5, $6,
                $7, $8, $9, $10, $11,
                $12, $13, COALESCE($14, 'BRL'), $15, $16, $17,
                $18, $19
            )
            RETURNING {}
            "#,
            JOB_COLUMNS
        ))
        .bind(job.company_id)
        .bind(&job.title)
        .bind(&job.description)
        .bind(&job.requirements)
        .bind(&job.responsibilities)
        .bind(&job.benefits)
        .bind(&job.area)
        .bind(job.area_id)
        .bind(&job.seniority_level)
        .bind(&job.work_modality)
        .bind(&job.contract_type)
        .bind(job.min_salary)
        .bind(job.max_salary)
        .bind(&job.salary_currency)
        .bind(&job.city)
        .bind(&job.state)
        .bind(&job.country)
        .bind(job.is_company_hidden)
        .bind(job.expires_at)
        .fetch_one(&mut *tx)
        .await?;

        Self::replace_job_skills(&mut tx, row.id, &job.skills).await?;
        tx.commit().await?;

        let skills = self.job_skills(row.id).await?;
        Ok(JobDetails { job: row, skills })
    }

    async fn get_job(&self, id: i64) -> Result<JobDetails> {
        let job = sqlx::query_as::<_, Job>(&format!("SELECT {} FROM jobs WHERE id = $1", JOB_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Job {} not found", id)))?;
        let skills = self.job_skills(id).await?;
        Ok(JobDetails { job, skills })
    }

    async fn update_job(&self, id: i64, changes: JobChanges) -> Result<JobDetails> {
        let mut tx = self.pool.begin().await?;
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE jobs SET updated_at = NOW()");
        push_set(&mut qb, "title", changes.title);
        push_set(&mut qb, "description", changes.description);
        push_set(&mut qb, "requirements", changes.requirements);
        push_set(&mut qb, "responsibilities", changes.responsibilities);
        push_set(&mut qb, "benefits", changes.benefits);
        push_set(&mut qb, "area", changes.area);
        push_set(&mut qb, "area_id", changes.area_id);
        push_set(&mut qb, "seniority_level", changes.seniority_level);
        push_set(&mut qb, "work_modality", changes.work_modality);
        push_set(&mut qb, "contract_type", changes.contract_type);
        push_set(&mut qb, "min_salary", changes.min_salary);
        push_set(&mut qb, "max_salary", changes.max_salary);
        push_set(&mut qb, "salary_currency", changes.salary_currency);
        push_set(&mut qb, "city", changes.city);
        push_set(&mut qb, "state", changes.state);
        push_set(&mut qb, "country", changes.country);
        push_set(&mut qb, "is_active", changes.is_active);
        push_set(&mut qb, "is_company_hidden", changes.is_company_hidden);
        push_set(&mut qb, "expires_at", changes.expires_at);
        qb.push(" WHERE id = ")
            .push_bind(id)
            .push(format!(" RETURNING {}", JOB_COLUMNS));
        let job = qb
            .build_query_as::<Job>()
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Job {} not found", id)))?;

        if let Some(skills) = &changes.skills {
            Self::replace_job_skills(&mut tx, id, skills).await?;
        }
        tx.commit().await?;

        let skills = self.job_skills(id).await?;
        Ok(JobDetails { job, skills })
    }

    async fn delete_job(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("Job {} not found", id)));
        }
        Ok(())
    }

    async fn search_jobs(&self, filter: &JobFilter, page: PageRequest) -> Result<Page<Job>> {
        let mut count_qb = QueryBuilder::new("SELECT COUNT(*) FROM jobs");
        filter.push_where(&mut count_qb);
        let total = self.count(count_qb).await?;

        let mut qb = QueryBuilder::new(format!("SELECT {} FROM jobs", JOB_COLUMNS));
        filter.push_where(&mut qb);
        filter.push_order_by(&mut qb);
        qb.push(" LIMIT ")
            .push_bind(page.limit())
            .push(" OFFSET ")
            .push_bind(page.offset());
        let items = qb.build_query_as::<Job>().fetch_all(&self.pool).await?;

        Ok(Page::new(items, total, page))
    }

    async fn list_jobs(
        &self,
        company_id: Option<i64>,
        active: Option<bool>,
        page: PageRequest,
    ) -> Result<Page<Job>> {
        fn push_where(qb: &mut QueryBuilder<'_, Postgres>, company_id: Option<i64>, active: Option<bool>) {
            qb.push(" WHERE TRUE");
            if let Some(company_id) = company_id {
                qb.push(" AND company_id = ").push_bind(company_id);
            }
            if let Some(active) = active {
                qb.push(" AND is_active = ").push_bind(active);
            }
        }

        let mut count_qb = QueryBuilder::new("SELECT COUNT(*) FROM jobs");
        push_where(&mut count_qb, company_id, active);
        let total = self.count(count_qb).await?;

        let mut qb = QueryBuilder::new(format!("SELECT {} FROM jobs", JOB_COLUMNS));
        push_where(&mut qb, company_id, active);
        qb.push(" ORDER BY created_at DESC, id DESC LIMIT ")
            .push_bind(page.limit())
            .push(" OFFSET ")
            .push_bind(page.offset());
        let items = qb.build_query_as::<Job>().fetch_all(&self.pool).await?;

        Ok(Page::new(items, total, page))
    }

    async fn list_skills(&self) -> Result<Vec<Skill>> {
        let skills =
            sqlx::query_as::<_, Skill>("SELECT id, name, category FROM skills ORDER BY LOWER(name)")
                .fetch_all(&self.pool)
                .await?;
        Ok(skills)
    }

    async fn create_skill(&self, name: String, category: Option<String>) -> Result<Skill> {
        let skill = sqlx::query_as::<_, Skill>(
            "INSERT INTO skills (name, category) VALUES ($1, $2) RETURNING id, name, category",
        )
        .bind(name)
        .bind(category)
        .fetch_one(&self.pool)
        .await?;
        Ok(skill)
    }

    async fn list_areas(&self) -> Result<Vec<Area>> {
        let areas = sqlx::query_as::<_, Area>("SELECT id, name FROM areas ORDER BY LOWER(name)")
            .fetch_all(&self.pool)
            .await?;
        Ok(areas)
    }

    async fn create_area(&self, name: String) -> Result<Area> {
        let area = sqlx::query_as::<_, Area>("INSERT INTO areas (name) VALUES ($1) RETURNING id, name")
            .bind(name)
            .fetch_one(&self.pool)
            .await?;
        Ok(area)
    }

    async fn create_application(&self, application: NewApplication) -> Result<Application> {
        let row = sqlx::query_as::<_, ApplicationRow>(&format!(
            "INSERT INTO applications (job_id, candidate_id, match_score, cover_letter) \
             VALUES ($1, $2, $3, $4) RETURNING {}",
            APPLICATION_COLUMNS
        ))
        .bind(application.job_id)
        .bind(application.candidate_id)
        .bind(application.match_score)
        .bind(application.cover_letter)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match Error::from(e) {
            Error::Conflict(_) => {
                Error::Conflict("Candidate has already applied to this job".to_string())
            }
            other => other,
        })?;
        row.try_into()
    }

    async fn get_application(&self, id: i64) -> Result<Application> {
        let row = sqlx::query_as::<_, ApplicationRow>(&format!(
            "SELECT {} FROM applications WHERE id = $1",
            APPLICATION_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Application {} not found", id)))?;
        row.try_into()
    }

    async fn update_application_status(
        &self,
        id: i64,
        expected: ApplicationStatus,
        status: ApplicationStatus,
    ) -> Result<Application> {
        let row = sqlx::query_as::<_, ApplicationRow>(&format!(
            "UPDATE applications SET status = $2, updated_at = NOW() \
             WHERE id = $1 AND status = $3 RETURNING {}",
            APPLICATION_COLUMNS
        ))
        .bind(id)
        .bind(status.as_str())
        .bind(expected.as_str())
        .fetch_optional(&self.pool)
        .await?;
        if let Some(row) = row {
            return row.try_into();
        }

        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM applications WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        if exists {
            Err(Error::Conflict(format!(
                "Application {} is no longer '{}'",
                id, expected
            )))
        } else {
            Err(Error::NotFound(format!("Application {} not found", id)))
        }
    }

    async fn delete_application(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM applications WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("Application {} not found", id)));
        }
        Ok(())
    }

    async fn list_candidate_applications(
        &self,
        candidate_id: i64,
        status: Option<ApplicationStatus>,
        page: PageRequest,
    ) -> Result<Page<Application>> {
        let status = status.map(|s| s.as_str());
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM applications \
             WHERE candidate_id = $1 AND ($2::TEXT IS NULL OR status = $2)",
        )
        .bind(candidate_id)
        .bind(status)
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query_as::<_, ApplicationRow>(&format!(
            "SELECT {} FROM applications \
             WHERE candidate_id = $1 AND ($2::TEXT IS NULL OR status = $2) \
             ORDER BY applied_at DESC, id DESC LIMIT $3 OFFSET $4",
            APPLICATION_COLUMNS
        ))
        .bind(candidate_id)
        .bind(status)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(Page::new(into_applications(rows)?, total, page))
    }

    async fn list_job_applications(
        &self,
        job_id: i64,
        status: Option<ApplicationStatus>,
        page: PageRequest,
    ) -> Result<Page<Application>> {
        let status = status.map(|s| s.as_str());
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM applications \
             WHERE job_id = $1 AND ($2::TEXT IS NULL OR status = $2)",
        )
        .bind(job_id)
        .bind(status)
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query_as::<_, ApplicationRow>(&format!(
            "SELECT {} FROM applications \
             WHERE job_id = $1 AND ($2::TEXT IS NULL OR status = $2) \
             ORDER BY match_score DESC, applied_at DESC, id DESC LIMIT $3 OFFSET $4",
            APPLICATION_COLUMNS
        ))
        .bind(job_id)
        .bind(status)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(Page::new(into_applications(rows)?, total, page))
    }

    async fn get_resume(&self, candidate_id: i64) -> Result<Resume> {
        let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM candidates WHERE id = $1")
            .bind(candidate_id)
            .fetch_optional(&self.pool)
            .await?;
        if exists.is_none() {
            return Err(Error::NotFound(format!("Candidate {} not found", candidate_id)));
        }

        let experiences = sqlx::query_as::<_, Experience>(
            "SELECT * FROM experiences WHERE candidate_id = $1 \
             ORDER BY start_date DESC NULLS LAST, id DESC",
        )
        .bind(candidate_id)
        .fetch_all(&self.pool)
        .await?;
        let educations = sqlx::query_as::<_, Education>(
            "SELECT * FROM educations WHERE candidate_id = $1 \
             ORDER BY completion_date DESC NULLS LAST, id DESC",
        )
        .bind(candidate_id)
        .fetch_all(&self.pool)
        .await?;
        let certifications = sqlx::query_as::<_, Certification>(
            "SELECT * FROM certifications WHERE candidate_id = $1 \
             ORDER BY issue_date DESC NULLS LAST, id DESC",
        )
        .bind(candidate_id)
        .fetch_all(&self.pool)
        .await?;
        let projects = sqlx::query_as::<_, Project>(
            "SELECT * FROM projects WHERE candidate_id = $1 \
             ORDER BY start_date DESC NULLS LAST, id DESC",
        )
        .bind(candidate_id)
        .fetch_all(&self.pool)
        .await?;
        let languages = sqlx::query_as::<_, Language>(
            "SELECT * FROM languages WHERE candidate_id = $1 ORDER BY id",
        )
        .bind(candidate_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Resume {
            experiences,
            educations,
            certifications,
            projects,
            languages,
        })
    }

    async fn create_resume_entry(
        &self,
        candidate_id: i64,
        entry: ResumeEntry,
    ) -> Result<ResumeRecord> {
        let record = match entry {
            ResumeEntry::Experience(f) => ResumeRecord::Experience(
                sqlx::query_as::<_, Experience>(
                    "INSERT INTO experiences (candidate_id, job_title, company_name, city, state, \
                     country, start_date, end_date, is_current_job, description) \
                     VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING *",
                )
                .bind(candidate_id)
                .bind(f.job_title)
                .bind(f.company_name)
                .bind(f.city)
                .bind(f.state)
                .bind(f.country)
                .bind(f.start_date)
                .bind(f.end_date)
                .bind(f.is_current_job)
                .bind(f.description)
                .fetch_one(&self.pool)
                .await?,
            ),
            ResumeEntry::Education(f) => ResumeRecord::Education(
                sqlx::query_as::<_, Education>(
                    "INSERT INTO educations (candidate_id, degree_name, major, institution_name, \
                     start_date, completion_date, grade) \
                     VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
                )
                .bind(candidate_id)
                .bind(f.degree_name)
                .bind(f.major)
                .bind(f.institution_name)
                .bind(f.start_date)
                .bind(f.completion_date)
                .bind(f.grade)
                .fetch_one(&self.pool)
                .await?,
            ),
            ResumeEntry::Certification(f) => ResumeRecord::Certification(
                sqlx::query_as::<_, Certification>(
                    "INSERT INTO certifications (candidate_id, name, issuing_organization, \
                     issue_date, expiration_date, credential_id, credential_url) \
                     VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
                )
                .bind(candidate_id)
                .bind(f.name)
                .bind(f.issuing_organization)
                .bind(f.issue_date)
                .bind(f.expiration_date)
                .bind(f.credential_id)
                .bind(f.credential_url)
                .fetch_one(&self.pool)
                .await?,
            ),
            ResumeEntry::Project(f) => ResumeRecord::Project(
                sqlx::query_as::<_, Project>(
                    "INSERT INTO projects (candidate_id, name, description, role, technologies, \
                     start_date, end_date, is_current, project_url, repository_url) \
                     VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING *",
                )
                .bind(candidate_id)
                .bind(f.name)
                .bind(f.description)
                .bind(f.role)
                .bind(f.technologies)
                .bind(f.start_date)
                .bind(f.end_date)
                .bind(f.is_current)
                .bind(f.project_url)
                .bind(f.repository_url)
                .fetch_one(&self.pool)
                .await?,
            ),
            ResumeEntry::Language(f) => ResumeRecord::Language(
                sqlx::query_as::<_, Language>(
                    "INSERT INTO languages (candidate_id, name, proficiency, can_read, can_write, \
                     can_speak) VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
                )
                .bind(candidate_id)
                .bind(f.name)
                .bind(f.proficiency)
                .bind(f.can_read)
                .bind(f.can_write)
                .bind(f.can_speak)
                .fetch_one(&self.pool)
                .await?,
            ),
        };
        Ok(record)
    }

    async fn update_resume_entry(
        &self,
        candidate_id: i64,
        id: i64,
        entry: ResumeEntry,
    ) -> Result<ResumeRecord> {
        let section = entry.section();
        let record = match entry {
            ResumeEntry::Experience(f) => sqlx::query_as::<_, Experience>(
                "UPDATE experiences SET job_title = $3, company_name = $4, city = $5, state = $6, \
                 country = $7, start_date = $8, end_date = $9, is_current_job = $10, \
                 description = $11 WHERE id = $1 AND candidate_id = $2 RETURNING *",
            )
            .bind(id)
            .bind(candidate_id)
            .bind(f.job_title)
            .bind(f.company_name)
            .bind(f.city)
            .bind(f.state)
            .bind(f.country)
            .bind(f.start_date)
            .bind(f.end_date)
            .bind(f.is_current_job)
            .bind(f.description)
            .fetch_optional(&self.pool)
            .await?
            .map(ResumeRecord::Experience),
            ResumeEntry::Education(f) => sqlx::query_as::<_, Education>(
                "UPDATE educations SET degree_name = $3, major = $4, institution_name = $5, \
                 start_date = $6, completion_date = $7, grade = $8 \
                 WHERE id = $1 AND candidate_id = $2 RETURNING *",
            )
            .bind(id)
            .bind(candidate_id)
            .bind(f.degree_name)
            .bind(f.major)
            .bind(f.institution_name)
            .bind(f.start_date)
            .bind(f.completion_date)
            .bind(f.grade)
            .fetch_optional(&self.pool)
            .await?
            .map(ResumeRecord::Education),
            ResumeEntry::Certification(f) => sqlx::query_as::<_, Certification>(
                "UPDATE certifications SET name = $3, issuing_organization = $4, issue_date = $5, \
                 expiration_date = $6, credential_id = $7, credential_url = $8 \
                 WHERE id = $1 AND candidate_id = $2 RETURNING *",
            )
            .bind(id)
            .bind(candidate_id)
            .bind(f.name)
            .bind(f.issuing_organization)
            .bind(f.issue_date)
            .bind(f.expiration_date)
            .bind(f.credential_id)
            .bind(f.credential_url)
            .fetch_optional(&self.pool)
            .await?
            .map(ResumeRecord::Certification),
            ResumeEntry::Project(f) => sqlx::query_as::<_, Project>(
                "UPDATE projects SET name = $3, description = $4, role = $5, technologies = $6, \
                 start_date = $7, end_date = $8, is_current = $9, project_url = $10, \
                 repository_url = $11 WHERE id = $1 AND candidate_id = $2 RETURNING *",
            )
            .bind(id)
            .bind(candidate_id)
            .bind(f.name)
            .bind(f.description)
            .bind(f.role)
            .bind(f.technologies)
            .bind(f.start_date)
            .bind(f.end_date)
            .bind(f.is_current)
            .bind(f.project_url)
            .bind(f.repository_url)
            .fetch_optional(&self.pool)
            .await?
            .map(ResumeRecord::Project),
            ResumeEntry::Language(f) => sqlx::query_as::<_, Language>(
                "UPDATE languages SET name = $3, proficiency = $4, can_read = $5, can_write = $6, \
                 can_speak = $7 WHERE id = $1 AND candidate_id = $2 RETURNING *",
            )
            .bind(id)
            .bind(candidate_id)
            .bind(f.name)
            .bind(f.proficiency)
            .bind(f.can_read)
            .bind(f.can_write)
            .bind(f.can_speak)
            .fetch_optional(&self.pool)
            .await?
            .map(ResumeRecord::Language),
        };
        record.ok_or_else(|| Error::NotFound(format!("{} entry {} not found", section.table(), id)))
    }

    async fn delete_resume_entry(
        &self,
        candidate_id: i64,
        section: ResumeSection,
        id: i64,
    ) -> Result<()> {
        let sql = format!(
            "DELETE FROM {} WHERE id = $1 AND candidate_id = $2",
            section.table()
        );
        let result = sqlx::query(&sql)
            .bind(id)
            .bind(candidate_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("{} entry {} not found", section.table(), id)));
        }
        Ok(())
    }

    async fn stats(&self) -> Result<PlatformStats> {
        let (active_jobs, companies, candidates, applications): (i64, i64, i64, i64) =
            sqlx::query_as(
                r#"
                SELECT
                    (SELECT COUNT(*) FROM jobs WHERE is_active = TRUE),
                    (SELECT COUNT(*) FROM companies),
                    (SELECT COUNT(*) FROM candidates),
                    (SELECT COUNT(*) FROM applications)
                "#,
            )
            .fetch_one(&self.pool)
            .await?;
        Ok(PlatformStats {
            active_jobs,
            companies,
            candidates,
            applications,
        })
    }

    async fn company_stats(&self, company_id: i64) -> Result<CompanyStats> {
        let (total_jobs, active_jobs, total_applications): (i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT
                (SELECT COUNT(*) FROM jobs WHERE company_id = $1),
                (SELECT COUNT(*) FROM jobs WHERE company_id = $1 AND is_active = TRUE),
                (SELECT COUNT(*) FROM applications a
                    JOIN jobs j ON j.id = a.job_id
                    WHERE j.company_id = $1)
            "#,
        )
        .bind(company_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(CompanyStats {
            total_jobs,
            active_jobs,
            total_applications,
        })
    }
}
