//! Persistence boundary.
//!
//! Every service talks to storage through [`EntityStore`]. Two backends exist:
//! [`pg_store::PgStore`] for PostgreSQL and [`memory_store::MemoryStore`], an
//! in-process store with the same constraints (unique application per job and
//! candidate, unique skill names, foreign keys).

pub mod memory_store;
pub mod pg_store;
pub mod pool;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::application::{Application, ApplicationStatus, NewApplication};
use crate::models::candidate::{Candidate, CandidateFields, CandidateProfile, CandidateSkill};
use crate::models::catalog::{Area, Skill};
use crate::models::company::{Company, CompanyFields};
use crate::models::job::{Job, JobChanges, JobDetails, NewJob};
use crate::models::resume::{Resume, ResumeEntry, ResumeRecord, ResumeSection};
use crate::models::user::{NewUser, User};
use crate::services::candidate_filter::CandidateFilter;
use crate::services::job_filter::JobFilter;
use crate::utils::pagination::{Page, PageRequest};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformStats {
    pub active_jobs: i64,
    pub companies: i64,
    pub candidates: i64,
    pub applications: i64,
}

/// Job and application counts of one company.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyStats {
    pub total_jobs: i64,
    pub active_jobs: i64,
    pub total_applications: i64,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EntityStore: Send + Sync {
    async fn create_user(&self, user: NewUser) -> Result<User>;

    async fn get_candidate(&self, id: i64) -> Result<CandidateProfile>;
    async fn find_candidate_by_user(&self, user_id: i64) -> Result<Option<CandidateProfile>>;
    /// Creates the profile on first call; later calls patch the provided fields.
    async fn upsert_candidate(&self, user_id: i64, fields: CandidateFields) -> Result<Candidate>;
    /// Replaces the whole skill set of a candidate.
    async fn set_candidate_skills(
        &self,
        candidate_id: i64,
        skills: Vec<(i64, i16)>,
    ) -> Result<Vec<CandidateSkill>>;

    /// Actively looking candidates matching `filter`, newest profiles first.
    async fn search_candidates(
        &self,
        filter: &CandidateFilter,
        page: PageRequest,
    ) -> Result<Page<Candidate>>;

    async fn get_company(&self, id: i64) -> Result<Company>;
    async fn find_company_by_user(&self, user_id: i64) -> Result<Option<Company>>;
    async fn upsert_company(&self, user_id: i64, fields: CompanyFields) -> Result<Company>;

    async fn create_job(&self, job: NewJob) -> Result<JobDetails>;
    async fn get_job(&self, id: i64) -> Result<JobDetails>;
    async fn update_job(&self, id: i64, changes: JobChanges) -> Result<JobDetails>;
    async fn delete_job(&self, id: i64) -> Result<()>;
    /// Active jobs matching every criterion of `filter`, in the filter's order.
    async fn search_jobs(&self, filter: &JobFilter, page: PageRequest) -> Result<Page<Job>>;
    /// Jobs regardless of the public search rules, newest first.
    async fn list_jobs(
        &self,
        company_id: Option<i64>,
        active: Option<bool>,
        page: PageRequest,
    ) -> Result<Page<Job>>;

    async fn list_skills(&self) -> Result<Vec<Skill>>;
    async fn create_skill(&self, name: String, category: Option<String>) -> Result<Skill>;
    async fn list_areas(&self) -> Result<Vec<Area>>;
    async fn create_area(&self, name: String) -> Result<Area>;

    /// Fails with `Error::Conflict` when the (job, candidate) pair already applied.
    async fn create_application(&self, application: NewApplication) -> Result<Application>;
    async fn get_application(&self, id: i64) -> Result<Application>;
    /// Compare-and-set on the status column. `Error::Conflict` when the row
    /// no longer holds `expected`.
    async fn update_application_status(
        &self,
        id: i64,
        expected: ApplicationStatus,
        status: ApplicationStatus,
    ) -> Result<Application>;
    async fn delete_application(&self, id: i64) -> Result<()>;
    async fn list_candidate_applications(
        &self,
        candidate_id: i64,
        status: Option<ApplicationStatus>,
        page: PageRequest,
    ) -> Result<Page<Application>>;
    /// Best matches first, then most recent.
    async fn list_job_applications(
        &self,
        job_id: i64,
        status: Option<ApplicationStatus>,
        page: PageRequest,
    ) -> Result<Page<Application>>;

    async fn get_resume(&self, candidate_id: i64) -> Result<Resume>;
    async fn create_resume_entry(
        &self,
        candidate_id: i64,
        entry: ResumeEntry,
    ) -> Result<ResumeRecord>;
    /// `Error::NotFound` unless the row exists and belongs to `candidate_id`.
    async fn update_resume_entry(
        &self,
        candidate_id: i64,
        id: i64,
        entry: ResumeEntry,
    ) -> Result<ResumeRecord>;
    async fn delete_resume_entry(
        &self,
        candidate_id: i64,
        section: ResumeSection,
        id: i64,
    ) -> Result<()>;

    async fn stats(&self) -> Result<PlatformStats>;
    async fn company_stats(&self, company_id: i64) -> Result<CompanyStats>;
}
