use std::sync::Arc;

use crate::database::EntityStore;
use crate::dto::job_dto::{CompanyJobsQuery, CreateJobPayload, JobSearchQuery};
use crate::error::{Error, Result};
use crate::middleware::auth::AuthContext;
use crate::models::job::{Job, JobChanges, JobDetails};
use crate::models::user::Role;
use crate::services::candidate_service::current_candidate;
use crate::services::company_service::current_company;
use crate::services::job_filter::JobFilter;
use crate::services::match_service::{self, MatchBreakdown};
use crate::utils::pagination::{Page, PageRequest};

#[derive(Clone)]
pub struct JobService {
    store: Arc<dyn EntityStore>,
}

impl JobService {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }

    /// Public search over active jobs.
    pub async fn search(&self, query: &JobSearchQuery) -> Result<Page<Job>> {
        let filter = JobFilter::from_query(query)?;
        let page = PageRequest::from_query(query.page, query.per_page)?;
        self.store.search_jobs(&filter, page).await
    }

    pub async fn get(&self, id: i64) -> Result<JobDetails> {
        self.store.get_job(id).await
    }

    pub async fn create(&self, auth: &AuthContext, payload: CreateJobPayload) -> Result<JobDetails> {
        let company = current_company(self.store.as_ref(), auth).await?;
        let created = self.store.create_job(payload.into_new_job(company.id)).await?;
        tracing::info!(job_id = created.job.id, company_id = company.id, "job created");
        Ok(created)
    }

    pub async fn update(
        &self,
        auth: &AuthContext,
        id: i64,
        changes: JobChanges,
    ) -> Result<JobDetails> {
        let current = self.owned_job(auth, id).await?;
        let min = changes.min_salary.unwrap_or(current.job.min_salary);
        let max = changes.max_salary.unwrap_or(current.job.max_salary);
        if let (Some(min), Some(max)) = (min, max) {
            if min > max {
                return Err(Error::BadRequest(
                    "min_salary must not exceed max_salary".to_string(),
                ));
            }
        }
        let updated = self.store.update_job(id, changes).await?;
        tracing::info!(job_id = id, "job updated");
        Ok(updated)
    }

    pub async fn delete(&self, auth: &AuthContext, id: i64) -> Result<()> {
        self.owned_job(auth, id).await?;
        self.store.delete_job(id).await?;
        tracing::info!(job_id = id, "job deleted");
        Ok(())
    }

    pub async fn toggle_status(&self, auth: &AuthContext, id: i64) -> Result<JobDetails> {
        let current = self.owned_job(auth, id).await?;
        self.write_active(id, !current.job.is_active).await
    }

    pub async fn company_jobs(
        &self,
        auth: &AuthContext,
        query: &CompanyJobsQuery,
    ) -> Result<Page<Job>> {
        let company = current_company(self.store.as_ref(), auth).await?;
        let page = PageRequest::from_query(query.page, query.per_page)?;
        self.store.list_jobs(Some(company.id), query.active, page).await
    }

    /// Moderation listing, inactive jobs included.
    pub async fn admin_list(
        &self,
        auth: &AuthContext,
        query: &CompanyJobsQuery,
    ) -> Result<Page<Job>> {
        auth.require_role(&[Role::Admin])?;
        let page = PageRequest::from_query(query.page, query.per_page)?;
        self.store.list_jobs(None, query.active, page).await
    }

    pub async fn admin_set_active(
        &self,
        auth: &AuthContext,
        id: i64,
        is_active: bool,
    ) -> Result<JobDetails> {
        auth.require_role(&[Role::Admin])?;
        self.write_active(id, is_active).await
    }

    /// Fit of the authenticated candidate for a job, factor by factor.
    /// A scoring fault degrades to the fallback score, as on apply.
    pub async fn match_breakdown(&self, auth: &AuthContext, id: i64) -> Result<MatchBreakdown> {
        let candidate = current_candidate(self.store.as_ref(), auth).await?;
        let job = self.store.get_job(id).await?;
        Ok(match_service::breakdown_or_fallback(&candidate, &job))
    }

    /// Loads a job the caller's company owns; admins may act on any job.
    pub(crate) async fn owned_job(&self, auth: &AuthContext, id: i64) -> Result<JobDetails> {
        if auth.is_admin() {
            return self.store.get_job(id).await;
        }
        let company = current_company(self.store.as_ref(), auth).await?;
        let job = self.store.get_job(id).await?;
        if job.job.company_id != company.id {
            return Err(Error::Forbidden(
                "You do not have permission to manage this job".to_string(),
            ));
        }
        Ok(job)
    }

    async fn write_active(&self, id: i64, is_active: bool) -> Result<JobDetails> {
        let updated = self
            .store
            .update_job(
                id,
                JobChanges {
                    is_active: Some(is_active),
                    ..Default::default()
                },
            )
            .await?;
        tracing::info!(job_id = id, is_active, "job visibility changed");
        Ok(updated)
    }
}
