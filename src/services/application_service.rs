//! Application lifecycle: apply, move through review stages, withdraw.

use std::sync::Arc;

use crate::database::EntityStore;
use crate::error::{Error, Result};
use crate::middleware::auth::AuthContext;
use crate::models::application::{Application, ApplicationStatus, NewApplication};
use crate::models::job::JobDetails;
use crate::models::user::Role;
use crate::services::candidate_service::current_candidate;
use crate::services::company_service::current_company;
use crate::services::match_service;
use crate::utils::pagination::{Page, PageRequest};

#[derive(Clone)]
pub struct ApplicationService {
    store: Arc<dyn EntityStore>,
}

impl ApplicationService {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }

    /// The match score is captured once, here, and never recomputed.
    /// Duplicate applications are rejected by the store itself.
    pub async fn apply(
        &self,
        auth: &AuthContext,
        job_id: i64,
        cover_letter: Option<String>,
    ) -> Result<Application> {
        let candidate = current_candidate(self.store.as_ref(), auth).await?;
        let job = self.store.get_job(job_id).await?;
        if !job.job.is_active {
            return Err(Error::BadRequest(
                "This job is no longer accepting applications".to_string(),
            ));
        }

        let match_score = match_service::score_or_fallback(&candidate, &job);
        let application = self
            .store
            .create_application(NewApplication {
                job_id,
                candidate_id: candidate.candidate.id,
                match_score: i16::from(match_score),
                cover_letter,
            })
            .await?;

        tracing::info!(
            application_id = application.id,
            job_id,
            candidate_id = candidate.candidate.id,
            match_score,
            "application submitted"
        );
        Ok(application)
    }

    pub async fn transition(
        &self,
        auth: &AuthContext,
        application_id: i64,
        next: ApplicationStatus,
    ) -> Result<Application> {
        let company = current_company(self.store.as_ref(), auth).await?;
        let application = self.store.get_application(application_id).await?;
        let job = self.store.get_job(application.job_id).await?;
        if job.job.company_id != company.id {
            return Err(Error::Forbidden(
                "You do not have permission to update this application".to_string(),
            ));
        }

        let current = application.status;
        if current == next {
            return Ok(application);
        }
        if !current.can_transition_to(next) {
            return Err(Error::BadRequest(format!(
                "Cannot move application from '{}' to '{}'",
                current, next
            )));
        }

        let updated = self
            .store
            .update_application_status(application_id, current, next)
            .await?;
        tracing::info!(
            application_id,
            from = %current,
            to = %next,
            "application status changed"
        );
        Ok(updated)
    }

    /// Only the candidate who applied may withdraw; the row is deleted.
    pub async fn withdraw(&self, auth: &AuthContext, application_id: i64) -> Result<()> {
        if auth.role != Role::Candidate {
            return Err(Error::Forbidden(
                "Only the applicant can withdraw an application".to_string(),
            ));
        }
        let candidate = current_candidate(self.store.as_ref(), auth).await?;
        let application = self.store.get_application(application_id).await?;
        if application.candidate_id != candidate.candidate.id {
            return Err(Error::Forbidden(
                "You do not have permission to withdraw this application".to_string(),
            ));
        }

        self.store.delete_application(application_id).await?;
        tracing::info!(application_id, candidate_id = candidate.candidate.id, "application withdrawn");
        Ok(())
    }

    /// Visible to the applicant and to the company that owns the job.
    pub async fn get(&self, auth: &AuthContext, application_id: i64) -> Result<Application> {
        let application = self.store.get_application(application_id).await?;
        let allowed = match auth.role {
            Role::Candidate => {
                let candidate = current_candidate(self.store.as_ref(), auth).await?;
                application.candidate_id == candidate.candidate.id
            }
            Role::Company => {
                let company = current_company(self.store.as_ref(), auth).await?;
                let job = self.store.get_job(application.job_id).await?;
                job.job.company_id == company.id
            }
            Role::Admin => true,
        };
        if !allowed {
            return Err(Error::Forbidden(
                "You do not have access to this application".to_string(),
            ));
        }
        Ok(application)
    }

    pub async fn my_applications(
        &self,
        auth: &AuthContext,
        status: Option<ApplicationStatus>,
        page: PageRequest,
    ) -> Result<Page<Application>> {
        let candidate = current_candidate(self.store.as_ref(), auth).await?;
        self.store
            .list_candidate_applications(candidate.candidate.id, status, page)
            .await
    }

    /// Applications to one of the caller's jobs, best matches first.
    pub async fn job_applications(
        &self,
        auth: &AuthContext,
        job_id: i64,
        status: Option<ApplicationStatus>,
        page: PageRequest,
    ) -> Result<Page<Application>> {
        let job = self.owned_job(auth, job_id).await?;
        self.store
            .list_job_applications(job.job.id, status, page)
            .await
    }

    async fn owned_job(&self, auth: &AuthContext, job_id: i64) -> Result<JobDetails> {
        let company = current_company(self.store.as_ref(), auth).await?;
        let job = self.store.get_job(job_id).await?;
        if job.job.company_id != company.id {
            return Err(Error::Forbidden(
                "You do not have permission to view these applications".to_string(),
            ));
        }
        Ok(job)
    }
}
