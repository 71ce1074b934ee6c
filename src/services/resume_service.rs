use std::sync::Arc;

use crate::database::EntityStore;
use crate::error::{Error, Result};
use crate::middleware::auth::AuthContext;
use crate::models::resume::{Resume, ResumeEntry, ResumeRecord, ResumeSection};
use crate::services::candidate_service::current_candidate;

#[derive(Clone)]
pub struct ResumeService {
    store: Arc<dyn EntityStore>,
}

impl ResumeService {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }

    pub async fn resume(&self, auth: &AuthContext) -> Result<Resume> {
        let candidate = current_candidate(self.store.as_ref(), auth).await?;
        self.store.get_resume(candidate.candidate.id).await
    }

    pub async fn add(&self, auth: &AuthContext, entry: ResumeEntry) -> Result<ResumeRecord> {
        let candidate = current_candidate(self.store.as_ref(), auth).await?;
        let record = self
            .store
            .create_resume_entry(candidate.candidate.id, entry)
            .await?;
        tracing::info!(candidate_id = candidate.candidate.id, entry_id = record.id(), "resume entry added");
        Ok(record)
    }

    pub async fn update(
        &self,
        auth: &AuthContext,
        section: ResumeSection,
        id: i64,
        entry: ResumeEntry,
    ) -> Result<ResumeRecord> {
        if entry.section() != section {
            return Err(Error::BadRequest(format!(
                "payload does not belong to section '{}'",
                section.table()
            )));
        }
        let candidate = current_candidate(self.store.as_ref(), auth).await?;
        self.store
            .update_resume_entry(candidate.candidate.id, id, entry)
            .await
    }

    pub async fn remove(&self, auth: &AuthContext, section: ResumeSection, id: i64) -> Result<()> {
        let candidate = current_candidate(self.store.as_ref(), auth).await?;
        self.store
            .delete_resume_entry(candidate.candidate.id, section, id)
            .await?;
        tracing::info!(candidate_id = candidate.candidate.id, entry_id = id, "resume entry removed");
        Ok(())
    }
}
