use std::sync::Arc;

use crate::database::EntityStore;
use crate::error::{Error, Result};
use crate::middleware::auth::AuthContext;
use crate::dto::profile_dto::CandidateSearchQuery;
use crate::models::candidate::{Candidate, CandidateFields, CandidateProfile};
use crate::models::user::Role;
use crate::services::candidate_filter::CandidateFilter;
use crate::utils::pagination::{Page, PageRequest};
use crate::utils::text::non_blank;

/// Profile of the authenticated candidate, or `NotFound` when none was created yet.
pub async fn current_candidate(
    store: &dyn EntityStore,
    auth: &AuthContext,
) -> Result<CandidateProfile> {
    auth.require_role(&[Role::Candidate])?;
    store
        .find_candidate_by_user(auth.user_id)
        .await?
        .ok_or_else(|| Error::NotFound("Candidate profile not found".to_string()))
}

#[derive(Clone)]
pub struct CandidateService {
    store: Arc<dyn EntityStore>,
}

impl CandidateService {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }

    pub async fn profile(&self, auth: &AuthContext) -> Result<CandidateProfile> {
        current_candidate(self.store.as_ref(), auth).await
    }

    /// Creates the profile on first save; names are mandatory at that point.
    pub async fn save_profile(
        &self,
        auth: &AuthContext,
        fields: CandidateFields,
    ) -> Result<CandidateProfile> {
        auth.require_role(&[Role::Candidate])?;
        let existing = self.store.find_candidate_by_user(auth.user_id).await?;
        if existing.is_none()
            && (non_blank(fields.first_name.as_deref()).is_none()
                || non_blank(fields.last_name.as_deref()).is_none())
        {
            return Err(Error::BadRequest(
                "first_name and last_name are required to create a profile".to_string(),
            ));
        }

        let candidate = self.store.upsert_candidate(auth.user_id, fields).await?;
        tracing::info!(
            candidate_id = candidate.id,
            created = existing.is_none(),
            "candidate profile saved"
        );
        self.store.get_candidate(candidate.id).await
    }

    pub async fn set_skills(
        &self,
        auth: &AuthContext,
        skills: Vec<(i64, i16)>,
    ) -> Result<CandidateProfile> {
        let profile = current_candidate(self.store.as_ref(), auth).await?;
        let skills = self
            .store
            .set_candidate_skills(profile.candidate.id, skills)
            .await?;
        Ok(CandidateProfile {
            candidate: profile.candidate,
            skills,
        })
    }

    /// Recruiter search over candidates who are open to offers.
    pub async fn search(
        &self,
        auth: &AuthContext,
        query: &CandidateSearchQuery,
    ) -> Result<Page<Candidate>> {
        auth.require_role(&[Role::Company, Role::Admin])?;
        let filter = CandidateFilter::from_query(query)?;
        let page = PageRequest::from_query(query.page, query.per_page)?;
        self.store.search_candidates(&filter, page).await
    }

    /// Recruiter view of a candidate.
    pub async fn get(&self, auth: &AuthContext, id: i64) -> Result<CandidateProfile> {
        auth.require_role(&[Role::Company, Role::Admin])?;
        self.store.get_candidate(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MockEntityStore;

    #[tokio::test]
    async fn first_save_requires_names() {
        let mut store = MockEntityStore::new();
        store
            .expect_find_candidate_by_user()
            .returning(|_| Ok(None));
        store.expect_upsert_candidate().never();

        let service = CandidateService::new(Arc::new(store));
        let err = service
            .save_profile(
                &AuthContext::new(7, Role::Candidate),
                CandidateFields {
                    first_name: Some("Ana".into()),
                    last_name: Some("  ".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::BadRequest(_)));
    }

    #[tokio::test]
    async fn companies_cannot_edit_candidate_profiles() {
        let service = CandidateService::new(Arc::new(MockEntityStore::new()));
        let err = service
            .save_profile(&AuthContext::new(1, Role::Company), CandidateFields::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Forbidden(_)));
    }

    #[tokio::test]
    async fn missing_profile_is_not_found() {
        let mut store = MockEntityStore::new();
        store
            .expect_find_candidate_by_user()
            .returning(|_| Ok(None));
        let service = CandidateService::new(Arc::new(store));
        let err = service
            .profile(&AuthContext::new(3, Role::Candidate))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn candidates_cannot_search_candidates() {
        let mut store = MockEntityStore::new();
        store.expect_search_candidates().never();
        let service = CandidateService::new(Arc::new(store));
        let err = service
            .search(&AuthContext::new(3, Role::Candidate), &CandidateSearchQuery::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Forbidden(_)));
    }
}
