use std::sync::Arc;

use crate::database::EntityStore;
use crate::dto::profile_dto::CompanyStatsResponse;
use crate::error::{Error, Result};
use crate::middleware::auth::AuthContext;
use crate::models::company::{Company, CompanyFields};
use crate::models::user::Role;
use crate::utils::text::non_blank;

pub async fn current_company(store: &dyn EntityStore, auth: &AuthContext) -> Result<Company> {
    auth.require_role(&[Role::Company])?;
    store
        .find_company_by_user(auth.user_id)
        .await?
        .ok_or_else(|| Error::NotFound("Company profile not found".to_string()))
}

#[derive(Clone)]
pub struct CompanyService {
    store: Arc<dyn EntityStore>,
}

impl CompanyService {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }

    pub async fn profile(&self, auth: &AuthContext) -> Result<Company> {
        current_company(self.store.as_ref(), auth).await
    }

    pub async fn save_profile(&self, auth: &AuthContext, fields: CompanyFields) -> Result<Company> {
        auth.require_role(&[Role::Company])?;
        let existing = self.store.find_company_by_user(auth.user_id).await?;
        if existing.is_none() && non_blank(fields.company_name.as_deref()).is_none() {
            return Err(Error::BadRequest(
                "company_name is required to create a profile".to_string(),
            ));
        }
        let company = self.store.upsert_company(auth.user_id, fields).await?;
        tracing::info!(company_id = company.id, created = existing.is_none(), "company profile saved");
        Ok(company)
    }

    pub async fn get(&self, id: i64) -> Result<Company> {
        self.store.get_company(id).await
    }

    pub async fn stats(&self, auth: &AuthContext) -> Result<CompanyStatsResponse> {
        let company = current_company(self.store.as_ref(), auth).await?;
        let counts = self.store.company_stats(company.id).await?;
        let conversion_rate = if counts.active_jobs > 0 {
            let rate = counts.total_applications as f64 / counts.active_jobs as f64;
            (rate * 100.0).round() / 100.0
        } else {
            0.0
        };
        Ok(CompanyStatsResponse {
            company_name: company.company_name,
            total_jobs: counts.total_jobs,
            active_jobs: counts.active_jobs,
            paused_jobs: counts.total_jobs - counts.active_jobs,
            total_applications: counts.total_applications,
            conversion_rate,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{CompanyStats, MockEntityStore};
    use crate::utils::time::now;

    fn company(id: i64, user_id: i64) -> Company {
        Company {
            id,
            user_id,
            company_name: "Acme".into(),
            description: None,
            website: None,
            sector: None,
            company_size: None,
            city: None,
            state: None,
            country: None,
            created_at: now(),
            updated_at: now(),
        }
    }

    #[tokio::test]
    async fn conversion_rate_is_applications_per_active_job() {
        let mut store = MockEntityStore::new();
        store
            .expect_find_company_by_user()
            .returning(|user_id| Ok(Some(company(4, user_id))));
        store
            .expect_company_stats()
            .withf(|company_id| *company_id == 4)
            .returning(|_| {
                Ok(CompanyStats {
                    total_jobs: 5,
                    active_jobs: 3,
                    total_applications: 7,
                })
            });

        let service = CompanyService::new(Arc::new(store));
        let stats = service.stats(&AuthContext::new(9, Role::Company)).await.unwrap();
        assert_eq!(stats.paused_jobs, 2);
        assert_eq!(stats.conversion_rate, 2.33);
        assert_eq!(stats.company_name, "Acme");
    }

    #[tokio::test]
    async fn no_active_jobs_means_zero_conversion() {
        let mut store = MockEntityStore::new();
        store
            .expect_find_company_by_user()
            .returning(|user_id| Ok(Some(company(4, user_id))));
        store.expect_company_stats().returning(|_| {
            Ok(CompanyStats {
                total_jobs: 2,
                active_jobs: 0,
                total_applications: 3,
            })
        });

        let service = CompanyService::new(Arc::new(store));
        let stats = service.stats(&AuthContext::new(9, Role::Company)).await.unwrap();
        assert_eq!(stats.conversion_rate, 0.0);
    }
}
