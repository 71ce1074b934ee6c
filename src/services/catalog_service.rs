//! Skill and area reference data, plus public platform counters.

use std::sync::Arc;

use crate::database::{EntityStore, PlatformStats};
use crate::error::Result;
use crate::middleware::auth::AuthContext;
use crate::models::catalog::{Area, Skill};
use crate::models::user::Role;

#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn EntityStore>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }

    pub async fn skills(&self) -> Result<Vec<Skill>> {
        self.store.list_skills().await
    }

    pub async fn create_skill(
        &self,
        auth: &AuthContext,
        name: String,
        category: Option<String>,
    ) -> Result<Skill> {
        auth.require_role(&[Role::Admin])?;
        let skill = self
            .store
            .create_skill(name.trim().to_string(), category)
            .await?;
        tracing::info!(skill_id = skill.id, name = %skill.name, "skill created");
        Ok(skill)
    }

    pub async fn areas(&self) -> Result<Vec<Area>> {
        self.store.list_areas().await
    }

    pub async fn create_area(&self, auth: &AuthContext, name: String) -> Result<Area> {
        auth.require_role(&[Role::Admin])?;
        let area = self.store.create_area(name.trim().to_string()).await?;
        tracing::info!(area_id = area.id, name = %area.name, "area created");
        Ok(area)
    }

    pub async fn stats(&self) -> Result<PlatformStats> {
        self.store.stats().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MockEntityStore;
    use crate::error::Error;

    #[tokio::test]
    async fn only_admins_create_skills() {
        let mut store = MockEntityStore::new();
        store.expect_create_skill().never();
        let service = CatalogService::new(Arc::new(store));
        let err = service
            .create_skill(&AuthContext::new(1, Role::Company), "Rust".into(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Forbidden(_)));
    }

    #[tokio::test]
    async fn skill_names_are_trimmed() {
        let mut store = MockEntityStore::new();
        store
            .expect_create_skill()
            .withf(|name, _| name == "Rust")
            .returning(|name, category| Ok(Skill { id: 1, name, category }));
        let service = CatalogService::new(Arc::new(store));
        let skill = service
            .create_skill(&AuthContext::new(1, Role::Admin), "  Rust ".into(), None)
            .await
            .unwrap();
        assert_eq!(skill.name, "Rust");
    }
}
