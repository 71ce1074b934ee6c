pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use std::sync::Arc;

use crate::database::EntityStore;
use crate::services::{
    application_service::ApplicationService, candidate_service::CandidateService,
    catalog_service::CatalogService, company_service::CompanyService, i18n_service::Localizer,
    job_service::JobService, resume_service::ResumeService,
};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn EntityStore>,
    pub jwt_secret: Arc<str>,
    pub localizer: Localizer,
    pub job_service: JobService,
    pub application_service: ApplicationService,
    pub candidate_service: CandidateService,
    pub company_service: CompanyService,
    pub resume_service: ResumeService,
    pub catalog_service: CatalogService,
}

impl AppState {
    pub fn new(store: Arc<dyn EntityStore>, jwt_secret: &str, localizer: Localizer) -> Self {
        Self {
            job_service: JobService::new(store.clone()),
            application_service: ApplicationService::new(store.clone()),
            candidate_service: CandidateService::new(store.clone()),
            company_service: CompanyService::new(store.clone()),
            resume_service: ResumeService::new(store.clone()),
            catalog_service: CatalogService::new(store.clone()),
            store,
            jwt_secret: Arc::from(jwt_secret),
            localizer,
        }
    }
}
