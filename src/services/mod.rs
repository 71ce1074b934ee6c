pub mod application_service;
pub mod candidate_filter;
pub mod candidate_service;
pub mod catalog_service;
pub mod company_service;
pub mod i18n_service;
pub mod job_filter;
pub mod job_service;
pub mod match_service;
pub mod resume_service;
