pub mod application_dto;
pub mod catalog_dto;
pub mod job_dto;
pub mod profile_dto;
pub mod resume_dto;
