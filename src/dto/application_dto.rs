use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::application::{Application, ApplicationStatus};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ApplyPayload {
    pub job_id: i64,
    #[validate(length(max = 5000))]
    pub cover_letter: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusPayload {
    pub status: String,
}

impl UpdateStatusPayload {
    pub fn parse(&self) -> crate::error::Result<ApplicationStatus> {
        self.status
            .parse()
            .map_err(crate::error::Error::BadRequest)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ApplicationListQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub status: Option<String>,
}

impl ApplicationListQuery {
    pub fn status_filter(&self) -> crate::error::Result<Option<ApplicationStatus>> {
        match crate::utils::text::non_blank(self.status.as_deref()) {
            Some(raw) => raw
                .parse()
                .map(Some)
                .map_err(crate::error::Error::BadRequest),
            None => Ok(None),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationMutationResponse {
    pub message: String,
    pub application: Application,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationListResponse {
    pub items: Vec<Application>,
    pub total: i64,
    pub page: u32,
    pub per_page: u32,
    pub total_pages: i64,
}

impl From<crate::utils::pagination::Page<Application>> for ApplicationListResponse {
    fn from(value: crate::utils::pagination::Page<Application>) -> Self {
        Self {
            items: value.items,
            total: value.total,
            page: value.page,
            per_page: value.per_page,
            total_pages: value.total_pages,
        }
    }
}
