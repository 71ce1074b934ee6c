use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Company {
    pub id: i64,
    pub user_id: i64,
    pub company_name: String,
    pub description: Option<String>,
    pub website: Option<String>,
    pub sector: Option<String>,
    pub company_size: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct CompanyFields {
    pub company_name: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
    pub sector: Option<String>,
    pub company_size: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}
