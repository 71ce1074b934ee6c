use axum::{
    extract::{Path, State},
    response::{IntoResponse, Json},
    Extension,
};
use serde_json::json;
use validator::Validate;

use crate::{
    dto::profile_dto::{CompanyProfilePayload, CompanyStatsResponse},
    error::Result,
    middleware::auth::AuthContext,
    services::i18n_service::Locale,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/companies/profile",
    responses(
        (status = 200, description = "Profile of the authenticated company"),
        (status = 404, description = "Profile not created yet")
    )
)]
#[axum::debug_handler]
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<impl IntoResponse> {
    let company = state.company_service.profile(&auth).await?;
    Ok(Json(json!({ "company": company })))
}

#[utoipa::path(
    put,
    path = "/api/companies/profile",
    request_body = CompanyProfilePayload,
    responses(
        (status = 200, description = "Profile created or updated"),
        (status = 400, description = "Invalid payload")
    )
)]
#[axum::debug_handler]
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    locale: Locale,
    Json(payload): Json<CompanyProfilePayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let company = state
        .company_service
        .save_profile(&auth, payload.into())
        .await?;
    Ok(Json(json!({
        "message": state.localizer.t(locale.as_str(), "profile.updated"),
        "company": company,
    })))
}

#[utoipa::path(
    get,
    path = "/api/companies/{id}",
    params(
        ("id" = i64, Path, description = "Company ID")
    ),
    responses(
        (status = 200, description = "Company found"),
        (status = 404, description = "Company not found")
    )
)]
#[axum::debug_handler]
pub async fn get_company(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let company = state.company_service.get(id).await?;
    Ok(Json(company))
}

#[utoipa::path(
    get,
    path = "/api/stats/company",
    responses(
        (status = 200, description = "Job and application counters of the caller's company", body = Json<CompanyStatsResponse>),
        (status = 403, description = "Companies only"),
        (status = 404, description = "Profile not created yet")
    )
)]
#[axum::debug_handler]
pub async fn company_stats(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<impl IntoResponse> {
    let stats = state.company_service.stats(&auth).await?;
    Ok(Json(stats))
}
