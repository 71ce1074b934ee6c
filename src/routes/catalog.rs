use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use serde_json::json;
use validator::Validate;

use crate::{
    dto::catalog_dto::{CreateAreaPayload, CreateSkillPayload},
    error::Result,
    middleware::auth::AuthContext,
    services::i18n_service::Locale,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/skills",
    responses(
        (status = 200, description = "Skill catalog ordered by category and name")
    )
)]
#[axum::debug_handler]
pub async fn list_skills(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let skills = state.catalog_service.skills().await?;
    Ok(Json(json!({ "skills": skills })))
}

#[utoipa::path(
    post,
    path = "/api/skills",
    request_body = CreateSkillPayload,
    responses(
        (status = 201, description = "Skill created"),
        (status = 403, description = "Admins only"),
        (status = 409, description = "Skill name already taken")
    )
)]
#[axum::debug_handler]
pub async fn create_skill(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    locale: Locale,
    Json(payload): Json<CreateSkillPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let skill = state
        .catalog_service
        .create_skill(&auth, payload.name, payload.category)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": state.localizer.t(locale.as_str(), "skill.created"),
            "skill": skill,
        })),
    ))
}

#[utoipa::path(
    get,
    path = "/api/areas",
    responses(
        (status = 200, description = "Professional areas ordered by name")
    )
)]
#[axum::debug_handler]
pub async fn list_areas(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let areas = state.catalog_service.areas().await?;
    Ok(Json(json!({ "areas": areas })))
}

#[utoipa::path(
    post,
    path = "/api/areas",
    request_body = CreateAreaPayload,
    responses(
        (status = 201, description = "Area created"),
        (status = 403, description = "Admins only"),
        (status = 409, description = "Area name already taken")
    )
)]
#[axum::debug_handler]
pub async fn create_area(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    locale: Locale,
    Json(payload): Json<CreateAreaPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let area = state.catalog_service.create_area(&auth, payload.name).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": state.localizer.t(locale.as_str(), "area.created"),
            "area": area,
        })),
    ))
}

#[utoipa::path(
    get,
    path = "/api/stats",
    responses(
        (status = 200, description = "Public platform counters")
    )
)]
#[axum::debug_handler]
pub async fn platform_stats(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let stats = state.catalog_service.stats().await?;
    Ok(Json(stats))
}
