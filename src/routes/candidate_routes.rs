use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Json},
    Extension,
};
use validator::Validate;

use crate::{
    dto::profile_dto::{
        CandidateProfilePayload, CandidateProfileResponse, CandidateSearchQuery,
        CandidateSkillsPayload,
    },
    error::Result,
    middleware::auth::AuthContext,
    services::i18n_service::Locale,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/candidates/profile",
    responses(
        (status = 200, description = "Profile of the authenticated candidate"),
        (status = 404, description = "Profile not created yet")
    )
)]
#[axum::debug_handler]
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<impl IntoResponse> {
    let candidate = state.candidate_service.profile(&auth).await?;
    Ok(Json(CandidateProfileResponse {
        message: None,
        candidate,
    }))
}

#[utoipa::path(
    put,
    path = "/api/candidates/profile",
    request_body = CandidateProfilePayload,
    responses(
        (status = 200, description = "Profile created or updated", body = Json<CandidateProfileResponse>),
        (status = 400, description = "Invalid payload")
    )
)]
#[axum::debug_handler]
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    locale: Locale,
    Json(payload): Json<CandidateProfilePayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let candidate = state
        .candidate_service
        .save_profile(&auth, payload.into())
        .await?;
    Ok(Json(CandidateProfileResponse {
        message: Some(state.localizer.t(locale.as_str(), "profile.updated")),
        candidate,
    }))
}

#[utoipa::path(
    put,
    path = "/api/candidates/skills",
    request_body = CandidateSkillsPayload,
    responses(
        (status = 200, description = "Skill set replaced", body = Json<CandidateProfileResponse>),
        (status = 404, description = "Unknown skill or missing profile"),
        (status = 409, description = "Skill listed twice")
    )
)]
#[axum::debug_handler]
pub async fn update_skills(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    locale: Locale,
    Json(payload): Json<CandidateSkillsPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let skills = payload
        .skills
        .into_iter()
        .map(|s| (s.skill_id, s.proficiency_level))
        .collect();
    let candidate = state.candidate_service.set_skills(&auth, skills).await?;
    Ok(Json(CandidateProfileResponse {
        message: Some(state.localizer.t(locale.as_str(), "skills.updated")),
        candidate,
    }))
}

#[utoipa::path(
    get,
    path = "/api/candidates/search",
    params(
        ("page" = Option<u32>, Query, description = "Page number"),
        ("per_page" = Option<u32>, Query, description = "Items per page"),
        ("q" = Option<String>, Query, description = "Name or current title"),
        ("city" = Option<String>, Query, description = "City substring"),
        ("state" = Option<String>, Query, description = "State substring"),
        ("min_salary" = Option<String>, Query, description = "Lowest expected salary"),
        ("max_salary" = Option<String>, Query, description = "Highest expected salary")
    ),
    responses(
        (status = 200, description = "Actively looking candidates"),
        (status = 400, description = "Invalid filter"),
        (status = 403, description = "Only companies and admins may search candidates")
    )
)]
#[axum::debug_handler]
pub async fn search_candidates(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<CandidateSearchQuery>,
) -> Result<impl IntoResponse> {
    let page = state.candidate_service.search(&auth, &query).await?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/api/candidates/{id}",
    params(
        ("id" = i64, Path, description = "Candidate ID")
    ),
    responses(
        (status = 200, description = "Candidate profile"),
        (status = 403, description = "Only companies and admins may browse candidates"),
        (status = 404, description = "Candidate not found")
    )
)]
#[axum::debug_handler]
pub async fn get_candidate(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let candidate = state.candidate_service.get(&auth, id).await?;
    Ok(Json(candidate))
}
