use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use serde_json::json;
use validator::Validate;

use crate::{
    dto::application_dto::{
        ApplicationListQuery, ApplicationListResponse, ApplicationMutationResponse, ApplyPayload,
        UpdateStatusPayload,
    },
    error::Result,
    middleware::auth::AuthContext,
    services::i18n_service::Locale,
    utils::pagination::PageRequest,
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/applications",
    request_body = ApplyPayload,
    responses(
        (status = 201, description = "Application submitted", body = Json<ApplicationMutationResponse>),
        (status = 400, description = "Job is not accepting applications"),
        (status = 404, description = "Job or candidate profile not found"),
        (status = 409, description = "Candidate already applied to this job")
    )
)]
#[axum::debug_handler]
pub async fn apply(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    locale: Locale,
    Json(payload): Json<ApplyPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let application = state
        .application_service
        .apply(&auth, payload.job_id, payload.cover_letter)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApplicationMutationResponse {
            message: state.localizer.t(locale.as_str(), "application.created"),
            application,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/applications/my-applications",
    params(
        ("page" = Option<u32>, Query, description = "Page number"),
        ("per_page" = Option<u32>, Query, description = "Items per page"),
        ("status" = Option<String>, Query, description = "Filter by application status")
    ),
    responses(
        (status = 200, description = "Applications of the authenticated candidate", body = Json<ApplicationListResponse>)
    )
)]
#[axum::debug_handler]
pub async fn my_applications(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<ApplicationListQuery>,
) -> Result<impl IntoResponse> {
    let status = query.status_filter()?;
    let page = PageRequest::from_query(query.page, query.per_page)?;
    let result = state
        .application_service
        .my_applications(&auth, status, page)
        .await?;
    Ok(Json(ApplicationListResponse::from(result)))
}

#[utoipa::path(
    get,
    path = "/api/applications/{id}",
    params(
        ("id" = i64, Path, description = "Application ID")
    ),
    responses(
        (status = 200, description = "Application found"),
        (status = 403, description = "Not the applicant nor the hiring company"),
        (status = 404, description = "Application not found")
    )
)]
#[axum::debug_handler]
pub async fn get_application(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let application = state.application_service.get(&auth, id).await?;
    Ok(Json(application))
}

#[utoipa::path(
    put,
    path = "/api/applications/{id}/status",
    params(
        ("id" = i64, Path, description = "Application ID")
    ),
    request_body = UpdateStatusPayload,
    responses(
        (status = 200, description = "Status updated", body = Json<ApplicationMutationResponse>),
        (status = 400, description = "Unknown status or illegal transition"),
        (status = 403, description = "Job belongs to another company"),
        (status = 404, description = "Application not found")
    )
)]
#[axum::debug_handler]
pub async fn update_status(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    locale: Locale,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateStatusPayload>,
) -> Result<impl IntoResponse> {
    let next = payload.parse()?;
    let application = state
        .application_service
        .transition(&auth, id, next)
        .await?;
    Ok(Json(ApplicationMutationResponse {
        message: state
            .localizer
            .t(locale.as_str(), "application.status_updated"),
        application,
    }))
}

#[utoipa::path(
    delete,
    path = "/api/applications/{id}",
    params(
        ("id" = i64, Path, description = "Application ID")
    ),
    responses(
        (status = 200, description = "Application withdrawn"),
        (status = 403, description = "Only the applicant may withdraw"),
        (status = 404, description = "Application not found")
    )
)]
#[axum::debug_handler]
pub async fn withdraw(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    locale: Locale,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    state.application_service.withdraw(&auth, id).await?;
    Ok(Json(json!({
        "message": state.localizer.t(locale.as_str(), "application.withdrawn"),
    })))
}
