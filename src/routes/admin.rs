use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Json},
    Extension,
};

use crate::{
    dto::catalog_dto::SetActivePayload,
    dto::job_dto::{CompanyJobsQuery, JobListResponse, JobMutationResponse, JobResponse},
    error::Result,
    middleware::auth::AuthContext,
    services::i18n_service::Locale,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/admin/jobs",
    params(
        ("page" = Option<u32>, Query, description = "Page number"),
        ("per_page" = Option<u32>, Query, description = "Items per page"),
        ("active" = Option<bool>, Query, description = "Only active or only inactive jobs")
    ),
    responses(
        (status = 200, description = "Every job on the platform", body = Json<JobListResponse>),
        (status = 403, description = "Admins only")
    )
)]
#[axum::debug_handler]
pub async fn list_jobs(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<CompanyJobsQuery>,
) -> Result<impl IntoResponse> {
    let page = state.job_service.admin_list(&auth, &query).await?;
    Ok(Json(JobListResponse::new(page, true)))
}

#[utoipa::path(
    post,
    path = "/api/admin/jobs/{id}/active",
    params(
        ("id" = i64, Path, description = "Job ID")
    ),
    request_body = SetActivePayload,
    responses(
        (status = 200, description = "Visibility changed", body = Json<JobMutationResponse>),
        (status = 403, description = "Admins only"),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn set_job_active(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    locale: Locale,
    Path(id): Path<i64>,
    Json(payload): Json<SetActivePayload>,
) -> Result<impl IntoResponse> {
    let job = state
        .job_service
        .admin_set_active(&auth, id, payload.is_active)
        .await?;
    let key = if payload.is_active {
        "job.activated"
    } else {
        "job.deactivated"
    };
    Ok(Json(JobMutationResponse {
        message: state.localizer.t(locale.as_str(), key),
        job: JobResponse::new(job, true),
    }))
}
