use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use serde_json::json;
use validator::Validate;

use crate::{
    dto::application_dto::{ApplicationListQuery, ApplicationListResponse},
    dto::job_dto::{
        CompanyJobsQuery, CreateJobPayload, JobListResponse, JobMutationResponse, JobResponse,
        JobSearchQuery, UpdateJobPayload,
    },
    error::Result,
    middleware::auth::AuthContext,
    services::i18n_service::Locale,
    utils::pagination::PageRequest,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/jobs",
    params(
        ("page" = Option<u32>, Query, description = "Page number, 1-based"),
        ("per_page" = Option<u32>, Query, description = "Items per page (max 100)"),
        ("q" = Option<String>, Query, description = "Free text over title, description and requirements"),
        ("area" = Option<String>, Query, description = "Area id or area label"),
        ("city" = Option<String>, Query, description = "City substring"),
        ("min_salary" = Option<String>, Query, description = "Minimum salary floor"),
        ("sort" = Option<String>, Query, description = "newest | oldest | salary_desc | salary_asc")
    ),
    responses(
        (status = 200, description = "Matching active jobs", body = Json<JobListResponse>),
        (status = 400, description = "Invalid filter or page")
    )
)]
#[axum::debug_handler]
pub async fn search_jobs(
    State(state): State<AppState>,
    Query(query): Query<JobSearchQuery>,
) -> Result<impl IntoResponse> {
    let page = state.job_service.search(&query).await?;
    Ok(Json(JobListResponse::from(page)))
}

#[utoipa::path(
    get,
    path = "/api/jobs/{id}",
    params(
        ("id" = i64, Path, description = "Job ID")
    ),
    responses(
        (status = 200, description = "Job found", body = Json<JobResponse>),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let job = state.job_service.get(id).await?;
    Ok(Json(JobResponse::new(job, false)))
}

#[utoipa::path(
    post,
    path = "/api/jobs",
    request_body = CreateJobPayload,
    responses(
        (status = 201, description = "Job created successfully", body = Json<JobMutationResponse>),
        (status = 400, description = "Invalid payload"),
        (status = 403, description = "Only companies can post jobs")
    )
)]
#[axum::debug_handler]
pub async fn create_job(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    locale: Locale,
    Json(payload): Json<CreateJobPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let job = state.job_service.create(&auth, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(JobMutationResponse {
            message: state.localizer.t(locale.as_str(), "job.created"),
            job: JobResponse::new(job, true),
        }),
    ))
}

#[utoipa::path(
    put,
    path = "/api/jobs/{id}",
    params(
        ("id" = i64, Path, description = "Job ID")
    ),
    request_body = UpdateJobPayload,
    responses(
        (status = 200, description = "Job updated successfully", body = Json<JobMutationResponse>),
        (status = 400, description = "Invalid payload"),
        (status = 403, description = "Job belongs to another company"),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn update_job(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    locale: Locale,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateJobPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let job = state.job_service.update(&auth, id, payload.into()).await?;
    Ok(Json(JobMutationResponse {
        message: state.localizer.t(locale.as_str(), "job.updated"),
        job: JobResponse::new(job, true),
    }))
}

#[utoipa::path(
    delete,
    path = "/api/jobs/{id}",
    params(
        ("id" = i64, Path, description = "Job ID")
    ),
    responses(
        (status = 200, description = "Job deleted successfully"),
        (status = 403, description = "Job belongs to another company"),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_job(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    locale: Locale,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    state.job_service.delete(&auth, id).await?;
    Ok(Json(json!({
        "message": state.localizer.t(locale.as_str(), "job.deleted"),
    })))
}

#[utoipa::path(
    post,
    path = "/api/jobs/{id}/toggle-status",
    params(
        ("id" = i64, Path, description = "Job ID")
    ),
    responses(
        (status = 200, description = "Job activated or deactivated", body = Json<JobMutationResponse>),
        (status = 403, description = "Job belongs to another company"),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn toggle_job_status(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    locale: Locale,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let job = state.job_service.toggle_status(&auth, id).await?;
    let key = if job.job.is_active {
        "job.activated"
    } else {
        "job.deactivated"
    };
    Ok(Json(JobMutationResponse {
        message: state.localizer.t(locale.as_str(), key),
        job: JobResponse::new(job, true),
    }))
}

#[utoipa::path(
    get,
    path = "/api/jobs/my-jobs",
    params(
        ("page" = Option<u32>, Query, description = "Page number"),
        ("per_page" = Option<u32>, Query, description = "Items per page"),
        ("active" = Option<bool>, Query, description = "Only active or only inactive jobs")
    ),
    responses(
        (status = 200, description = "Jobs of the authenticated company", body = Json<JobListResponse>),
        (status = 403, description = "Not a company")
    )
)]
#[axum::debug_handler]
pub async fn my_jobs(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<CompanyJobsQuery>,
) -> Result<impl IntoResponse> {
    let page = state.job_service.company_jobs(&auth, &query).await?;
    Ok(Json(JobListResponse::new(page, true)))
}

#[utoipa::path(
    get,
    path = "/api/jobs/{id}/applications",
    params(
        ("id" = i64, Path, description = "Job ID"),
        ("status" = Option<String>, Query, description = "Filter by application status")
    ),
    responses(
        (status = 200, description = "Applications ranked by match score", body = Json<ApplicationListResponse>),
        (status = 403, description = "Job belongs to another company"),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn job_applications(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
    Query(query): Query<ApplicationListQuery>,
) -> Result<impl IntoResponse> {
    let status = query.status_filter()?;
    let page = PageRequest::from_query(query.page, query.per_page)?;
    let result = state
        .application_service
        .job_applications(&auth, id, status, page)
        .await?;
    Ok(Json(ApplicationListResponse::from(result)))
}

#[utoipa::path(
    get,
    path = "/api/jobs/{id}/match",
    params(
        ("id" = i64, Path, description = "Job ID")
    ),
    responses(
        (status = 200, description = "Per-factor compatibility of the authenticated candidate"),
        (status = 404, description = "Job or candidate profile not found")
    )
)]
#[axum::debug_handler]
pub async fn job_match(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let breakdown = state.job_service.match_breakdown(&auth, id).await?;
    Ok(Json(breakdown))
}
