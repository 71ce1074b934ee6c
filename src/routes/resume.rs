use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use serde_json::{json, Value};

use crate::{
    dto::resume_dto::{parse_entry, CompleteResumeResponse, ResumeEntryResponse},
    error::{Error, Result},
    middleware::auth::AuthContext,
    models::resume::{Resume, ResumeSection},
    services::i18n_service::Locale,
    AppState,
};

fn section_from_path(raw: &str) -> Result<ResumeSection> {
    raw.parse().map_err(Error::NotFound)
}

fn section_rows(resume: Resume, section: ResumeSection) -> Result<Value> {
    let rows = match section {
        ResumeSection::Experience => serde_json::to_value(resume.experiences)?,
        ResumeSection::Education => serde_json::to_value(resume.educations)?,
        ResumeSection::Certification => serde_json::to_value(resume.certifications)?,
        ResumeSection::Project => serde_json::to_value(resume.projects)?,
        ResumeSection::Language => serde_json::to_value(resume.languages)?,
    };
    Ok(rows)
}

#[utoipa::path(
    get,
    path = "/api/resume/complete",
    responses(
        (status = 200, description = "All resume sections of the authenticated candidate", body = Json<CompleteResumeResponse>)
    )
)]
#[axum::debug_handler]
pub async fn complete_resume(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<impl IntoResponse> {
    let resume = state.resume_service.resume(&auth).await?;
    Ok(Json(CompleteResumeResponse::from(resume)))
}

#[utoipa::path(
    get,
    path = "/api/resume/{section}",
    params(
        ("section" = String, Path, description = "experiences | educations | certifications | projects | languages")
    ),
    responses(
        (status = 200, description = "Rows of one resume section"),
        (status = 404, description = "Unknown section")
    )
)]
#[axum::debug_handler]
pub async fn list_section(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(section): Path<String>,
) -> Result<impl IntoResponse> {
    let section = section_from_path(&section)?;
    let resume = state.resume_service.resume(&auth).await?;
    let rows = section_rows(resume, section)?;
    Ok(Json(json!({ "section": section.table(), "items": rows })))
}

#[utoipa::path(
    post,
    path = "/api/resume/{section}",
    params(
        ("section" = String, Path, description = "Resume section")
    ),
    responses(
        (status = 201, description = "Entry added", body = Json<ResumeEntryResponse>),
        (status = 400, description = "Invalid entry")
    )
)]
#[axum::debug_handler]
pub async fn add_entry(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    locale: Locale,
    Path(section): Path<String>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse> {
    let section = section_from_path(&section)?;
    let entry = parse_entry(section, body)?;
    let record = state.resume_service.add(&auth, entry).await?;
    Ok((
        StatusCode::CREATED,
        Json(ResumeEntryResponse {
            message: state.localizer.t(locale.as_str(), "resume.created"),
            entry: record,
        }),
    ))
}

#[utoipa::path(
    put,
    path = "/api/resume/{section}/{id}",
    params(
        ("section" = String, Path, description = "Resume section"),
        ("id" = i64, Path, description = "Entry ID")
    ),
    responses(
        (status = 200, description = "Entry updated", body = Json<ResumeEntryResponse>),
        (status = 404, description = "Entry not found for this candidate")
    )
)]
#[axum::debug_handler]
pub async fn update_entry(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    locale: Locale,
    Path((section, id)): Path<(String, i64)>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse> {
    let section = section_from_path(&section)?;
    let entry = parse_entry(section, body)?;
    let record = state
        .resume_service
        .update(&auth, section, id, entry)
        .await?;
    Ok(Json(ResumeEntryResponse {
        message: state.localizer.t(locale.as_str(), "resume.updated"),
        entry: record,
    }))
}

#[utoipa::path(
    delete,
    path = "/api/resume/{section}/{id}",
    params(
        ("section" = String, Path, description = "Resume section"),
        ("id" = i64, Path, description = "Entry ID")
    ),
    responses(
        (status = 200, description = "Entry deleted"),
        (status = 404, description = "Entry not found for this candidate")
    )
)]
#[axum::debug_handler]
pub async fn delete_entry(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    locale: Locale,
    Path((section, id)): Path<(String, i64)>,
) -> Result<impl IntoResponse> {
    let section = section_from_path(&section)?;
    state.resume_service.remove(&auth, section, id).await?;
    Ok(Json(json!({
        "message": state.localizer.t(locale.as_str(), "resume.deleted"),
    })))
}
