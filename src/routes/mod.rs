pub mod admin;
pub mod application;
pub mod candidate_routes;
pub mod catalog;
pub mod company;
pub mod health;
pub mod job;
pub mod resume;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::{middleware::auth::require_bearer_auth, AppState};

const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Full HTTP surface. Anonymous routes and bearer-protected routes may share
/// a path (`GET /api/jobs/:id` is public, `PUT` on it is not).
pub fn app(state: AppState) -> Router {
    let public_api = Router::new()
        .route("/health", get(health::health))
        .route("/api/jobs", get(job::search_jobs))
        .route("/api/jobs/:id", get(job::get_job))
        .route("/api/companies/:id", get(company::get_company))
        .route("/api/skills", get(catalog::list_skills))
        .route("/api/areas", get(catalog::list_areas))
        .route("/api/stats", get(catalog::platform_stats));

    let protected_api = Router::new()
        .route("/api/jobs", post(job::create_job))
        .route("/api/jobs/my-jobs", get(job::my_jobs))
        .route(
            "/api/jobs/:id",
            put(job::update_job).delete(job::delete_job),
        )
        .route(
            "/api/jobs/:id/toggle-status",
            post(job::toggle_job_status),
        )
        .route(
            "/api/jobs/:id/applications",
            get(job::job_applications),
        )
        .route("/api/jobs/:id/match", get(job::job_match))
        .route("/api/applications", post(application::apply))
        .route(
            "/api/applications/my-applications",
            get(application::my_applications),
        )
        .route(
            "/api/applications/:id",
            get(application::get_application).delete(application::withdraw),
        )
        .route(
            "/api/applications/:id/status",
            put(application::update_status),
        )
        .route(
            "/api/candidates/profile",
            get(candidate_routes::get_profile).put(candidate_routes::update_profile),
        )
        .route(
            "/api/candidates/skills",
            put(candidate_routes::update_skills),
        )
        .route(
            "/api/candidates/search",
            get(candidate_routes::search_candidates),
        )
        .route("/api/candidates/:id", get(candidate_routes::get_candidate))
        .route(
            "/api/companies/profile",
            get(company::get_profile).put(company::update_profile),
        )
        .route("/api/stats/company", get(company::company_stats))
        .route("/api/resume/complete", get(resume::complete_resume))
        .route(
            "/api/resume/:section",
            get(resume::list_section).post(resume::add_entry),
        )
        .route(
            "/api/resume/:section/:id",
            put(resume::update_entry).delete(resume::delete_entry),
        )
        .route("/api/skills", post(catalog::create_skill))
        .route("/api/areas", post(catalog::create_area))
        .route("/api/admin/jobs", get(admin::list_jobs))
        .route(
            "/api/admin/jobs/:id/active",
            post(admin::set_job_active),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_bearer_auth,
        ));

    public_api
        .merge(protected_api)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
}
