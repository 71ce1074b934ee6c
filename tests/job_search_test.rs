mod common;

use axum::http::StatusCode;
use common::TestApp;
use jobboard_backend::models::user::Role;
use serde_json::json;

async fn company_with_profile(app: &TestApp, email: &str) -> String {
    let (_, token) = app.user(email, Role::Company).await;
    let (status, _) = app
        .send(
            "PUT",
            "/api/companies/profile",
            Some(&token),
            Some(json!({ "company_name": "Acme", "city": "Recife" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    token
}

async fn post_job(app: &TestApp, token: &str, body: serde_json::Value) -> i64 {
    let (status, res) = app.send("POST", "/api/jobs", Some(token), Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "{res}");
    res["job"]["id"].as_i64().unwrap()
}

#[tokio::test]
async fn search_lists_only_active_jobs() {
    let app = TestApp::new();
    let company = company_with_profile(&app, "hr@acme.test").await;

    let visible = post_job(
        &app,
        &company,
        json!({ "title": "Rust Engineer", "description": "Backend services" }),
    )
    .await;
    let hidden = post_job(
        &app,
        &company,
        json!({ "title": "Go Engineer", "description": "Backend services" }),
    )
    .await;

    let (status, _) = app
        .send(
            "POST",
            &format!("/api/jobs/{hidden}/toggle-status"),
            Some(&company),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, res) = app.send("GET", "/api/jobs", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<i64> = res["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|j| j["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![visible]);
    assert_eq!(res["total"], 1);

    // The owner still sees both.
    let (_, mine) = app
        .send("GET", "/api/jobs/my-jobs", Some(&company), None)
        .await;
    assert_eq!(mine["total"], 2);
}

#[tokio::test]
async fn numeric_area_matches_area_id_only() {
    let app = TestApp::new();
    let (_, admin) = app.user("admin@board.test", Role::Admin).await;
    let company = company_with_profile(&app, "hr@acme.test").await;

    let (status, res) = app
        .send(
            "POST",
            "/api/areas",
            Some(&admin),
            Some(json!({ "name": "Engineering" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let area_id = res["area"]["id"].as_i64().unwrap();

    let by_id = post_job(
        &app,
        &company,
        json!({ "title": "Platform", "description": "Infra", "area_id": area_id }),
    )
    .await;
    post_job(
        &app,
        &company,
        json!({
            "title": "Data",
            "description": "Pipelines",
            "area": format!("Squad {area_id}")
        }),
    )
    .await;

    let (status, res) = app
        .send("GET", &format!("/api/jobs?area={area_id}"), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let items = res["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"].as_i64().unwrap(), by_id);
}

#[tokio::test]
async fn hidden_company_is_not_exposed_publicly() {
    let app = TestApp::new();
    let company = company_with_profile(&app, "hr@acme.test").await;
    let id = post_job(
        &app,
        &company,
        json!({
            "title": "Confidential",
            "description": "Stealth startup",
            "is_company_hidden": true
        }),
    )
    .await;

    let (_, job) = app.send("GET", &format!("/api/jobs/{id}"), None, None).await;
    assert!(job["company_id"].is_null());

    let (_, list) = app.send("GET", "/api/jobs", None, None).await;
    assert!(list["items"][0]["company_id"].is_null());
}

#[tokio::test]
async fn invalid_filters_are_rejected() {
    let app = TestApp::new();
    let (status, res) = app
        .send("GET", "/api/jobs?per_page=1000", None, None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(res["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn mutations_require_a_token() {
    let app = TestApp::new();
    let (status, res) = app
        .send(
            "POST",
            "/api/jobs",
            None,
            Some(json!({ "title": "Rust", "description": "x" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(res["code"], "UNAUTHORIZED");

    let (status, _) = app
        .send("GET", "/api/jobs/1", Some("not-a-jwt"), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn messages_follow_accept_language() {
    let app = TestApp::new();
    let company = company_with_profile(&app, "hr@acme.test").await;
    let (status, res) = app
        .send_with_locale(
            "POST",
            "/api/jobs",
            Some(&company),
            Some(json!({ "title": "Rust", "description": "Backend" })),
            Some("pt-BR,pt;q=0.9"),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(res["message"], "Vaga criada com sucesso");
}

#[tokio::test]
async fn salaries_beyond_storage_precision_are_rejected() {
    let app = TestApp::new();
    let company = company_with_profile(&app, "hr@acme.test").await;

    let (status, res) = app
        .send(
            "POST",
            "/api/jobs",
            Some(&company),
            Some(json!({
                "title": "Rust",
                "description": "Backend",
                "max_salary": "10000000000"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(res["code"], "VALIDATION_ERROR");

    let (_, candidate) = app.user("ana@mail.test", Role::Candidate).await;
    let (status, _) = app
        .send(
            "PUT",
            "/api/candidates/profile",
            Some(&candidate),
            Some(json!({
                "first_name": "Ana",
                "last_name": "Silva",
                "expected_salary": "99999999999"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .send("GET", "/api/jobs?min_salary=10000000000", None, None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    post_job(
        &app,
        &company,
        json!({ "title": "Rust", "description": "Backend", "max_salary": "9999999999.99" }),
    )
    .await;
}

#[tokio::test]
async fn update_can_clear_nullable_fields() {
    let app = TestApp::new();
    let (_, admin) = app.user("admin@board.test", Role::Admin).await;
    let company = company_with_profile(&app, "hr@acme.test").await;
    let (_, res) = app
        .send("POST", "/api/areas", Some(&admin), Some(json!({ "name": "Data" })))
        .await;
    let area_id = res["area"]["id"].as_i64().unwrap();

    let id = post_job(
        &app,
        &company,
        json!({
            "title": "Analyst",
            "description": "Dashboards",
            "area_id": area_id,
            "city": "Recife",
            "min_salary": "4000",
            "max_salary": "6000"
        }),
    )
    .await;

    let (status, res) = app
        .send(
            "PUT",
            &format!("/api/jobs/{id}"),
            Some(&company),
            Some(json!({ "area_id": null, "max_salary": null })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{res}");
    assert!(res["job"]["area_id"].is_null());
    assert!(res["job"]["max_salary"].is_null());
    // Absent fields are left alone.
    assert_eq!(res["job"]["city"], "Recife");
    assert!(!res["job"]["min_salary"].is_null());
}

#[tokio::test]
async fn company_search_omits_confidential_jobs() {
    let app = TestApp::new();
    let company = company_with_profile(&app, "hr@acme.test").await;
    let open = post_job(
        &app,
        &company,
        json!({ "title": "Open role", "description": "Public" }),
    )
    .await;
    post_job(
        &app,
        &company,
        json!({
            "title": "Confidential",
            "description": "Stealth",
            "is_company_hidden": true
        }),
    )
    .await;

    let (_, profile) = app
        .send("GET", "/api/companies/profile", Some(&company), None)
        .await;
    let company_id = profile["company"]["id"].as_i64().unwrap();

    let (status, res) = app
        .send("GET", &format!("/api/jobs?company_id={company_id}"), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<i64> = res["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|j| j["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![open]);

    let (_, all) = app.send("GET", "/api/jobs", None, None).await;
    assert_eq!(all["total"], 2);
}
