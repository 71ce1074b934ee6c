mod common;

use axum::http::StatusCode;
use common::TestApp;
use jobboard_backend::{
    database::EntityStore,
    models::{candidate::CandidateFields, company::CompanyFields, job::NewJob, user::Role},
};
use rust_decimal::Decimal;
use serde_json::{json, Value as JsonValue};

struct Board {
    app: TestApp,
    company: String,
    candidate: String,
    job_id: i64,
}

async fn create_skill(app: &TestApp, admin: &str, name: &str) -> i64 {
    let (status, res) = app
        .send("POST", "/api/skills", Some(admin), Some(json!({ "name": name })))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{res}");
    res["skill"]["id"].as_i64().unwrap()
}

async fn candidate(app: &TestApp, email: &str, profile: JsonValue) -> String {
    let (_, token) = app.user(email, Role::Candidate).await;
    let (status, res) = app
        .send("PUT", "/api/candidates/profile", Some(&token), Some(profile))
        .await;
    assert_eq!(status, StatusCode::OK, "{res}");
    token
}

/// Company in Recife paying 7000..9000 for a job requiring Rust and SQL,
/// and a Recife candidate expecting 8000 who only knows Rust.
async fn board() -> Board {
    let app = TestApp::new();
    let (_, admin) = app.user("admin@board.test", Role::Admin).await;
    let rust = create_skill(&app, &admin, "Rust").await;
    let sql = create_skill(&app, &admin, "SQL").await;

    let (_, company) = app.user("hr@acme.test", Role::Company).await;
    let (status, _) = app
        .send(
            "PUT",
            "/api/companies/profile",
            Some(&company),
            Some(json!({ "company_name": "Acme" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, res) = app
        .send(
            "POST",
            "/api/jobs",
            Some(&company),
            Some(json!({
                "title": "Backend Engineer",
                "description": "Services in Rust",
                "city": "Recife",
                "min_salary": "7000",
                "max_salary": "9000",
                "skills": [
                    { "skill_id": rust, "is_required": true },
                    { "skill_id": sql, "is_required": true }
                ]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{res}");
    let job_id = res["job"]["id"].as_i64().unwrap();

    let candidate = candidate(
        &app,
        "ana@mail.test",
        json!({
            "first_name": "Ana",
            "last_name": "Silva",
            "city": "recife",
            "expected_salary": "8000"
        }),
    )
    .await;
    let (status, _) = app
        .send(
            "PUT",
            "/api/candidates/skills",
            Some(&candidate),
            Some(json!({ "skills": [{ "skill_id": rust, "proficiency_level": 4 }] })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    Board {
        app,
        company,
        candidate,
        job_id,
    }
}

async fn apply(b: &Board, token: &str) -> (StatusCode, JsonValue) {
    b.app
        .send(
            "POST",
            "/api/applications",
            Some(token),
            Some(json!({ "job_id": b.job_id, "cover_letter": "Hello" })),
        )
        .await
}

#[tokio::test]
async fn application_captures_match_score() {
    let b = board().await;
    let (status, res) = apply(&b, &b.candidate).await;
    assert_eq!(status, StatusCode::CREATED, "{res}");
    assert_eq!(res["application"]["match_score"], 70);
    assert_eq!(res["application"]["status"], "pending");

    let (status, breakdown) = b
        .app
        .send(
            "GET",
            &format!("/api/jobs/{}/match", b.job_id),
            Some(&b.candidate),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(breakdown["score"], 70);
}

#[tokio::test]
async fn second_application_conflicts() {
    let b = board().await;
    let (status, _) = apply(&b, &b.candidate).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, res) = apply(&b, &b.candidate).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(res["code"], "CONFLICT");

    let (_, mine) = b
        .app
        .send(
            "GET",
            "/api/applications/my-applications",
            Some(&b.candidate),
            None,
        )
        .await;
    assert_eq!(mine["total"], 1);
}

#[tokio::test]
async fn withdraw_by_another_candidate_is_forbidden() {
    let b = board().await;
    let (_, res) = apply(&b, &b.candidate).await;
    let app_id = res["application"]["id"].as_i64().unwrap();

    let intruder = candidate(
        &b.app,
        "bruno@mail.test",
        json!({ "first_name": "Bruno", "last_name": "Lima" }),
    )
    .await;
    let (status, _) = b
        .app
        .send(
            "DELETE",
            &format!("/api/applications/{app_id}"),
            Some(&intruder),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, still_there) = b
        .app
        .send(
            "GET",
            &format!("/api/applications/{app_id}"),
            Some(&b.candidate),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(still_there["id"].as_i64().unwrap(), app_id);

    let (status, _) = b
        .app
        .send(
            "DELETE",
            &format!("/api/applications/{app_id}"),
            Some(&b.candidate),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn status_moves_forward_only() {
    let b = board().await;
    let (_, res) = apply(&b, &b.candidate).await;
    let app_id = res["application"]["id"].as_i64().unwrap();
    let uri = format!("/api/applications/{app_id}/status");

    let (status, res) = b
        .app
        .send("PUT", &uri, Some(&b.company), Some(json!({ "status": "interview" })))
        .await;
    assert_eq!(status, StatusCode::OK, "{res}");
    assert_eq!(res["application"]["status"], "interview");

    let (status, _) = b
        .app
        .send("PUT", &uri, Some(&b.company), Some(json!({ "status": "pending" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = b
        .app
        .send("PUT", &uri, Some(&b.company), Some(json!({ "status": "hired" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Candidates cannot move their own application.
    let (status, _) = b
        .app
        .send("PUT", &uri, Some(&b.candidate), Some(json!({ "status": "approved" })))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn company_sees_applications_ranked_by_score() {
    let b = board().await;
    apply(&b, &b.candidate).await;
    let weaker = candidate(
        &b.app,
        "caio@mail.test",
        json!({ "first_name": "Caio", "last_name": "Souza", "city": "Natal" }),
    )
    .await;
    let (status, _) = apply(&b, &weaker).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, res) = b
        .app
        .send(
            "GET",
            &format!("/api/jobs/{}/applications", b.job_id),
            Some(&b.company),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let scores: Vec<i64> = res["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["match_score"].as_i64().unwrap())
        .collect();
    assert_eq!(scores.len(), 2);
    assert!(scores[0] >= scores[1]);
    assert_eq!(scores[0], 70);
}

#[tokio::test]
async fn inactive_job_rejects_applications() {
    let b = board().await;
    let (status, _) = b
        .app
        .send(
            "POST",
            &format!("/api/jobs/{}/toggle-status", b.job_id),
            Some(&b.company),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = apply(&b, &b.candidate).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn match_breakdown_falls_back_when_salary_math_overflows() {
    let app = TestApp::new();
    let company = app
        .store
        .upsert_company(100, CompanyFields { company_name: Some("Acme".into()), ..Default::default() })
        .await
        .unwrap();
    let job = app
        .store
        .create_job(NewJob {
            company_id: company.id,
            title: "Quant".into(),
            description: "Trading desk".into(),
            min_salary: Some(Decimal::ZERO),
            max_salary: Some(Decimal::MAX - Decimal::ONE),
            ..Default::default()
        })
        .await
        .unwrap();
    app.store
        .upsert_candidate(
            200,
            CandidateFields {
                first_name: Some("Ana".into()),
                last_name: Some("Silva".into()),
                expected_salary: Some(Decimal::MAX),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let candidate = common::token(200, Role::Candidate);

    let (status, breakdown) = app
        .send("GET", &format!("/api/jobs/{}/match", job.job.id), Some(&candidate), None)
        .await;
    assert_eq!(status, StatusCode::OK, "{breakdown}");
    assert_eq!(breakdown["score"], 50);
    assert!(breakdown["salary"].is_null());

    let (status, res) = app
        .send(
            "POST",
            "/api/applications",
            Some(&candidate),
            Some(json!({ "job_id": job.job.id })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{res}");
    assert_eq!(res["application"]["match_score"], 50);
}

#[tokio::test]
async fn terminal_status_is_not_overwritten() {
    let b = board().await;
    let (_, res) = apply(&b, &b.candidate).await;
    let app_id = res["application"]["id"].as_i64().unwrap();
    let uri = format!("/api/applications/{app_id}/status");

    let (status, _) = b
        .app
        .send("PUT", &uri, Some(&b.company), Some(json!({ "status": "approved" })))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = b
        .app
        .send("PUT", &uri, Some(&b.company), Some(json!({ "status": "rejected" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, current) = b
        .app
        .send("GET", &format!("/api/applications/{app_id}"), Some(&b.company), None)
        .await;
    assert_eq!(current["status"], "approved");
}
