#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use jobboard_backend::{
    database::{memory_store::MemoryStore, EntityStore},
    middleware::auth::Claims,
    models::user::{NewUser, Role},
    routes,
    services::i18n_service::Localizer,
    AppState,
};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::Value as JsonValue;
use tower::ServiceExt;

pub const SECRET: &str = "test_secret_key";

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(store.clone(), SECRET, Localizer::new("en-US"));
        Self {
            router: routes::app(state),
            store,
        }
    }

    /// Creates a user row and returns a bearer token for it.
    pub async fn user(&self, email: &str, role: Role) -> (i64, String) {
        let user = self
            .store
            .create_user(NewUser {
                email: email.to_string(),
                role,
            })
            .await
            .expect("seed user");
        (user.id, token(user.id, role))
    }

    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<JsonValue>,
    ) -> (StatusCode, JsonValue) {
        self.send_with_locale(method, uri, token, body, None).await
    }

    pub async fn send_with_locale(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<JsonValue>,
        locale: Option<&str>,
    ) -> (StatusCode, JsonValue) {
        let mut req = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            req = req.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        if let Some(locale) = locale {
            req = req.header(header::ACCEPT_LANGUAGE, locale);
        }
        let req = match body {
            Some(body) => req
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => req.body(Body::empty()).unwrap(),
        };

        let res = self.router.clone().oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            JsonValue::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(JsonValue::Null)
        };
        (status, json)
    }
}

pub fn token(user_id: i64, role: Role) -> String {
    let claims = Claims {
        sub: user_id.to_string(),
        exp: (chrono::Utc::now().timestamp() + 3600) as usize,
        role: Some(role.as_str().to_string()),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}
