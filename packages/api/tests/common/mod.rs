// ABOUTME: Shared helpers for API integration tests
// ABOUTME: Builds an app over an in-memory database and drives it with oneshot requests

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tasklane_api::{create_router, AppState};
use tasklane_security::{JwtConfig, UserCreateInput};
use tasklane_storage::test_utils::setup_test_db;
use tower::ServiceExt;

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

impl TestApp {
    pub async fn new() -> Self {
        let pool = setup_test_db().await;
        let state = AppState::new(pool, &JwtConfig::new("integration-test-secret"));
        Self {
            router: create_router(state.clone()),
            state,
        }
    }

    /// Create an account and return an access token for it
    pub async fn user_token(&self, username: &str) -> String {
        let user = self
            .state
            .user_storage
            .create_user(UserCreateInput {
                username: username.to_string(),
                email: String::new(),
                password: "password".to_string(),
            })
            .await
            .unwrap();

        self.state.jwt.issue_pair(&user).unwrap().access
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(serde_json::to_vec(&json).unwrap())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, value)
    }

    pub async fn raw_request(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }
}
