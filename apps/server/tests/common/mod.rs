#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::NaiveDate;
use jsonwebtoken::{encode, EncodingKey, Header};
use ledgerline_core::utils::FixedClock;
use ledgerline_server::{api::app_router, auth::Claims, build_state_with_clock, config::Config};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

const SECRET: &[u8; 32] = b"test-secret-test-secret-test-sec";

pub struct TestApp {
    pub router: Router,
    _tmp: TempDir,
}

/// Builds the full router over a fresh database, with "today" pinned.
pub async fn spawn_app(today: NaiveDate) -> TestApp {
    let tmp = tempfile::tempdir().unwrap();
    let config = Config {
        listen_addr: "127.0.0.1:0".parse().unwrap(),
        db_path: tmp.path().join("test.db").to_string_lossy().to_string(),
        cors_allow: vec!["*".to_string()],
        request_timeout: Duration::from_secs(30),
        jwt_secret: SECRET.to_vec(),
        timezone: chrono_tz::UTC,
    };
    let state = build_state_with_clock(&config, Arc::new(FixedClock(today)))
        .await
        .unwrap();
    TestApp {
        router: app_router(state, &config).unwrap(),
        _tmp: tmp,
    }
}

pub fn token_for(owner: &str) -> String {
    let claims = Claims {
        sub: owner.to_string(),
        exp: (chrono::Utc::now().timestamp() + 3600) as usize,
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET)).unwrap()
}

impl TestApp {
    /// Sends a request as `owner` and returns the status and JSON body (Null when empty).
    pub async fn send(
        &self,
        owner: &str,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", token_for(owner)));
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
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
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }
}
