#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{Map, Value};
use tower::ServiceExt;

use ncc_api::app::app;
use ncc_api::auth::Claims;
use ncc_api::config::RulesConfig;
use ncc_api::database::{Entity, MemoryStorage, Storage};
use ncc_api::handlers::AppState;
use ncc_api::services::RecordService;

pub const SECRET: &str = "integration-secret";
pub const ADMIN_ROLE: &str = "Administrador";

/// In-process application over a fresh in-memory store
pub struct TestApp {
    pub router: Router,
    pub storage: Arc<MemoryStorage>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_rules(RulesConfig::default())
    }

    pub fn with_rules(rules: RulesConfig) -> Self {
        let storage = Arc::new(MemoryStorage::new());
        let service = RecordService::new(storage.clone(), rules);
        let router = app(AppState::new(service, SECRET, ADMIN_ROLE));
        Self { router, storage }
    }

    /// Send a request and decode the JSON body (Null when empty)
    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>, token: Option<&str>) -> Result<(StatusCode, Value)> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body)?))?,
            None => builder.body(Body::empty())?,
        };

        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).with_context(|| format!("non-JSON body: {:?}", bytes))?
        };
        Ok((status, value))
    }

    pub async fn get(&self, uri: &str) -> Result<(StatusCode, Value)> {
        self.send(Method::GET, uri, None, Some(&admin_token())).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> Result<(StatusCode, Value)> {
        self.send(Method::POST, uri, Some(body), Some(&admin_token())).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> Result<(StatusCode, Value)> {
        self.send(Method::PUT, uri, Some(body), Some(&admin_token())).await
    }

    pub async fn delete(&self, uri: &str) -> Result<(StatusCode, Value)> {
        self.send(Method::DELETE, uri, None, Some(&admin_token())).await
    }

    /// POST as admin, expect 201, return the new id
    pub async fn create(&self, segment: &str, body: Value) -> Result<i64> {
        let (status, response) = self.post(&format!("/api/{}", segment), body).await?;
        anyhow::ensure!(status == StatusCode::CREATED, "create {} failed: {} {}", segment, status, response);
        response["data"]["id"].as_i64().context("created record has no id")
    }

    /// Insert directly into storage, bypassing the API (accounts are read-only over HTTP)
    pub async fn seed(&self, entity: Entity, value: Value) -> Result<i64> {
        let fields: Map<String, Value> = match value {
            Value::Object(map) => map,
            other => anyhow::bail!("seed expects an object, got {}", other),
        };
        Ok(self.storage.create(entity, fields).await?.id)
    }
}

pub fn claims(uid: i64) -> Claims {
    Claims {
        uid,
        username: Some("tester".to_string()),
        role_id: None,
        roles: None,
        role_name: None,
        exp: chrono::Utc::now().timestamp() + 3600,
        iat: Some(chrono::Utc::now().timestamp()),
    }
}

pub fn sign(claims: &Claims, secret: &str) -> String {
    encode(&Header::default(), claims, &EncodingKey::from_secret(secret.as_bytes())).expect("encode token")
}

pub fn token(roles: &[&str]) -> String {
    let claims = Claims {
        roles: Some(roles.iter().map(|r| r.to_string()).collect()),
        ..claims(1)
    };
    sign(&claims, SECRET)
}

pub fn admin_token() -> String {
    token(&[ADMIN_ROLE])
}

/// Principal → contractor, plus a union. Returns (principal, contractor, union).
pub async fn hierarchy(app: &TestApp) -> Result<(i64, i64, i64)> {
    let principal = app.create("principals", serde_json::json!({"name": "Codelco"})).await?;
    let contractor = app
        .create(
            "contractors",
            serde_json::json!({"principal_id": principal, "name": "Acme", "tax_id": "76.123.456-7"}),
        )
        .await?;
    let union = app.create("unions", serde_json::json!({"name": "Sindicato 1"})).await?;
    Ok((principal, contractor, union))
}
