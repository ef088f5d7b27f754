#![allow(dead_code)]

use std::sync::Arc;

use anyhow::Result;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, Response, StatusCode},
    Router,
};
use chrono::Utc;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use grievance_api::auth::{generate_jwt, Claims};
use grievance_api::config::AppConfig;
use grievance_api::database::models::{Department, User};
use grievance_api::database::{GrievanceStore, MemoryGrievanceStore};
use grievance_api::storage::MemoryAttachmentStore;
use grievance_api::types::Role;
use grievance_api::{app, AppState};

pub const TEST_SECRET: &str = "grievance-test-secret";
const BOUNDARY: &str = "X-GRIEVANCE-TEST-BOUNDARY";

/// Router over fresh in-memory stores, driven in-process
#[derive(Clone)]
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryGrievanceStore>,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_policy(false).await
    }

    pub async fn with_policy(delete_on_reject: bool) -> Self {
        let mut config = AppConfig::development();
        config.security.jwt_secret = TEST_SECRET.to_string();
        config.policy.delete_on_reject = delete_on_reject;

        let store = Arc::new(MemoryGrievanceStore::new());
        let state = AppState::new(store.clone(), Arc::new(MemoryAttachmentStore::new()), &config);
        Self {
            router: app(state),
            store,
        }
    }

    pub async fn department(&self, code: &str, name: &str) -> Department {
        self.store.ensure_department(code, name).await.unwrap()
    }

    pub async fn user(&self, name: &str, role: Role) -> Uuid {
        let id = Uuid::new_v4();
        self.store
            .upsert_user(User {
                id,
                name: name.to_string(),
                email: format!("{}@campus.test", name.to_lowercase()),
                student_id: matches!(role, Role::Student).then(|| format!("S-{}", &id.simple().to_string()[..6])),
                role: role.as_str().to_string(),
                department: None,
                created_at: Utc::now(),
            })
            .await
            .unwrap();
        id
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// JSON request; `body` of `None` sends no payload
    pub async fn json(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Result<(StatusCode, Value)> {
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
        let response = self.send(request).await;
        let status = response.status();
        Ok((status, body_json(response).await?))
    }

    pub async fn get(&self, uri: &str, token: &str) -> Result<(StatusCode, Value)> {
        self.json(Method::GET, uri, Some(token), None).await
    }

    /// multipart/form-data request with text fields and `(field, filename, content type, bytes)` files
    pub async fn multipart(
        &self,
        method: Method,
        uri: &str,
        token: &str,
        fields: &[(&str, &str)],
        files: &[(&str, &str, &str, &[u8])],
    ) -> Result<(StatusCode, Value)> {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={}", BOUNDARY))
            .body(Body::from(multipart_body(fields, files)))?;
        let response = self.send(request).await;
        let status = response.status();
        Ok((status, body_json(response).await?))
    }

    pub async fn create(&self, token: &str, body: Value) -> Result<Value> {
        let (status, json) = self.json(Method::POST, "/api/grievances", Some(token), Some(body)).await?;
        assert_eq!(status, StatusCode::CREATED, "create failed: {}", json);
        Ok(json["data"].clone())
    }
}

pub fn token(role: Role, id: Uuid) -> String {
    generate_jwt(&Claims::new(id, role, None, 1), TEST_SECRET).unwrap()
}

pub async fn body_json(response: Response<Body>) -> Result<Value> {
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    if bytes.is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_slice(&bytes)?)
}

fn multipart_body(fields: &[(&str, &str)], files: &[(&str, &str, &str, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            )
            .as_bytes(),
        );
    }
    for (name, filename, content_type, bytes) in files {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                BOUNDARY, name, filename, content_type
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}
