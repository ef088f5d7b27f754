mod common;

use anyhow::Result;
use axum::http::{Method, StatusCode};
use serde_json::json;
use uuid::Uuid;

use common::{token, TestApp};
use grievance_api::types::Role;

async fn reject(app: &TestApp) -> Result<(String, StatusCode, serde_json::Value)> {
    let student = token(Role::Student, Uuid::new_v4());
    let admin = token(Role::Admin, Uuid::new_v4());
    let created = app
        .create(&student, json!({"title": "Spam", "description": "Test", "category": "General"}))
        .await?;
    let uri = format!("/api/grievances/{}", created["id"].as_str().unwrap());

    let (status, body) = app
        .json(Method::PUT, &uri, Some(&admin), Some(json!({"status": "Rejected"})))
        .await?;
    Ok((uri, status, body))
}

#[tokio::test]
async fn rejected_status_is_kept_by_default() -> Result<()> {
    let app = TestApp::new().await;
    let (uri, status, body) = reject(&app).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "Rejected");

    let (status, body) = app.get(&uri, &token(Role::Admin, Uuid::new_v4())).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "Rejected");
    Ok(())
}

#[tokio::test]
async fn delete_on_reject_policy_removes_the_record() -> Result<()> {
    let app = TestApp::with_policy(true).await;
    let (uri, status, body) = reject(&app).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["deleted"], true);
    assert!(body["message"].is_string());

    let (status, _) = app.get(&uri, &token(Role::Admin, Uuid::new_v4())).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}
