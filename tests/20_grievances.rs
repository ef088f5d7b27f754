mod common;

use anyhow::Result;
use axum::http::{Method, StatusCode};
use serde_json::json;
use uuid::Uuid;

use common::{token, TestApp};
use grievance_api::types::Role;

fn broken_ac() -> serde_json::Value {
    json!({
        "title": "Broken AC",
        "description": "Room 204 AC is not cooling",
        "category": "Hostel",
        "priority": "High"
    })
}

#[tokio::test]
async fn broken_ac_scenario() -> Result<()> {
    let app = TestApp::new().await;
    let hostel = app.department("HOSTEL001", "Hostel Management").await;
    let u1 = app.user("Asha", Role::Student).await;
    let u2 = app.user("Ravi", Role::Student).await;
    let admin = app.user("Dean", Role::Admin).await;

    let (status, body) = app
        .json(Method::POST, "/api/grievances", Some(&token(Role::Student, u1)), Some(broken_ac()))
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    let created = &body["data"];
    assert_eq!(created["submittedBy"]["id"], u1.to_string());
    assert_eq!(created["department"], hostel.id.to_string());
    assert_eq!(created["status"], "Pending");
    let id = created["id"].as_str().unwrap().to_string();

    let (status, body) = app
        .get(&format!("/api/grievances/{}", id), &token(Role::Student, u2))
        .await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["success"], false);

    let (status, body) = app
        .get(&format!("/api/grievances/{}", id), &token(Role::Admin, admin))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["submittedBy"]["name"], "Asha");
    assert_eq!(body["data"]["submittedBy"]["email"], "asha@campus.test");
    Ok(())
}

#[tokio::test]
async fn create_alias_and_default_priority() -> Result<()> {
    let app = TestApp::new().await;
    let student = token(Role::Student, Uuid::new_v4());

    let (status, body) = app
        .json(
            Method::POST,
            "/api/grievances/create",
            Some(&student),
            Some(json!({"title": "Library hours", "description": "Open later", "category": "academic"})),
        )
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["priority"], "Medium");
    assert_eq!(body["data"]["category"], "Academic");
    assert!(body["data"]["department"].is_null(), "no ACAD001 registered");
    Ok(())
}

#[tokio::test]
async fn create_validation_failures() -> Result<()> {
    let app = TestApp::new().await;
    let student = token(Role::Student, Uuid::new_v4());

    let (status, body) = app
        .json(
            Method::POST,
            "/api/grievances",
            Some(&student),
            Some(json!({"title": "", "description": "x", "category": "Hostel"})),
        )
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["field_errors"]["title"].is_string());

    let (status, body) = app
        .json(
            Method::POST,
            "/api/grievances",
            Some(&student),
            Some(json!({"title": "t", "description": "d", "category": "Canteen"})),
        )
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["field_errors"]["category"].is_string());
    Ok(())
}

#[tokio::test]
async fn listing_is_scoped_filtered_and_sorted() -> Result<()> {
    let app = TestApp::new().await;
    let u1 = Uuid::new_v4();
    let u2 = Uuid::new_v4();
    let t1 = token(Role::Student, u1);
    let t2 = token(Role::Student, u2);
    let admin = token(Role::Admin, Uuid::new_v4());

    app.create(&t1, json!({"title": "B leak", "description": "d", "category": "Hostel", "priority": "High"})).await?;
    app.create(&t1, json!({"title": "A fan", "description": "d", "category": "Infrastructure", "priority": "Low"})).await?;
    app.create(&t2, json!({"title": "C exam", "description": "d", "category": "Academic", "priority": "High"})).await?;

    let (status, body) = app.get("/api/grievances", &t1).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);
    assert!(body["data"]
        .as_array()
        .unwrap()
        .iter()
        .all(|g| g["submittedBy"]["id"] == u1.to_string()));
    // newest first by default
    assert_eq!(body["data"][0]["title"], "A fan");

    let (_, body) = app.get("/api/grievances", &admin).await?;
    assert_eq!(body["count"], 3);

    let (_, body) = app.get("/api/grievances?priority=High&sort=title", &admin).await?;
    assert_eq!(body["count"], 2);
    assert_eq!(body["data"][0]["title"], "B leak");
    assert_eq!(body["data"][1]["title"], "C exam");

    let (_, body) = app.get("/api/grievances?priority=High", &t1).await?;
    assert_eq!(body["count"], 1);

    let (status, _) = app.get("/api/grievances?sort=password", &admin).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn unknown_id_is_not_found_for_everyone() -> Result<()> {
    let app = TestApp::new().await;
    let missing = Uuid::new_v4();

    for role in [Role::Student, Role::Admin] {
        let (status, body) = app
            .get(&format!("/api/grievances/{}", missing), &token(role, Uuid::new_v4()))
            .await?;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");
    }
    Ok(())
}

#[tokio::test]
async fn non_owner_update_is_forbidden_and_record_unchanged() -> Result<()> {
    let app = TestApp::new().await;
    let owner = token(Role::Student, Uuid::new_v4());
    let other = token(Role::Student, Uuid::new_v4());
    let created = app.create(&owner, broken_ac()).await?;
    let uri = format!("/api/grievances/{}", created["id"].as_str().unwrap());

    let (status, _) = app
        .json(Method::PUT, &uri, Some(&other), Some(json!({"title": "Hijacked"})))
        .await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, body) = app.get(&uri, &owner).await?;
    assert_eq!(body["data"]["title"], "Broken AC");
    assert_eq!(body["data"]["updatedAt"], created["updatedAt"]);
    Ok(())
}

#[tokio::test]
async fn owner_and_admin_update_disjoint_fields() -> Result<()> {
    let app = TestApp::new().await;
    let owner = token(Role::Student, Uuid::new_v4());
    let admin_id = app.user("Warden", Role::Admin).await;
    let admin = token(Role::Admin, admin_id);
    let created = app.create(&owner, broken_ac()).await?;
    let uri = format!("/api/grievances/{}", created["id"].as_str().unwrap());

    let (status, body) = app
        .json(
            Method::PUT,
            &uri,
            Some(&owner),
            Some(json!({"priority": "Urgent", "status": "Resolved"})),
        )
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["priority"], "Urgent");
    assert_eq!(body["data"]["title"], "Broken AC");
    assert_eq!(body["data"]["status"], "Pending");

    let (status, body) = app
        .json(
            Method::PUT,
            &uri,
            Some(&admin),
            Some(json!({"status": "In Progress", "assignedTo": admin_id.to_string(), "title": "ignored"})),
        )
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "In Progress");
    assert_eq!(body["data"]["assignedTo"]["name"], "Warden");
    assert!(body["data"]["assignedTo"].get("role").is_none());
    assert!(body["data"]["submittedBy"].get("role").is_none());
    assert_eq!(body["data"]["title"], "Broken AC");

    let (status, body) = app
        .json(Method::PUT, &uri, Some(&admin), Some(json!({"status": "Closed"})))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["field_errors"]["status"].is_string());

    let (status, _) = app
        .json(Method::PUT, &uri, Some(&owner), Some(json!({"description": "   "})))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn admin_delete_removes_record() -> Result<()> {
    let app = TestApp::new().await;
    let owner = token(Role::Student, Uuid::new_v4());
    let admin = token(Role::Admin, Uuid::new_v4());
    let created = app.create(&owner, broken_ac()).await?;
    let uri = format!("/api/grievances/{}", created["id"].as_str().unwrap());

    let (status, _) = app.json(Method::DELETE, &uri, Some(&owner), None).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.json(Method::DELETE, &uri, Some(&admin), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["deleted"], true);

    let (status, _) = app.get(&uri, &admin).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}
