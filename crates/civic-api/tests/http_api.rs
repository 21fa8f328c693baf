use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use civic_api::{AppStateInner, router};
use civic_db::{KeyValueStore, MemoryStore};
use civic_store::{ComplaintStore, UserDirectory};

fn app() -> Router {
    let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let state = Arc::new(AppStateInner {
        complaints: ComplaintStore::open(storage.clone()).unwrap(),
        users: UserDirectory::open(storage).unwrap(),
        jwt_secret: "test-secret".into(),
    });
    router(state)
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn login(app: &Router, email: &str, password: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "email": email, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    body["token"].as_str().unwrap().to_string()
}

fn ids(list: &Value) -> Vec<&str> {
    list.as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_str().unwrap())
        .collect()
}

fn complaint_body() -> Value {
    json!({
        "title": "Graffiti on library wall",
        "description": "Large graffiti tags appeared on the east wall overnight.",
        "category": "Public Safety",
        "location": "Central Library, East Wall",
        "citizenName": "Robin Park",
        "citizenEmail": "Robin@Example.com",
        "citizenPhone": "555-0100"
    })
}

#[tokio::test]
async fn submit_then_fetch_complaint() {
    let app = app();

    let (status, created) = send(&app, "POST", "/complaints", None, Some(complaint_body())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["status"], "new");
    assert_eq!(created["createdAt"], created["updatedAt"]);

    let id = created["id"].as_str().unwrap();
    let (status, fetched) = send(&app, "GET", &format!("/complaints/{}", id), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let (status, _) = send(&app, "GET", "/complaints/does-not-exist", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_complaint_reports_fields() {
    let app = app();
    let mut body = complaint_body();
    body["title"] = json!("Tag");
    body["citizenEmail"] = json!("nope");

    let (status, errors) = send(&app, "POST", "/complaints", None, Some(body)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let fields: Vec<&str> = errors["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["citizenEmail", "title"]);

    let mut body = complaint_body();
    body["category"] = json!("Aliens");
    let (status, _) = send(&app, "POST", "/complaints", None, Some(body)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn malformed_bodies_are_bad_requests() {
    let app = app();

    let (status, body) = send(
        &app,
        "POST",
        "/complaints",
        None,
        Some(json!({ "title": "Graffiti on library wall" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("description"));

    let (status, body) = send(
        &app,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "email": "jane@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, _) = send(
        &app,
        "POST",
        "/auth/register",
        None,
        Some(json!({
            "name": "Morgan",
            "email": "morgan@example.com",
            "password": "hunter22",
            "role": "admin"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let request = Request::builder()
        .method("POST")
        .uri("/complaints")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"title\": "))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn citizen_lookup_by_email() {
    let app = app();
    send(&app, "POST", "/complaints", None, Some(complaint_body())).await;

    let (status, list) = send(
        &app,
        "GET",
        "/complaints?email=robin@example.COM&status=all",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (_, list) = send(&app, "GET", "/complaints?email=jane@example.com", None, None).await;
    assert_eq!(ids(&list), vec!["c1"]);

    let (status, _) = send(&app, "GET", "/complaints", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn admin_routes_require_admin_role() {
    let app = app();

    let (status, _) = send(&app, "GET", "/admin/complaints", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let citizen = login(&app, "jane@example.com", "password123").await;
    let (status, _) = send(&app, "GET", "/admin/complaints", Some(&citizen), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, "GET", "/admin/complaints", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let admin = login(&app, "admin@gov.example", "admin123").await;
    let (status, list) = send(
        &app,
        "GET",
        "/admin/complaints?status=resolved&category=all&department=all",
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["id"], "c3");

    let (_, all) = send(&app, "GET", "/admin/complaints?search=PARK", Some(&admin), None).await;
    assert_eq!(ids(&all), vec!["c2", "c3"]);

    let (status, _) = send(&app, "GET", "/admin/complaints?status=done", Some(&admin), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, stats) = send(&app, "GET", "/admin/stats", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total"], 3);
    assert_eq!(stats["new"], 1);
    assert_eq!(stats["inProgress"], 1);
    assert_eq!(stats["resolved"], 1);
}

#[tokio::test]
async fn responses_drive_status() {
    let app = app();

    // anonymous citizen reply on a new complaint: status stays, name defaults
    let (status, reply) = send(
        &app,
        "POST",
        "/complaints/c2/responses",
        None,
        Some(json!({ "text": "Still dark out here." })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(reply["isAdmin"], false);
    assert_eq!(reply["userName"], "John Doe");
    let (_, c2) = send(&app, "GET", "/complaints/c2", None, None).await;
    assert_eq!(c2["status"], "new");

    // admin reply promotes it
    let admin = login(&app, "admin@gov.example", "admin123").await;
    let (status, reply) = send(
        &app,
        "POST",
        "/complaints/c2/responses",
        Some(&admin),
        Some(json!({ "text": "Crew scheduled for Tuesday." })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(reply["isAdmin"], true);
    assert_eq!(reply["userName"], "Public Works Dept");

    let (_, c2) = send(&app, "GET", "/complaints/c2", None, None).await;
    assert_eq!(c2["status"], "in-progress");
    assert_eq!(c2["responses"].as_array().unwrap().len(), 2);

    // admin reply on a resolved complaint leaves it resolved
    send(
        &app,
        "POST",
        "/complaints/c3/responses",
        Some(&admin),
        Some(json!({ "text": "Following up." })),
    )
    .await;
    let (_, c3) = send(&app, "GET", "/complaints/c3", None, None).await;
    assert_eq!(c3["status"], "resolved");

    let (status, _) = send(
        &app,
        "POST",
        "/complaints/c2/responses",
        None,
        Some(json!({ "text": "   " })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(
        &app,
        "POST",
        "/complaints/zzz/responses",
        None,
        Some(json!({ "text": "hello" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn admin_updates_complaint() {
    let app = app();
    let admin = login(&app, "admin@gov.example", "admin123").await;

    let (status, _) = send(
        &app,
        "PATCH",
        "/admin/complaints/c2",
        Some(&admin),
        Some(json!({ "departmentAssigned": "Ministry of Magic" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, updated) = send(
        &app,
        "PATCH",
        "/admin/complaints/c2",
        Some(&admin),
        Some(json!({ "status": "assigned", "departmentAssigned": "Utility Services" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "assigned");
    assert_eq!(updated["departmentAssigned"], "Utility Services");
    assert_eq!(updated["title"], "Street Light Outage");

    let (status, _) = send(
        &app,
        "PATCH",
        "/admin/complaints/missing",
        Some(&admin),
        Some(json!({ "status": "closed" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn register_login_and_profile() {
    let app = app();

    let (status, created) = send(
        &app,
        "POST",
        "/auth/register",
        None,
        Some(json!({ "name": "Morgan", "email": "morgan@example.com", "password": "hunter22" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["user"]["role"], "citizen");

    let (status, _) = send(
        &app,
        "POST",
        "/auth/register",
        None,
        Some(json!({ "name": "Morgan", "email": "MORGAN@example.com", "password": "hunter22" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(
        &app,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "email": "morgan@example.com", "password": "wrong-one" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let token = login(&app, "morgan@example.com", "hunter22").await;
    let (status, me) = send(&app, "GET", "/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["email"], "morgan@example.com");

    let (status, updated) = send(
        &app,
        "PATCH",
        "/me",
        Some(&token),
        Some(json!({ "name": "Morgan Lee" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["user"]["name"], "Morgan Lee");
    assert!(updated["token"].as_str().is_some());

    let (status, _) = send(&app, "GET", "/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn catalog_and_health() {
    let app = app();

    let (status, catalog) = send(&app, "GET", "/catalog", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(catalog["categories"].as_array().unwrap().len(), 11);
    assert_eq!(catalog["departments"].as_array().unwrap().len(), 10);

    let (status, health) = send(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["status"], "ok");
}
