//! Integration tests for `/api/v1/projects`, the module records nested under
//! it, and the workspace snapshot.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete_auth, get_auth, new_user, post_json, put_json};
use serde_json::{json, Value};
use sqlx::PgPool;

async fn create_project(app: axum::Router, token: &str, name: &str) -> Value {
    let response = post_json(app, "/api/v1/projects", token, json!({"name": name})).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn me_provisions_user_from_token(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (id, token) = new_user();

    let response = get_auth(app, "/api/v1/me", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["id"], id.to_string());
    assert_eq!(json["data"]["email"], format!("{id}@example.test"));

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE id = $1")
        .bind(id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_project_gets_default_layout(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (id, token) = new_user();

    let project = create_project(app, &token, "Recipe app").await;

    assert_eq!(project["name"], "Recipe app");
    assert_eq!(project["owner_id"], id.to_string());
    assert_eq!(project["is_archived"], false);
    let modules = project["workspace_layout"]["modules"].as_array().unwrap();
    assert_eq!(modules.len(), 8);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn blank_project_name_is_400(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (_, token) = new_user();

    let response = post_json(app, "/api/v1/projects", &token, json!({"name": "   "})).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn projects_are_private_to_their_owner(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (_, alice) = new_user();
    let (_, bob) = new_user();

    let project = create_project(app.clone(), &alice, "Alice's").await;
    let uri = format!("/api/v1/projects/{}", project["id"].as_str().unwrap());

    let response = get_auth(app.clone(), &uri, &bob).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = delete_auth(app.clone(), &uri, &bob).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get_auth(app.clone(), "/api/v1/projects", &bob).await;
    assert_eq!(body_json(response).await["data"], json!([]));

    let response = get_auth(app, &uri, &alice).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn archive_hides_project_until_restored(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (_, token) = new_user();
    let project = create_project(app.clone(), &token, "Old idea").await;
    let id = project["id"].as_str().unwrap();

    let response = post_json(
        app.clone(),
        &format!("/api/v1/projects/{id}/archive"),
        &token,
        json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["is_archived"], true);

    let listed = body_json(get_auth(app.clone(), "/api/v1/projects", &token).await).await;
    assert_eq!(listed["data"].as_array().unwrap().len(), 0);

    let listed = body_json(
        get_auth(app.clone(), "/api/v1/projects?include_archived=true", &token).await,
    )
    .await;
    assert_eq!(listed["data"].as_array().unwrap().len(), 1);

    let response = post_json(
        app.clone(),
        &format!("/api/v1/projects/{id}/restore"),
        &token,
        json!({}),
    )
    .await;
    assert_eq!(body_json(response).await["data"]["is_archived"], false);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_and_delete_project(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (_, token) = new_user();
    let project = create_project(app.clone(), &token, "Draft").await;
    let uri = format!("/api/v1/projects/{}", project["id"].as_str().unwrap());

    let response = put_json(
        app.clone(),
        &uri,
        &token,
        json!({"name": "Final", "description": "Now with a plan"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Final");
    assert_eq!(json["data"]["description"], "Now with a plan");

    let response = delete_auth(app.clone(), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(app, &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn layout_validation(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (_, token) = new_user();
    let project = create_project(app.clone(), &token, "Layout").await;
    let uri = format!("/api/v1/projects/{}/layout", project["id"].as_str().unwrap());

    let duplicate = json!({"modules": [
        {"module_type": "prd", "x": 0, "y": 0, "w": 4, "h": 3},
        {"module_type": "prd", "x": 4, "y": 0, "w": 4, "h": 3}
    ]});
    let response = put_json(app.clone(), &uri, &token, duplicate).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let unknown = json!({"modules": [{"module_type": "chat", "x": 0, "y": 0, "w": 4, "h": 3}]});
    let response = put_json(app.clone(), &uri, &token, unknown).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let valid = json!({"modules": [
        {"module_type": "tasks", "x": 0, "y": 0, "w": 12, "h": 6},
        {"module_type": "scratchpad", "x": 0, "y": 6, "w": 6, "h": 4}
    ]});
    let response = put_json(app, &uri, &token, valid.clone()).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["workspace_layout"], valid);
}

// ---------------------------------------------------------------------------
// Module records
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn task_crud_with_enum_validation(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (_, token) = new_user();
    let project = create_project(app.clone(), &token, "Tasks").await;
    let base = format!("/api/v1/projects/{}/tasks", project["id"].as_str().unwrap());

    let response = post_json(
        app.clone(),
        &base,
        &token,
        json!({"title": "Bad", "status": "blocked"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json(
        app.clone(),
        &base,
        &token,
        json!({"title": "Set up CI", "priority": "high", "estimated_hours": 2.5}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let task = body_json(response).await["data"].clone();
    assert_eq!(task["status"], "todo");
    assert_eq!(task["position"], 0);

    let item_uri = format!("{base}/{}", task["id"].as_str().unwrap());
    let response = put_json(app.clone(), &item_uri, &token, json!({"status": "done"})).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["status"], "done");

    let response = put_json(app.clone(), &item_uri, &token, json!({"status": "finished"})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = delete_auth(app.clone(), &item_uri, &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let response = delete_auth(app, &item_uri, &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn bulk_roadmap_appends_after_existing_items(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (_, token) = new_user();
    let project = create_project(app.clone(), &token, "Roadmap").await;
    let base = format!("/api/v1/projects/{}/roadmap", project["id"].as_str().unwrap());

    post_json(app.clone(), &base, &token, json!({"title": "Existing"})).await;

    // Generated items carry a position that the server ignores.
    let generated = json!({"items": [
        {"title": "Plan", "status": "planned", "priority": "high", "phase": "planning", "position": 0},
        {"title": "Build", "status": "planned", "priority": "medium", "phase": "development", "position": 1}
    ]});
    let response = post_json(app.clone(), &format!("{base}/bulk"), &token, generated).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await["data"].clone();
    let positions: Vec<i64> = created
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["position"].as_i64().unwrap())
        .collect();
    assert_eq!(positions, vec![1, 2]);

    let response = post_json(app, &format!("{base}/bulk"), &token, json!({"items": []})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deployment_platform_is_canonicalised(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (_, token) = new_user();
    let project = create_project(app.clone(), &token, "Ship").await;
    let base = format!("/api/v1/projects/{}/deployment", project["id"].as_str().unwrap());

    let response = post_json(
        app.clone(),
        &base,
        &token,
        json!({"title": "Set env vars", "platform": "Vercel", "category": "environment"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let item = body_json(response).await["data"].clone();
    assert_eq!(item["platform"], "vercel");
    assert_eq!(item["is_completed"], false);

    let response = post_json(
        app.clone(),
        &base,
        &token,
        json!({"title": "Deploy", "platform": "mainframe"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let item_uri = format!("{base}/{}", item["id"].as_str().unwrap());
    let response = put_json(app, &item_uri, &token, json!({"is_completed": true})).await;
    assert_eq!(body_json(response).await["data"]["is_completed"], true);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn module_routes_check_project_ownership(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (_, alice) = new_user();
    let (_, mallory) = new_user();
    let project = create_project(app.clone(), &alice, "Secret stuff").await;
    let base = format!("/api/v1/projects/{}/secrets", project["id"].as_str().unwrap());

    let response = post_json(
        app.clone(),
        &base,
        &alice,
        json!({"name": "STRIPE_KEY", "value": "sk_test_123", "environment": "staging"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = get_auth(app.clone(), &base, &mallory).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = post_json(
        app,
        &base,
        &mallory,
        json!({"name": "X", "value": "y"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Workspace snapshot
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn workspace_snapshot_includes_every_module(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (_, token) = new_user();
    let project = create_project(app.clone(), &token, "Full").await;
    let id = project["id"].as_str().unwrap();

    for (module, body) in [
        ("prds", json!({"title": "PRD v1", "content": "# Overview"})),
        ("roadmap", json!({"title": "MVP"})),
        ("tasks", json!({"title": "Login"})),
        ("notes", json!({"content": "remember the milk", "is_pinned": true})),
        ("prompts", json!({"title": "Refactor", "content": "Refactor this", "tags": ["Rust", "rust"]})),
        ("secrets", json!({"name": "DB_URL", "value": "postgres://"})),
        ("deployment", json!({"title": "Build"})),
    ] {
        let response =
            post_json(app.clone(), &format!("/api/v1/projects/{id}/{module}"), &token, body).await;
        assert_eq!(response.status(), StatusCode::CREATED, "{module}");
    }

    let response = get_auth(app, &format!("/api/v1/projects/{id}/workspace"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let snapshot = body_json(response).await["data"].clone();
    assert_eq!(snapshot["project"]["id"], id);
    for key in ["prds", "roadmap", "tasks", "notes", "prompts", "secrets", "deployment"] {
        assert_eq!(snapshot[key].as_array().unwrap().len(), 1, "{key}");
    }
    assert_eq!(snapshot["prompts"][0]["tags"], json!(["rust"]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn workspace_of_another_user_is_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (_, owner) = new_user();
    let (_, other) = new_user();
    let project = create_project(app.clone(), &owner, "Mine").await;

    let response = get_auth(
        app,
        &format!("/api/v1/projects/{}/workspace", project["id"].as_str().unwrap()),
        &other,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
