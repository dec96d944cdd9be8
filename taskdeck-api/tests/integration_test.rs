/// Integration tests for TaskDeck API
///
/// These tests verify the full system works end-to-end:
/// - API endpoints with authentication
/// - Organization CRUD and role checks
/// - Project CRUD and password unlock
/// - Task lifecycle (create with defaults, patch, filter, delete)
/// - Membership isolation between organizations

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::TestContext;
use serde_json::json;
use taskdeck_shared::models::task::{Task, TaskPriority, TaskStatus};
use tower::Service as _;

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// Test that creating a task fills in the column defaults
#[tokio::test]
async fn test_create_task_defaults() {
    let ctx = TestContext::new().await.unwrap();
    let project = common::create_test_project(&ctx, "Defaults").await.unwrap();

    let request = Request::builder()
        .method("POST")
        .uri(format!("/v1/tasks/{}", project.id))
        .header("authorization", ctx.auth_header())
        .header("content-type", "application/json")
        .body(Body::from(json!({ "title": "First task" }).to_string()))
        .unwrap();

    let response = ctx.app.clone().call(request).await.unwrap();
    let status = response.status();
    let task = body_json(response).await;

    assert_eq!(status, StatusCode::OK, "unexpected response: {}", task);
    assert_eq!(task["title"], "First task");
    assert_eq!(task["project_id"], project.id.to_string());
    assert_eq!(task["priority"], "medium");
    assert_eq!(task["status"], "to-do");
    assert!(task["due_date"].is_null());
    assert!(task["description"].is_null());

    ctx.cleanup().await.unwrap();
}

/// Test that a missing title is rejected with 400
#[tokio::test]
async fn test_create_task_requires_title() {
    let ctx = TestContext::new().await.unwrap();
    let project = common::create_test_project(&ctx, "No title").await.unwrap();

    let request = Request::builder()
        .method("POST")
        .uri(format!("/v1/tasks/{}", project.id))
        .header("authorization", ctx.auth_header())
        .header("content-type", "application/json")
        .body(Body::from(json!({ "description": "no title here" }).to_string()))
        .unwrap();

    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    ctx.cleanup().await.unwrap();
}

/// Test that a status-only patch leaves every other field alone
#[tokio::test]
async fn test_update_task_partial() {
    let ctx = TestContext::new().await.unwrap();
    let project = common::create_test_project(&ctx, "Patch").await.unwrap();

    let task = Task::create(
        &ctx.db,
        taskdeck_shared::models::task::CreateTask {
            project_id: project.id,
            title: "Ship the release".to_string(),
            description: Some("Cut and tag".to_string()),
            priority: Some(TaskPriority::High),
            status: None,
            due_date: Some(chrono::NaiveDate::from_ymd_opt(2026, 9, 15).unwrap()),
        },
    )
    .await
    .unwrap();

    let request = Request::builder()
        .method("PATCH")
        .uri(format!("/v1/tasks/{}?id={}", project.id, task.id))
        .header("authorization", ctx.auth_header())
        .header("content-type", "application/json")
        .body(Body::from(json!({ "status": "in-progress" }).to_string()))
        .unwrap();

    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let updated = Task::find_by_id(&ctx.db, task.id).await.unwrap().unwrap();
    assert_eq!(updated.status, TaskStatus::InProgress);
    assert!(
        updated.updated_at > task.updated_at,
        "updated_at should be refreshed by the patch"
    );
    assert_eq!(updated.title, "Ship the release");
    assert_eq!(updated.description.as_deref(), Some("Cut and tag"));
    assert_eq!(updated.priority, TaskPriority::High);
    assert_eq!(
        updated.due_date,
        Some(chrono::NaiveDate::from_ymd_opt(2026, 9, 15).unwrap())
    );

    ctx.cleanup().await.unwrap();
}

/// Test that an explicit null due_date clears the stored date
#[tokio::test]
async fn test_update_task_clears_due_date() {
    let ctx = TestContext::new().await.unwrap();
    let project = common::create_test_project(&ctx, "Due dates").await.unwrap();

    let task = Task::create(
        &ctx.db,
        taskdeck_shared::models::task::CreateTask {
            project_id: project.id,
            title: "Dated task".to_string(),
            description: None,
            priority: None,
            status: None,
            due_date: Some(chrono::NaiveDate::from_ymd_opt(2026, 10, 1).unwrap()),
        },
    )
    .await
    .unwrap();

    let request = Request::builder()
        .method("PATCH")
        .uri(format!("/v1/tasks/{}?id={}", project.id, task.id))
        .header("authorization", ctx.auth_header())
        .header("content-type", "application/json")
        .body(Body::from(json!({ "due_date": null }).to_string()))
        .unwrap();

    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let updated = Task::find_by_id(&ctx.db, task.id).await.unwrap().unwrap();
    assert_eq!(updated.due_date, None);

    ctx.cleanup().await.unwrap();
}

/// Test that a patch without the id query parameter is a 400
#[tokio::test]
async fn test_update_task_requires_id() {
    let ctx = TestContext::new().await.unwrap();
    let project = common::create_test_project(&ctx, "Missing id").await.unwrap();

    let request = Request::builder()
        .method("PATCH")
        .uri(format!("/v1/tasks/{}", project.id))
        .header("authorization", ctx.auth_header())
        .header("content-type", "application/json")
        .body(Body::from(json!({ "status": "done" }).to_string()))
        .unwrap();

    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    ctx.cleanup().await.unwrap();
}

/// Test that delete removes exactly the named row and reports success
#[tokio::test]
async fn test_delete_task() {
    let ctx = TestContext::new().await.unwrap();
    let project = common::create_test_project(&ctx, "Deletion").await.unwrap();

    let keep = Task::create(
        &ctx.db,
        taskdeck_shared::models::task::CreateTask {
            project_id: project.id,
            title: "Keep me".to_string(),
            description: None,
            priority: None,
            status: None,
            due_date: None,
        },
    )
    .await
    .unwrap();

    let doomed = Task::create(
        &ctx.db,
        taskdeck_shared::models::task::CreateTask {
            project_id: project.id,
            title: "Delete me".to_string(),
            description: None,
            priority: None,
            status: None,
            due_date: None,
        },
    )
    .await
    .unwrap();

    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/v1/tasks/{}?id={}", project.id, doomed.id))
        .header("authorization", ctx.auth_header())
        .body(Body::empty())
        .unwrap();

    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["success"], true);

    assert!(Task::find_by_id(&ctx.db, doomed.id).await.unwrap().is_none());
    assert!(Task::find_by_id(&ctx.db, keep.id).await.unwrap().is_some());

    // Deleting an unknown id is a 404
    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/v1/tasks/{}?id={}", project.id, uuid::Uuid::new_v4()))
        .header("authorization", ctx.auth_header())
        .body(Body::empty())
        .unwrap();

    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    ctx.cleanup().await.unwrap();
}

/// Test listing tasks with status and priority filters
#[tokio::test]
async fn test_list_tasks_filtered() {
    let ctx = TestContext::new().await.unwrap();
    let project = common::create_test_project(&ctx, "Filters").await.unwrap();

    for (title, priority, status) in [
        ("a", TaskPriority::High, TaskStatus::Done),
        ("b", TaskPriority::High, TaskStatus::ToDo),
        ("c", TaskPriority::Low, TaskStatus::Done),
    ] {
        Task::create(
            &ctx.db,
            taskdeck_shared::models::task::CreateTask {
                project_id: project.id,
                title: title.to_string(),
                description: None,
                priority: Some(priority),
                status: Some(status),
                due_date: None,
            },
        )
        .await
        .unwrap();
    }

    let request = Request::builder()
        .method("GET")
        .uri(format!("/v1/tasks/{}?status=done&priority=high", project.id))
        .header("authorization", ctx.auth_header())
        .body(Body::empty())
        .unwrap();

    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let tasks = body_json(response).await;
    let tasks = tasks.as_array().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["title"], "a");

    // No filter returns the whole board
    let request = Request::builder()
        .method("GET")
        .uri(format!("/v1/tasks/{}", project.id))
        .header("authorization", ctx.auth_header())
        .body(Body::empty())
        .unwrap();

    let response = ctx.app.clone().call(request).await.unwrap();
    let tasks = body_json(response).await;
    assert_eq!(tasks.as_array().unwrap().len(), 3);

    ctx.cleanup().await.unwrap();
}

/// Test organization creation and the name-required error
#[tokio::test]
async fn test_create_organization() {
    let ctx = TestContext::new().await.unwrap();

    let request = Request::builder()
        .method("POST")
        .uri("/v1/organizations")
        .header("authorization", ctx.auth_header())
        .header("content-type", "application/json")
        .body(Body::from(
            json!({ "name": "Acme Inc", "type": "startup" }).to_string(),
        ))
        .unwrap();

    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    assert_eq!(body["organization"]["name"], "Acme Inc");
    assert_eq!(body["organization"]["type"], "startup");

    // Clean up the extra org
    let org_id = body["organization"]["id"].as_str().unwrap();
    sqlx::query("DELETE FROM tenants WHERE id = $1")
        .bind(uuid::Uuid::parse_str(org_id).unwrap())
        .execute(&ctx.db)
        .await
        .unwrap();

    // Missing name is a 400 and inserts nothing; the sentinel type lets
    // us look for a stray row afterwards
    let sentinel = format!("no-name-{}", uuid::Uuid::new_v4());
    let request = Request::builder()
        .method("POST")
        .uri("/v1/organizations")
        .header("authorization", ctx.auth_header())
        .header("content-type", "application/json")
        .body(Body::from(json!({ "type": sentinel }).to_string()))
        .unwrap();

    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let inserted: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tenants WHERE org_type = $1")
        .bind(&sentinel)
        .fetch_one(&ctx.db)
        .await
        .unwrap();
    assert_eq!(inserted, 0, "rejected create must not insert a row");

    ctx.cleanup().await.unwrap();
}

/// Test that creating a project under an unknown organization reaches
/// the storage layer and surfaces the foreign-key rejection
#[tokio::test]
async fn test_create_project_unknown_org_surfaces_storage_error() {
    let ctx = TestContext::new().await.unwrap();

    let request = Request::builder()
        .method("POST")
        .uri("/v1/projects")
        .header("authorization", ctx.auth_header())
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "title": "Orphan project",
                "orgId": uuid::Uuid::new_v4(),
            })
            .to_string(),
        ))
        .unwrap();

    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"], "storage_error");
    assert!(
        body["message"].as_str().unwrap().contains("foreign key"),
        "expected the database message, got: {}",
        body["message"]
    );

    ctx.cleanup().await.unwrap();
}

/// Test that organization creation is transactional
#[tokio::test]
async fn test_organization_create_rolls_back() {
    use taskdeck_shared::models::tenant::{CreateTenant, Tenant, TenantPlan};

    let ctx = TestContext::new().await.unwrap();

    let mut tx = ctx.db.begin().await.unwrap();
    let tenant = Tenant::create(
        &mut *tx,
        CreateTenant {
            name: format!("Rollback Org {}", uuid::Uuid::new_v4()),
            org_type: None,
            plan: TenantPlan::Free,
        },
    )
    .await
    .unwrap();
    tx.rollback().await.unwrap();

    assert!(
        Tenant::find_by_id(&ctx.db, tenant.id).await.unwrap().is_none(),
        "rolled-back organization must not persist"
    );

    ctx.cleanup().await.unwrap();
}

/// Test that listing projects without org_id is a 400
#[tokio::test]
async fn test_list_projects_requires_org_id() {
    let ctx = TestContext::new().await.unwrap();

    let request = Request::builder()
        .method("GET")
        .uri("/v1/projects")
        .header("authorization", ctx.auth_header())
        .body(Body::empty())
        .unwrap();

    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    ctx.cleanup().await.unwrap();
}

/// Test project creation and the wrapped response shape
#[tokio::test]
async fn test_create_and_list_projects() {
    let ctx = TestContext::new().await.unwrap();

    let request = Request::builder()
        .method("POST")
        .uri("/v1/projects")
        .header("authorization", ctx.auth_header())
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "title": "Website redesign",
                "description": "Q4 refresh",
                "orgId": ctx.tenant.id,
            })
            .to_string(),
        ))
        .unwrap();

    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    assert_eq!(body["project"]["title"], "Website redesign");
    // The password hash must never leak
    assert!(body["project"].get("password_hash").is_none());

    let request = Request::builder()
        .method("GET")
        .uri(format!("/v1/projects?orgId={}", ctx.tenant.id))
        .header("authorization", ctx.auth_header())
        .body(Body::empty())
        .unwrap();

    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["projects"].as_array().unwrap().len(), 1);

    ctx.cleanup().await.unwrap();
}

/// Test project password unlock flow
#[tokio::test]
async fn test_project_unlock() {
    let ctx = TestContext::new().await.unwrap();

    let request = Request::builder()
        .method("POST")
        .uri("/v1/projects")
        .header("authorization", ctx.auth_header())
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "title": "Locked board",
                "orgId": ctx.tenant.id,
                "project_password": "sekrit123",
            })
            .to_string(),
        ))
        .unwrap();

    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    let project_id = body["project"]["id"].as_str().unwrap().to_string();

    // Wrong password is rejected
    let request = Request::builder()
        .method("POST")
        .uri(format!("/v1/projects/{}/unlock", project_id))
        .header("authorization", ctx.auth_header())
        .header("content-type", "application/json")
        .body(Body::from(json!({ "password": "wrong" }).to_string()))
        .unwrap();

    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Correct password unlocks
    let request = Request::builder()
        .method("POST")
        .uri(format!("/v1/projects/{}/unlock", project_id))
        .header("authorization", ctx.auth_header())
        .header("content-type", "application/json")
        .body(Body::from(json!({ "password": "sekrit123" }).to_string()))
        .unwrap();

    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["unlocked"], true);

    ctx.cleanup().await.unwrap();
}

/// Test that members of one organization cannot touch another's projects
#[tokio::test]
async fn test_membership_isolation() {
    let ctx = TestContext::new().await.unwrap();
    let project = common::create_test_project(&ctx, "Private").await.unwrap();

    let (outsider, token) = ctx.add_outsider().await.unwrap();

    let request = Request::builder()
        .method("GET")
        .uri(format!("/v1/projects/{}", project.id))
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let request = Request::builder()
        .method("GET")
        .uri(format!("/v1/tasks/{}", project.id))
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(outsider.id)
        .execute(&ctx.db)
        .await
        .unwrap();
    ctx.cleanup().await.unwrap();
}

/// Test that viewers cannot create tasks
#[tokio::test]
async fn test_viewer_cannot_write() {
    let ctx = TestContext::new().await.unwrap();
    let project = common::create_test_project(&ctx, "Read only").await.unwrap();

    let (_viewer, token) = ctx
        .add_member(taskdeck_shared::models::membership::MembershipRole::Viewer)
        .await
        .unwrap();

    // Viewers can read the board
    let request = Request::builder()
        .method("GET")
        .uri(format!("/v1/tasks/{}", project.id))
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // But not write to it
    let request = Request::builder()
        .method("POST")
        .uri(format!("/v1/tasks/{}", project.id))
        .header("authorization", format!("Bearer {}", token))
        .header("content-type", "application/json")
        .body(Body::from(json!({ "title": "Sneaky" }).to_string()))
        .unwrap();

    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    ctx.cleanup().await.unwrap();
}

/// Test authentication requirement
#[tokio::test]
async fn test_authentication_required() {
    let ctx = TestContext::new().await.unwrap();

    let request = Request::builder()
        .method("GET")
        .uri("/v1/organizations")
        .body(Body::empty())
        .unwrap();

    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    ctx.cleanup().await.unwrap();
}

/// Test the register/login flow end to end
#[tokio::test]
async fn test_register_and_login() {
    let ctx = TestContext::new().await.unwrap();

    let email = format!("signup-{}@example.com", uuid::Uuid::new_v4());

    let request = Request::builder()
        .method("POST")
        .uri("/v1/auth/register")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "email": email,
                "password": "hunter2hunter2",
                "name": "New User",
            })
            .to_string(),
        ))
        .unwrap();

    let response = ctx.app.clone().call(request).await.unwrap();
    let status = response.status();
    let body = body_json(response).await;
    assert_eq!(status, StatusCode::OK, "unexpected response: {}", body);
    assert!(body["access_token"].is_string());
    assert!(body["refresh_token"].is_string());

    let request = Request::builder()
        .method("POST")
        .uri("/v1/auth/login")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({ "email": email, "password": "hunter2hunter2" }).to_string(),
        ))
        .unwrap();

    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert!(body["access_token"].is_string());

    // Wrong password is a 401
    let request = Request::builder()
        .method("POST")
        .uri("/v1/auth/login")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({ "email": email, "password": "wrong-password1" }).to_string(),
        ))
        .unwrap();

    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    sqlx::query("DELETE FROM users WHERE email = $1")
        .bind(&email)
        .execute(&ctx.db)
        .await
        .unwrap();
    ctx.cleanup().await.unwrap();
}
