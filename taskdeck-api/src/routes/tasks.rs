/// Task endpoints
///
/// All task routes are keyed by project ID in the path; the target task
/// for updates and deletes is named by an `id` query parameter. Every
/// handler resolves the project first and checks the caller's membership
/// in the owning organization.
///
/// # Endpoints
///
/// - `GET    /v1/tasks/:project_id?status=done&priority=high` - List tasks
/// - `POST   /v1/tasks/:project_id` - Create task
/// - `PATCH  /v1/tasks/:project_id?id=<uuid>` - Update task
/// - `DELETE /v1/tasks/:project_id?id=<uuid>` - Delete task

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use taskdeck_shared::{
    auth::{
        authorization::{require_membership, require_role},
        middleware::AuthContext,
    },
    board::BoardFilter,
    models::{
        membership::MembershipRole,
        project::Project,
        task::{CreateTask, Task, TaskPriority, TaskStatus, UpdateTask},
    },
};
use uuid::Uuid;

/// Create task request
#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    /// Task title (required)
    pub title: Option<String>,

    /// Optional description
    pub description: Option<String>,

    /// Priority, defaults to medium
    pub priority: Option<TaskPriority>,

    /// Status, defaults to to-do
    pub status: Option<TaskStatus>,

    /// Optional due date
    pub due_date: Option<NaiveDate>,
}

/// Query parameter naming the task to update or delete
#[derive(Debug, Deserialize)]
pub struct TaskIdQuery {
    pub id: Option<Uuid>,
}

/// Resolves a project and verifies the caller is a member of its organization
async fn load_authorized_project(
    state: &AppState,
    auth: &AuthContext,
    project_id: Uuid,
) -> ApiResult<Project> {
    let project = Project::find_by_id(&state.db, project_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    require_membership(&state.db, project.tenant_id, auth.user_id).await?;

    Ok(project)
}

/// Lists tasks in a project, newest first
///
/// Optional `status` and `priority` query parameters narrow the result;
/// both omitted returns the whole board.
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(project_id): Path<Uuid>,
    Query(filter): Query<BoardFilter>,
) -> ApiResult<Json<Vec<Task>>> {
    load_authorized_project(&state, &auth, project_id).await?;

    let tasks = Task::list_by_project(&state.db, project_id, filter.status, filter.priority).await?;

    Ok(Json(tasks))
}

/// Creates a new task in a project
///
/// # Errors
///
/// - `400 Bad Request`: Missing title
/// - `403 Forbidden`: Caller lacks Member role in the organization
/// - `404 Not Found`: Unknown project
pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(project_id): Path<Uuid>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<Json<Task>> {
    let title = req
        .title
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("Task title is required".to_string()))?;

    let project = load_authorized_project(&state, &auth, project_id).await?;
    require_role(&state.db, project.tenant_id, auth.user_id, MembershipRole::Member).await?;

    let task = Task::create(
        &state.db,
        CreateTask {
            project_id,
            title,
            description: req.description,
            priority: req.priority,
            status: req.status,
            due_date: req.due_date,
        },
    )
    .await?;

    Ok(Json(task))
}

/// Applies a partial update to a task
///
/// # Errors
///
/// - `400 Bad Request`: Missing id query parameter
/// - `404 Not Found`: Task does not exist in this project
pub async fn update_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(project_id): Path<Uuid>,
    Query(query): Query<TaskIdQuery>,
    Json(req): Json<UpdateTask>,
) -> ApiResult<Json<Task>> {
    let task_id = query
        .id
        .ok_or_else(|| ApiError::BadRequest("Task id is required".to_string()))?;

    let project = load_authorized_project(&state, &auth, project_id).await?;
    require_role(&state.db, project.tenant_id, auth.user_id, MembershipRole::Member).await?;

    // Scope the lookup to the project so a task ID from another project 404s
    Task::find_by_id_and_project(&state.db, task_id, project_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    let task = Task::update(&state.db, task_id, req)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(task))
}

/// Deletes a task
///
/// # Errors
///
/// - `400 Bad Request`: Missing id query parameter
/// - `404 Not Found`: Task does not exist in this project
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(project_id): Path<Uuid>,
    Query(query): Query<TaskIdQuery>,
) -> ApiResult<Json<serde_json::Value>> {
    let task_id = query
        .id
        .ok_or_else(|| ApiError::BadRequest("Task id is required".to_string()))?;

    let project = load_authorized_project(&state, &auth, project_id).await?;
    require_role(&state.db, project.tenant_id, auth.user_id, MembershipRole::Member).await?;

    let task = Task::find_by_id_and_project(&state.db, task_id, project_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    // The row can vanish between the lookup and the delete
    let deleted = Task::delete(&state.db, task.id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Task not found".to_string()));
    }

    Ok(Json(serde_json::json!({ "success": true })))
}
