/// Project endpoints
///
/// Projects group tasks within an organization. A project may carry an
/// optional access password; clients verify it through the unlock
/// endpoint before showing the project's board.
///
/// # Endpoints
///
/// - `GET    /v1/projects?orgId=<uuid>` - List projects in an organization
/// - `POST   /v1/projects` - Create project
/// - `GET    /v1/projects/:id` - Get a single project
/// - `PATCH  /v1/projects/:id` - Update project
/// - `DELETE /v1/projects/:id` - Delete project
/// - `POST   /v1/projects/:id/unlock` - Verify project access password

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use taskdeck_shared::{
    auth::{
        authorization::{require_membership, require_role, AuthzError},
        middleware::AuthContext,
        password,
    },
    models::{
        membership::MembershipRole,
        project::{CreateProject, Project, UpdateProject},
        tenant::Tenant,
    },
};
use uuid::Uuid;

/// Query parameters for listing projects
#[derive(Debug, Deserialize)]
pub struct ListProjectsQuery {
    /// Organization to list projects for
    #[serde(rename = "orgId")]
    pub org_id: Option<Uuid>,
}

/// Create project request
#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    /// Project title (required)
    pub title: Option<String>,

    /// Optional description
    pub description: Option<String>,

    /// Optional access password (stored hashed, never returned)
    pub project_password: Option<String>,

    /// Organization the project belongs to (required)
    #[serde(rename = "orgId")]
    pub org_id: Option<Uuid>,
}

/// Update project request
#[derive(Debug, Deserialize)]
pub struct UpdateProjectRequest {
    /// New title
    pub title: Option<String>,

    /// New description
    pub description: Option<String>,

    /// New access password (stored hashed)
    pub project_password: Option<String>,
}

/// Unlock request carrying the candidate password
#[derive(Debug, Deserialize)]
pub struct UnlockProjectRequest {
    /// Candidate access password
    pub password: String,
}

/// List response wrapper
#[derive(Debug, Serialize)]
pub struct ListProjectsResponse {
    pub projects: Vec<Project>,
}

/// Single project response wrapper
#[derive(Debug, Serialize)]
pub struct ProjectResponse {
    pub project: Project,
}

/// Loads a project and verifies the caller is a member of its organization
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

/// Lists projects in an organization, newest first
///
/// # Errors
///
/// - `400 Bad Request`: Missing orgId query parameter
/// - `403 Forbidden`: Caller is not a member of the organization
pub async fn list_projects(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<ListProjectsQuery>,
) -> ApiResult<Json<ListProjectsResponse>> {
    let org_id = query
        .org_id
        .ok_or_else(|| ApiError::BadRequest("orgId query parameter is required".to_string()))?;

    require_membership(&state.db, org_id, auth.user_id).await?;

    let projects = Project::list_by_tenant(&state.db, org_id).await?;

    Ok(Json(ListProjectsResponse { projects }))
}

/// Creates a new project
///
/// The access password, when provided, is hashed with Argon2id before
/// storage; the plaintext is never persisted or returned.
///
/// # Errors
///
/// - `400 Bad Request`: Missing title or orgId, or the insert is rejected
///   by the storage layer (unknown orgId hits the foreign key)
/// - `403 Forbidden`: Caller lacks Member role in the organization
pub async fn create_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateProjectRequest>,
) -> ApiResult<(StatusCode, Json<ProjectResponse>)> {
    let title = req
        .title
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("Project title is required".to_string()))?;

    let org_id = req
        .org_id
        .ok_or_else(|| ApiError::BadRequest("orgId is required".to_string()))?;

    if let Err(e) = require_role(&state.db, org_id, auth.user_id, MembershipRole::Member).await {
        // An unknown organization also has no membership row. Fall
        // through in that case so the insert hits the foreign key and
        // the storage error reaches the caller.
        let unknown_org = matches!(e, AuthzError::NotMember(_))
            && Tenant::find_by_id(&state.db, org_id).await?.is_none();
        if !unknown_org {
            return Err(e.into());
        }
    }

    let password_hash = match req.project_password.as_deref() {
        Some(pw) if !pw.is_empty() => Some(password::hash_password(pw)?),
        _ => None,
    };

    let project = Project::create(
        &state.db,
        CreateProject {
            tenant_id: org_id,
            title,
            description: req.description,
            password_hash,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(ProjectResponse { project })))
}

/// Gets a single project by ID
pub async fn get_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ProjectResponse>> {
    let project = load_authorized_project(&state, &auth, id).await?;

    Ok(Json(ProjectResponse { project }))
}

/// Updates a project (member or higher)
///
/// Only fields present in the request body are changed. Setting a new
/// project_password replaces the stored hash.
pub async fn update_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateProjectRequest>,
) -> ApiResult<Json<ProjectResponse>> {
    let project = load_authorized_project(&state, &auth, id).await?;
    require_role(&state.db, project.tenant_id, auth.user_id, MembershipRole::Member).await?;

    let password_hash = match req.project_password.as_deref() {
        Some(pw) if !pw.is_empty() => Some(password::hash_password(pw)?),
        _ => None,
    };

    let project = Project::update(
        &state.db,
        id,
        UpdateProject {
            title: req.title,
            description: req.description,
            password_hash,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    Ok(Json(ProjectResponse { project }))
}

/// Deletes a project (member or higher)
///
/// Cascades to all tasks in the project.
pub async fn delete_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    let project = load_authorized_project(&state, &auth, id).await?;
    require_role(&state.db, project.tenant_id, auth.user_id, MembershipRole::Member).await?;

    let deleted = Project::delete(&state.db, id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Project not found".to_string()));
    }

    Ok(Json(serde_json::json!({ "success": true })))
}

/// Verifies a project access password
///
/// Returns 200 with `{"unlocked": true}` when the password matches.
/// Projects without a password are always unlocked.
///
/// # Errors
///
/// - `401 Unauthorized`: Wrong password
pub async fn unlock_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UnlockProjectRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let project = load_authorized_project(&state, &auth, id).await?;

    let unlocked = match project.password_hash.as_deref() {
        Some(hash) => password::verify_password(&req.password, hash)?,
        None => true,
    };

    if !unlocked {
        return Err(ApiError::Unauthorized("Incorrect project password".to_string()));
    }

    Ok(Json(serde_json::json!({ "unlocked": true })))
}
