/// Organization endpoints
///
/// Organizations are the top-level tenancy unit. Every authenticated
/// user can create organizations; the creator becomes the owner.
///
/// # Endpoints
///
/// - `GET    /v1/organizations` - List organizations the caller belongs to
/// - `POST   /v1/organizations` - Create organization (caller becomes owner)
/// - `GET    /v1/organizations/:id` - Get a single organization
/// - `PATCH  /v1/organizations/:id` - Update (admin or higher)
/// - `DELETE /v1/organizations/:id` - Delete (owner only)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use taskdeck_shared::{
    auth::{
        authorization::{require_membership, require_role},
        middleware::AuthContext,
    },
    models::{
        membership::{CreateMembership, Membership, MembershipRole},
        tenant::{CreateTenant, Tenant, TenantPlan, UpdateTenant},
    },
};
use uuid::Uuid;

/// Create organization request
#[derive(Debug, Deserialize)]
pub struct CreateOrganizationRequest {
    /// Organization name (required)
    pub name: Option<String>,

    /// Organization category (e.g. "startup", "agency")
    #[serde(rename = "type")]
    pub org_type: Option<String>,

    /// Billing plan (defaults to free)
    pub plan: Option<TenantPlan>,
}

/// Update organization request
#[derive(Debug, Deserialize)]
pub struct UpdateOrganizationRequest {
    /// New name
    pub name: Option<String>,

    /// New category
    #[serde(rename = "type")]
    pub org_type: Option<String>,

    /// New plan
    pub plan: Option<TenantPlan>,
}

/// List response wrapper
#[derive(Debug, Serialize)]
pub struct ListOrganizationsResponse {
    pub organizations: Vec<Tenant>,
}

/// Single organization response wrapper
#[derive(Debug, Serialize)]
pub struct OrganizationResponse {
    pub organization: Tenant,
}

/// Lists all organizations the caller is a member of
pub async fn list_organizations(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<ListOrganizationsResponse>> {
    let organizations = Tenant::list_for_user(&state.db, auth.user_id).await?;

    Ok(Json(ListOrganizationsResponse { organizations }))
}

/// Creates a new organization
///
/// The caller automatically becomes the owner.
///
/// # Errors
///
/// - `400 Bad Request`: Missing or empty name
pub async fn create_organization(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateOrganizationRequest>,
) -> ApiResult<(StatusCode, Json<OrganizationResponse>)> {
    let name = req
        .name
        .filter(|n| !n.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("Organization name is required".to_string()))?;

    // Organization and owner membership land atomically
    let mut tx = state.db.begin().await?;

    let organization = Tenant::create(
        &mut *tx,
        CreateTenant {
            name,
            org_type: req.org_type,
            plan: req.plan.unwrap_or(TenantPlan::Free),
        },
    )
    .await?;

    Membership::create(
        &mut *tx,
        CreateMembership {
            tenant_id: organization.id,
            user_id: auth.user_id,
            role: MembershipRole::Owner,
        },
    )
    .await?;

    tx.commit().await?;

    Ok((
        StatusCode::CREATED,
        Json(OrganizationResponse { organization }),
    ))
}

/// Gets a single organization by ID
///
/// # Errors
///
/// - `403 Forbidden`: Caller is not a member
/// - `404 Not Found`: Organization doesn't exist
pub async fn get_organization(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<OrganizationResponse>> {
    require_membership(&state.db, id, auth.user_id).await?;

    let organization = Tenant::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Organization not found".to_string()))?;

    Ok(Json(OrganizationResponse { organization }))
}

/// Updates an organization (admin or higher)
///
/// Only fields present in the request body are changed.
pub async fn update_organization(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateOrganizationRequest>,
) -> ApiResult<Json<OrganizationResponse>> {
    require_role(&state.db, id, auth.user_id, MembershipRole::Admin).await?;

    let organization = Tenant::update(
        &state.db,
        id,
        UpdateTenant {
            name: req.name,
            org_type: req.org_type,
            plan: req.plan,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Organization not found".to_string()))?;

    Ok(Json(OrganizationResponse { organization }))
}

/// Deletes an organization (owner only)
///
/// Cascades to all memberships, projects, and tasks.
pub async fn delete_organization(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    require_role(&state.db, id, auth.user_id, MembershipRole::Owner).await?;

    let deleted = Tenant::delete(&state.db, id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Organization not found".to_string()));
    }

    Ok(Json(serde_json::json!({ "success": true })))
}
