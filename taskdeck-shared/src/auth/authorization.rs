/// Authorization helpers and permission checks
///
/// Role-based access control (RBAC) utilities for organization-scoped
/// resources.
///
/// # Permission Model
///
/// 1. **Organization Membership**: the user must be a member of the tenant
/// 2. **Role-Based Permissions**: defined by MembershipRole (Owner, Admin, Member, Viewer)
///
/// Authorization always runs against the database, never against token
/// claims alone, so a revoked membership takes effect immediately.
///
/// # Example
///
/// ```no_run
/// use taskdeck_shared::auth::authorization::{require_membership, require_role};
/// use taskdeck_shared::models::membership::MembershipRole;
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// async fn check_permissions(
///     pool: &PgPool,
///     tenant_id: Uuid,
///     user_id: Uuid,
/// ) -> Result<(), Box<dyn std::error::Error>> {
///     // Any member can read
///     require_membership(pool, tenant_id, user_id).await?;
///
///     // Writes need Member or higher
///     require_role(pool, tenant_id, user_id, MembershipRole::Member).await?;
///     Ok(())
/// }
/// ```

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::membership::{Membership, MembershipRole};

/// Error type for authorization checks
#[derive(Debug, thiserror::Error)]
pub enum AuthzError {
    /// User is not a member of the tenant
    #[error("Not a member of organization {0}")]
    NotMember(Uuid),

    /// User doesn't have required role
    #[error("Insufficient permissions: requires {required:?}, has {actual:?}")]
    InsufficientRole {
        required: MembershipRole,
        actual: MembershipRole,
    },

    /// User doesn't have access to the resource
    #[error("Not authorized to access this resource")]
    NotAuthorized,

    /// Database error
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

/// Permission levels for organization resources
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourcePermission {
    /// Read permission (Viewer+)
    Read,

    /// Write permission (Member+)
    Write,

    /// Manage permission (Admin+)
    Manage,

    /// Owner permission (Owner only)
    Own,
}

impl ResourcePermission {
    /// Gets the minimum role required for this permission
    pub fn min_role(&self) -> MembershipRole {
        match self {
            ResourcePermission::Read => MembershipRole::Viewer,
            ResourcePermission::Write => MembershipRole::Member,
            ResourcePermission::Manage => MembershipRole::Admin,
            ResourcePermission::Own => MembershipRole::Owner,
        }
    }
}

/// Checks if a user is a member of a tenant
///
/// # Errors
///
/// Returns `AuthzError::NotMember` if the user is not a member
pub async fn require_membership(
    pool: &PgPool,
    tenant_id: Uuid,
    user_id: Uuid,
) -> Result<(), AuthzError> {
    let has_access = Membership::has_access(pool, tenant_id, user_id).await?;

    if !has_access {
        return Err(AuthzError::NotMember(tenant_id));
    }

    Ok(())
}

/// Checks if a user has a specific role (or higher) in a tenant
///
/// # Errors
///
/// Returns error if:
/// - User is not a member
/// - User's role is insufficient
pub async fn require_role(
    pool: &PgPool,
    tenant_id: Uuid,
    user_id: Uuid,
    required_role: MembershipRole,
) -> Result<(), AuthzError> {
    let user_role = Membership::get_role(pool, tenant_id, user_id)
        .await?
        .ok_or(AuthzError::NotMember(tenant_id))?;

    if !user_role.has_permission(&required_role) {
        return Err(AuthzError::InsufficientRole {
            required: required_role,
            actual: user_role,
        });
    }

    Ok(())
}

/// Checks if a user holds a permission level in a tenant
///
/// Convenience wrapper mapping [`ResourcePermission`] to the minimum
/// role it requires.
pub async fn require_permission(
    pool: &PgPool,
    tenant_id: Uuid,
    user_id: Uuid,
    permission: ResourcePermission,
) -> Result<(), AuthzError> {
    require_role(pool, tenant_id, user_id, permission.min_role()).await
}
