/// Membership model and database operations
///
/// This module provides the Membership model for user-tenant relationships with RBAC.
/// It implements a many-to-many relationship between users and tenants with role-based access control.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE membership_role AS ENUM ('owner', 'admin', 'member', 'viewer');
///
/// CREATE TABLE memberships (
///     tenant_id UUID NOT NULL REFERENCES tenants(id) ON DELETE CASCADE,
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     role membership_role NOT NULL DEFAULT 'member',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     PRIMARY KEY (tenant_id, user_id)
/// );
/// ```
///
/// # Roles
///
/// - **owner**: Full control, delete organization
/// - **admin**: Manage members, projects, and tasks
/// - **member**: Create and manage projects and tasks
/// - **viewer**: Read-only access

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// RBAC roles for tenant memberships
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "membership_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MembershipRole {
    /// Full control: delete organization, manage all members
    Owner,

    /// Can manage members, projects, and all tasks
    Admin,

    /// Can create and manage projects and tasks
    Member,

    /// Read-only access to projects and tasks
    Viewer,
}

impl MembershipRole {
    /// Converts role to string for display
    pub fn as_str(&self) -> &'static str {
        match self {
            MembershipRole::Owner => "owner",
            MembershipRole::Admin => "admin",
            MembershipRole::Member => "member",
            MembershipRole::Viewer => "viewer",
        }
    }

    /// Can manage members (add, remove, change roles)
    pub fn can_manage_members(&self) -> bool {
        matches!(self, MembershipRole::Owner | MembershipRole::Admin)
    }

    /// Can delete the organization
    pub fn can_delete_tenant(&self) -> bool {
        matches!(self, MembershipRole::Owner)
    }

    /// Can create and modify projects and tasks
    pub fn can_write(&self) -> bool {
        !matches!(self, MembershipRole::Viewer)
    }

    /// Checks if this role has permission level of the required role
    ///
    /// Hierarchy: Owner > Admin > Member > Viewer
    pub fn has_permission(&self, required: &MembershipRole) -> bool {
        self.permission_level() >= required.permission_level()
    }

    /// Returns numeric permission level for comparison
    fn permission_level(&self) -> u8 {
        match self {
            MembershipRole::Owner => 4,
            MembershipRole::Admin => 3,
            MembershipRole::Member => 2,
            MembershipRole::Viewer => 1,
        }
    }
}

/// Membership model representing user-tenant relationship with role
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Membership {
    /// Tenant ID
    pub tenant_id: Uuid,

    /// User ID
    pub user_id: Uuid,

    /// Role within the tenant
    pub role: MembershipRole,

    /// When the membership was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new membership
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMembership {
    /// Tenant ID
    pub tenant_id: Uuid,

    /// User ID
    pub user_id: Uuid,

    /// Role to assign (defaults to Member)
    #[serde(default = "default_role")]
    pub role: MembershipRole,
}

fn default_role() -> MembershipRole {
    MembershipRole::Member
}

impl Membership {
    /// Creates a new membership (adds user to tenant)
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Membership already exists (unique constraint violation)
    /// - Tenant or user doesn't exist (foreign key violation)
    /// - Database connection fails
    pub async fn create<'e, E>(executor: E, data: CreateMembership) -> Result<Self, sqlx::Error>
    where
        E: sqlx::Executor<'e, Database = sqlx::Postgres>,
    {
        let membership = sqlx::query_as::<_, Membership>(
            r#"
            INSERT INTO memberships (tenant_id, user_id, role)
            VALUES ($1, $2, $3)
            RETURNING tenant_id, user_id, role, created_at
            "#,
        )
        .bind(data.tenant_id)
        .bind(data.user_id)
        .bind(data.role)
        .fetch_one(executor)
        .await?;

        Ok(membership)
    }

    /// Finds a specific membership by tenant and user
    pub async fn find(
        pool: &PgPool,
        tenant_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let membership = sqlx::query_as::<_, Membership>(
            r#"
            SELECT tenant_id, user_id, role, created_at
            FROM memberships
            WHERE tenant_id = $1 AND user_id = $2
            "#,
        )
        .bind(tenant_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(membership)
    }

    /// Checks if a user has access to a tenant (any role)
    pub async fn has_access(
        pool: &PgPool,
        tenant_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM memberships
                WHERE tenant_id = $1 AND user_id = $2
            )
            "#,
        )
        .bind(tenant_id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(exists)
    }

    /// Gets a user's role in a tenant
    ///
    /// # Returns
    ///
    /// The user's role if they are a member, None otherwise
    pub async fn get_role(
        pool: &PgPool,
        tenant_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<MembershipRole>, sqlx::Error> {
        let role: Option<MembershipRole> = sqlx::query_scalar(
            r#"
            SELECT role FROM memberships
            WHERE tenant_id = $1 AND user_id = $2
            "#,
        )
        .bind(tenant_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(role)
    }

    /// Lists all tenants a user belongs to
    pub async fn list_by_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let memberships = sqlx::query_as::<_, Membership>(
            r#"
            SELECT tenant_id, user_id, role, created_at
            FROM memberships
            WHERE user_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(memberships)
    }

    /// Deletes a membership (removes user from tenant)
    ///
    /// # Returns
    ///
    /// True if the membership was deleted, false if it didn't exist
    pub async fn delete(pool: &PgPool, tenant_id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM memberships WHERE tenant_id = $1 AND user_id = $2"
        )
        .bind(tenant_id)
        .bind(user_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_membership_role_as_str() {
        assert_eq!(MembershipRole::Owner.as_str(), "owner");
        assert_eq!(MembershipRole::Admin.as_str(), "admin");
        assert_eq!(MembershipRole::Member.as_str(), "member");
        assert_eq!(MembershipRole::Viewer.as_str(), "viewer");
    }

    #[test]
    fn test_role_permissions() {
        assert!(MembershipRole::Owner.can_manage_members());
        assert!(MembershipRole::Owner.can_delete_tenant());
        assert!(MembershipRole::Owner.can_write());

        assert!(MembershipRole::Admin.can_manage_members());
        assert!(!MembershipRole::Admin.can_delete_tenant());
        assert!(MembershipRole::Admin.can_write());

        assert!(!MembershipRole::Member.can_manage_members());
        assert!(!MembershipRole::Member.can_delete_tenant());
        assert!(MembershipRole::Member.can_write());

        assert!(!MembershipRole::Viewer.can_manage_members());
        assert!(!MembershipRole::Viewer.can_delete_tenant());
        assert!(!MembershipRole::Viewer.can_write());
    }

    #[test]
    fn test_role_hierarchy() {
        assert!(MembershipRole::Owner.has_permission(&MembershipRole::Admin));
        assert!(MembershipRole::Admin.has_permission(&MembershipRole::Member));
        assert!(MembershipRole::Member.has_permission(&MembershipRole::Member));
        assert!(!MembershipRole::Viewer.has_permission(&MembershipRole::Member));
        assert!(!MembershipRole::Member.has_permission(&MembershipRole::Admin));
    }

    #[test]
    fn test_create_membership_default_role() {
        assert_eq!(default_role(), MembershipRole::Member);
    }

    // Integration tests for database operations are in taskdeck-api/tests
}
