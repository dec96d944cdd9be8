/// Tenant model and database operations
///
/// This module provides the Tenant model for multi-tenant isolation.
/// A tenant is an organization; every user belongs to one or more
/// tenants via the Membership model, and all projects (and their tasks)
/// belong to exactly one tenant.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tenants (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL,
///     plan VARCHAR(50) NOT NULL DEFAULT 'free',
///     org_type VARCHAR(100),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     CONSTRAINT tenants_plan_check CHECK (
///         plan IN ('free', 'pro', 'enterprise')
///     )
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskdeck_shared::models::tenant::{Tenant, CreateTenant, TenantPlan};
/// use taskdeck_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let new_tenant = CreateTenant {
///     name: "Acme Corp".to_string(),
///     org_type: Some("startup".to_string()),
///     plan: TenantPlan::Free,
/// };
///
/// let tenant = Tenant::create(&pool, new_tenant).await?;
/// println!("Created organization: {}", tenant.id);
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Billing plan types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TenantPlan {
    /// Free plan (default for new organizations)
    #[serde(rename = "free")]
    Free,

    /// Professional plan
    #[serde(rename = "pro")]
    Pro,

    /// Enterprise plan (custom pricing, dedicated support)
    #[serde(rename = "enterprise")]
    Enterprise,
}

impl TenantPlan {
    /// Converts plan to string for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            TenantPlan::Free => "free",
            TenantPlan::Pro => "pro",
            TenantPlan::Enterprise => "enterprise",
        }
    }

    /// Parses plan from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "free" => Some(TenantPlan::Free),
            "pro" => Some(TenantPlan::Pro),
            "enterprise" => Some(TenantPlan::Enterprise),
            _ => None,
        }
    }
}

/// Tenant model representing an organization
///
/// Tenants are the top-level entity for multi-tenant isolation.
/// All resources (projects, tasks) belong to a tenant.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Tenant {
    /// Unique tenant ID (UUID v4)
    pub id: Uuid,

    /// Organization name
    pub name: String,

    /// Current billing plan
    pub plan: String,

    /// Organization category (e.g. "startup", "agency")
    #[serde(rename = "type")]
    pub org_type: Option<String>,

    /// When the organization was created
    pub created_at: DateTime<Utc>,

    /// When the organization was last updated
    pub updated_at: DateTime<Utc>,
}

impl Tenant {
    /// Gets the parsed plan enum
    pub fn get_plan(&self) -> Option<TenantPlan> {
        TenantPlan::from_str(&self.plan)
    }
}

/// Input for creating a new tenant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTenant {
    /// Organization name
    pub name: String,

    /// Organization category
    #[serde(rename = "type")]
    pub org_type: Option<String>,

    /// Initial billing plan (defaults to Free)
    #[serde(default = "default_plan")]
    pub plan: TenantPlan,
}

fn default_plan() -> TenantPlan {
    TenantPlan::Free
}

/// Input for updating an existing tenant
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTenant {
    /// New name
    pub name: Option<String>,

    /// New organization category
    #[serde(rename = "type")]
    pub org_type: Option<String>,

    /// New plan
    pub plan: Option<TenantPlan>,
}

impl Tenant {
    /// Creates a new tenant in the database
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn create<'e, E>(executor: E, data: CreateTenant) -> Result<Self, sqlx::Error>
    where
        E: sqlx::Executor<'e, Database = sqlx::Postgres>,
    {
        let tenant = sqlx::query_as::<_, Tenant>(
            r#"
            INSERT INTO tenants (name, org_type, plan)
            VALUES ($1, $2, $3)
            RETURNING id, name, plan, org_type, created_at, updated_at
            "#,
        )
        .bind(data.name)
        .bind(data.org_type)
        .bind(data.plan.as_str())
        .fetch_one(executor)
        .await?;

        Ok(tenant)
    }

    /// Finds a tenant by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let tenant = sqlx::query_as::<_, Tenant>(
            r#"
            SELECT id, name, plan, org_type, created_at, updated_at
            FROM tenants
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(tenant)
    }

    /// Lists all organizations a user is a member of
    ///
    /// Joins through memberships so the caller only sees organizations
    /// they actually belong to. Ordered by creation date (newest first).
    pub async fn list_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let tenants = sqlx::query_as::<_, Tenant>(
            r#"
            SELECT t.id, t.name, t.plan, t.org_type, t.created_at, t.updated_at
            FROM tenants t
            INNER JOIN memberships m ON m.tenant_id = t.id
            WHERE m.user_id = $1
            ORDER BY t.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(tenants)
    }

    /// Updates an existing tenant
    ///
    /// Only non-None fields in `data` will be updated.
    ///
    /// # Returns
    ///
    /// The updated tenant if found, None if the tenant doesn't exist
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateTenant,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE tenants SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.name.is_some() {
            bind_count += 1;
            query.push_str(&format!(", name = ${}", bind_count));
        }
        if data.org_type.is_some() {
            bind_count += 1;
            query.push_str(&format!(", org_type = ${}", bind_count));
        }
        if data.plan.is_some() {
            bind_count += 1;
            query.push_str(&format!(", plan = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, name, plan, org_type, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Tenant>(&query).bind(id);

        if let Some(name) = data.name {
            q = q.bind(name);
        }
        if let Some(org_type) = data.org_type {
            q = q.bind(org_type);
        }
        if let Some(plan) = data.plan {
            q = q.bind(plan.as_str());
        }

        let tenant = q.fetch_optional(pool).await?;

        Ok(tenant)
    }

    /// Deletes a tenant by ID
    ///
    /// ⚠️  **WARNING**: This cascades to all related data (memberships,
    /// projects, tasks). Use with extreme caution!
    ///
    /// # Returns
    ///
    /// True if the tenant was deleted, false if it didn't exist
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tenants WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
