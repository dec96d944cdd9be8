/// Project model and database operations
///
/// Projects group tasks within an organization. A project may carry an
/// optional access password, stored as an Argon2id hash. The plaintext
/// password is never persisted.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE projects (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     tenant_id UUID NOT NULL REFERENCES tenants(id) ON DELETE CASCADE,
///     title VARCHAR(255) NOT NULL,
///     description TEXT,
///     password_hash VARCHAR(255),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskdeck_shared::models::project::{Project, CreateProject};
/// use taskdeck_shared::db::pool::{create_pool, DatabaseConfig};
/// use uuid::Uuid;
///
/// # async fn example(tenant_id: Uuid) -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let project = Project::create(&pool, CreateProject {
///     tenant_id,
///     title: "Website Redesign".to_string(),
///     description: Some("Q3 marketing site refresh".to_string()),
///     password_hash: None,
/// }).await?;
///
/// let projects = Project::list_by_tenant(&pool, tenant_id).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Project model representing a collection of tasks
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    /// Unique project ID (UUID v4)
    pub id: Uuid,

    /// Organization this project belongs to
    pub tenant_id: Uuid,

    /// Project title
    pub title: String,

    /// Optional longer description
    pub description: Option<String>,

    /// Argon2id hash of the project access password, if one is set
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,

    /// When the project was created
    pub created_at: DateTime<Utc>,

    /// When the project was last updated
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Whether this project requires a password to unlock
    pub fn is_protected(&self) -> bool {
        self.password_hash.is_some()
    }
}

/// Input for creating a new project
#[derive(Debug, Clone)]
pub struct CreateProject {
    /// Organization ID
    pub tenant_id: Uuid,

    /// Project title
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Argon2id hash of the access password (NOT the plaintext)
    pub password_hash: Option<String>,
}

/// Input for updating an existing project
#[derive(Debug, Clone, Default)]
pub struct UpdateProject {
    /// New title
    pub title: Option<String>,

    /// New description
    pub description: Option<String>,

    /// New Argon2id password hash
    pub password_hash: Option<String>,
}

impl Project {
    /// Creates a new project in the database
    ///
    /// # Errors
    ///
    /// Returns an error if the tenant doesn't exist (foreign key violation)
    /// or the database operation fails.
    pub async fn create(pool: &PgPool, data: CreateProject) -> Result<Self, sqlx::Error> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (tenant_id, title, description, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING id, tenant_id, title, description, password_hash, created_at, updated_at
            "#,
        )
        .bind(data.tenant_id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.password_hash)
        .fetch_one(pool)
        .await?;

        Ok(project)
    }

    /// Finds a project by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, tenant_id, title, description, password_hash, created_at, updated_at
            FROM projects
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(project)
    }

    /// Lists all projects in an organization, newest first
    pub async fn list_by_tenant(pool: &PgPool, tenant_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let projects = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, tenant_id, title, description, password_hash, created_at, updated_at
            FROM projects
            WHERE tenant_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(tenant_id)
        .fetch_all(pool)
        .await?;

        Ok(projects)
    }

    /// Updates an existing project
    ///
    /// Only non-None fields in `data` will be updated.
    ///
    /// # Returns
    ///
    /// The updated project if found, None if the project doesn't exist
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateProject,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE projects SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.title.is_some() {
            bind_count += 1;
            query.push_str(&format!(", title = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }
        if data.password_hash.is_some() {
            bind_count += 1;
            query.push_str(&format!(", password_hash = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, tenant_id, title, description, password_hash, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Project>(&query).bind(id);

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(password_hash) = data.password_hash {
            q = q.bind(password_hash);
        }

        let project = q.fetch_optional(pool).await?;

        Ok(project)
    }

    /// Deletes a project by ID
    ///
    /// Cascades to all tasks in the project.
    ///
    /// # Returns
    ///
    /// True if the project was deleted, false if it didn't exist
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
