/// Database models for TaskDeck
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `user`: User accounts and authentication
/// - `tenant`: Organizations for multi-tenancy
/// - `membership`: User-tenant relationships with roles
/// - `project`: Units of work under a tenant
/// - `task`: Atomic work items under a project
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
/// let tenant = Tenant::create(&pool, CreateTenant {
///     name: "Acme Corp".to_string(),
///     plan: TenantPlan::Free,
///     org_type: Some("startup".to_string()),
/// }).await?;
/// # Ok(())
/// # }
/// ```

pub mod membership;
pub mod project;
pub mod task;
pub mod tenant;
pub mod user;
