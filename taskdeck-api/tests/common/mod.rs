/// Common test utilities for integration tests
///
/// This module provides shared infrastructure for integration tests:
/// - Test database setup and cleanup
/// - Test user/organization/membership creation
/// - JWT token generation
/// - API client helpers

use sqlx::PgPool;
use taskdeck_api::app::{build_router, AppState};
use taskdeck_api::config::Config;
use taskdeck_shared::auth::jwt::{create_token, Claims, TokenType};
use taskdeck_shared::models::membership::{CreateMembership, Membership, MembershipRole};
use taskdeck_shared::models::project::{CreateProject, Project};
use taskdeck_shared::models::tenant::{CreateTenant, Tenant, TenantPlan};
use taskdeck_shared::models::user::{CreateUser, User};
use uuid::Uuid;

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
    pub config: Config,
    pub tenant: Tenant,
    pub user: User,
    pub jwt_token: String,
}

impl TestContext {
    /// Creates a new test context with a fresh tenant, user and owner
    /// membership
    pub async fn new() -> anyhow::Result<Self> {
        // Load test configuration
        let config = Config::from_env()?;

        // Connect to database
        let db = PgPool::connect(&config.database.url).await?;

        // Run migrations (path relative to Cargo.toml, not this file)
        sqlx::migrate!("../migrations").run(&db).await?;

        // Create test organization
        let tenant = Tenant::create(
            &db,
            CreateTenant {
                name: format!("Test Org {}", Uuid::new_v4()),
                org_type: Some("startup".to_string()),
                plan: TenantPlan::Pro,
            },
        )
        .await?;

        // Create test user
        let user = User::create(
            &db,
            CreateUser {
                email: format!("test-{}@example.com", Uuid::new_v4()),
                password_hash: "test_hash".to_string(), // Not used in tests
                name: Some("Test User".to_string()),
            },
        )
        .await?;

        // Create membership
        Membership::create(
            &db,
            CreateMembership {
                tenant_id: tenant.id,
                user_id: user.id,
                role: MembershipRole::Owner,
            },
        )
        .await?;

        // Generate JWT token
        let claims = Claims::new(user.id, Some(tenant.id), TokenType::Access);
        let jwt_token = create_token(&claims, &config.jwt.secret)?;

        // Build app
        let state = AppState::new(db.clone(), config.clone());
        let app = build_router(state);

        Ok(TestContext {
            db,
            app,
            config,
            tenant,
            user,
            jwt_token,
        })
    }

    /// Returns authorization header value
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.jwt_token)
    }

    /// Creates a second user with the given role in this context's
    /// organization, returning the user and a matching access token
    pub async fn add_member(&self, role: MembershipRole) -> anyhow::Result<(User, String)> {
        let user = User::create(
            &self.db,
            CreateUser {
                email: format!("member-{}@example.com", Uuid::new_v4()),
                password_hash: "test_hash".to_string(),
                name: None,
            },
        )
        .await?;

        Membership::create(
            &self.db,
            CreateMembership {
                tenant_id: self.tenant.id,
                user_id: user.id,
                role,
            },
        )
        .await?;

        let claims = Claims::new(user.id, Some(self.tenant.id), TokenType::Access);
        let token = create_token(&claims, &self.config.jwt.secret)?;

        Ok((user, token))
    }

    /// Creates a user with no membership anywhere, returning an access
    /// token for testing isolation
    pub async fn add_outsider(&self) -> anyhow::Result<(User, String)> {
        let user = User::create(
            &self.db,
            CreateUser {
                email: format!("outsider-{}@example.com", Uuid::new_v4()),
                password_hash: "test_hash".to_string(),
                name: None,
            },
        )
        .await?;

        let claims = Claims::new(user.id, None, TokenType::Access);
        let token = create_token(&claims, &self.config.jwt.secret)?;

        Ok((user, token))
    }

    /// Cleans up test data
    pub async fn cleanup(&self) -> anyhow::Result<()> {
        // Delete test organization (cascades to memberships, projects, tasks)
        Tenant::delete(&self.db, self.tenant.id).await?;
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(self.user.id)
            .execute(&self.db)
            .await?;
        Ok(())
    }
}

/// Helper to create a test project in the context's organization
pub async fn create_test_project(ctx: &TestContext, title: &str) -> anyhow::Result<Project> {
    let project = Project::create(
        &ctx.db,
        CreateProject {
            tenant_id: ctx.tenant.id,
            title: title.to_string(),
            description: None,
            password_hash: None,
        },
    )
    .await?;

    Ok(project)
}
