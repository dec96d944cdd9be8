/// Task model and database operations
///
/// Tasks are the core work items of the system. Each task belongs to a
/// project and carries a priority, a workflow status, and an optional
/// due date.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_priority AS ENUM ('high', 'medium', 'low');
/// CREATE TYPE task_status AS ENUM ('to-do', 'in-progress', 'done');
///
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     title VARCHAR(255) NOT NULL,
///     description TEXT,
///     priority task_priority NOT NULL DEFAULT 'medium',
///     status task_status NOT NULL DEFAULT 'to-do',
///     due_date DATE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskdeck_shared::models::task::{Task, CreateTask, TaskStatus, UpdateTask};
/// use taskdeck_shared::db::pool::{create_pool, DatabaseConfig};
/// use uuid::Uuid;
///
/// # async fn example(project_id: Uuid) -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let task = Task::create(&pool, CreateTask {
///     project_id,
///     title: "Write launch copy".to_string(),
///     description: None,
///     priority: None,
///     status: None,
///     due_date: None,
/// }).await?;
///
/// // Move it to in-progress
/// Task::update(&pool, task.id, UpdateTask {
///     status: Some(TaskStatus::InProgress),
///     ..Default::default()
/// }).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Task priority levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    /// Needs attention first
    High,

    /// Default priority for new tasks
    Medium,

    /// Can wait
    Low,
}

impl TaskPriority {
    /// Converts priority to string for display
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::High => "high",
            TaskPriority::Medium => "medium",
            TaskPriority::Low => "low",
        }
    }

    /// Parses priority from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "high" => Some(TaskPriority::High),
            "medium" => Some(TaskPriority::Medium),
            "low" => Some(TaskPriority::Low),
            _ => None,
        }
    }
}

/// Task workflow states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    /// Not started yet
    ToDo,

    /// Being worked on
    InProgress,

    /// Completed
    Done,
}

impl TaskStatus {
    /// Converts status to string for display
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::ToDo => "to-do",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Done => "done",
        }
    }

    /// Parses status from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "to-do" => Some(TaskStatus::ToDo),
            "in-progress" => Some(TaskStatus::InProgress),
            "done" => Some(TaskStatus::Done),
            _ => None,
        }
    }
}

/// Task model representing a single work item
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID (UUID v4)
    pub id: Uuid,

    /// Project this task belongs to
    pub project_id: Uuid,

    /// Task title
    pub title: String,

    /// Optional longer description
    pub description: Option<String>,

    /// Priority level
    pub priority: TaskPriority,

    /// Workflow status
    pub status: TaskStatus,

    /// Optional due date (calendar date, no time component)
    pub due_date: Option<NaiveDate>,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new task
///
/// Priority defaults to Medium and status to ToDo when omitted.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTask {
    /// Project ID
    #[serde(default)]
    pub project_id: Uuid,

    /// Task title
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Priority (defaults to Medium)
    pub priority: Option<TaskPriority>,

    /// Status (defaults to ToDo)
    pub status: Option<TaskStatus>,

    /// Optional due date
    pub due_date: Option<NaiveDate>,
}

/// Input for updating an existing task
///
/// Every field is optional so callers can patch a single column. The
/// due date is doubly optional: `Some(None)` clears it, while a missing
/// field leaves it untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTask {
    /// New title
    pub title: Option<String>,

    /// New description
    pub description: Option<String>,

    /// New priority
    pub priority: Option<TaskPriority>,

    /// New status
    pub status: Option<TaskStatus>,

    /// New due date; `Some(None)` clears the existing date
    #[serde(default, deserialize_with = "double_option")]
    pub due_date: Option<Option<NaiveDate>>,
}

/// Deserializes a field so that JSON `null` becomes `Some(None)` while
/// an absent field stays `None` (via `#[serde(default)]`).
fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(de).map(Some)
}

impl Task {
    /// Creates a new task in the database
    ///
    /// Omitted priority and status fall back to the column defaults
    /// (medium and to-do).
    ///
    /// # Errors
    ///
    /// Returns an error if the project doesn't exist (foreign key
    /// violation) or the database operation fails.
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (project_id, title, description, priority, status, due_date)
            VALUES ($1, $2, $3, COALESCE($4, 'medium'::task_priority), COALESCE($5, 'to-do'::task_status), $6)
            RETURNING id, project_id, title, description, priority, status, due_date,
                      created_at, updated_at
            "#,
        )
        .bind(data.project_id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.priority)
        .bind(data.status)
        .bind(data.due_date)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, project_id, title, description, priority, status, due_date,
                   created_at, updated_at
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID scoped to a project
    ///
    /// Used by the API to ensure a task ID from a request actually
    /// belongs to the project named in the path.
    pub async fn find_by_id_and_project(
        pool: &PgPool,
        id: Uuid,
        project_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, project_id, title, description, priority, status, due_date,
                   created_at, updated_at
            FROM tasks
            WHERE id = $1 AND project_id = $2
            "#,
        )
        .bind(id)
        .bind(project_id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Lists tasks in a project, newest first
    ///
    /// Optional status/priority filters narrow the result set at the
    /// query level; None means no filtering on that dimension.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: Uuid,
        status: Option<TaskStatus>,
        priority: Option<TaskPriority>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let mut query = String::from(
            "SELECT id, project_id, title, description, priority, status, due_date, \
             created_at, updated_at FROM tasks WHERE project_id = $1",
        );
        let mut bind_count = 1;

        if status.is_some() {
            bind_count += 1;
            query.push_str(&format!(" AND status = ${}", bind_count));
        }
        if priority.is_some() {
            bind_count += 1;
            query.push_str(&format!(" AND priority = ${}", bind_count));
        }

        query.push_str(" ORDER BY created_at DESC");

        let mut q = sqlx::query_as::<_, Task>(&query).bind(project_id);

        if let Some(status) = status {
            q = q.bind(status);
        }
        if let Some(priority) = priority {
            q = q.bind(priority);
        }

        let tasks = q.fetch_all(pool).await?;

        Ok(tasks)
    }

    /// Updates an existing task
    ///
    /// Only fields present in `data` are written. Always refreshes
    /// `updated_at`, so a status-only patch leaves title, description,
    /// priority, and due date untouched.
    ///
    /// # Returns
    ///
    /// The updated task if found, None if the task doesn't exist
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE tasks SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.title.is_some() {
            bind_count += 1;
            query.push_str(&format!(", title = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }
        if data.priority.is_some() {
            bind_count += 1;
            query.push_str(&format!(", priority = ${}", bind_count));
        }
        if data.status.is_some() {
            bind_count += 1;
            query.push_str(&format!(", status = ${}", bind_count));
        }
        if data.due_date.is_some() {
            bind_count += 1;
            // Binds NULL when the caller sends an explicit null
            query.push_str(&format!(", due_date = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, project_id, title, description, priority, status, \
             due_date, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Task>(&query).bind(id);

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(priority) = data.priority {
            q = q.bind(priority);
        }
        if let Some(status) = data.status {
            q = q.bind(status);
        }
        if let Some(due_date) = data.due_date {
            q = q.bind(due_date);
        }

        let task = q.fetch_optional(pool).await?;

        Ok(task)
    }

    /// Deletes a task by ID
    ///
    /// # Returns
    ///
    /// True if the task was deleted, false if it didn't exist
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_round_trip() {
        for p in [TaskPriority::High, TaskPriority::Medium, TaskPriority::Low] {
            assert_eq!(TaskPriority::from_str(p.as_str()), Some(p));
        }
        assert_eq!(TaskPriority::from_str("urgent"), None);
    }

    #[test]
    fn test_status_round_trip() {
        for s in [TaskStatus::ToDo, TaskStatus::InProgress, TaskStatus::Done] {
            assert_eq!(TaskStatus::from_str(s.as_str()), Some(s));
        }
        assert_eq!(TaskStatus::from_str("blocked"), None);
    }

    #[test]
    fn test_status_serde_kebab_case() {
        assert_eq!(
            serde_json::to_string(&TaskStatus::InProgress).unwrap(),
            "\"in-progress\""
        );
        let parsed: TaskStatus = serde_json::from_str("\"to-do\"").unwrap();
        assert_eq!(parsed, TaskStatus::ToDo);
    }

    #[test]
    fn test_update_task_missing_due_date_left_untouched() {
        let update: UpdateTask = serde_json::from_str(r#"{"status": "done"}"#).unwrap();
        assert_eq!(update.status, Some(TaskStatus::Done));
        assert!(update.due_date.is_none());
    }

    #[test]
    fn test_update_task_null_due_date_clears() {
        let update: UpdateTask = serde_json::from_str(r#"{"due_date": null}"#).unwrap();
        assert_eq!(update.due_date, Some(None));
    }

    #[test]
    fn test_update_task_set_due_date() {
        let update: UpdateTask = serde_json::from_str(r#"{"due_date": "2026-03-15"}"#).unwrap();
        let expected = NaiveDate::from_ymd_opt(2026, 3, 15).unwrap();
        assert_eq!(update.due_date, Some(Some(expected)));
    }

    // Integration tests for database operations are in taskdeck-api/tests
}
