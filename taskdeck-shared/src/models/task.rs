/// Task model and database operations
///
/// Tasks are the core entity of the system: a titled, dated unit of work
/// owned by exactly one user. Status moves freely among the three values;
/// the only specialized operation is `mark_completed`, which unconditionally
/// sets `completed` and is therefore idempotent.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('pending', 'in_progress', 'completed');
///
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     title VARCHAR(100) NOT NULL,
///     description VARCHAR(500) NOT NULL,
///     due_date DATE NOT NULL,
///     status task_status NOT NULL DEFAULT 'pending',
///     owner_id UUID NOT NULL REFERENCES users(id),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskdeck_shared::models::task::{CreateTask, Task, TaskStatus};
/// use chrono::NaiveDate;
/// # use sqlx::PgPool;
/// # use uuid::Uuid;
///
/// # async fn example(pool: PgPool, owner_id: Uuid) -> Result<(), sqlx::Error> {
/// let task = Task::create(&pool, CreateTask {
///     title: "Ship release".to_string(),
///     description: "Tag, build, publish".to_string(),
///     due_date: NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
///     status: TaskStatus::Pending,
///     owner_id,
/// }).await?;
///
/// let done = Task::mark_completed(&pool, task.id).await?;
/// assert_eq!(done.unwrap().status, TaskStatus::Completed);
/// # Ok(())
/// # }
/// ```
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Task status
///
/// A closed set of variants with explicit equality; never compared as
/// strings. Any value may move to any other value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Default state at creation
    Pending,

    /// Work has started
    InProgress,

    /// Work is done
    Completed,
}

impl TaskStatus {
    /// Converts status to string for logging and display
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
        }
    }
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::Pending
    }
}

/// Task model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID (UUID v4)
    pub id: Uuid,

    /// Short title
    pub title: String,

    /// Longer description of the work
    pub description: String,

    /// Calendar date the task is due
    pub due_date: NaiveDate,

    /// Current status
    pub status: TaskStatus,

    /// User who owns this task (required; never null)
    pub owner_id: Uuid,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new task
///
/// `owner_id` is always set by the server to the authenticated caller,
/// never taken from client input.
#[derive(Debug, Clone)]
pub struct CreateTask {
    pub title: String,
    pub description: String,
    pub due_date: NaiveDate,
    pub status: TaskStatus,
    pub owner_id: Uuid,
}

/// Input for updating an existing task
///
/// Title, description, and due date are replaced wholesale (a task update is
/// a full rewrite of the user-facing fields). Status is optional and keeps
/// the current value when absent. Owner reassignment is admin-only and
/// enforced by the policy engine before this ever runs.
#[derive(Debug, Clone)]
pub struct UpdateTask {
    pub title: String,
    pub description: String,
    pub due_date: NaiveDate,
    pub status: Option<TaskStatus>,
    pub owner_id: Option<Uuid>,
}

impl Task {
    /// Creates a new task in the database
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (title, description, due_date, status, owner_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, title, description, due_date, status, owner_id, created_at, updated_at
            "#,
        )
        .bind(data.title)
        .bind(data.description)
        .bind(data.due_date)
        .bind(data.status)
        .bind(data.owner_id)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, due_date, status, owner_id, created_at, updated_at
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Lists all tasks (admin visibility)
    ///
    /// Ordered by due date, soonest first.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, due_date, status, owner_id, created_at, updated_at
            FROM tasks
            ORDER BY due_date ASC, created_at ASC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Lists the tasks owned by one user
    pub async fn list_by_owner(pool: &PgPool, owner_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, due_date, status, owner_id, created_at, updated_at
            FROM tasks
            WHERE owner_id = $1
            ORDER BY due_date ASC, created_at ASC
            "#,
        )
        .bind(owner_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Updates an existing task
    ///
    /// When `status` is None the current status is kept; when `owner_id` is
    /// None the current owner is kept.
    ///
    /// # Returns
    ///
    /// The updated task if found, None if the task doesn't exist
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET title = $2,
                description = $3,
                due_date = $4,
                status = COALESCE($5, status),
                owner_id = COALESCE($6, owner_id),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, title, description, due_date, status, owner_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.due_date)
        .bind(data.status)
        .bind(data.owner_id)
        .fetch_optional(pool)
        .await?;

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

    /// Marks a task as completed
    ///
    /// Unconditionally sets status to `completed` regardless of the current
    /// state, so calling it twice is not an error.
    ///
    /// # Returns
    ///
    /// The updated task if found, None if the task doesn't exist
    pub async fn mark_completed(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET status = 'completed', updated_at = NOW()
            WHERE id = $1
            RETURNING id, title, description, due_date, status, owner_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }
}
