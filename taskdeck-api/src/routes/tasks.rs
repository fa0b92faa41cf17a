/// Task endpoints
///
/// # Endpoints
///
/// - `GET /v1/tasks` - List tasks (admin: all, user: own)
/// - `POST /v1/tasks` - Create a task, owned by the caller
/// - `GET /v1/tasks/:id` - Read a task (owner or admin)
/// - `PUT /v1/tasks/:id` - Update a task (owner or admin; reassignment admin only)
/// - `DELETE /v1/tasks/:id` - Delete a task (owner or admin)
/// - `PATCH /v1/tasks/:id/complete` - Mark completed (owner or admin, idempotent)
///
/// Handlers resolve the target task first (404 on a miss), then consult the
/// policy engine, then validate input, and only then touch storage. A
/// denied or invalid request never mutates anything.
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use taskdeck_shared::{
    auth::policy::{authorize, task_list_scope, AuthContext, Operation, TaskScope},
    models::{
        task::{CreateTask, Task, TaskStatus, UpdateTask},
        user::User,
    },
    validation::validate_task_write,
};
use uuid::Uuid;

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};

/// Task creation request
///
/// There is no owner field: the server always assigns the authenticated
/// caller as the owner, regardless of what the client might send.
#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,

    pub description: String,

    /// ISO-8601 calendar date, optionally with a time component
    pub due_date: String,

    /// Initial status (default: pending)
    pub status: Option<TaskStatus>,
}

/// Task update request
///
/// Title, description, and due date are replaced wholesale; status keeps
/// its current value when absent. `owner_id` reassigns the task and is
/// admin only.
#[derive(Debug, Deserialize)]
pub struct UpdateTaskRequest {
    pub title: String,

    pub description: String,

    /// ISO-8601 calendar date, optionally with a time component
    pub due_date: String,

    pub status: Option<TaskStatus>,

    /// New owner (admin only)
    pub owner_id: Option<Uuid>,
}

/// List tasks
///
/// Admins see every task; regular users see only their own. The scope
/// decision lives in the policy module, not here.
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Task>>> {
    authorize(Some(&auth), Operation::ListTasks)?;

    let tasks = match task_list_scope(&auth) {
        TaskScope::All => Task::list_all(&state.db).await?,
        TaskScope::Owned(owner_id) => Task::list_by_owner(&state.db, owner_id).await?,
    };

    Ok(Json(tasks))
}

/// Create a task owned by the caller
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Missing fields or unparseable due date
pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    authorize(Some(&auth), Operation::CreateTask)?;

    let due_date = validate_task_write(&req.title, &req.description, &req.due_date)?;

    let task = Task::create(
        &state.db,
        CreateTask {
            title: req.title,
            description: req.description,
            due_date,
            status: req.status.unwrap_or_default(),
            owner_id: auth.user_id,
        },
    )
    .await?;

    tracing::info!(task_id = %task.id, owner_id = %task.owner_id, "Task created");

    Ok((StatusCode::CREATED, Json(task)))
}

/// Read a single task (owner or admin)
pub async fn get_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Task>> {
    let task = Task::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    authorize(
        Some(&auth),
        Operation::ReadTask {
            owner_id: task.owner_id,
        },
    )?;

    Ok(Json(task))
}

/// Update a task (owner or admin; owner reassignment admin only)
///
/// # Errors
///
/// - `400 Bad Request`: New owner does not exist
/// - `403 Forbidden`: Caller is neither owner nor admin, or a non-admin
///   attempted a reassignment
/// - `404 Not Found`: Task does not exist
/// - `422 Unprocessable Entity`: Invalid fields
pub async fn update_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<Task>> {
    let task = Task::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    let reassigns_owner = req.owner_id.is_some_and(|owner| owner != task.owner_id);

    authorize(
        Some(&auth),
        Operation::UpdateTask {
            owner_id: task.owner_id,
            reassigns_owner,
        },
    )?;

    let due_date = validate_task_write(&req.title, &req.description, &req.due_date)?;

    // Every task must reference an existing owner at write time.
    if let Some(new_owner) = req.owner_id {
        if User::find_by_id(&state.db, new_owner).await?.is_none() {
            return Err(ApiError::BadRequest(
                "Target owner does not exist".to_string(),
            ));
        }
    }

    let updated = Task::update(
        &state.db,
        task.id,
        UpdateTask {
            title: req.title,
            description: req.description,
            due_date,
            status: req.status,
            owner_id: req.owner_id,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(updated))
}

/// Delete a task (owner or admin)
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let task = Task::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    authorize(
        Some(&auth),
        Operation::DeleteTask {
            owner_id: task.owner_id,
        },
    )?;

    Task::delete(&state.db, task.id).await?;

    tracing::info!(task_id = %task.id, deleted_by = %auth.user_id, "Task deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Mark a task as completed (owner or admin)
///
/// Idempotent: completing an already-completed task succeeds and leaves
/// the status at completed.
pub async fn complete_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Task>> {
    let task = Task::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    authorize(
        Some(&auth),
        Operation::CompleteTask {
            owner_id: task.owner_id,
        },
    )?;

    let completed = Task::mark_completed(&state.db, task.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(completed))
}
