/// User management endpoints
///
/// # Endpoints
///
/// - `POST /v1/users` - Register a new account (public)
/// - `GET /v1/users` - List users (admin only)
/// - `GET /v1/users/:id` - Read a user (self or admin)
/// - `PUT /v1/users/:id` - Update a user (self or admin; role changes admin only)
/// - `DELETE /v1/users/:id` - Delete a user and their tasks (admin only)
///
/// Every decision goes through `auth::policy::authorize`; handlers resolve
/// the target first, so a missing user is a 404 regardless of the caller.
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use taskdeck_shared::{
    auth::{
        password,
        policy::{authorize, AuthContext, Operation},
    },
    models::user::{CreateUser, UpdateUser, User, UserRole},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
};

/// Distinguishes an absent field from an explicit `null`
///
/// Serde collapses both into `None` by default; wrapping the value in a
/// second `Option` keeps `null` (clear the field) apart from absent (leave
/// it alone).
fn nullable_field<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: serde::Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Enforces the password strength rules from the auth layer
///
/// The DTO length check only covers the minimum length; this adds the
/// character-class requirements before the password is ever hashed.
fn check_password_strength(password: &str) -> Result<(), ApiError> {
    password::validate_password_strength(password).map_err(|message| {
        ApiError::ValidationError(vec![ValidationErrorDetail {
            field: "password".to_string(),
            message,
        }])
    })
}

/// Registration request
///
/// There is deliberately no `role` field: new accounts always start as
/// regular users, and only an admin can promote them afterwards.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Login name
    #[validate(length(min = 3, max = 80, message = "Username must be 3-80 characters"))]
    pub username: String,

    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    /// Optional display name
    #[validate(length(max = 255, message = "Name must be at most 255 characters"))]
    pub name: Option<String>,
}

/// Update request
///
/// All fields optional; only provided fields change. A `role` field from a
/// non-admin caller fails the whole request with 403, even when every other
/// field would be permitted.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 3, max = 80, message = "Username must be 3-80 characters"))]
    pub username: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    /// New display name; an explicit `null` clears it, an absent field
    /// leaves it unchanged
    #[serde(default, deserialize_with = "nullable_field")]
    #[validate(length(max = 255, message = "Name must be at most 255 characters"))]
    pub name: Option<Option<String>>,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: Option<String>,

    pub role: Option<UserRole>,
}

/// Pagination query parameters
#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_limit")]
    pub limit: i64,

    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

/// Register a new user (public)
///
/// # Errors
///
/// - `409 Conflict`: Username or email already exists
/// - `422 Unprocessable Entity`: Validation failed
pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<User>)> {
    authorize(None, Operation::CreateUser)?;

    req.validate().map_err(ApiError::from_validation)?;
    check_password_strength(&req.password)?;

    let password_hash = password::hash_password(&req.password)?;

    let user = User::create(
        &state.db,
        CreateUser {
            username: req.username,
            email: req.email,
            name: req.name,
            password_hash,
            role: UserRole::User,
        },
    )
    .await?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok((StatusCode::CREATED, Json(user)))
}

/// List all users (admin only)
pub async fn list_users(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(page): Query<Pagination>,
) -> ApiResult<Json<Vec<User>>> {
    authorize(Some(&auth), Operation::ListUsers)?;

    let users = User::list(&state.db, page.limit, page.offset).await?;

    Ok(Json(users))
}

/// Read a single user (self or admin)
pub async fn get_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<User>> {
    let user = User::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    authorize(Some(&auth), Operation::ReadUser { target_id: user.id })?;

    Ok(Json(user))
}

/// Update a user (self or admin; role changes admin only)
pub async fn update_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateUserRequest>,
) -> ApiResult<Json<User>> {
    let target = User::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    authorize(
        Some(&auth),
        Operation::UpdateUser {
            target_id: target.id,
            changes_role: req.role.is_some(),
        },
    )?;

    req.validate().map_err(ApiError::from_validation)?;

    let password_hash = match req.password {
        Some(ref plaintext) => {
            check_password_strength(plaintext)?;
            Some(password::hash_password(plaintext)?)
        }
        None => None,
    };

    let updated = User::update(
        &state.db,
        target.id,
        UpdateUser {
            username: req.username,
            email: req.email,
            name: req.name,
            password_hash,
            role: req.role,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(updated))
}

/// Delete a user and every task they own (admin only)
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let target = User::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    authorize(Some(&auth), Operation::DeleteUser)?;

    User::delete(&state.db, target.id).await?;

    tracing::info!(user_id = %target.id, deleted_by = %auth.user_id, "User deleted");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_name_distinguishes_null_from_absent() {
        let absent: UpdateUserRequest = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(absent.name, None);

        let cleared: UpdateUserRequest = serde_json::from_str(r#"{"name": null}"#).unwrap();
        assert_eq!(cleared.name, Some(None));

        let set: UpdateUserRequest = serde_json::from_str(r#"{"name": "Jane Doe"}"#).unwrap();
        assert_eq!(set.name, Some(Some("Jane Doe".to_string())));
    }

    #[test]
    fn test_check_password_strength_maps_to_validation_error() {
        assert!(check_password_strength("MyP@ssw0rd!").is_ok());

        match check_password_strength("NoSpecial123") {
            Err(ApiError::ValidationError(details)) => {
                assert_eq!(details[0].field, "password");
            }
            other => panic!("Expected validation error, got {:?}", other),
        }
    }
}
