/// Centralized authorization policy
///
/// Every route decision funnels through one rule table here instead of
/// ad-hoc `is_admin()` checks scattered across handlers. A decision is a
/// pure function of the caller (identity + role) and the attempted
/// operation, which carries whatever snapshot of the target the rule needs
/// (owner ID, target user ID, whether a restricted field is touched).
///
/// # Rule table
///
/// | Operation | Rule |
/// |---|---|
/// | list tasks | any authenticated caller; admins see all, users see their own |
/// | read/update/delete/complete task | owner or admin |
/// | create task | any authenticated caller; owner is always the caller |
/// | update task, reassigning owner | admin only |
/// | list users, delete user | admin only |
/// | read/update user | self or admin |
/// | update user, changing role | admin only, even for self |
/// | create user | open (registration) |
///
/// # Outcomes
///
/// `Unauthorized` means no valid identity was presented (HTTP 401);
/// `Forbidden` means the identity is valid but the rule table denies the
/// operation (HTTP 403). Existence of the target is checked by the caller
/// *before* authorization, so a missing target is a plain not-found.
///
/// # Example
///
/// ```
/// use taskdeck_shared::auth::policy::{authorize, AuthContext, Operation};
/// use taskdeck_shared::models::user::UserRole;
/// use uuid::Uuid;
///
/// let caller = AuthContext::new(Uuid::new_v4(), UserRole::User);
///
/// // A user may read their own task...
/// assert!(authorize(
///     Some(&caller),
///     Operation::ReadTask { owner_id: caller.user_id },
/// )
/// .is_ok());
///
/// // ...but not someone else's.
/// assert!(authorize(
///     Some(&caller),
///     Operation::ReadTask { owner_id: Uuid::new_v4() },
/// )
/// .is_err());
/// ```
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::user::UserRole;

/// Verified caller identity attached to a request after authentication
///
/// Produced by the JWT middleware, which re-reads the user row so the role
/// here is current, not the role at token-issue time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user ID
    pub user_id: Uuid,

    /// Current role of the authenticated user
    pub role: UserRole,
}

impl AuthContext {
    pub fn new(user_id: Uuid, role: UserRole) -> Self {
        Self { user_id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// An attempted operation, carrying the target snapshot the rules need
///
/// Variants addressing an existing resource embed the fact the rule turns
/// on (the task's owner, the target user's ID) rather than the whole row,
/// keeping decisions pure and trivially testable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// List tasks (visibility is scoped separately, see [`task_list_scope`])
    ListTasks,

    /// Read a single task
    ReadTask { owner_id: Uuid },

    /// Create a task; the server assigns the caller as owner
    CreateTask,

    /// Update a task; `reassigns_owner` is true when the request would move
    /// the task to a different owner
    UpdateTask { owner_id: Uuid, reassigns_owner: bool },

    /// Delete a task
    DeleteTask { owner_id: Uuid },

    /// Mark a task completed
    CompleteTask { owner_id: Uuid },

    /// List all users
    ListUsers,

    /// Read a user record
    ReadUser { target_id: Uuid },

    /// Create a user (registration)
    CreateUser,

    /// Update a user record; `changes_role` is true when the request
    /// includes a role field
    UpdateUser { target_id: Uuid, changes_role: bool },

    /// Delete a user (and, by cascade, their tasks)
    DeleteUser,
}

/// Denial outcome of an authorization decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PolicyError {
    /// No valid identity was presented
    #[error("Authentication required")]
    Unauthorized,

    /// Identity is valid but the operation is not allowed
    #[error("Not authorized to perform this operation")]
    Forbidden,
}

/// Visibility scope for listing tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskScope {
    /// All tasks (admin)
    All,

    /// Only tasks owned by the given user
    Owned(Uuid),
}

/// Decides whether `caller` may perform `op`
///
/// Pure and synchronous: no storage access, no internal state. Callers are
/// expected to have resolved the target resource already (missing targets
/// are a not-found, decided before this function runs).
pub fn authorize(caller: Option<&AuthContext>, op: Operation) -> Result<(), PolicyError> {
    // Registration is the one operation open to unauthenticated callers.
    if op == Operation::CreateUser {
        return Ok(());
    }

    let caller = caller.ok_or(PolicyError::Unauthorized)?;

    // A non-admin touching a role field is denied outright, even on their
    // own record and even if every other field in the request is permitted.
    if let Operation::UpdateUser { changes_role: true, .. } = op {
        if !caller.is_admin() {
            deny(caller, &op);
            return Err(PolicyError::Forbidden);
        }
    }

    if caller.is_admin() {
        return Ok(());
    }

    let allowed = match op {
        Operation::ListTasks | Operation::CreateTask => true,

        Operation::ReadTask { owner_id }
        | Operation::DeleteTask { owner_id }
        | Operation::CompleteTask { owner_id } => owner_id == caller.user_id,

        // Owners may update their own task, but only an admin may move it
        // to a different owner.
        Operation::UpdateTask {
            owner_id,
            reassigns_owner,
        } => owner_id == caller.user_id && !reassigns_owner,

        Operation::ReadUser { target_id }
        | Operation::UpdateUser { target_id, .. } => target_id == caller.user_id,

        Operation::ListUsers | Operation::DeleteUser => false,

        // Handled above.
        Operation::CreateUser => true,
    };

    if allowed {
        Ok(())
    } else {
        deny(caller, &op);
        Err(PolicyError::Forbidden)
    }
}

/// Returns the task-list visibility scope for a caller
///
/// Admins see every task; regular users see only their own.
pub fn task_list_scope(caller: &AuthContext) -> TaskScope {
    if caller.is_admin() {
        TaskScope::All
    } else {
        TaskScope::Owned(caller.user_id)
    }
}

fn deny(caller: &AuthContext, op: &Operation) {
    tracing::debug!(
        user_id = %caller.user_id,
        role = caller.role.as_str(),
        operation = ?op,
        "Operation denied by policy"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> AuthContext {
        AuthContext::new(Uuid::new_v4(), UserRole::User)
    }

    fn admin() -> AuthContext {
        AuthContext::new(Uuid::new_v4(), UserRole::Admin)
    }

    #[test]
    fn test_unauthenticated_is_unauthorized() {
        for op in [
            Operation::ListTasks,
            Operation::CreateTask,
            Operation::ReadTask {
                owner_id: Uuid::new_v4(),
            },
            Operation::ListUsers,
            Operation::DeleteUser,
        ] {
            assert_eq!(authorize(None, op), Err(PolicyError::Unauthorized));
        }
    }

    #[test]
    fn test_registration_is_open() {
        assert!(authorize(None, Operation::CreateUser).is_ok());
        assert!(authorize(Some(&user()), Operation::CreateUser).is_ok());
    }

    #[test]
    fn test_owner_may_access_own_task() {
        let caller = user();

        for op in [
            Operation::ReadTask {
                owner_id: caller.user_id,
            },
            Operation::UpdateTask {
                owner_id: caller.user_id,
                reassigns_owner: false,
            },
            Operation::DeleteTask {
                owner_id: caller.user_id,
            },
            Operation::CompleteTask {
                owner_id: caller.user_id,
            },
        ] {
            assert!(authorize(Some(&caller), op).is_ok(), "op {:?}", op);
        }
    }

    #[test]
    fn test_other_user_is_forbidden() {
        let caller = user();
        let other_owner = Uuid::new_v4();

        for op in [
            Operation::ReadTask {
                owner_id: other_owner,
            },
            Operation::UpdateTask {
                owner_id: other_owner,
                reassigns_owner: false,
            },
            Operation::DeleteTask {
                owner_id: other_owner,
            },
            Operation::CompleteTask {
                owner_id: other_owner,
            },
        ] {
            assert_eq!(
                authorize(Some(&caller), op),
                Err(PolicyError::Forbidden),
                "op {:?}",
                op
            );
        }
    }

    #[test]
    fn test_admin_may_do_everything() {
        let caller = admin();
        let target = Uuid::new_v4();

        for op in [
            Operation::ListTasks,
            Operation::ReadTask { owner_id: target },
            Operation::CreateTask,
            Operation::UpdateTask {
                owner_id: target,
                reassigns_owner: true,
            },
            Operation::DeleteTask { owner_id: target },
            Operation::CompleteTask { owner_id: target },
            Operation::ListUsers,
            Operation::ReadUser { target_id: target },
            Operation::CreateUser,
            Operation::UpdateUser {
                target_id: target,
                changes_role: true,
            },
            Operation::DeleteUser,
        ] {
            assert!(authorize(Some(&caller), op).is_ok(), "op {:?}", op);
        }
    }

    #[test]
    fn test_owner_cannot_reassign_task() {
        let caller = user();

        assert_eq!(
            authorize(
                Some(&caller),
                Operation::UpdateTask {
                    owner_id: caller.user_id,
                    reassigns_owner: true,
                },
            ),
            Err(PolicyError::Forbidden)
        );
    }

    #[test]
    fn test_user_management_is_admin_only() {
        let caller = user();

        assert_eq!(
            authorize(Some(&caller), Operation::ListUsers),
            Err(PolicyError::Forbidden)
        );
        assert_eq!(
            authorize(Some(&caller), Operation::DeleteUser),
            Err(PolicyError::Forbidden)
        );
    }

    #[test]
    fn test_self_profile_access() {
        let caller = user();

        assert!(authorize(
            Some(&caller),
            Operation::ReadUser {
                target_id: caller.user_id,
            },
        )
        .is_ok());
        assert!(authorize(
            Some(&caller),
            Operation::UpdateUser {
                target_id: caller.user_id,
                changes_role: false,
            },
        )
        .is_ok());

        let other = Uuid::new_v4();
        assert_eq!(
            authorize(Some(&caller), Operation::ReadUser { target_id: other }),
            Err(PolicyError::Forbidden)
        );
        assert_eq!(
            authorize(
                Some(&caller),
                Operation::UpdateUser {
                    target_id: other,
                    changes_role: false,
                },
            ),
            Err(PolicyError::Forbidden)
        );
    }

    #[test]
    fn test_role_change_forbidden_even_for_self() {
        // The request may contain otherwise-valid field changes; a role
        // field from a non-admin still sinks the whole request.
        let caller = user();

        assert_eq!(
            authorize(
                Some(&caller),
                Operation::UpdateUser {
                    target_id: caller.user_id,
                    changes_role: true,
                },
            ),
            Err(PolicyError::Forbidden)
        );
    }

    #[test]
    fn test_task_list_scope() {
        let u = user();
        let a = admin();

        assert_eq!(task_list_scope(&u), TaskScope::Owned(u.user_id));
        assert_eq!(task_list_scope(&a), TaskScope::All);
    }
}
