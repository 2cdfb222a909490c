//! Capability checks for role-gated operations.
//!
//! The core trusts that authentication already happened upstream; what arrives
//! here is a resolved [`Actor`] (user id plus role). Callers invoke the check
//! matching the operation before calling into [`crate::core`]: deciding
//! timesheets and reading the pending queue need a reviewer, everything on the
//! billing side needs an admin. The core operations themselves take the input
//! as already authorized.

use crate::entities::user::UserRole;
use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};

/// The acting user, as resolved by the upstream authentication layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// Id of the authenticated user
    pub user_id: i64,
    /// Role the user holds
    pub role: UserRole,
}

impl Actor {
    /// Creates an actor from an already-authenticated identity.
    #[must_use]
    pub const fn new(user_id: i64, role: UserRole) -> Self {
        Self { user_id, role }
    }

    /// Whether this actor holds the admin role.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, UserRole::Admin)
    }

    /// Whether this actor may review (approve/reject) timesheets.
    #[must_use]
    pub const fn can_review(&self) -> bool {
        matches!(self.role, UserRole::Admin | UserRole::Manager)
    }
}

/// Requires the admin role; gates every invoice operation.
pub fn ensure_admin(actor: &Actor) -> Result<()> {
    if actor.is_admin() {
        Ok(())
    } else {
        Err(Error::Forbidden {
            message: "administrator role required".to_string(),
        })
    }
}

/// Requires manager or admin; gates timesheet decisions and the pending queue.
pub fn ensure_reviewer(actor: &Actor) -> Result<()> {
    if actor.can_review() {
        Ok(())
    } else {
        Err(Error::Forbidden {
            message: "manager or administrator role required".to_string(),
        })
    }
}
