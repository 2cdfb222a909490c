//! User business logic - Handles the user directory.
//!
//! Provides functions for creating, updating, deactivating, and querying
//! users. The one real rule here is the reporting line: employees must always
//! have a manager, while managers and admins may or may not. Deactivation is
//! soft so a departed user's timesheets stay attributable.

use crate::{
    entities::{User, user, user::UserRole},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};

/// Parameters for creating or replacing a user record.
#[derive(Debug, Clone)]
pub struct UserInput {
    /// Login/contact email, unique across users
    pub email: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Role governing capabilities
    pub role: UserRole,
    /// Manager the user reports to; required for employees
    pub manager_id: Option<i64>,
    /// Date the user joined
    pub hire_date: Option<Date>,
    /// Organizational department
    pub department: Option<String>,
    /// Job title for display
    pub job_title: Option<String>,
}

/// Retrieves a user by its unique ID.
pub async fn get_user_by_id(db: &DatabaseConnection, user_id: i64) -> Result<Option<user::Model>> {
    User::find_by_id(user_id).one(db).await.map_err(Into::into)
}

/// Finds a user by email, returning None if no user has it.
pub async fn get_user_by_email(
    db: &DatabaseConnection,
    email: &str,
) -> Result<Option<user::Model>> {
    User::find()
        .filter(user::Column::Email.eq(email))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves the active direct reports of a manager, ordered by last name.
///
/// Used to build a manager's approval queue and team views; deactivated
/// users are excluded.
pub async fn get_direct_reports(
    db: &DatabaseConnection,
    manager_id: i64,
) -> Result<Vec<user::Model>> {
    User::find()
        .filter(user::Column::ManagerId.eq(manager_id))
        .filter(user::Column::IsActive.eq(true))
        .order_by_asc(user::Column::LastName)
        .order_by_asc(user::Column::FirstName)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Validates the reporting line for a role and returns the resolved manager id.
///
/// Employees must name a manager; for other roles the manager is optional.
/// Whenever a manager id is given, it must reference an existing user.
async fn resolve_manager<C>(db: &C, role: UserRole, manager_id: Option<i64>) -> Result<Option<i64>>
where
    C: ConnectionTrait,
{
    if role == UserRole::Employee && manager_id.is_none() {
        return Err(Error::Validation {
            message: "Manager is required for employees".to_string(),
        });
    }

    if let Some(id) = manager_id {
        User::find_by_id(id)
            .one(db)
            .await?
            .ok_or(Error::UserNotFound { id })?;
    }

    Ok(manager_id)
}

/// Creates a new user, enforcing email uniqueness and the reporting-line rule.
pub async fn create_user(db: &DatabaseConnection, input: UserInput) -> Result<user::Model> {
    if input.email.trim().is_empty() {
        return Err(Error::Validation {
            message: "Email cannot be empty".to_string(),
        });
    }

    let txn = db.begin().await?;

    let existing = User::find()
        .filter(user::Column::Email.eq(input.email.trim()))
        .one(&txn)
        .await?;
    if existing.is_some() {
        return Err(Error::Validation {
            message: "User with this email already exists".to_string(),
        });
    }

    let manager_id = resolve_manager(&txn, input.role, input.manager_id).await?;

    let user = user::ActiveModel {
        email: Set(input.email.trim().to_string()),
        first_name: Set(input.first_name),
        last_name: Set(input.last_name),
        role: Set(input.role),
        manager_id: Set(manager_id),
        is_active: Set(true),
        hire_date: Set(input.hire_date),
        department: Set(input.department),
        job_title: Set(input.job_title),
        ..Default::default()
    };

    let user = user.insert(&txn).await?;
    txn.commit().await?;

    Ok(user)
}

/// Replaces a user's record, re-checking email uniqueness and the
/// reporting-line rule.
///
/// A non-employee whose input names no manager gets the manager cleared.
pub async fn update_user(
    db: &DatabaseConnection,
    user_id: i64,
    input: UserInput,
) -> Result<user::Model> {
    let txn = db.begin().await?;

    let user = User::find_by_id(user_id)
        .one(&txn)
        .await?
        .ok_or(Error::UserNotFound { id: user_id })?;

    if user.email != input.email.trim() {
        let taken = User::find()
            .filter(user::Column::Email.eq(input.email.trim()))
            .one(&txn)
            .await?;
        if taken.is_some() {
            return Err(Error::Validation {
                message: "User with this email already exists".to_string(),
            });
        }
    }

    let manager_id = resolve_manager(&txn, input.role, input.manager_id).await?;

    let mut active_model: user::ActiveModel = user.into();
    active_model.email = Set(input.email.trim().to_string());
    active_model.first_name = Set(input.first_name);
    active_model.last_name = Set(input.last_name);
    active_model.role = Set(input.role);
    active_model.manager_id = Set(manager_id);
    active_model.hire_date = Set(input.hire_date);
    active_model.department = Set(input.department);
    active_model.job_title = Set(input.job_title);

    let user = active_model.update(&txn).await?;
    txn.commit().await?;

    Ok(user)
}

/// Soft-deactivates a user, keeping their history intact.
pub async fn deactivate_user(db: &DatabaseConnection, user_id: i64) -> Result<user::Model> {
    let user = User::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or(Error::UserNotFound { id: user_id })?;

    let mut active_model: user::ActiveModel = user.into();
    active_model.is_active = Set(false);
    active_model.update(db).await.map_err(Into::into)
}
