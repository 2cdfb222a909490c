//! Project business logic - Handles projects and their user assignments.
//!
//! Projects belong to a client and carry the default billable rate that the
//! billing engine snapshots at invoice time. Assignments control which
//! projects a non-admin user may log time against; the assignment set is
//! synchronized as a whole when a project is updated.

use crate::{
    entities::{
        Project, ProjectAssignment, User, project, project::ProjectStatus, project_assignment,
        user::UserRole,
    },
    errors::{Error, Result},
};
use rust_decimal::Decimal;
use sea_orm::{JoinType, QueryOrder, QuerySelect, Set, TransactionTrait, prelude::*};
use std::collections::HashSet;

/// Parameters for creating or replacing a project.
#[derive(Debug, Clone)]
pub struct ProjectInput {
    /// Project name, shown on invoice line items
    pub name: String,
    /// Owning client
    pub client_id: i64,
    /// Hourly rate applied to billable time at invoice generation
    pub default_billable_rate: Decimal,
    /// Whether the project is open for time logging
    pub status: ProjectStatus,
    /// Employees to assign; None leaves existing assignments untouched
    pub employee_ids: Option<Vec<i64>>,
}

/// Retrieves a project by its unique ID.
pub async fn get_project_by_id(
    db: &DatabaseConnection,
    project_id: i64,
) -> Result<Option<project::Model>> {
    Project::find_by_id(project_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves all projects of a client, ordered by name.
pub async fn get_projects_by_client(
    db: &DatabaseConnection,
    client_id: i64,
) -> Result<Vec<project::Model>> {
    Project::find()
        .filter(project::Column::ClientId.eq(client_id))
        .order_by_asc(project::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves the active projects a user may log time against.
///
/// Admins see every active project; everyone else sees only active projects
/// they are assigned to. A user without assignments gets an empty list until
/// an admin assigns them.
pub async fn get_active_projects_for_user(
    db: &DatabaseConnection,
    user_id: i64,
) -> Result<Vec<project::Model>> {
    let user = User::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or(Error::UserNotFound { id: user_id })?;

    if user.role == UserRole::Admin {
        return Project::find()
            .filter(project::Column::Status.eq(ProjectStatus::Active))
            .order_by_asc(project::Column::Name)
            .all(db)
            .await
            .map_err(Into::into);
    }

    Project::find()
        .join(JoinType::InnerJoin, project::Relation::Assignments.def())
        .filter(project_assignment::Column::UserId.eq(user_id))
        .filter(project::Column::Status.eq(ProjectStatus::Active))
        .order_by_asc(project::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Returns the ids of users currently assigned to a project.
pub async fn get_assigned_user_ids(db: &DatabaseConnection, project_id: i64) -> Result<Vec<i64>> {
    let assignments = ProjectAssignment::find()
        .filter(project_assignment::Column::ProjectId.eq(project_id))
        .order_by_asc(project_assignment::Column::UserId)
        .all(db)
        .await?;

    Ok(assignments.into_iter().map(|a| a.user_id).collect())
}

fn validate_input(input: &ProjectInput) -> Result<()> {
    if input.name.trim().is_empty() {
        return Err(Error::Validation {
            message: "Project name cannot be empty".to_string(),
        });
    }
    if input.default_billable_rate < Decimal::ZERO {
        return Err(Error::Validation {
            message: "Default billable rate cannot be negative".to_string(),
        });
    }
    Ok(())
}

/// Adds an assignment for each listed user that does not already have one.
async fn add_assignments<C>(db: &C, project_id: i64, employee_ids: &[i64]) -> Result<()>
where
    C: ConnectionTrait,
{
    for &employee_id in employee_ids {
        User::find_by_id(employee_id)
            .one(db)
            .await?
            .ok_or(Error::UserNotFound { id: employee_id })?;

        let exists = ProjectAssignment::find()
            .filter(project_assignment::Column::UserId.eq(employee_id))
            .filter(project_assignment::Column::ProjectId.eq(project_id))
            .one(db)
            .await?;
        if exists.is_none() {
            let assignment = project_assignment::ActiveModel {
                user_id: Set(employee_id),
                project_id: Set(project_id),
                ..Default::default()
            };
            assignment.insert(db).await?;
        }
    }
    Ok(())
}

/// Creates a new project under an existing client, optionally assigning
/// employees to it in the same unit of work.
pub async fn create_project(db: &DatabaseConnection, input: ProjectInput) -> Result<project::Model> {
    validate_input(&input)?;

    let txn = db.begin().await?;

    crate::entities::Client::find_by_id(input.client_id)
        .one(&txn)
        .await?
        .ok_or(Error::ClientNotFound {
            id: input.client_id,
        })?;

    let project = project::ActiveModel {
        name: Set(input.name.trim().to_string()),
        client_id: Set(input.client_id),
        default_billable_rate: Set(input.default_billable_rate),
        status: Set(input.status),
        ..Default::default()
    };
    let project = project.insert(&txn).await?;

    if let Some(employee_ids) = &input.employee_ids {
        add_assignments(&txn, project.id, employee_ids).await?;
    }

    txn.commit().await?;
    Ok(project)
}

/// Replaces a project's record and, when an employee list is given,
/// synchronizes the assignment set to exactly that list.
pub async fn update_project(
    db: &DatabaseConnection,
    project_id: i64,
    input: ProjectInput,
) -> Result<project::Model> {
    validate_input(&input)?;

    let txn = db.begin().await?;

    let project = Project::find_by_id(project_id)
        .one(&txn)
        .await?
        .ok_or(Error::ProjectNotFound { id: project_id })?;

    if project.client_id != input.client_id {
        crate::entities::Client::find_by_id(input.client_id)
            .one(&txn)
            .await?
            .ok_or(Error::ClientNotFound {
                id: input.client_id,
            })?;
    }

    let mut active_model: project::ActiveModel = project.into();
    active_model.name = Set(input.name.trim().to_string());
    active_model.client_id = Set(input.client_id);
    active_model.default_billable_rate = Set(input.default_billable_rate);
    active_model.status = Set(input.status);
    let project = active_model.update(&txn).await?;

    if let Some(employee_ids) = &input.employee_ids {
        let wanted: HashSet<i64> = employee_ids.iter().copied().collect();

        let current = ProjectAssignment::find()
            .filter(project_assignment::Column::ProjectId.eq(project.id))
            .all(&txn)
            .await?;

        for assignment in &current {
            if !wanted.contains(&assignment.user_id) {
                assignment.clone().delete(&txn).await?;
            }
        }

        let existing: HashSet<i64> = current.iter().map(|a| a.user_id).collect();
        let missing: Vec<i64> = employee_ids
            .iter()
            .copied()
            .filter(|id| !existing.contains(id))
            .collect();
        add_assignments(&txn, project.id, &missing).await?;
    }

    txn.commit().await?;
    Ok(project)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_create_project_validation() -> Result<()> {
        let db = setup_test_db().await?;
        let client = create_test_client(&db, "Acme Corp").await?;

        let result = create_project(
            &db,
            ProjectInput {
                name: String::new(),
                client_id: client.id,
                default_billable_rate: dec!(50),
                status: ProjectStatus::Active,
                employee_ids: None,
            },
        )
        .await;
        assert!(matches!(
            result.unwrap_err(),
            Error::Validation { message: _ }
        ));

        let result = create_project(
            &db,
            ProjectInput {
                name: "Negative Rate".to_string(),
                client_id: client.id,
                default_billable_rate: dec!(-1),
                status: ProjectStatus::Active,
                employee_ids: None,
            },
        )
        .await;
        assert!(matches!(
            result.unwrap_err(),
            Error::Validation { message: _ }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_project_unknown_client() -> Result<()> {
        let db = setup_test_db().await?;

        let result = create_project(
            &db,
            ProjectInput {
                name: "Orphan".to_string(),
                client_id: 123,
                default_billable_rate: dec!(50),
                status: ProjectStatus::Active,
                employee_ids: None,
            },
        )
        .await;
        assert!(matches!(
            result.unwrap_err(),
            Error::ClientNotFound { id: 123 }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_project_with_assignments() -> Result<()> {
        let db = setup_test_db().await?;
        let client = create_test_client(&db, "Acme Corp").await?;
        let manager = create_test_manager(&db, "boss@corp.test").await?;
        let dev = create_test_employee(&db, "dev@corp.test", manager.id).await?;

        let project = create_project(
            &db,
            ProjectInput {
                name: "Website Revamp".to_string(),
                client_id: client.id,
                default_billable_rate: dec!(75),
                status: ProjectStatus::Active,
                employee_ids: Some(vec![dev.id, dev.id]), // duplicate id must not double-assign
            },
        )
        .await?;

        assert_eq!(project.default_billable_rate, dec!(75));
        let assigned = get_assigned_user_ids(&db, project.id).await?;
        assert_eq!(assigned, vec![dev.id]);

        Ok(())
    }

    #[tokio::test]
    async fn test_create_project_unknown_employee() -> Result<()> {
        let db = setup_test_db().await?;
        let client = create_test_client(&db, "Acme Corp").await?;

        let result = create_project(
            &db,
            ProjectInput {
                name: "Website Revamp".to_string(),
                client_id: client.id,
                default_billable_rate: dec!(75),
                status: ProjectStatus::Active,
                employee_ids: Some(vec![404]),
            },
        )
        .await;
        assert!(matches!(result.unwrap_err(), Error::UserNotFound { id: 404 }));

        // The whole unit of work rolled back: no project row either
        assert!(get_projects_by_client(&db, client.id).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_update_project_syncs_assignments() -> Result<()> {
        let db = setup_test_db().await?;
        let client = create_test_client(&db, "Acme Corp").await?;
        let manager = create_test_manager(&db, "boss@corp.test").await?;
        let dev_a = create_test_employee(&db, "a@corp.test", manager.id).await?;
        let dev_b = create_test_employee(&db, "b@corp.test", manager.id).await?;

        let project = create_project(
            &db,
            ProjectInput {
                name: "Website Revamp".to_string(),
                client_id: client.id,
                default_billable_rate: dec!(75),
                status: ProjectStatus::Active,
                employee_ids: Some(vec![dev_a.id]),
            },
        )
        .await?;

        // Replace dev_a with dev_b
        update_project(
            &db,
            project.id,
            ProjectInput {
                name: "Website Revamp".to_string(),
                client_id: client.id,
                default_billable_rate: dec!(80),
                status: ProjectStatus::Active,
                employee_ids: Some(vec![dev_b.id]),
            },
        )
        .await?;

        let assigned = get_assigned_user_ids(&db, project.id).await?;
        assert_eq!(assigned, vec![dev_b.id]);

        let updated = get_project_by_id(&db, project.id).await?.unwrap();
        assert_eq!(updated.default_billable_rate, dec!(80));

        Ok(())
    }

    #[tokio::test]
    async fn test_update_project_leaves_assignments_when_none() -> Result<()> {
        let db = setup_test_db().await?;
        let client = create_test_client(&db, "Acme Corp").await?;
        let manager = create_test_manager(&db, "boss@corp.test").await?;
        let dev = create_test_employee(&db, "dev@corp.test", manager.id).await?;

        let project = create_project(
            &db,
            ProjectInput {
                name: "Website Revamp".to_string(),
                client_id: client.id,
                default_billable_rate: dec!(75),
                status: ProjectStatus::Active,
                employee_ids: Some(vec![dev.id]),
            },
        )
        .await?;

        update_project(
            &db,
            project.id,
            ProjectInput {
                name: "Website Revamp Phase 2".to_string(),
                client_id: client.id,
                default_billable_rate: dec!(75),
                status: ProjectStatus::Active,
                employee_ids: None,
            },
        )
        .await?;

        let assigned = get_assigned_user_ids(&db, project.id).await?;
        assert_eq!(assigned, vec![dev.id]);

        Ok(())
    }

    #[tokio::test]
    async fn test_active_projects_visibility() -> Result<()> {
        let db = setup_test_db().await?;
        let client = create_test_client(&db, "Acme Corp").await?;
        let admin = create_test_admin(&db, "root@corp.test").await?;
        let manager = create_test_manager(&db, "boss@corp.test").await?;
        let dev = create_test_employee(&db, "dev@corp.test", manager.id).await?;

        let assigned_project = create_project(
            &db,
            ProjectInput {
                name: "Assigned".to_string(),
                client_id: client.id,
                default_billable_rate: dec!(50),
                status: ProjectStatus::Active,
                employee_ids: Some(vec![dev.id]),
            },
        )
        .await?;
        create_project(
            &db,
            ProjectInput {
                name: "Unassigned".to_string(),
                client_id: client.id,
                default_billable_rate: dec!(50),
                status: ProjectStatus::Active,
                employee_ids: None,
            },
        )
        .await?;
        create_project(
            &db,
            ProjectInput {
                name: "Closed".to_string(),
                client_id: client.id,
                default_billable_rate: dec!(50),
                status: ProjectStatus::Inactive,
                employee_ids: Some(vec![dev.id]),
            },
        )
        .await?;

        // Admin sees every active project, but not the inactive one
        let admin_view = get_active_projects_for_user(&db, admin.id).await?;
        assert_eq!(admin_view.len(), 2);

        // The employee only sees the active project they are assigned to
        let dev_view = get_active_projects_for_user(&db, dev.id).await?;
        assert_eq!(dev_view.len(), 1);
        assert_eq!(dev_view[0].id, assigned_project.id);

        Ok(())
    }

    #[tokio::test]
    async fn test_active_projects_unknown_user() -> Result<()> {
        let db = setup_test_db().await?;

        let result = get_active_projects_for_user(&db, 55).await;
        assert!(matches!(result.unwrap_err(), Error::UserNotFound { id: 55 }));

        Ok(())
    }
}
