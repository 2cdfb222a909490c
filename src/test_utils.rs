//! Shared test utilities for `Timewise`.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::{
        billing,
        client::{self, ClientInput},
        project::{self, ProjectInput},
        timesheet::{self, TimeEntryInput, TimesheetDetail},
        user::{self, UserInput},
    },
    entities::{self, ProjectStatus, TaskType, UserRole},
    errors::Result,
};
use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a test client with only the name filled in.
pub async fn create_test_client(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::client::Model> {
    client::create_client(
        db,
        ClientInput {
            name: name.to_string(),
            contact_person: None,
            contact_email: None,
            address: None,
        },
    )
    .await
}

/// Creates a test project under the given client.
///
/// # Defaults
/// * `default_billable_rate`: 50
/// * `status`: Active
/// * no employee assignments
pub async fn create_test_project(
    db: &DatabaseConnection,
    client_id: i64,
    name: &str,
) -> Result<entities::project::Model> {
    project::create_project(
        db,
        ProjectInput {
            name: name.to_string(),
            client_id,
            default_billable_rate: dec!(50),
            status: ProjectStatus::Active,
            employee_ids: None,
        },
    )
    .await
}

/// Creates a test admin user.
pub async fn create_test_admin(
    db: &DatabaseConnection,
    email: &str,
) -> Result<entities::user::Model> {
    user::create_user(
        db,
        UserInput {
            email: email.to_string(),
            first_name: "Test".to_string(),
            last_name: "Admin".to_string(),
            role: UserRole::Admin,
            manager_id: None,
            hire_date: None,
            department: None,
            job_title: None,
        },
    )
    .await
}

/// Creates a test manager user.
pub async fn create_test_manager(
    db: &DatabaseConnection,
    email: &str,
) -> Result<entities::user::Model> {
    user::create_user(
        db,
        UserInput {
            email: email.to_string(),
            first_name: "Test".to_string(),
            last_name: "Manager".to_string(),
            role: UserRole::Manager,
            manager_id: None,
            hire_date: None,
            department: None,
            job_title: None,
        },
    )
    .await
}

/// Creates a test employee reporting to the given manager.
pub async fn create_test_employee(
    db: &DatabaseConnection,
    email: &str,
    manager_id: i64,
) -> Result<entities::user::Model> {
    user::create_user(db, employee_input(email, Some(manager_id))).await
}

/// Builds an employee [`UserInput`] with sensible defaults.
pub fn employee_input(email: &str, manager_id: Option<i64>) -> UserInput {
    UserInput {
        email: email.to_string(),
        first_name: "Test".to_string(),
        last_name: "Employee".to_string(),
        role: UserRole::Employee,
        manager_id,
        hire_date: None,
        department: None,
        job_title: None,
    }
}

/// Builds a billable [`TimeEntryInput`] for the given project and day.
pub fn billable_entry(project_id: i64, entry_date: NaiveDate, hours: Decimal) -> TimeEntryInput {
    TimeEntryInput {
        project_id: Some(project_id),
        entry_date,
        hours,
        task_type: TaskType::Billable,
        notes: None,
    }
}

/// Builds a non-billable meeting [`TimeEntryInput`] for the given day.
pub fn meeting_entry(entry_date: NaiveDate, hours: Decimal) -> TimeEntryInput {
    TimeEntryInput {
        project_id: None,
        entry_date,
        hours,
        task_type: TaskType::Meeting,
        notes: None,
    }
}

/// Common fixture: one client with one project, one manager, one employee.
#[derive(Debug, Clone)]
pub struct ProjectFixture {
    /// The billed client
    pub client: entities::client::Model,
    /// An active project of the client, rate 50
    pub project: entities::project::Model,
    /// A manager who reviews timesheets
    pub manager: entities::user::Model,
    /// An employee reporting to the manager
    pub employee: entities::user::Model,
}

/// Sets up a complete test environment with client, project, manager, and
/// employee. Returns (db, fixture) for common workflow scenarios.
pub async fn setup_with_project() -> Result<(DatabaseConnection, ProjectFixture)> {
    let db = setup_test_db().await?;
    let client = create_test_client(&db, "Acme Corp").await?;
    let project = create_test_project(&db, client.id, "Website Revamp").await?;
    let manager = create_test_manager(&db, "boss@corp.test").await?;
    let employee = create_test_employee(&db, "dev@corp.test", manager.id).await?;
    Ok((
        db,
        ProjectFixture {
            client,
            project,
            manager,
            employee,
        },
    ))
}

/// Runs a week through the whole workflow: upsert, submit, approve.
/// Returns the approved timesheet aggregate.
pub async fn create_approved_timesheet(
    db: &DatabaseConnection,
    user_id: i64,
    week_start_date: NaiveDate,
    entries: Vec<TimeEntryInput>,
) -> Result<TimesheetDetail> {
    let detail = timesheet::upsert_timesheet(db, user_id, week_start_date, entries).await?;
    timesheet::submit_timesheet(db, detail.timesheet.id).await?;
    timesheet::decide_timesheet(db, detail.timesheet.id, true, None).await
}

/// Sets up a generated draft invoice worth 490: 5h at rate 50 plus 3h at
/// rate 80, both approved, billed over one week. Returns (db, invoice detail)
/// for payment and status tests.
pub async fn setup_with_invoice() -> Result<(DatabaseConnection, billing::InvoiceDetail)> {
    let (db, fixture) = setup_with_project().await?;

    let project_b = project::create_project(
        &db,
        ProjectInput {
            name: "Data Migration".to_string(),
            client_id: fixture.client.id,
            default_billable_rate: dec!(80),
            status: ProjectStatus::Active,
            employee_ids: None,
        },
    )
    .await?;

    let week_start = NaiveDate::from_ymd_opt(2024, 1, 7).expect("valid date");
    create_approved_timesheet(
        &db,
        fixture.employee.id,
        week_start,
        vec![
            billable_entry(fixture.project.id, week_start, dec!(5)),
            billable_entry(project_b.id, week_start + Days::new(1), dec!(3)),
        ],
    )
    .await?;

    let detail = billing::generate_invoice(
        &db,
        fixture.client.id,
        week_start,
        week_start + Days::new(6),
        NaiveDate::from_ymd_opt(2024, 2, 15).expect("valid date"),
    )
    .await?;

    Ok((db, detail))
}
