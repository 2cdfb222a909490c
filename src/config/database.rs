//! Database configuration module for `Timewise`.
//!
//! This module handles `SQLite` database connection and table creation using
//! `SeaORM`. It provides functions for establishing database connections and
//! creating all necessary tables based on the entity definitions. The module
//! uses `SeaORM`'s `Schema::create_table_from_entity` method to generate SQL
//! statements from the entity models, so the database schema always matches
//! the Rust struct definitions without manual SQL.

use crate::entities::{
    Client, Invoice, InvoiceLineItem, Payment, Project, ProjectAssignment, TimeEntry, Timesheet,
    User,
};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Gets the database URL from environment variable or returns default `SQLite` path.
///
/// This function looks for `DATABASE_URL` in the environment and falls back to
/// a default local `SQLite` file if not found.
pub fn get_database_url() -> Result<String> {
    Ok(std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite://data/timewise.sqlite".to_string()))
}

/// Establishes a connection to the `SQLite` database using the `DATABASE_URL`
/// environment variable.
///
/// Falls back to a default local `SQLite` file if no environment variable is
/// set.
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url()?;

    Database::connect(&database_url).await.map_err(Into::into)
}

/// Creates all necessary database tables using `SeaORM`'s schema generation
/// from entity definitions.
///
/// Creates tables for users, clients, projects, project assignments,
/// timesheets, time entries, invoices, invoice line items, and payments.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let user_table = schema.create_table_from_entity(User);
    let client_table = schema.create_table_from_entity(Client);
    let project_table = schema.create_table_from_entity(Project);
    let assignment_table = schema.create_table_from_entity(ProjectAssignment);
    let timesheet_table = schema.create_table_from_entity(Timesheet);
    let time_entry_table = schema.create_table_from_entity(TimeEntry);
    let invoice_table = schema.create_table_from_entity(Invoice);
    let line_item_table = schema.create_table_from_entity(InvoiceLineItem);
    let payment_table = schema.create_table_from_entity(Payment);

    db.execute(builder.build(&user_table)).await?;
    db.execute(builder.build(&client_table)).await?;
    db.execute(builder.build(&project_table)).await?;
    db.execute(builder.build(&assignment_table)).await?;
    db.execute(builder.build(&timesheet_table)).await?;
    db.execute(builder.build(&time_entry_table)).await?;
    db.execute(builder.build(&invoice_table)).await?;
    db.execute(builder.build(&line_item_table)).await?;
    db.execute(builder.build(&payment_table)).await?;

    Ok(())
}
