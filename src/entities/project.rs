//! Project entity - A client engagement that billable time is logged against.
//!
//! The `default_billable_rate` is snapshotted onto invoice line items at
//! generation time; changing it later never rewrites existing invoices.

use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum ProjectStatus {
    /// Open for time logging
    #[sea_orm(string_value = "ACTIVE")]
    Active,
    /// Closed; hidden from project pickers but kept for history
    #[sea_orm(string_value = "INACTIVE")]
    Inactive,
}

/// Project database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "projects")]
pub struct Model {
    /// Unique identifier for the project
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Project name, shown on invoice line items
    pub name: String,
    /// Client this project belongs to
    pub client_id: i64,
    /// Hourly rate applied when invoicing billable time on this project
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub default_billable_rate: Decimal,
    /// Whether the project is open for time logging
    pub status: ProjectStatus,
}

/// Defines relationships between Project and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each project belongs to one client
    #[sea_orm(
        belongs_to = "super::client::Entity",
        from = "Column::ClientId",
        to = "super::client::Column::Id"
    )]
    Client,
    /// One project accumulates many time entries
    #[sea_orm(has_many = "super::time_entry::Entity")]
    TimeEntries,
    /// One project has many user assignments
    #[sea_orm(has_many = "super::project_assignment::Entity")]
    Assignments,
}

impl Related<super::client::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Client.def()
    }
}

impl Related<super::time_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TimeEntries.def()
    }
}

impl Related<super::project_assignment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
