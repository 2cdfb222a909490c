//! User entity - Represents employees, managers, and administrators.
//!
//! Every user carries a role and an optional reference to the manager they
//! report to. Employees are required (at creation time) to have a manager;
//! deactivation is a soft flag so historical timesheets keep their author.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Role assigned to a user, stored as an uppercase string column
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum UserRole {
    /// Full administrative access, including billing
    #[sea_orm(string_value = "ADMIN")]
    Admin,
    /// Reviews and decides the timesheets of direct reports
    #[sea_orm(string_value = "MANAGER")]
    Manager,
    /// Files weekly timesheets
    #[sea_orm(string_value = "EMPLOYEE")]
    Employee,
}

/// User database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Unique identifier for the user
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Login/contact email, unique across all users
    #[sea_orm(unique)]
    pub email: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Role governing what the user may do
    pub role: UserRole,
    /// Manager this user reports to, if any
    pub manager_id: Option<i64>,
    /// Soft-deactivation flag; inactive users keep their history
    pub is_active: bool,
    /// Date the user joined the company
    pub hire_date: Option<Date>,
    /// Organizational department
    pub department: Option<String>,
    /// Job title for display purposes
    pub job_title: Option<String>,
}

/// Defines relationships between User and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One user files many weekly timesheets
    #[sea_orm(has_many = "super::timesheet::Entity")]
    Timesheets,
    /// One user can be assigned to many projects
    #[sea_orm(has_many = "super::project_assignment::Entity")]
    ProjectAssignments,
}

impl Related<super::timesheet::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Timesheets.def()
    }
}

impl Related<super::project_assignment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProjectAssignments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Display name used on invoice line items and reports.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
