//! Timesheet entity - One employee's hours for one week.
//!
//! A timesheet is unique per (user, week start date) and owns its time entries
//! exclusively: deleting the timesheet deletes the entries. The status column
//! drives the workflow in [`crate::core::timesheet`]; only that module mutates
//! timesheets.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Workflow status of a timesheet.
///
/// Legal transitions are Draft/Rejected → Submitted → Approved or Rejected;
/// Approved is terminal. A rejected timesheet that gets edited stays Rejected
/// until it is explicitly re-submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum TimesheetStatus {
    /// Being edited by its owner; not yet visible to the approval queue
    #[sea_orm(string_value = "DRAFT")]
    Draft,
    /// Waiting for a manager decision; immutable to edits
    #[sea_orm(string_value = "SUBMITTED")]
    Submitted,
    /// Accepted; its billable entries become invoiceable. Terminal.
    #[sea_orm(string_value = "APPROVED")]
    Approved,
    /// Sent back with comments; editable and re-submittable
    #[sea_orm(string_value = "REJECTED")]
    Rejected,
}

/// Timesheet database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "timesheets")]
pub struct Model {
    /// Unique identifier for the timesheet
    #[sea_orm(primary_key)]
    pub id: i64,
    /// The user whose week this is
    pub user_id: i64,
    /// First day (Sunday) of the covered week
    pub week_start_date: Date,
    /// Current workflow status
    pub status: TimesheetStatus,
    /// When the timesheet was last submitted for review
    pub submitted_at: Option<DateTimeUtc>,
    /// When the timesheet was approved
    pub approved_at: Option<DateTimeUtc>,
    /// Manager feedback from the most recent rejection
    pub rejection_comments: Option<String>,
}

/// Defines relationships between Timesheet and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each timesheet belongs to one user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    /// One timesheet owns many time entries
    #[sea_orm(has_many = "super::time_entry::Entity")]
    TimeEntries,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::time_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TimeEntries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
