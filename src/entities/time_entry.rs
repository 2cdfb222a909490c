//! Time entry entity - A block of hours worked on a single day.
//!
//! Entries live only inside a timesheet and are replaced wholesale when the
//! timesheet is edited. Billable entries must reference a project; the project
//! reference is cleared for non-billable work.

use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Kind of work a time entry records
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum TaskType {
    /// Client work charged through an invoice; requires a project
    #[sea_orm(string_value = "BILLABLE")]
    Billable,
    /// Internal project work that is not charged
    #[sea_orm(string_value = "NON_BILLABLE")]
    NonBillable,
    /// Meetings and coordination
    #[sea_orm(string_value = "MEETING")]
    Meeting,
    /// Training and professional development
    #[sea_orm(string_value = "TRAINING")]
    Training,
}

/// Time entry database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "time_entries")]
pub struct Model {
    /// Unique identifier for the time entry
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning timesheet
    pub timesheet_id: i64,
    /// Project the hours were worked on; required for billable entries
    pub project_id: Option<i64>,
    /// Day the work happened; must fall within the timesheet's week
    pub entry_date: Date,
    /// Hours worked, positive
    #[sea_orm(column_type = "Decimal(Some((6, 2)))")]
    pub hours: Decimal,
    /// Kind of work recorded
    pub task_type: TaskType,
    /// Free-form notes about the work
    pub notes: Option<String>,
}

/// Defines relationships between `TimeEntry` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each time entry belongs to one timesheet
    #[sea_orm(
        belongs_to = "super::timesheet::Entity",
        from = "Column::TimesheetId",
        to = "super::timesheet::Column::Id"
    )]
    Timesheet,
    /// Each time entry may reference one project
    #[sea_orm(
        belongs_to = "super::project::Entity",
        from = "Column::ProjectId",
        to = "super::project::Column::Id"
    )]
    Project,
}

impl Related<super::timesheet::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Timesheet.def()
    }
}

impl Related<super::project::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Project.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
