//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod client;
pub mod invoice;
pub mod invoice_line_item;
pub mod payment;
pub mod project;
pub mod project_assignment;
pub mod time_entry;
pub mod timesheet;
pub mod user;

// Re-export specific types to avoid conflicts
pub use client::{Column as ClientColumn, Entity as Client, Model as ClientModel};
pub use invoice::{
    Column as InvoiceColumn, Entity as Invoice, InvoiceStatus, Model as InvoiceModel,
};
pub use invoice_line_item::{
    Column as InvoiceLineItemColumn, Entity as InvoiceLineItem, Model as InvoiceLineItemModel,
};
pub use payment::{Column as PaymentColumn, Entity as Payment, Model as PaymentModel};
pub use project::{
    Column as ProjectColumn, Entity as Project, Model as ProjectModel, ProjectStatus,
};
pub use project_assignment::{
    Column as ProjectAssignmentColumn, Entity as ProjectAssignment,
    Model as ProjectAssignmentModel,
};
pub use time_entry::{
    Column as TimeEntryColumn, Entity as TimeEntry, Model as TimeEntryModel, TaskType,
};
pub use timesheet::{
    Column as TimesheetColumn, Entity as Timesheet, Model as TimesheetModel, TimesheetStatus,
};
pub use user::{Column as UserColumn, Entity as User, Model as UserModel, UserRole};
