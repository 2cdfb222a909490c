//! Core business logic - framework-agnostic operations over the entities.
//!
//! Each submodule owns one subsystem and is the only place that mutates its
//! aggregate: `timesheet` drives the weekly timesheet workflow, `billing`
//! generates invoices and keeps the payment ledger, and `user` / `project` /
//! `client` manage the supporting directory data. Every mutating operation
//! runs as a single database transaction.

/// Invoice generation, status, and payment ledger operations
pub mod billing;
/// Client directory operations
pub mod client;
/// Project and project-assignment operations
pub mod project;
/// Weekly timesheet workflow (draft → submitted → approved/rejected)
pub mod timesheet;
/// User directory operations (roles, managers, activation)
pub mod user;
