//! Invoice entity - A bill issued to a client for approved billable time.
//!
//! Invoices own their line items and payments. `total_amount` is the sum of
//! the line totals and is fixed at generation time; `amount_paid` only ever
//! grows as payments are recorded. The balance due is always derived, never
//! stored.

use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Billing status of an invoice.
///
/// Unlike the timesheet workflow there is no transition guard: status can be
/// set administratively to any value. `record_payment` promotes to Paid once
/// payments cover the total, and nothing ever demotes from Paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum InvoiceStatus {
    /// Generated but not yet sent to the client; deletable
    #[sea_orm(string_value = "DRAFT")]
    Draft,
    /// Delivered to the client and awaiting payment
    #[sea_orm(string_value = "SENT")]
    Sent,
    /// Fully covered by recorded payments
    #[sea_orm(string_value = "PAID")]
    Paid,
    /// Past due date without full payment
    #[sea_orm(string_value = "OVERDUE")]
    Overdue,
}

/// Invoice database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "invoices")]
pub struct Model {
    /// Unique identifier for the invoice
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Client being billed
    pub client_id: i64,
    /// Date the invoice was generated
    pub issue_date: Date,
    /// Date payment is due
    pub due_date: Date,
    /// Current billing status
    pub status: InvoiceStatus,
    /// Sum of all line item totals, fixed at generation time
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub total_amount: Decimal,
    /// Running sum of recorded payments; never decreases
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub amount_paid: Decimal,
    /// When the invoice row was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Invoice and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each invoice belongs to one client
    #[sea_orm(
        belongs_to = "super::client::Entity",
        from = "Column::ClientId",
        to = "super::client::Column::Id"
    )]
    Client,
    /// One invoice owns many line items
    #[sea_orm(has_many = "super::invoice_line_item::Entity")]
    LineItems,
    /// One invoice owns many payments
    #[sea_orm(has_many = "super::payment::Entity")]
    Payments,
}

impl Related<super::client::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Client.def()
    }
}

impl Related<super::invoice_line_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LineItems.def()
    }
}

impl Related<super::payment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Remaining amount owed: total minus what has been paid so far.
    #[must_use]
    pub fn balance_due(&self) -> Decimal {
        self.total_amount - self.amount_paid
    }
}
