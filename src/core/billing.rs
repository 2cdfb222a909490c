//! Billing engine business logic.
//!
//! Turns approved billable time into client invoices and keeps the payment
//! ledger. Invoice generation reads a snapshot of the matching time entries,
//! groups them per (project, user), snapshots each project's current rate,
//! and persists the invoice with its line items as one unit. Payments are
//! append-only and bump `amount_paid` with an atomic column update; once
//! payments cover the total the invoice flips to Paid and never flips back.
//!
//! Generation is intentionally not idempotent: running it twice over
//! overlapping ranges double-bills. Guarding against that is the caller's
//! responsibility.

use crate::{
    entities::{
        Invoice, InvoiceLineItem, Payment, Project, TimeEntry, Timesheet, User, invoice,
        invoice::InvoiceStatus, invoice_line_item, payment, project, time_entry,
        time_entry::TaskType, timesheet, timesheet::TimesheetStatus, user,
    },
    errors::{Error, Result},
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    JoinType, QueryOrder, QuerySelect, QueryTrait, Set, TransactionTrait, prelude::*,
};
use std::collections::{HashMap, HashSet};
use tracing::info;

/// Parameters for recording a payment against an invoice.
#[derive(Debug, Clone)]
pub struct PaymentInput {
    /// Date the payment was received
    pub payment_date: NaiveDate,
    /// Amount paid, positive
    pub amount: Decimal,
    /// Payment method ("wire", "check", ...)
    pub method: Option<String>,
    /// Free-form notes
    pub notes: Option<String>,
}

/// Optional criteria for listing invoices.
#[derive(Debug, Clone, Default)]
pub struct InvoiceFilter {
    /// Restrict to one client
    pub client_id: Option<i64>,
    /// Restrict to one status
    pub status: Option<InvoiceStatus>,
    /// Earliest issue date, inclusive
    pub start_date: Option<NaiveDate>,
    /// Latest issue date, inclusive
    pub end_date: Option<NaiveDate>,
}

/// An invoice together with the line items and payments it owns.
#[derive(Debug, Clone)]
pub struct InvoiceDetail {
    /// The invoice row
    pub invoice: invoice::Model,
    /// Its line items, one per billed (project, user) pair
    pub line_items: Vec<invoice_line_item::Model>,
    /// Payments recorded against it, oldest first
    pub payments: Vec<payment::Model>,
}

/// Loads an invoice aggregate (invoice, line items, payments) by id.
pub async fn get_invoice_detail(
    db: &DatabaseConnection,
    invoice_id: i64,
) -> Result<InvoiceDetail> {
    let invoice = Invoice::find_by_id(invoice_id)
        .one(db)
        .await?
        .ok_or(Error::InvoiceNotFound { id: invoice_id })?;

    let line_items = InvoiceLineItem::find()
        .filter(invoice_line_item::Column::InvoiceId.eq(invoice_id))
        .order_by_asc(invoice_line_item::Column::Id)
        .all(db)
        .await?;

    let payments = Payment::find()
        .filter(payment::Column::InvoiceId.eq(invoice_id))
        .order_by_asc(payment::Column::PaymentDate)
        .order_by_asc(payment::Column::Id)
        .all(db)
        .await?;

    Ok(InvoiceDetail {
        invoice,
        line_items,
        payments,
    })
}

/// Retrieves all invoices issued to a client, newest first.
pub async fn get_invoices_by_client(
    db: &DatabaseConnection,
    client_id: i64,
) -> Result<Vec<invoice::Model>> {
    Invoice::find()
        .filter(invoice::Column::ClientId.eq(client_id))
        .order_by_desc(invoice::Column::IssueDate)
        .order_by_desc(invoice::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves invoices matching the given filter criteria, newest first.
pub async fn find_invoices(
    db: &DatabaseConnection,
    filter: &InvoiceFilter,
) -> Result<Vec<invoice::Model>> {
    Invoice::find()
        .apply_if(filter.client_id, |q, v| {
            q.filter(invoice::Column::ClientId.eq(v))
        })
        .apply_if(filter.status, |q, v| q.filter(invoice::Column::Status.eq(v)))
        .apply_if(filter.start_date, |q, v| {
            q.filter(invoice::Column::IssueDate.gte(v))
        })
        .apply_if(filter.end_date, |q, v| {
            q.filter(invoice::Column::IssueDate.lte(v))
        })
        .order_by_desc(invoice::Column::IssueDate)
        .order_by_desc(invoice::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// The billing engine's input query: billable entries on the client's
/// projects, belonging to approved timesheets, dated within the range.
pub async fn find_billable_entries<C>(
    db: &C,
    client_id: i64,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<Vec<time_entry::Model>>
where
    C: ConnectionTrait,
{
    TimeEntry::find()
        .join(JoinType::InnerJoin, time_entry::Relation::Project.def())
        .join(JoinType::InnerJoin, time_entry::Relation::Timesheet.def())
        .filter(project::Column::ClientId.eq(client_id))
        .filter(timesheet::Column::Status.eq(TimesheetStatus::Approved))
        .filter(time_entry::Column::TaskType.eq(TaskType::Billable))
        .filter(time_entry::Column::EntryDate.between(start_date, end_date))
        .order_by_asc(time_entry::Column::EntryDate)
        .order_by_asc(time_entry::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Generates a draft invoice for a client over a date range.
///
/// Queries the approved billable entries in range, groups them by
/// (project, user) in first-seen order, snapshots each project's current
/// `default_billable_rate`, and persists the invoice with its line items as
/// one unit. Fails when the client is unknown or the period has nothing to
/// bill. Entries committed after this snapshot are not picked up
/// retroactively.
pub async fn generate_invoice(
    db: &DatabaseConnection,
    client_id: i64,
    start_date: NaiveDate,
    end_date: NaiveDate,
    due_date: NaiveDate,
) -> Result<InvoiceDetail> {
    let txn = db.begin().await?;

    crate::entities::Client::find_by_id(client_id)
        .one(&txn)
        .await?
        .ok_or(Error::ClientNotFound { id: client_id })?;

    let entries = find_billable_entries(&txn, client_id, start_date, end_date).await?;
    if entries.is_empty() {
        return Err(Error::InvalidState {
            message: "No billable time entries found for the selected period".to_string(),
        });
    }

    // Resolve all associations up front; no per-entry fetches below
    let timesheet_ids: HashSet<i64> = entries.iter().map(|e| e.timesheet_id).collect();
    let sheets: HashMap<i64, timesheet::Model> = Timesheet::find()
        .filter(timesheet::Column::Id.is_in(timesheet_ids))
        .all(&txn)
        .await?
        .into_iter()
        .map(|t| (t.id, t))
        .collect();

    let project_ids: HashSet<i64> = entries.iter().filter_map(|e| e.project_id).collect();
    let projects: HashMap<i64, project::Model> = Project::find()
        .filter(project::Column::Id.is_in(project_ids))
        .all(&txn)
        .await?
        .into_iter()
        .map(|p| (p.id, p))
        .collect();

    let user_ids: HashSet<i64> = sheets.values().map(|t| t.user_id).collect();
    let users: HashMap<i64, user::Model> = User::find()
        .filter(user::Column::Id.is_in(user_ids))
        .all(&txn)
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();

    // Group hours by (project, user), keeping first-seen order
    let mut group_order: Vec<(i64, i64)> = Vec::new();
    let mut group_hours: HashMap<(i64, i64), Decimal> = HashMap::new();
    for entry in &entries {
        let Some(project_id) = entry.project_id else {
            continue;
        };
        let Some(sheet) = sheets.get(&entry.timesheet_id) else {
            continue;
        };
        let key = (project_id, sheet.user_id);
        if !group_hours.contains_key(&key) {
            group_order.push(key);
        }
        *group_hours.entry(key).or_insert(Decimal::ZERO) += entry.hours;
    }

    let invoice = invoice::ActiveModel {
        client_id: Set(client_id),
        issue_date: Set(Utc::now().date_naive()),
        due_date: Set(due_date),
        status: Set(InvoiceStatus::Draft),
        total_amount: Set(Decimal::ZERO),
        amount_paid: Set(Decimal::ZERO),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    let invoice = invoice.insert(&txn).await?;

    let mut total_amount = Decimal::ZERO;
    for key in group_order {
        let (project_id, user_id) = key;
        let project = projects
            .get(&project_id)
            .ok_or(Error::ProjectNotFound { id: project_id })?;
        let user = users
            .get(&user_id)
            .ok_or(Error::UserNotFound { id: user_id })?;
        let hours = group_hours.get(&key).copied().unwrap_or_default();

        let rate = project.default_billable_rate;
        let line_total = hours * rate;
        total_amount += line_total;

        let line_item = invoice_line_item::ActiveModel {
            invoice_id: Set(invoice.id),
            project_id: Set(project_id),
            user_id: Set(user_id),
            description: Set(format!("{} - {}", project.name, user.full_name())),
            hours: Set(hours),
            rate: Set(rate),
            line_total: Set(line_total),
            ..Default::default()
        };
        line_item.insert(&txn).await?;
    }

    let mut active_model: invoice::ActiveModel = invoice.into();
    active_model.total_amount = Set(total_amount);
    let invoice = active_model.update(&txn).await?;

    txn.commit().await?;
    info!(
        "Generated invoice {} for client {} over {start_date}..{end_date}, total {total_amount}",
        invoice.id, client_id
    );

    get_invoice_detail(db, invoice.id).await
}

/// Overwrites an invoice's status unconditionally.
///
/// This is an administrative override with no transition guard, deliberately
/// looser than the timesheet workflow: back-office staff fix mislabeled
/// invoices with it.
pub async fn set_invoice_status(
    db: &DatabaseConnection,
    invoice_id: i64,
    status: InvoiceStatus,
) -> Result<InvoiceDetail> {
    let invoice = Invoice::find_by_id(invoice_id)
        .one(db)
        .await?
        .ok_or(Error::InvoiceNotFound { id: invoice_id })?;

    let mut active_model: invoice::ActiveModel = invoice.into();
    active_model.status = Set(status);
    active_model.update(db).await?;

    get_invoice_detail(db, invoice_id).await
}

/// Records a payment and bumps the invoice's `amount_paid`.
///
/// The increment is a single atomic column update, so concurrent payments on
/// the same invoice serialize instead of losing updates; the Paid threshold
/// is re-checked against the freshly read row. Reaching (or exceeding) the
/// total flips the invoice to Paid; nothing ever flips it back.
pub async fn record_payment(
    db: &DatabaseConnection,
    invoice_id: i64,
    input: PaymentInput,
) -> Result<InvoiceDetail> {
    use sea_orm::sea_query::Expr;

    if input.amount <= Decimal::ZERO {
        return Err(Error::Validation {
            message: "Payment amount must be positive".to_string(),
        });
    }

    let txn = db.begin().await?;

    let _invoice = Invoice::find_by_id(invoice_id)
        .one(&txn)
        .await?
        .ok_or(Error::InvoiceNotFound { id: invoice_id })?;

    let payment = payment::ActiveModel {
        invoice_id: Set(invoice_id),
        payment_date: Set(input.payment_date),
        amount: Set(input.amount),
        method: Set(input.method),
        notes: Set(input.notes),
        ..Default::default()
    };
    payment.insert(&txn).await?;

    // Atomic increment: amount_paid = amount_paid + amount
    Invoice::update_many()
        .col_expr(
            invoice::Column::AmountPaid,
            Expr::col(invoice::Column::AmountPaid).add(input.amount),
        )
        .filter(invoice::Column::Id.eq(invoice_id))
        .exec(&txn)
        .await?;

    // Re-check the Paid threshold against the updated row
    let updated = Invoice::find_by_id(invoice_id)
        .one(&txn)
        .await?
        .ok_or(Error::InvoiceNotFound { id: invoice_id })?;

    if updated.amount_paid >= updated.total_amount && updated.status != InvoiceStatus::Paid {
        let mut active_model: invoice::ActiveModel = updated.into();
        active_model.status = Set(InvoiceStatus::Paid);
        active_model.update(&txn).await?;
    }

    txn.commit().await?;
    info!(
        "Recorded payment of {} against invoice {invoice_id}",
        input.amount
    );

    get_invoice_detail(db, invoice_id).await
}

/// Deletes a draft invoice and, by ownership, its line items and payments.
///
/// Anything past Draft has been sent to a client and is part of the books.
pub async fn delete_invoice(db: &DatabaseConnection, invoice_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    let invoice = Invoice::find_by_id(invoice_id)
        .one(&txn)
        .await?
        .ok_or(Error::InvoiceNotFound { id: invoice_id })?;

    if invoice.status != InvoiceStatus::Draft {
        return Err(Error::InvalidState {
            message: "Only draft invoices can be deleted".to_string(),
        });
    }

    Payment::delete_many()
        .filter(payment::Column::InvoiceId.eq(invoice_id))
        .exec(&txn)
        .await?;
    InvoiceLineItem::delete_many()
        .filter(invoice_line_item::Column::InvoiceId.eq(invoice_id))
        .exec(&txn)
        .await?;
    invoice.delete(&txn).await?;

    txn.commit().await?;
    Ok(())
}
