//! Timesheet workflow business logic.
//!
//! A timesheet collects one user's hours for one week (starting Sunday) and
//! moves through Draft → Submitted → Approved/Rejected. Editing replaces the
//! entry collection wholesale and is only allowed in Draft or Rejected;
//! submission freezes the sheet for a manager decision; approval is terminal.
//! Every operation runs as one database transaction so concurrent edits and
//! submissions of the same sheet serialize instead of interleaving partial
//! writes.

use crate::{
    entities::{
        Project, TimeEntry, Timesheet, User, time_entry, time_entry::TaskType, timesheet,
        timesheet::TimesheetStatus, user,
    },
    errors::{Error, Result},
};
use chrono::{Datelike, Days, NaiveDate, Utc, Weekday};
use rust_decimal::Decimal;
use sea_orm::{JoinType, QueryOrder, QuerySelect, Set, TransactionTrait, prelude::*};
use tracing::info;

/// One incoming time entry in an upsert request.
#[derive(Debug, Clone)]
pub struct TimeEntryInput {
    /// Project worked on; required when `task_type` is billable
    pub project_id: Option<i64>,
    /// Day the work happened
    pub entry_date: NaiveDate,
    /// Hours worked, positive
    pub hours: Decimal,
    /// Kind of work
    pub task_type: TaskType,
    /// Free-form notes
    pub notes: Option<String>,
}

/// A timesheet together with the entries it owns, loaded in one call.
#[derive(Debug, Clone)]
pub struct TimesheetDetail {
    /// The timesheet row
    pub timesheet: timesheet::Model,
    /// Its entries, ordered by entry date then id
    pub entries: Vec<time_entry::Model>,
}

/// Loads a timesheet aggregate (sheet plus ordered entries) by id.
pub async fn get_timesheet_detail(
    db: &DatabaseConnection,
    timesheet_id: i64,
) -> Result<TimesheetDetail> {
    let sheet = Timesheet::find_by_id(timesheet_id)
        .one(db)
        .await?
        .ok_or(Error::TimesheetNotFound { id: timesheet_id })?;

    let entries = entries_of(db, timesheet_id).await?;
    Ok(TimesheetDetail {
        timesheet: sheet,
        entries,
    })
}

/// Retrieves all timesheets of a user, most recent week first.
pub async fn get_timesheets_for_user(
    db: &DatabaseConnection,
    user_id: i64,
) -> Result<Vec<timesheet::Model>> {
    Timesheet::find()
        .filter(timesheet::Column::UserId.eq(user_id))
        .order_by_desc(timesheet::Column::WeekStartDate)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves the submitted timesheets waiting on a manager's decision.
///
/// Only sheets filed by that manager's reports are returned, oldest week
/// first so the queue drains in order.
pub async fn get_pending_timesheets_for_manager(
    db: &DatabaseConnection,
    manager_id: i64,
) -> Result<Vec<timesheet::Model>> {
    Timesheet::find()
        .join(JoinType::InnerJoin, timesheet::Relation::User.def())
        .filter(user::Column::ManagerId.eq(manager_id))
        .filter(timesheet::Column::Status.eq(TimesheetStatus::Submitted))
        .order_by_asc(timesheet::Column::WeekStartDate)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a user's time entries within a date range, across timesheets.
///
/// Feeds utilization views; the range is inclusive on both ends.
pub async fn get_entries_for_user_in_range(
    db: &DatabaseConnection,
    user_id: i64,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<Vec<time_entry::Model>> {
    TimeEntry::find()
        .join(JoinType::InnerJoin, time_entry::Relation::Timesheet.def())
        .filter(timesheet::Column::UserId.eq(user_id))
        .filter(time_entry::Column::EntryDate.between(start_date, end_date))
        .order_by_asc(time_entry::Column::EntryDate)
        .order_by_asc(time_entry::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves the time entries logged against a project within a date range.
pub async fn get_entries_for_project_in_range(
    db: &DatabaseConnection,
    project_id: i64,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<Vec<time_entry::Model>> {
    TimeEntry::find()
        .filter(time_entry::Column::ProjectId.eq(project_id))
        .filter(time_entry::Column::EntryDate.between(start_date, end_date))
        .order_by_asc(time_entry::Column::EntryDate)
        .order_by_asc(time_entry::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

async fn entries_of<C>(db: &C, timesheet_id: i64) -> Result<Vec<time_entry::Model>>
where
    C: ConnectionTrait,
{
    TimeEntry::find()
        .filter(time_entry::Column::TimesheetId.eq(timesheet_id))
        .order_by_asc(time_entry::Column::EntryDate)
        .order_by_asc(time_entry::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Creates or replaces the timesheet for (user, week), swapping in the given
/// entry collection wholesale.
///
/// The week must start on a Sunday and every entry must fall inside it;
/// billable entries must name an existing project. Only Draft and Rejected
/// sheets are editable. Editing a Rejected sheet does NOT reset it to Draft:
/// it stays Rejected until explicitly re-submitted, so rejection feedback
/// remains visible while the user reworks the week.
pub async fn upsert_timesheet(
    db: &DatabaseConnection,
    user_id: i64,
    week_start_date: NaiveDate,
    entries: Vec<TimeEntryInput>,
) -> Result<TimesheetDetail> {
    if week_start_date.weekday() != Weekday::Sun {
        return Err(Error::Validation {
            message: "Week start date must be a Sunday".to_string(),
        });
    }
    let week_end_date = week_start_date + Days::new(6); // Saturday

    let txn = db.begin().await?;

    User::find_by_id(user_id)
        .one(&txn)
        .await?
        .ok_or(Error::UserNotFound { id: user_id })?;

    let existing = Timesheet::find()
        .filter(timesheet::Column::UserId.eq(user_id))
        .filter(timesheet::Column::WeekStartDate.eq(week_start_date))
        .one(&txn)
        .await?;

    let sheet = match existing {
        Some(sheet) => {
            if sheet.status != TimesheetStatus::Draft && sheet.status != TimesheetStatus::Rejected {
                return Err(Error::InvalidState {
                    message: "Cannot modify a submitted or approved timesheet".to_string(),
                });
            }
            sheet
        }
        None => {
            let draft = timesheet::ActiveModel {
                user_id: Set(user_id),
                week_start_date: Set(week_start_date),
                status: Set(TimesheetStatus::Draft),
                submitted_at: Set(None),
                approved_at: Set(None),
                rejection_comments: Set(None),
                ..Default::default()
            };
            draft.insert(&txn).await?
        }
    };

    // Clear existing entries and add new ones
    TimeEntry::delete_many()
        .filter(time_entry::Column::TimesheetId.eq(sheet.id))
        .exec(&txn)
        .await?;

    for entry in entries {
        if entry.entry_date < week_start_date || entry.entry_date > week_end_date {
            return Err(Error::Validation {
                message: format!(
                    "Entry date {} must be within the week ({week_start_date} to {week_end_date})",
                    entry.entry_date
                ),
            });
        }

        if entry.hours <= Decimal::ZERO {
            return Err(Error::Validation {
                message: "Entry hours must be positive".to_string(),
            });
        }

        if entry.task_type == TaskType::Billable && entry.project_id.is_none() {
            return Err(Error::Validation {
                message: "Project is required for billable time entries".to_string(),
            });
        }

        let project_id = match entry.project_id {
            Some(id) => {
                Project::find_by_id(id)
                    .one(&txn)
                    .await?
                    .ok_or(Error::ProjectNotFound { id })?;
                Some(id)
            }
            None => None,
        };

        let row = time_entry::ActiveModel {
            timesheet_id: Set(sheet.id),
            project_id: Set(project_id),
            entry_date: Set(entry.entry_date),
            hours: Set(entry.hours),
            task_type: Set(entry.task_type),
            notes: Set(entry.notes),
            ..Default::default()
        };
        row.insert(&txn).await?;
    }

    txn.commit().await?;

    get_timesheet_detail(db, sheet.id).await
}

/// Submits a timesheet for manager review.
///
/// Allowed from Draft or Rejected, never from Submitted/Approved, and never
/// with an empty entry collection. All entry rules are re-checked here even
/// though upsert already enforced them: the rows were persisted earlier and
/// could predate a rule, so violations surface as `InvalidState` rather than
/// `ValidationError`.
pub async fn submit_timesheet(
    db: &DatabaseConnection,
    timesheet_id: i64,
) -> Result<TimesheetDetail> {
    let txn = db.begin().await?;

    let sheet = Timesheet::find_by_id(timesheet_id)
        .one(&txn)
        .await?
        .ok_or(Error::TimesheetNotFound { id: timesheet_id })?;

    if sheet.status != TimesheetStatus::Draft && sheet.status != TimesheetStatus::Rejected {
        return Err(Error::InvalidState {
            message: "Timesheet is not in a submittable state".to_string(),
        });
    }

    let entries = entries_of(&txn, sheet.id).await?;
    if entries.is_empty() {
        return Err(Error::InvalidState {
            message: "Cannot submit an empty timesheet".to_string(),
        });
    }

    if sheet.week_start_date.weekday() != Weekday::Sun {
        return Err(Error::InvalidState {
            message: "Timesheet week start date must be a Sunday".to_string(),
        });
    }
    let week_end_date = sheet.week_start_date + Days::new(6);

    for entry in &entries {
        if entry.entry_date < sheet.week_start_date || entry.entry_date > week_end_date {
            return Err(Error::InvalidState {
                message: format!(
                    "Entry date {} is outside the timesheet week ({} to {week_end_date})",
                    entry.entry_date, sheet.week_start_date
                ),
            });
        }

        if entry.task_type == TaskType::Billable && entry.project_id.is_none() {
            return Err(Error::InvalidState {
                message: "Billable entries must have a project assigned".to_string(),
            });
        }
    }

    let mut active_model: timesheet::ActiveModel = sheet.into();
    active_model.status = Set(TimesheetStatus::Submitted);
    active_model.submitted_at = Set(Some(Utc::now()));
    active_model.rejection_comments = Set(None);
    let sheet = active_model.update(&txn).await?;

    txn.commit().await?;
    info!("Timesheet {} submitted for review", sheet.id);

    Ok(TimesheetDetail {
        timesheet: sheet,
        entries,
    })
}

/// Approves or rejects a submitted timesheet.
///
/// Approval stamps `approved_at` and is terminal for the week. Rejection
/// requires non-blank comments so the author knows what to fix, and sends the
/// sheet back into the editable Rejected state.
pub async fn decide_timesheet(
    db: &DatabaseConnection,
    timesheet_id: i64,
    approved: bool,
    comments: Option<&str>,
) -> Result<TimesheetDetail> {
    let txn = db.begin().await?;

    let sheet = Timesheet::find_by_id(timesheet_id)
        .one(&txn)
        .await?
        .ok_or(Error::TimesheetNotFound { id: timesheet_id })?;

    if sheet.status != TimesheetStatus::Submitted {
        return Err(Error::InvalidState {
            message: "Only submitted timesheets can be approved or rejected".to_string(),
        });
    }

    let mut active_model: timesheet::ActiveModel = sheet.into();
    if approved {
        active_model.status = Set(TimesheetStatus::Approved);
        active_model.approved_at = Set(Some(Utc::now()));
        active_model.rejection_comments = Set(None);
    } else {
        let comments = comments.map(str::trim).unwrap_or_default();
        if comments.is_empty() {
            return Err(Error::Validation {
                message: "Rejection comments are required".to_string(),
            });
        }
        active_model.status = Set(TimesheetStatus::Rejected);
        active_model.rejection_comments = Set(Some(comments.to_string()));
        active_model.approved_at = Set(None);
    }
    let sheet = active_model.update(&txn).await?;

    txn.commit().await?;
    info!(
        "Timesheet {} {}",
        sheet.id,
        if approved { "approved" } else { "rejected" }
    );

    let entries = entries_of(db, sheet.id).await?;
    Ok(TimesheetDetail {
        timesheet: sheet,
        entries,
    })
}

/// Deletes a draft timesheet and, by ownership, all its entries.
///
/// Anything past Draft is part of the review/billing record and cannot be
/// deleted.
pub async fn delete_timesheet(db: &DatabaseConnection, timesheet_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    let sheet = Timesheet::find_by_id(timesheet_id)
        .one(&txn)
        .await?
        .ok_or(Error::TimesheetNotFound { id: timesheet_id })?;

    if sheet.status != TimesheetStatus::Draft {
        return Err(Error::InvalidState {
            message: "Only draft timesheets can be deleted".to_string(),
        });
    }

    TimeEntry::delete_many()
        .filter(time_entry::Column::TimesheetId.eq(sheet.id))
        .exec(&txn)
        .await?;
    sheet.delete(&txn).await?;

    txn.commit().await?;
    Ok(())
}
