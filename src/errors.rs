//! Unified error handling for `Timewise`.
//!
//! Every core operation returns [`Result`]; failures are one of three business
//! kinds (an entity lookup missed, the input was malformed, or the operation
//! is not allowed in the current lifecycle state) plus infrastructure
//! pass-throughs. Callers translate these into transport responses; nothing in
//! the core retries or swallows an error.

use thiserror::Error;

/// All errors surfaced by the core operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A referenced user id does not exist
    #[error("User not found: {id}")]
    UserNotFound {
        /// The user id that missed
        id: i64,
    },

    /// A referenced client id does not exist
    #[error("Client not found: {id}")]
    ClientNotFound {
        /// The client id that missed
        id: i64,
    },

    /// A referenced project id does not exist
    #[error("Project not found: {id}")]
    ProjectNotFound {
        /// The project id that missed
        id: i64,
    },

    /// A referenced timesheet id does not exist
    #[error("Timesheet not found: {id}")]
    TimesheetNotFound {
        /// The timesheet id that missed
        id: i64,
    },

    /// A referenced invoice id does not exist
    #[error("Invoice not found: {id}")]
    InvoiceNotFound {
        /// The invoice id that missed
        id: i64,
    },

    /// Malformed input: bad dates, missing required association, non-positive
    /// amount, blank required text
    #[error("Validation error: {message}")]
    Validation {
        /// What was wrong with the input
        message: String,
    },

    /// The operation is not permitted given the current lifecycle status or a
    /// business precondition
    #[error("Invalid state: {message}")]
    InvalidState {
        /// Which precondition failed
        message: String,
    },

    /// The acting user's role does not grant the requested capability
    #[error("Forbidden: {message}")]
    Forbidden {
        /// The capability that was denied
        message: String,
    },

    /// Configuration error (missing/unparseable config file or value)
    #[error("Configuration error: {message}")]
    Config {
        /// What failed to load or parse
        message: String,
    },

    /// Database error surfaced by the storage layer
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Environment variable error
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
