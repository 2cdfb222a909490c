//! Initial data seeding from config.toml.
//!
//! On first startup the database has no users, which would leave no one able
//! to administer the system. This module reads the bootstrap administrator
//! account from a TOML configuration file (falling back to built-in defaults
//! when the file is absent) and creates it if it does not already exist.
//! Seeding is idempotent: re-running against a populated database only
//! re-activates the admin if it was deactivated.

use crate::core::user::{self, UserInput};
use crate::entities::{User, UserColumn, UserModel, UserRole};
use crate::errors::{Error, Result};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize)]
pub struct SeedConfig {
    /// Bootstrap administrator account
    pub admin: AdminConfig,
}

/// Configuration for the bootstrap administrator account
#[derive(Debug, Deserialize, Clone)]
pub struct AdminConfig {
    /// Admin login email
    pub email: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            email: "admin@example.com".to_string(),
            first_name: "Admin".to_string(),
            last_name: "User".to_string(),
        }
    }
}

/// Loads seed configuration from a TOML file.
///
/// # Errors
/// Returns an error if the file cannot be read, the TOML syntax is invalid,
/// or required fields are missing.
pub fn load_seed_config<P: AsRef<Path>>(path: P) -> Result<SeedConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads seed configuration from the default location (./config.toml),
/// falling back to built-in defaults when the file does not exist.
pub fn load_default_seed_config() -> Result<SeedConfig> {
    if Path::new("config.toml").exists() {
        load_seed_config("config.toml")
    } else {
        Ok(SeedConfig {
            admin: AdminConfig::default(),
        })
    }
}

/// Ensures the bootstrap administrator exists and is active.
///
/// Creates the admin user when no user with the configured email exists;
/// otherwise re-activates the existing account if it was deactivated.
pub async fn seed_admin_user(db: &DatabaseConnection, cfg: &AdminConfig) -> Result<UserModel> {
    let existing = User::find()
        .filter(UserColumn::Email.eq(cfg.email.as_str()))
        .one(db)
        .await?;

    if let Some(admin) = existing {
        if admin.is_active {
            return Ok(admin);
        }
        let mut active_model: crate::entities::user::ActiveModel = admin.into();
        active_model.is_active = Set(true);
        let admin = active_model.update(db).await?;
        info!("Re-activated bootstrap admin user: {}", admin.email);
        return Ok(admin);
    }

    let admin = user::create_user(
        db,
        UserInput {
            email: cfg.email.clone(),
            first_name: cfg.first_name.clone(),
            last_name: cfg.last_name.clone(),
            role: UserRole::Admin,
            manager_id: None,
            hire_date: None,
            department: None,
            job_title: None,
        },
    )
    .await?;
    info!("Created bootstrap admin user: {}", admin.email);
    Ok(admin)
}
