//! Client entity - Represents a billable customer organization.
//!
//! Clients own projects, and invoices are issued against a client for the
//! approved billable time logged on its projects.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Client database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "clients")]
pub struct Model {
    /// Unique identifier for the client
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Client organization name
    pub name: String,
    /// Primary contact person, if known
    pub contact_person: Option<String>,
    /// Contact email for invoicing correspondence
    pub contact_email: Option<String>,
    /// Postal address
    pub address: Option<String>,
}

/// Defines relationships between Client and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One client owns many projects
    #[sea_orm(has_many = "super::project::Entity")]
    Projects,
    /// One client receives many invoices
    #[sea_orm(has_many = "super::invoice::Entity")]
    Invoices,
}

impl Related<super::project::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Projects.def()
    }
}

impl Related<super::invoice::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Invoices.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
