//! Client business logic - Handles the client directory.
//!
//! Clients are mostly plain records; the only rules are that a client needs a
//! name and cannot be deleted while projects still hang off it, since projects
//! carry logged time that must stay attributable.

use crate::{
    entities::{Client, Invoice, Project, client, invoice, project},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};

/// Parameters for creating or replacing a client record.
#[derive(Debug, Clone)]
pub struct ClientInput {
    /// Client organization name
    pub name: String,
    /// Primary contact person
    pub contact_person: Option<String>,
    /// Contact email for invoicing correspondence
    pub contact_email: Option<String>,
    /// Postal address
    pub address: Option<String>,
}

/// Retrieves a client by its unique ID.
pub async fn get_client_by_id(
    db: &DatabaseConnection,
    client_id: i64,
) -> Result<Option<client::Model>> {
    Client::find_by_id(client_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves all clients, ordered alphabetically by name.
pub async fn get_all_clients(db: &DatabaseConnection) -> Result<Vec<client::Model>> {
    Client::find()
        .order_by_asc(client::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds clients whose name contains the given fragment.
pub async fn search_clients(db: &DatabaseConnection, name: &str) -> Result<Vec<client::Model>> {
    Client::find()
        .filter(client::Column::Name.contains(name))
        .order_by_asc(client::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Creates a new client.
pub async fn create_client(db: &DatabaseConnection, input: ClientInput) -> Result<client::Model> {
    if input.name.trim().is_empty() {
        return Err(Error::Validation {
            message: "Client name cannot be empty".to_string(),
        });
    }

    let client = client::ActiveModel {
        name: Set(input.name.trim().to_string()),
        contact_person: Set(input.contact_person),
        contact_email: Set(input.contact_email),
        address: Set(input.address),
        ..Default::default()
    };

    client.insert(db).await.map_err(Into::into)
}

/// Replaces a client's record.
pub async fn update_client(
    db: &DatabaseConnection,
    client_id: i64,
    input: ClientInput,
) -> Result<client::Model> {
    if input.name.trim().is_empty() {
        return Err(Error::Validation {
            message: "Client name cannot be empty".to_string(),
        });
    }

    let client = Client::find_by_id(client_id)
        .one(db)
        .await?
        .ok_or(Error::ClientNotFound { id: client_id })?;

    let mut active_model: client::ActiveModel = client.into();
    active_model.name = Set(input.name.trim().to_string());
    active_model.contact_person = Set(input.contact_person);
    active_model.contact_email = Set(input.contact_email);
    active_model.address = Set(input.address);

    active_model.update(db).await.map_err(Into::into)
}

/// Deletes a client that has no projects and no invoices.
///
/// Projects carry logged time and invoices are part of the books; both must
/// stay attributable, so a client with either has to have them removed first.
pub async fn delete_client(db: &DatabaseConnection, client_id: i64) -> Result<()> {
    let client = Client::find_by_id(client_id)
        .one(db)
        .await?
        .ok_or(Error::ClientNotFound { id: client_id })?;

    let project_count = Project::find()
        .filter(project::Column::ClientId.eq(client_id))
        .count(db)
        .await?;
    if project_count > 0 {
        return Err(Error::InvalidState {
            message: "Cannot delete a client that still has projects".to_string(),
        });
    }

    let invoice_count = Invoice::find()
        .filter(invoice::Column::ClientId.eq(client_id))
        .count(db)
        .await?;
    if invoice_count > 0 {
        return Err(Error::InvalidState {
            message: "Cannot delete a client that still has invoices".to_string(),
        });
    }

    client.delete(db).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_create_client_validation() -> Result<()> {
        let db = setup_test_db().await?;

        let result = create_client(
            &db,
            ClientInput {
                name: "  ".to_string(),
                contact_person: None,
                contact_email: None,
                address: None,
            },
        )
        .await;
        assert!(matches!(
            result.unwrap_err(),
            Error::Validation { message: _ }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_and_get_client() -> Result<()> {
        let db = setup_test_db().await?;

        let client = create_test_client(&db, "Acme Corp").await?;
        assert_eq!(client.name, "Acme Corp");

        let found = get_client_by_id(&db, client.id).await?.unwrap();
        assert_eq!(found, client);

        Ok(())
    }

    #[tokio::test]
    async fn test_get_all_clients_ordered() -> Result<()> {
        let db = setup_test_db().await?;

        create_test_client(&db, "Zenith Ltd").await?;
        create_test_client(&db, "Acme Corp").await?;

        let clients = get_all_clients(&db).await?;
        assert_eq!(clients.len(), 2);
        assert_eq!(clients[0].name, "Acme Corp");
        assert_eq!(clients[1].name, "Zenith Ltd");

        Ok(())
    }

    #[tokio::test]
    async fn test_search_clients() -> Result<()> {
        let db = setup_test_db().await?;

        create_test_client(&db, "Acme Corp").await?;
        create_test_client(&db, "Zenith Ltd").await?;

        let hits = search_clients(&db, "corp").await?;
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Acme Corp");

        Ok(())
    }

    #[tokio::test]
    async fn test_update_client() -> Result<()> {
        let db = setup_test_db().await?;
        let client = create_test_client(&db, "Acme Corp").await?;

        let updated = update_client(
            &db,
            client.id,
            ClientInput {
                name: "Acme Corporation".to_string(),
                contact_person: Some("Jordan Lee".to_string()),
                contact_email: Some("billing@acme.test".to_string()),
                address: None,
            },
        )
        .await?;

        assert_eq!(updated.name, "Acme Corporation");
        assert_eq!(updated.contact_person.as_deref(), Some("Jordan Lee"));

        Ok(())
    }

    #[tokio::test]
    async fn test_update_client_not_found() -> Result<()> {
        let db = setup_test_db().await?;

        let result = update_client(
            &db,
            7,
            ClientInput {
                name: "Ghost".to_string(),
                contact_person: None,
                contact_email: None,
                address: None,
            },
        )
        .await;
        assert!(matches!(result.unwrap_err(), Error::ClientNotFound { id: 7 }));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_client() -> Result<()> {
        let db = setup_test_db().await?;
        let client = create_test_client(&db, "Acme Corp").await?;

        delete_client(&db, client.id).await?;
        assert!(get_client_by_id(&db, client.id).await?.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_client_with_projects_blocked() -> Result<()> {
        let db = setup_test_db().await?;
        let client = create_test_client(&db, "Acme Corp").await?;
        create_test_project(&db, client.id, "Website Revamp").await?;

        let result = delete_client(&db, client.id).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidState { message: _ }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_client_not_found() -> Result<()> {
        let db = setup_test_db().await?;

        let result = delete_client(&db, 99).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::ClientNotFound { id: 99 }
        ));

        Ok(())
    }
}
