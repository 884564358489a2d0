//! Client repository for database operations.

use hwf_core::text::non_blank;
use hwf_shared::AppError;
use hwf_shared::types::{PageRequest, PageResponse};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};

use crate::entities::{clients, requests};
use crate::repositories::fetch_page;

/// Error types for client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Client not found.
    #[error("Client not found: {0}")]
    NotFound(i32),

    /// First or last name is blank.
    #[error("First and last name are required")]
    NameRequired,

    /// Cannot delete a client that still has requests.
    #[error("Cannot delete client: client has {0} requests")]
    HasRequests(u64),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<ClientError> for AppError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::NotFound(_) => Self::NotFound(err.to_string()),
            ClientError::NameRequired => Self::Validation(err.to_string()),
            ClientError::HasRequests(_) => Self::Conflict(err.to_string()),
            ClientError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Input for creating or replacing a client.
#[derive(Debug, Clone, Default)]
pub struct ClientInput {
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Email address.
    pub email: Option<String>,
    /// Phone number.
    pub phone: Option<String>,
    /// Street address.
    pub address: Option<String>,
    /// City.
    pub city: Option<String>,
    /// Postal code.
    pub postal_code: Option<String>,
    /// Free-form notes.
    pub notes: Option<String>,
}

impl ClientInput {
    fn validate(&self) -> Result<(), ClientError> {
        if self.first_name.trim().is_empty() || self.last_name.trim().is_empty() {
            return Err(ClientError::NameRequired);
        }
        Ok(())
    }
}

/// Filter options for listing clients.
#[derive(Debug, Clone, Default)]
pub struct ClientFilter {
    /// Matches first name, last name or email.
    pub search: Option<String>,
}

/// Client repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct ClientRepository {
    db: DatabaseConnection,
}

impl ClientRepository {
    /// Creates a new client repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a client.
    ///
    /// # Errors
    ///
    /// Returns an error if a name is blank or the insert fails.
    pub async fn create(&self, input: ClientInput) -> Result<clients::Model, ClientError> {
        input.validate()?;

        let now = chrono::Utc::now().into();
        let client = clients::ActiveModel {
            first_name: Set(input.first_name.trim().to_string()),
            last_name: Set(input.last_name.trim().to_string()),
            email: Set(non_blank(input.email)),
            phone: Set(non_blank(input.phone)),
            address: Set(non_blank(input.address)),
            city: Set(non_blank(input.city)),
            postal_code: Set(non_blank(input.postal_code)),
            notes: Set(non_blank(input.notes)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        Ok(client.insert(&self.db).await?)
    }

    /// Finds a client by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: i32) -> Result<Option<clients::Model>, ClientError> {
        Ok(clients::Entity::find_by_id(id).one(&self.db).await?)
    }

    /// Lists clients ordered by last name, then first name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        filter: ClientFilter,
        page: &PageRequest,
    ) -> Result<PageResponse<clients::Model>, ClientError> {
        let mut query = clients::Entity::find()
            .order_by_asc(clients::Column::LastName)
            .order_by_asc(clients::Column::FirstName)
            .order_by_asc(clients::Column::Id);

        if let Some(search) = non_blank(filter.search) {
            query = query.filter(
                Condition::any()
                    .add(clients::Column::FirstName.contains(&search))
                    .add(clients::Column::LastName.contains(&search))
                    .add(clients::Column::Email.contains(&search)),
            );
        }

        Ok(fetch_page(query, &self.db, page).await?)
    }

    /// Replaces a client's fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the client does not exist, a name is blank, or
    /// the update fails.
    pub async fn update(&self, id: i32, input: ClientInput) -> Result<clients::Model, ClientError> {
        input.validate()?;

        let client = clients::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(ClientError::NotFound(id))?;

        let mut active: clients::ActiveModel = client.into();
        active.first_name = Set(input.first_name.trim().to_string());
        active.last_name = Set(input.last_name.trim().to_string());
        active.email = Set(non_blank(input.email));
        active.phone = Set(non_blank(input.phone));
        active.address = Set(non_blank(input.address));
        active.city = Set(non_blank(input.city));
        active.postal_code = Set(non_blank(input.postal_code));
        active.notes = Set(non_blank(input.notes));
        active.updated_at = Set(chrono::Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a client that has no requests.
    ///
    /// # Errors
    ///
    /// Returns an error if the client does not exist or still has requests.
    pub async fn delete(&self, id: i32) -> Result<(), ClientError> {
        let client = clients::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(ClientError::NotFound(id))?;

        let request_count = requests::Entity::find()
            .filter(requests::Column::ClientId.eq(id))
            .count(&self.db)
            .await?;
        if request_count > 0 {
            return Err(ClientError::HasRequests(request_count));
        }

        clients::Entity::delete_by_id(client.id)
            .exec(&self.db)
            .await?;
        Ok(())
    }
}
