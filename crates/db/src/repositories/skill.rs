//! Skill repository for database operations.

use hwf_core::text::non_blank;
use hwf_shared::AppError;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};

use crate::entities::skills;

/// Error types for skill operations.
#[derive(Debug, thiserror::Error)]
pub enum SkillError {
    /// Skill not found.
    #[error("Skill not found: {0}")]
    NotFound(i32),

    /// Name is blank.
    #[error("Skill name is required")]
    NameRequired,

    /// Another skill already uses the name.
    #[error("Skill '{0}' already exists")]
    DuplicateName(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<SkillError> for AppError {
    fn from(err: SkillError) -> Self {
        match err {
            SkillError::NotFound(_) => Self::NotFound(err.to_string()),
            SkillError::NameRequired => Self::Validation(err.to_string()),
            SkillError::DuplicateName(_) => Self::Conflict(err.to_string()),
            SkillError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Input for creating or replacing a skill.
#[derive(Debug, Clone, Default)]
pub struct SkillInput {
    /// Unique skill name.
    pub name: String,
    /// Description.
    pub description: Option<String>,
}

/// Skill repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct SkillRepository {
    db: DatabaseConnection,
}

impl SkillRepository {
    /// Creates a new skill repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a skill with a unique name.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank or taken.
    pub async fn create(&self, input: SkillInput) -> Result<skills::Model, SkillError> {
        let name = input.name.trim().to_string();
        if name.is_empty() {
            return Err(SkillError::NameRequired);
        }
        if self.name_taken(&name, None).await? {
            return Err(SkillError::DuplicateName(name));
        }

        let now = chrono::Utc::now().into();
        let skill = skills::ActiveModel {
            name: Set(name),
            description: Set(non_blank(input.description)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        Ok(skill.insert(&self.db).await?)
    }

    /// Finds a skill by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: i32) -> Result<Option<skills::Model>, SkillError> {
        Ok(skills::Entity::find_by_id(id).one(&self.db).await?)
    }

    /// Lists all skills by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<skills::Model>, SkillError> {
        Ok(skills::Entity::find()
            .order_by_asc(skills::Column::Name)
            .all(&self.db)
            .await?)
    }

    /// Replaces a skill's name and description.
    ///
    /// # Errors
    ///
    /// Returns an error if the skill does not exist or the new name is taken.
    pub async fn update(&self, id: i32, input: SkillInput) -> Result<skills::Model, SkillError> {
        let skill = skills::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(SkillError::NotFound(id))?;

        let name = input.name.trim().to_string();
        if name.is_empty() {
            return Err(SkillError::NameRequired);
        }
        if name != skill.name && self.name_taken(&name, Some(id)).await? {
            return Err(SkillError::DuplicateName(name));
        }

        let mut active: skills::ActiveModel = skill.into();
        active.name = Set(name);
        active.description = Set(non_blank(input.description));
        active.updated_at = Set(chrono::Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a skill. Volunteer and team links go with it.
    ///
    /// # Errors
    ///
    /// Returns an error if the skill does not exist.
    pub async fn delete(&self, id: i32) -> Result<(), SkillError> {
        let result = skills::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(SkillError::NotFound(id));
        }
        Ok(())
    }

    async fn name_taken(&self, name: &str, except: Option<i32>) -> Result<bool, SkillError> {
        let mut query = skills::Entity::find().filter(skills::Column::Name.eq(name));
        if let Some(id) = except {
            query = query.filter(skills::Column::Id.ne(id));
        }
        Ok(query.count(&self.db).await? > 0)
    }
}
