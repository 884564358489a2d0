//! Volunteer repository for database operations.

use hwf_core::text::non_blank;
use hwf_core::volunteer::Availability;
use hwf_shared::AppError;
use hwf_shared::types::{PageRequest, PageResponse};
use sea_orm::sea_query::Query;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::debug;

use crate::entities::{skills, volunteer_skills, volunteers};
use crate::repositories::fetch_page;

/// Error types for volunteer operations.
#[derive(Debug, thiserror::Error)]
pub enum VolunteerError {
    /// Volunteer not found.
    #[error("Volunteer not found: {0}")]
    NotFound(i32),

    /// First or last name is blank.
    #[error("First and last name are required")]
    NameRequired,

    /// Referenced skill does not exist.
    #[error("Skill {0} does not exist")]
    SkillNotFound(i32),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<VolunteerError> for AppError {
    fn from(err: VolunteerError) -> Self {
        match err {
            VolunteerError::NotFound(_) => Self::NotFound(err.to_string()),
            VolunteerError::NameRequired | VolunteerError::SkillNotFound(_) => {
                Self::Validation(err.to_string())
            }
            VolunteerError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Input for creating or replacing a volunteer.
#[derive(Debug, Clone, Default)]
pub struct VolunteerInput {
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Email address.
    pub email: Option<String>,
    /// Phone number.
    pub phone: Option<String>,
    /// Has a vehicle for deliveries.
    pub has_transportation: bool,
    /// Currently taking assignments.
    pub is_active: bool,
    /// Weekly availability.
    pub availability: Option<Availability>,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// Filter options for listing volunteers.
#[derive(Debug, Clone, Default)]
pub struct VolunteerFilter {
    /// Filter by active flag.
    pub is_active: Option<bool>,
    /// Filter by transportation flag.
    pub has_transportation: Option<bool>,
    /// Only volunteers holding this skill.
    pub skill_id: Option<i32>,
}

/// Volunteer with linked skill ids.
#[derive(Debug, Clone)]
pub struct VolunteerDetails {
    /// The volunteer record.
    pub volunteer: volunteers::Model,
    /// Skills held, ascending.
    pub skill_ids: Vec<i32>,
}

impl VolunteerDetails {
    /// Decodes the stored availability, if any.
    ///
    /// Unreadable stored text is treated as absent.
    #[must_use]
    pub fn availability(&self) -> Option<Availability> {
        self.volunteer
            .availability
            .as_deref()
            .and_then(|text| Availability::parse(text).ok())
    }
}

/// Volunteer repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct VolunteerRepository {
    db: DatabaseConnection,
}

impl VolunteerRepository {
    /// Creates a new volunteer repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a volunteer.
    ///
    /// # Errors
    ///
    /// Returns an error if a name is blank or the insert fails.
    pub async fn create(&self, input: VolunteerInput) -> Result<volunteers::Model, VolunteerError> {
        validate_names(&input)?;

        let now = chrono::Utc::now().into();
        let volunteer = volunteers::ActiveModel {
            first_name: Set(input.first_name.trim().to_string()),
            last_name: Set(input.last_name.trim().to_string()),
            email: Set(non_blank(input.email)),
            phone: Set(non_blank(input.phone)),
            has_transportation: Set(input.has_transportation),
            is_active: Set(input.is_active),
            availability: Set(input.availability.as_ref().map(Availability::to_json)),
            notes: Set(non_blank(input.notes)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        Ok(volunteer.insert(&self.db).await?)
    }

    /// Finds a volunteer with skill ids.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: i32) -> Result<Option<VolunteerDetails>, VolunteerError> {
        let Some(volunteer) = volunteers::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };
        let skill_ids = skill_ids_for(&self.db, id).await?;
        Ok(Some(VolunteerDetails {
            volunteer,
            skill_ids,
        }))
    }

    /// Lists volunteers by last name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        filter: VolunteerFilter,
        page: &PageRequest,
    ) -> Result<PageResponse<volunteers::Model>, VolunteerError> {
        let mut query = volunteers::Entity::find()
            .order_by_asc(volunteers::Column::LastName)
            .order_by_asc(volunteers::Column::FirstName)
            .order_by_asc(volunteers::Column::Id);

        if let Some(is_active) = filter.is_active {
            query = query.filter(volunteers::Column::IsActive.eq(is_active));
        }
        if let Some(has_transportation) = filter.has_transportation {
            query = query.filter(volunteers::Column::HasTransportation.eq(has_transportation));
        }
        if let Some(skill_id) = filter.skill_id {
            query = query.filter(
                volunteers::Column::Id.in_subquery(
                    Query::select()
                        .column(volunteer_skills::Column::VolunteerId)
                        .from(volunteer_skills::Entity)
                        .and_where(volunteer_skills::Column::SkillId.eq(skill_id))
                        .to_owned(),
                ),
            );
        }

        Ok(fetch_page(query, &self.db, page).await?)
    }

    /// Replaces a volunteer's fields. Skills are left untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the volunteer does not exist or a name is blank.
    pub async fn update(
        &self,
        id: i32,
        input: VolunteerInput,
    ) -> Result<volunteers::Model, VolunteerError> {
        validate_names(&input)?;

        let volunteer = volunteers::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(VolunteerError::NotFound(id))?;

        let mut active: volunteers::ActiveModel = volunteer.into();
        active.first_name = Set(input.first_name.trim().to_string());
        active.last_name = Set(input.last_name.trim().to_string());
        active.email = Set(non_blank(input.email));
        active.phone = Set(non_blank(input.phone));
        active.has_transportation = Set(input.has_transportation);
        active.is_active = Set(input.is_active);
        active.availability = Set(input.availability.as_ref().map(Availability::to_json));
        active.notes = Set(non_blank(input.notes));
        active.updated_at = Set(chrono::Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a volunteer. Skill, team, request and delivery links go with it.
    ///
    /// # Errors
    ///
    /// Returns an error if the volunteer does not exist.
    pub async fn delete(&self, id: i32) -> Result<(), VolunteerError> {
        let result = volunteers::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(VolunteerError::NotFound(id));
        }
        Ok(())
    }

    /// Replaces the skills a volunteer holds. Duplicate ids collapse.
    ///
    /// # Errors
    ///
    /// Returns an error if the volunteer or any skill does not exist.
    pub async fn replace_skills(
        &self,
        volunteer_id: i32,
        skill_ids: &[i32],
    ) -> Result<Vec<i32>, VolunteerError> {
        let mut wanted = skill_ids.to_vec();
        wanted.sort_unstable();
        wanted.dedup();

        let txn = self.db.begin().await?;

        if volunteers::Entity::find_by_id(volunteer_id)
            .one(&txn)
            .await?
            .is_none()
        {
            return Err(VolunteerError::NotFound(volunteer_id));
        }

        let existing: Vec<i32> = skills::Entity::find()
            .select_only()
            .column(skills::Column::Id)
            .filter(skills::Column::Id.is_in(wanted.clone()))
            .into_tuple()
            .all(&txn)
            .await?;
        if let Some(missing) = wanted.iter().find(|id| !existing.contains(id)) {
            return Err(VolunteerError::SkillNotFound(*missing));
        }

        volunteer_skills::Entity::delete_many()
            .filter(volunteer_skills::Column::VolunteerId.eq(volunteer_id))
            .exec(&txn)
            .await?;

        if !wanted.is_empty() {
            let rows = wanted.iter().map(|skill_id| volunteer_skills::ActiveModel {
                volunteer_id: Set(volunteer_id),
                skill_id: Set(*skill_id),
            });
            volunteer_skills::Entity::insert_many(rows)
                .exec_without_returning(&txn)
                .await?;
        }

        txn.commit().await?;
        debug!(volunteer_id, count = wanted.len(), "Volunteer skills replaced");
        Ok(wanted)
    }
}

fn validate_names(input: &VolunteerInput) -> Result<(), VolunteerError> {
    if input.first_name.trim().is_empty() || input.last_name.trim().is_empty() {
        return Err(VolunteerError::NameRequired);
    }
    Ok(())
}

async fn skill_ids_for<C: ConnectionTrait>(conn: &C, volunteer_id: i32) -> Result<Vec<i32>, DbErr> {
    volunteer_skills::Entity::find()
        .select_only()
        .column(volunteer_skills::Column::SkillId)
        .filter(volunteer_skills::Column::VolunteerId.eq(volunteer_id))
        .order_by_asc(volunteer_skills::Column::SkillId)
        .into_tuple()
        .all(conn)
        .await
}
