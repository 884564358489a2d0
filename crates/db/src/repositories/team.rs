//! Team repository: teams, their members and their skills.

use hwf_core::text::non_blank;
use hwf_shared::AppError;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::Serialize;
use tracing::debug;

use crate::entities::{
    request_teams, requests, skills, team_members, team_skills, teams, volunteers,
};
use crate::repositories::request_team::sync_legacy_team;

/// Error types for team operations.
#[derive(Debug, thiserror::Error)]
pub enum TeamError {
    /// Team not found.
    #[error("Team not found: {0}")]
    NotFound(i32),

    /// Name is blank.
    #[error("Team name is required")]
    NameRequired,

    /// Referenced volunteer does not exist.
    #[error("Volunteer {0} does not exist")]
    VolunteerNotFound(i32),

    /// Referenced skill does not exist.
    #[error("Skill {0} does not exist")]
    SkillNotFound(i32),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<TeamError> for AppError {
    fn from(err: TeamError) -> Self {
        match err {
            TeamError::NotFound(_) => Self::NotFound(err.to_string()),
            TeamError::NameRequired
            | TeamError::VolunteerNotFound(_)
            | TeamError::SkillNotFound(_) => Self::Validation(err.to_string()),
            TeamError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Input for creating or replacing a team.
#[derive(Debug, Clone, Default)]
pub struct TeamInput {
    /// Team name.
    pub name: String,
    /// Description.
    pub description: Option<String>,
    /// Volunteer leading the team.
    pub lead_volunteer_id: Option<i32>,
}

/// Team with member and skill ids.
#[derive(Debug, Clone, Serialize)]
pub struct TeamDetails {
    /// The team record.
    #[serde(flatten)]
    pub team: teams::Model,
    /// Member volunteer ids, ascending.
    pub member_ids: Vec<i32>,
    /// Skill ids, ascending.
    pub skill_ids: Vec<i32>,
}

/// Team repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct TeamRepository {
    db: DatabaseConnection,
}

impl TeamRepository {
    /// Creates a new team repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a team.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank or the lead volunteer is unknown.
    pub async fn create(&self, input: TeamInput) -> Result<teams::Model, TeamError> {
        let name = input.name.trim().to_string();
        if name.is_empty() {
            return Err(TeamError::NameRequired);
        }
        self.check_lead(input.lead_volunteer_id).await?;

        let now = chrono::Utc::now().into();
        let team = teams::ActiveModel {
            name: Set(name),
            description: Set(non_blank(input.description)),
            lead_volunteer_id: Set(input.lead_volunteer_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        Ok(team.insert(&self.db).await?)
    }

    /// Finds a team with its members and skills.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: i32) -> Result<Option<TeamDetails>, TeamError> {
        let Some(team) = teams::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let member_ids = team_members::Entity::find()
            .select_only()
            .column(team_members::Column::VolunteerId)
            .filter(team_members::Column::TeamId.eq(id))
            .order_by_asc(team_members::Column::VolunteerId)
            .into_tuple()
            .all(&self.db)
            .await?;

        let skill_ids = team_skills::Entity::find()
            .select_only()
            .column(team_skills::Column::SkillId)
            .filter(team_skills::Column::TeamId.eq(id))
            .order_by_asc(team_skills::Column::SkillId)
            .into_tuple()
            .all(&self.db)
            .await?;

        Ok(Some(TeamDetails {
            team,
            member_ids,
            skill_ids,
        }))
    }

    /// Lists all teams by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<teams::Model>, TeamError> {
        Ok(teams::Entity::find()
            .order_by_asc(teams::Column::Name)
            .order_by_asc(teams::Column::Id)
            .all(&self.db)
            .await?)
    }

    /// Replaces a team's fields. Members and skills are left untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the team does not exist, the name is blank, or
    /// the lead volunteer is unknown.
    pub async fn update(&self, id: i32, input: TeamInput) -> Result<teams::Model, TeamError> {
        let team = teams::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(TeamError::NotFound(id))?;

        let name = input.name.trim().to_string();
        if name.is_empty() {
            return Err(TeamError::NameRequired);
        }
        self.check_lead(input.lead_volunteer_id).await?;

        let mut active: teams::ActiveModel = team.into();
        active.name = Set(name);
        active.description = Set(non_blank(input.description));
        active.lead_volunteer_id = Set(input.lead_volunteer_id);
        active.updated_at = Set(chrono::Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a team. Member, skill and request links go with it.
    ///
    /// Requests that pointed at the team get their legacy `team_id` moved to
    /// the first remaining linked team, or cleared.
    ///
    /// # Errors
    ///
    /// Returns an error if the team does not exist.
    pub async fn delete(&self, id: i32) -> Result<(), TeamError> {
        let txn = self.db.begin().await?;

        let mut affected: Vec<i32> = request_teams::Entity::find()
            .select_only()
            .column(request_teams::Column::RequestId)
            .filter(request_teams::Column::TeamId.eq(id))
            .into_tuple()
            .all(&txn)
            .await?;
        let legacy: Vec<i32> = requests::Entity::find()
            .select_only()
            .column(requests::Column::Id)
            .filter(requests::Column::TeamId.eq(id))
            .into_tuple()
            .all(&txn)
            .await?;
        affected.extend(legacy);
        affected.sort_unstable();
        affected.dedup();

        let result = teams::Entity::delete_by_id(id).exec(&txn).await?;
        if result.rows_affected == 0 {
            return Err(TeamError::NotFound(id));
        }
        for request_id in &affected {
            sync_legacy_team(&txn, *request_id).await?;
        }

        txn.commit().await?;
        debug!(team_id = id, requests = affected.len(), "Team deleted");
        Ok(())
    }

    /// Replaces the volunteers on a team. Duplicate ids collapse.
    ///
    /// # Errors
    ///
    /// Returns an error if the team or any volunteer does not exist.
    pub async fn replace_members(
        &self,
        team_id: i32,
        volunteer_ids: &[i32],
    ) -> Result<Vec<i32>, TeamError> {
        let wanted = sorted_unique(volunteer_ids);
        let txn = self.db.begin().await?;
        ensure_team(&txn, team_id).await?;

        let existing: Vec<i32> = volunteers::Entity::find()
            .select_only()
            .column(volunteers::Column::Id)
            .filter(volunteers::Column::Id.is_in(wanted.clone()))
            .into_tuple()
            .all(&txn)
            .await?;
        if let Some(missing) = wanted.iter().find(|id| !existing.contains(id)) {
            return Err(TeamError::VolunteerNotFound(*missing));
        }

        team_members::Entity::delete_many()
            .filter(team_members::Column::TeamId.eq(team_id))
            .exec(&txn)
            .await?;
        if !wanted.is_empty() {
            let rows = wanted.iter().map(|volunteer_id| team_members::ActiveModel {
                team_id: Set(team_id),
                volunteer_id: Set(*volunteer_id),
            });
            team_members::Entity::insert_many(rows)
                .exec_without_returning(&txn)
                .await?;
        }

        txn.commit().await?;
        debug!(team_id, count = wanted.len(), "Team members replaced");
        Ok(wanted)
    }

    /// Replaces the skills a team covers. Duplicate ids collapse.
    ///
    /// # Errors
    ///
    /// Returns an error if the team or any skill does not exist.
    pub async fn replace_skills(
        &self,
        team_id: i32,
        skill_ids: &[i32],
    ) -> Result<Vec<i32>, TeamError> {
        let wanted = sorted_unique(skill_ids);
        let txn = self.db.begin().await?;
        ensure_team(&txn, team_id).await?;

        let existing: Vec<i32> = skills::Entity::find()
            .select_only()
            .column(skills::Column::Id)
            .filter(skills::Column::Id.is_in(wanted.clone()))
            .into_tuple()
            .all(&txn)
            .await?;
        if let Some(missing) = wanted.iter().find(|id| !existing.contains(id)) {
            return Err(TeamError::SkillNotFound(*missing));
        }

        team_skills::Entity::delete_many()
            .filter(team_skills::Column::TeamId.eq(team_id))
            .exec(&txn)
            .await?;
        if !wanted.is_empty() {
            let rows = wanted.iter().map(|skill_id| team_skills::ActiveModel {
                team_id: Set(team_id),
                skill_id: Set(*skill_id),
            });
            team_skills::Entity::insert_many(rows)
                .exec_without_returning(&txn)
                .await?;
        }

        txn.commit().await?;
        debug!(team_id, count = wanted.len(), "Team skills replaced");
        Ok(wanted)
    }

    async fn check_lead(&self, lead_volunteer_id: Option<i32>) -> Result<(), TeamError> {
        if let Some(lead) = lead_volunteer_id {
            let count = volunteers::Entity::find_by_id(lead).count(&self.db).await?;
            if count == 0 {
                return Err(TeamError::VolunteerNotFound(lead));
            }
        }
        Ok(())
    }
}

async fn ensure_team<C: ConnectionTrait>(conn: &C, team_id: i32) -> Result<(), TeamError> {
    if teams::Entity::find_by_id(team_id).one(conn).await?.is_none() {
        return Err(TeamError::NotFound(team_id));
    }
    Ok(())
}

fn sorted_unique(ids: &[i32]) -> Vec<i32> {
    let mut ids = ids.to_vec();
    ids.sort_unstable();
    ids.dedup();
    ids
}
