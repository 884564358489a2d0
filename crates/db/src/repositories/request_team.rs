//! Team links for requests.
//!
//! Links are replaced wholesale: every call deletes all rows for the request
//! and inserts one row per submitted id, duplicates included. The legacy
//! `requests.team_id` column follows the first id.

use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use tracing::{debug, info};

use crate::entities::{request_teams, requests, teams};
use crate::repositories::request::RequestError;

/// Repository for the `request_teams` join table.
#[derive(Debug, Clone)]
pub struct RequestTeamRepository {
    db: DatabaseConnection,
}

impl RequestTeamRepository {
    /// Creates a new request-team repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Replaces the teams linked to a request.
    ///
    /// Returns the stored team ids in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or any team does not exist.
    pub async fn assign_multiple_teams(
        &self,
        request_id: i32,
        team_ids: &[i32],
    ) -> Result<Vec<i32>, RequestError> {
        let txn = self.db.begin().await?;

        if requests::Entity::find_by_id(request_id)
            .one(&txn)
            .await?
            .is_none()
        {
            return Err(RequestError::NotFound(request_id));
        }
        replace_teams(&txn, request_id, team_ids).await?;
        let stored = team_ids_for(&txn, request_id).await?;

        txn.commit().await?;
        info!(request_id, teams = ?stored, "Request teams assigned");
        Ok(stored)
    }

    /// Lists team ids linked to a request, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn team_ids(&self, request_id: i32) -> Result<Vec<i32>, RequestError> {
        Ok(team_ids_for(&self.db, request_id).await?)
    }
}

/// Deletes all team links for a request and inserts the given ids.
pub(crate) async fn replace_teams<C: ConnectionTrait>(
    conn: &C,
    request_id: i32,
    team_ids: &[i32],
) -> Result<(), RequestError> {
    ensure_teams_exist(conn, team_ids).await?;

    let removed = request_teams::Entity::delete_many()
        .filter(request_teams::Column::RequestId.eq(request_id))
        .exec(conn)
        .await?
        .rows_affected;

    if !team_ids.is_empty() {
        let rows = team_ids.iter().map(|team_id| request_teams::ActiveModel {
            request_id: Set(request_id),
            team_id: Set(*team_id),
            ..Default::default()
        });
        request_teams::Entity::insert_many(rows)
            .exec_without_returning(conn)
            .await?;
    }

    requests::Entity::update_many()
        .col_expr(
            requests::Column::TeamId,
            Expr::value(team_ids.first().copied()),
        )
        .filter(requests::Column::Id.eq(request_id))
        .exec(conn)
        .await?;

    debug!(
        request_id,
        removed,
        inserted = team_ids.len(),
        "Request team links replaced"
    );
    Ok(())
}

/// Points `requests.team_id` back at the first remaining team link.
pub(crate) async fn sync_legacy_team<C: ConnectionTrait>(
    conn: &C,
    request_id: i32,
) -> Result<Option<i32>, sea_orm::DbErr> {
    let first = team_ids_for(conn, request_id).await?.first().copied();
    requests::Entity::update_many()
        .col_expr(requests::Column::TeamId, Expr::value(first))
        .filter(requests::Column::Id.eq(request_id))
        .exec(conn)
        .await?;
    Ok(first)
}

pub(crate) async fn team_ids_for<C: ConnectionTrait>(
    conn: &C,
    request_id: i32,
) -> Result<Vec<i32>, sea_orm::DbErr> {
    request_teams::Entity::find()
        .select_only()
        .column(request_teams::Column::TeamId)
        .filter(request_teams::Column::RequestId.eq(request_id))
        .order_by_asc(request_teams::Column::Id)
        .into_tuple()
        .all(conn)
        .await
}

async fn ensure_teams_exist<C: ConnectionTrait>(
    conn: &C,
    team_ids: &[i32],
) -> Result<(), RequestError> {
    if team_ids.is_empty() {
        return Ok(());
    }
    let mut distinct = team_ids.to_vec();
    distinct.sort_unstable();
    distinct.dedup();

    let existing: Vec<i32> = teams::Entity::find()
        .select_only()
        .column(teams::Column::Id)
        .filter(teams::Column::Id.is_in(distinct.clone()))
        .into_tuple()
        .all(conn)
        .await?;

    match distinct.into_iter().find(|id| !existing.contains(id)) {
        Some(missing) => Err(RequestError::TeamNotFound(missing)),
        None => Ok(()),
    }
}
