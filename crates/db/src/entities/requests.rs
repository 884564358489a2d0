//! `SeaORM` Entity for requests table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "requests")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub client_id: i32,
    /// Single-team column kept alongside `request_teams` for older readers.
    pub team_id: Option<i32>,
    pub status: String,
    pub priority: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub location: Option<String>,
    pub scheduled_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::clients::Entity",
        from = "Column::ClientId",
        to = "super::clients::Column::Id"
    )]
    Clients,
    #[sea_orm(has_many = "super::request_teams::Entity")]
    RequestTeams,
    #[sea_orm(has_many = "super::request_items::Entity")]
    RequestItems,
    #[sea_orm(has_many = "super::delivery_assignments::Entity")]
    DeliveryAssignments,
}

impl Related<super::clients::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Clients.def()
    }
}

impl Related<super::request_teams::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RequestTeams.def()
    }
}

impl Related<super::request_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RequestItems.def()
    }
}

impl Related<super::delivery_assignments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DeliveryAssignments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
