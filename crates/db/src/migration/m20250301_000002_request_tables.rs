//! Request tables: requests and their team, item, volunteer and delivery links.
//!
//! `request_teams` cascades with its request. `request_volunteers.request_id`
//! has no foreign key, so volunteer links survive a request's deletion.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Requests::Table)
                    .if_not_exists()
                    .col(pk(Requests::Id))
                    .col(ColumnDef::new(Requests::ClientId).integer().not_null())
                    .col(ColumnDef::new(Requests::TeamId).integer().null())
                    .col(
                        ColumnDef::new(Requests::Status)
                            .string_len(32)
                            .not_null()
                            .default("new"),
                    )
                    .col(
                        ColumnDef::new(Requests::Priority)
                            .string_len(16)
                            .not_null()
                            .default("medium"),
                    )
                    .col(ColumnDef::new(Requests::Description).text().null())
                    .col(ColumnDef::new(Requests::Location).string().null())
                    .col(
                        ColumnDef::new(Requests::ScheduledAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(timestamp(Requests::CreatedAt))
                    .col(timestamp(Requests::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_requests_client")
                            .from(Requests::Table, Requests::ClientId)
                            .to(Clients::Table, Clients::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RequestTeams::Table)
                    .if_not_exists()
                    .col(pk(RequestTeams::Id))
                    .col(ColumnDef::new(RequestTeams::RequestId).integer().not_null())
                    .col(ColumnDef::new(RequestTeams::TeamId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_request_teams_request")
                            .from(RequestTeams::Table, RequestTeams::RequestId)
                            .to(Requests::Table, Requests::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_request_teams_team")
                            .from(RequestTeams::Table, RequestTeams::TeamId)
                            .to(Teams::Table, Teams::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RequestItems::Table)
                    .if_not_exists()
                    .col(pk(RequestItems::Id))
                    .col(ColumnDef::new(RequestItems::RequestId).integer().not_null())
                    .col(
                        ColumnDef::new(RequestItems::InventoryItemId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(RequestItems::Quantity).integer().not_null())
                    .col(
                        ColumnDef::new(RequestItems::Status)
                            .string_len(32)
                            .not_null()
                            .default("requested"),
                    )
                    .col(timestamp(RequestItems::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_request_items_request")
                            .from(RequestItems::Table, RequestItems::RequestId)
                            .to(Requests::Table, Requests::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_request_items_inventory_item")
                            .from(RequestItems::Table, RequestItems::InventoryItemId)
                            .to(InventoryItems::Table, InventoryItems::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RequestVolunteers::Table)
                    .if_not_exists()
                    .col(pk(RequestVolunteers::Id))
                    .col(
                        ColumnDef::new(RequestVolunteers::RequestId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RequestVolunteers::VolunteerId)
                            .integer()
                            .not_null(),
                    )
                    .col(timestamp(RequestVolunteers::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_request_volunteers_volunteer")
                            .from(RequestVolunteers::Table, RequestVolunteers::VolunteerId)
                            .to(Volunteers::Table, Volunteers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(DeliveryAssignments::Table)
                    .if_not_exists()
                    .col(pk(DeliveryAssignments::Id))
                    .col(
                        ColumnDef::new(DeliveryAssignments::RequestId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DeliveryAssignments::VolunteerId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(DeliveryAssignments::ScheduledDate).date().null())
                    .col(ColumnDef::new(DeliveryAssignments::CompletedDate).date().null())
                    .col(
                        ColumnDef::new(DeliveryAssignments::Status)
                            .string_len(32)
                            .not_null()
                            .default("scheduled"),
                    )
                    .col(ColumnDef::new(DeliveryAssignments::Notes).text().null())
                    .col(timestamp(DeliveryAssignments::CreatedAt))
                    .col(timestamp(DeliveryAssignments::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_delivery_assignments_request")
                            .from(DeliveryAssignments::Table, DeliveryAssignments::RequestId)
                            .to(Requests::Table, Requests::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_delivery_assignments_volunteer")
                            .from(DeliveryAssignments::Table, DeliveryAssignments::VolunteerId)
                            .to(Volunteers::Table, Volunteers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_requests_client")
                    .table(Requests::Table)
                    .col(Requests::ClientId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_requests_status")
                    .table(Requests::Table)
                    .col(Requests::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_request_teams_request")
                    .table(RequestTeams::Table)
                    .col(RequestTeams::RequestId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_request_items_request")
                    .table(RequestItems::Table)
                    .col(RequestItems::RequestId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_request_volunteers_request")
                    .table(RequestVolunteers::Table)
                    .col(RequestVolunteers::RequestId)
                    .col(RequestVolunteers::VolunteerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_delivery_assignments_request")
                    .table(DeliveryAssignments::Table)
                    .col(DeliveryAssignments::RequestId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(DeliveryAssignments::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(RequestVolunteers::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RequestItems::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RequestTeams::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Requests::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}

fn pk<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .integer()
        .not_null()
        .auto_increment()
        .primary_key()
        .to_owned()
}

fn timestamp<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .timestamp_with_time_zone()
        .not_null()
        .default(Expr::current_timestamp())
        .to_owned()
}

#[derive(DeriveIden)]
enum Clients {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Teams {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Volunteers {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum InventoryItems {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Requests {
    Table,
    Id,
    ClientId,
    TeamId,
    Status,
    Priority,
    Description,
    Location,
    ScheduledAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum RequestTeams {
    Table,
    Id,
    RequestId,
    TeamId,
}

#[derive(DeriveIden)]
enum RequestItems {
    Table,
    Id,
    RequestId,
    InventoryItemId,
    Quantity,
    Status,
    CreatedAt,
}

#[derive(DeriveIden)]
enum RequestVolunteers {
    Table,
    Id,
    RequestId,
    VolunteerId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum DeliveryAssignments {
    Table,
    Id,
    RequestId,
    VolunteerId,
    ScheduledDate,
    CompletedDate,
    Status,
    Notes,
    CreatedAt,
    UpdatedAt,
}
