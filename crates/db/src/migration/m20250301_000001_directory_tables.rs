//! Directory tables: clients, volunteers, skills, teams, inventory.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Clients::Table)
                    .if_not_exists()
                    .col(pk(Clients::Id))
                    .col(ColumnDef::new(Clients::FirstName).string().not_null())
                    .col(ColumnDef::new(Clients::LastName).string().not_null())
                    .col(ColumnDef::new(Clients::Email).string().null())
                    .col(ColumnDef::new(Clients::Phone).string().null())
                    .col(ColumnDef::new(Clients::Address).string().null())
                    .col(ColumnDef::new(Clients::City).string().null())
                    .col(ColumnDef::new(Clients::PostalCode).string().null())
                    .col(ColumnDef::new(Clients::Notes).text().null())
                    .col(timestamp(Clients::CreatedAt))
                    .col(timestamp(Clients::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Volunteers::Table)
                    .if_not_exists()
                    .col(pk(Volunteers::Id))
                    .col(ColumnDef::new(Volunteers::FirstName).string().not_null())
                    .col(ColumnDef::new(Volunteers::LastName).string().not_null())
                    .col(ColumnDef::new(Volunteers::Email).string().null())
                    .col(ColumnDef::new(Volunteers::Phone).string().null())
                    .col(
                        ColumnDef::new(Volunteers::HasTransportation)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Volunteers::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Volunteers::Availability).text().null())
                    .col(ColumnDef::new(Volunteers::Notes).text().null())
                    .col(timestamp(Volunteers::CreatedAt))
                    .col(timestamp(Volunteers::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Skills::Table)
                    .if_not_exists()
                    .col(pk(Skills::Id))
                    .col(ColumnDef::new(Skills::Name).string().not_null().unique_key())
                    .col(ColumnDef::new(Skills::Description).text().null())
                    .col(timestamp(Skills::CreatedAt))
                    .col(timestamp(Skills::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(VolunteerSkills::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(VolunteerSkills::VolunteerId).integer().not_null())
                    .col(ColumnDef::new(VolunteerSkills::SkillId).integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(VolunteerSkills::VolunteerId)
                            .col(VolunteerSkills::SkillId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_volunteer_skills_volunteer")
                            .from(VolunteerSkills::Table, VolunteerSkills::VolunteerId)
                            .to(Volunteers::Table, Volunteers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_volunteer_skills_skill")
                            .from(VolunteerSkills::Table, VolunteerSkills::SkillId)
                            .to(Skills::Table, Skills::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Teams::Table)
                    .if_not_exists()
                    .col(pk(Teams::Id))
                    .col(ColumnDef::new(Teams::Name).string().not_null())
                    .col(ColumnDef::new(Teams::Description).text().null())
                    .col(ColumnDef::new(Teams::LeadVolunteerId).integer().null())
                    .col(timestamp(Teams::CreatedAt))
                    .col(timestamp(Teams::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_teams_lead_volunteer")
                            .from(Teams::Table, Teams::LeadVolunteerId)
                            .to(Volunteers::Table, Volunteers::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TeamMembers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(TeamMembers::TeamId).integer().not_null())
                    .col(ColumnDef::new(TeamMembers::VolunteerId).integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(TeamMembers::TeamId)
                            .col(TeamMembers::VolunteerId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_team_members_team")
                            .from(TeamMembers::Table, TeamMembers::TeamId)
                            .to(Teams::Table, Teams::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_team_members_volunteer")
                            .from(TeamMembers::Table, TeamMembers::VolunteerId)
                            .to(Volunteers::Table, Volunteers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TeamSkills::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(TeamSkills::TeamId).integer().not_null())
                    .col(ColumnDef::new(TeamSkills::SkillId).integer().not_null())
                    .primary_key(Index::create().col(TeamSkills::TeamId).col(TeamSkills::SkillId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_team_skills_team")
                            .from(TeamSkills::Table, TeamSkills::TeamId)
                            .to(Teams::Table, Teams::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_team_skills_skill")
                            .from(TeamSkills::Table, TeamSkills::SkillId)
                            .to(Skills::Table, Skills::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(InventoryItems::Table)
                    .if_not_exists()
                    .col(pk(InventoryItems::Id))
                    .col(ColumnDef::new(InventoryItems::Name).string().not_null())
                    .col(ColumnDef::new(InventoryItems::Description).text().null())
                    .col(ColumnDef::new(InventoryItems::Category).string().null())
                    .col(
                        ColumnDef::new(InventoryItems::Quantity)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(InventoryItems::Unit).string().null())
                    .col(ColumnDef::new(InventoryItems::Location).string().null())
                    .col(
                        ColumnDef::new(InventoryItems::IsAvailable)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(timestamp(InventoryItems::CreatedAt))
                    .col(timestamp(InventoryItems::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_clients_last_name")
                    .table(Clients::Table)
                    .col(Clients::LastName)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_inventory_items_category")
                    .table(InventoryItems::Table)
                    .col(InventoryItems::Category)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TeamSkills::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TeamMembers::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Teams::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(VolunteerSkills::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Skills::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Volunteers::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(InventoryItems::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Clients::Table).if_exists().to_owned())
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
    FirstName,
    LastName,
    Email,
    Phone,
    Address,
    City,
    PostalCode,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Volunteers {
    Table,
    Id,
    FirstName,
    LastName,
    Email,
    Phone,
    HasTransportation,
    IsActive,
    Availability,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Skills {
    Table,
    Id,
    Name,
    Description,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum VolunteerSkills {
    Table,
    VolunteerId,
    SkillId,
}

#[derive(DeriveIden)]
enum Teams {
    Table,
    Id,
    Name,
    Description,
    LeadVolunteerId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum TeamMembers {
    Table,
    TeamId,
    VolunteerId,
}

#[derive(DeriveIden)]
enum TeamSkills {
    Table,
    TeamId,
    SkillId,
}

#[derive(DeriveIden)]
enum InventoryItems {
    Table,
    Id,
    Name,
    Description,
    Category,
    Quantity,
    Unit,
    Location,
    IsAvailable,
    CreatedAt,
    UpdatedAt,
}
