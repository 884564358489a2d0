//! Shared setup for database integration tests.
//!
//! Every test gets its own in-memory SQLite database with migrations applied.
//! The pool holds exactly one connection so the database lives as long as
//! the pool does.

#![allow(dead_code)]

use hwf_core::request::{ProductLine, RequestDraft};
use hwf_db::repositories::{
    ClientInput, ClientRepository, InventoryInput, InventoryRepository, TeamInput,
    TeamRepository, VolunteerInput, VolunteerRepository,
};
use hwf_db::{connect_with, run_migrations};
use hwf_shared::DatabaseConfig;
use sea_orm::DatabaseConnection;

/// Opens a fresh, migrated in-memory database.
pub async fn setup_db() -> DatabaseConnection {
    let mut config = DatabaseConfig::with_url("sqlite::memory:");
    config.max_connections = 1;
    config.min_connections = 1;

    let db = connect_with(&config).await.expect("connect to sqlite");
    run_migrations(&db).await.expect("apply migrations");
    db
}

/// Rows most request tests need.
pub struct Fixture {
    pub client_id: i32,
    pub team_ids: Vec<i32>,
    pub volunteer_id: i32,
    /// Inventory item with 10 units on hand.
    pub item_id: i32,
    /// Inventory item with 2 units on hand.
    pub scarce_item_id: i32,
}

impl Fixture {
    /// A draft for the fixture's client with nothing linked.
    pub fn draft(&self) -> RequestDraft {
        RequestDraft::for_client(self.client_id)
    }

    /// A draft with teams and one product line.
    pub fn draft_with(&self, team_ids: &[i32], products: &[(i32, i32)]) -> RequestDraft {
        let mut draft = self.draft();
        draft.team_ids = team_ids.to_vec();
        draft.products = products
            .iter()
            .map(|(item, qty)| ProductLine::new(*item, *qty))
            .collect();
        draft
    }
}

/// Inserts one client, three teams, one volunteer and two inventory items.
pub async fn seed(db: &DatabaseConnection) -> Fixture {
    let client = ClientRepository::new(db.clone())
        .create(ClientInput {
            first_name: "Amina".into(),
            last_name: "Haddad".into(),
            city: Some("Halifax".into()),
            ..ClientInput::default()
        })
        .await
        .expect("create client");

    let teams = TeamRepository::new(db.clone());
    let mut team_ids = Vec::new();
    for name in ["North Crew", "South Crew", "Pickup Crew"] {
        let team = teams
            .create(TeamInput {
                name: name.into(),
                ..TeamInput::default()
            })
            .await
            .expect("create team");
        team_ids.push(team.id);
    }

    let volunteer = VolunteerRepository::new(db.clone())
        .create(VolunteerInput {
            first_name: "Jonas".into(),
            last_name: "Berg".into(),
            has_transportation: true,
            is_active: true,
            ..VolunteerInput::default()
        })
        .await
        .expect("create volunteer");

    let inventory = InventoryRepository::new(db.clone());
    let item = inventory
        .create(InventoryInput {
            name: "Single bed frame".into(),
            category: Some("furniture".into()),
            quantity: 10,
            ..InventoryInput::default()
        })
        .await
        .expect("create item");
    let scarce = inventory
        .create(InventoryInput {
            name: "Microwave".into(),
            category: Some("appliances".into()),
            quantity: 2,
            ..InventoryInput::default()
        })
        .await
        .expect("create scarce item");

    Fixture {
        client_id: client.id,
        team_ids,
        volunteer_id: volunteer.id,
        item_id: item.id,
        scarce_item_id: scarce.id,
    }
}
