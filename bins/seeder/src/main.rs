//! Schema setup for HWF Donations development and testing.
//!
//! Applies migrations and optionally loads a small sample data set: clients,
//! skills, volunteers, teams, inventory and one request created through the
//! normal request workflow.
//!
//! Usage:
//!   setup-db                      - Apply pending migrations
//!   setup-db --fresh              - Drop all tables and re-apply migrations
//!   setup-db --with-sample-data   - Also insert sample rows (skipped when
//!                                   clients already exist)

use anyhow::Context;
use chrono::Weekday;
use clap::Parser;
use hwf_core::request::{ProductLine, RequestDraft, RequestPriority, RequestStatus};
use hwf_core::volunteer::Availability;
use hwf_db::migration::Migrator;
use hwf_db::repositories::{
    ClientFilter, ClientInput, ClientRepository, InventoryInput, InventoryRepository,
    RequestRepository, SkillInput, SkillRepository, TeamInput, TeamRepository, VolunteerInput,
    VolunteerRepository,
};
use hwf_shared::AppConfig;
use hwf_shared::types::PageRequest;
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;

#[derive(Parser)]
#[command(name = "setup-db")]
#[command(about = "Create the HWF Donations schema and optional sample data")]
struct Cli {
    /// Insert sample clients, volunteers, teams, inventory and a request.
    #[arg(long, default_value_t = false)]
    with_sample_data: bool,
    /// Drop every table before applying migrations.
    #[arg(long, default_value_t = false)]
    fresh: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = AppConfig::load().context("Failed to load configuration")?;

    println!("Connecting to database...");
    let db = hwf_db::connect_with(&config.database)
        .await
        .context("Failed to connect to database")?;

    if cli.fresh {
        println!("Dropping tables and re-applying migrations...");
        Migrator::fresh(&db).await?;
    } else {
        println!("Applying migrations...");
        hwf_db::run_migrations(&db).await?;
    }

    if cli.with_sample_data {
        seed_sample_data(&db).await?;
    }

    println!("Database ready!");
    Ok(())
}

async fn seed_sample_data(db: &DatabaseConnection) -> anyhow::Result<()> {
    let clients = ClientRepository::new(db.clone());
    let existing = clients
        .list(ClientFilter::default(), &PageRequest::default())
        .await?;
    if existing.meta.total > 0 {
        println!("  Clients already exist, skipping sample data...");
        return Ok(());
    }

    println!("Seeding clients...");
    let mut client_ids = Vec::new();
    for (first, last, city) in [
        ("Amina", "Haddad", "Halifax"),
        ("Daniel", "Okafor", "Dartmouth"),
        ("Mei", "Chen", "Bedford"),
    ] {
        let client = clients
            .create(ClientInput {
                first_name: first.into(),
                last_name: last.into(),
                city: Some(city.into()),
                ..ClientInput::default()
            })
            .await?;
        client_ids.push(client.id);
    }

    println!("Seeding skills...");
    let skills = SkillRepository::new(db.clone());
    let mut skill_ids = Vec::new();
    for (name, description) in [
        ("Driving", "Has a licence and can drive the van"),
        ("Heavy lifting", "Comfortable carrying furniture"),
        ("Assembly", "Can assemble bed frames and shelving"),
    ] {
        let skill = skills
            .create(SkillInput {
                name: name.into(),
                description: Some(description.into()),
            })
            .await?;
        skill_ids.push(skill.id);
    }

    println!("Seeding volunteers...");
    let volunteers = VolunteerRepository::new(db.clone());
    let mut volunteer_ids = Vec::new();
    for (first, last, drives, days) in [
        ("Jonas", "Berg", true, vec![Weekday::Sat, Weekday::Sun]),
        ("Priya", "Nair", false, vec![Weekday::Tue, Weekday::Thu]),
        ("Rosa", "Diaz", true, vec![Weekday::Mon, Weekday::Wed, Weekday::Fri]),
    ] {
        let volunteer = volunteers
            .create(VolunteerInput {
                first_name: first.into(),
                last_name: last.into(),
                has_transportation: drives,
                is_active: true,
                availability: Some(Availability::new(days, None)),
                ..VolunteerInput::default()
            })
            .await?;
        let held: &[i32] = if drives {
            &skill_ids[..2]
        } else {
            &skill_ids[2..]
        };
        volunteers.replace_skills(volunteer.id, held).await?;
        volunteer_ids.push(volunteer.id);
    }

    println!("Seeding teams...");
    let teams = TeamRepository::new(db.clone());
    let mut team_ids = Vec::new();
    for (name, lead, members) in [
        ("Weekend Delivery", volunteer_ids[0], vec![volunteer_ids[0], volunteer_ids[1]]),
        ("Weekday Pickup", volunteer_ids[2], vec![volunteer_ids[2]]),
    ] {
        let team = teams
            .create(TeamInput {
                name: name.into(),
                description: None,
                lead_volunteer_id: Some(lead),
            })
            .await?;
        teams.replace_members(team.id, &members).await?;
        team_ids.push(team.id);
    }

    println!("Seeding inventory...");
    let inventory = InventoryRepository::new(db.clone());
    let mut item_ids = Vec::new();
    for (name, category, quantity, unit) in [
        ("Single bed frame", "furniture", 6, "piece"),
        ("Mattress", "furniture", 4, "piece"),
        ("Kitchen starter kit", "kitchen", 12, "box"),
        ("Winter coat", "clothing", 25, "piece"),
        ("Microwave", "appliances", 2, "piece"),
    ] {
        let item = inventory
            .create(InventoryInput {
                name: name.into(),
                category: Some(category.into()),
                quantity,
                unit: Some(unit.into()),
                ..InventoryInput::default()
            })
            .await?;
        item_ids.push(item.id);
    }

    println!("Seeding a request...");
    let mut draft = RequestDraft::for_client(client_ids[0]);
    draft.team_ids = team_ids.clone();
    draft.volunteer_id = Some(volunteer_ids[0]);
    draft.status = RequestStatus::InProgress;
    draft.priority = RequestPriority::High;
    draft.description = Some("Furnishing a first apartment".into());
    draft.location = Some("Halifax".into());
    draft.products = vec![
        ProductLine::new(item_ids[0], 1),
        ProductLine::new(item_ids[1], 1),
        ProductLine::new(item_ids[2], 1),
    ];
    let saved = RequestRepository::new(db.clone())
        .create_request(draft)
        .await?;
    println!("  Request {} created", saved.request.request.id);

    Ok(())
}
