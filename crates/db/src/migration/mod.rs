//! Database migrations.
//!
//! Migrations are managed using sea-orm-migration. Tables are declared with
//! the schema builder so the same migrations run on PostgreSQL and SQLite.

pub use sea_orm_migration::prelude::*;

mod m20250301_000001_directory_tables;
mod m20250301_000002_request_tables;

/// Migrator for running database migrations.
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_directory_tables::Migration),
            Box::new(m20250301_000002_request_tables::Migration),
        ]
    }
}
