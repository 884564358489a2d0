//! `SeaORM` entity definitions.

pub mod clients;
pub mod delivery_assignments;
pub mod inventory_items;
pub mod request_items;
pub mod request_teams;
pub mod request_volunteers;
pub mod requests;
pub mod skills;
pub mod team_members;
pub mod team_skills;
pub mod teams;
pub mod volunteer_skills;
pub mod volunteers;
