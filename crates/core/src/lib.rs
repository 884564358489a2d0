//! Core domain logic for HWF Donations.
//!
//! This crate contains pure domain logic with ZERO web or database dependencies.
//! Status vocabularies, form normalization, and state transitions live here.
//!
//! # Modules
//!
//! - `request` - Donation-delivery requests: statuses, drafts, stock checks
//! - `assignment` - Delivery assignment lifecycle
//! - `inventory` - Stock levels and adjustments
//! - `volunteer` - Volunteer availability
//! - `text` - Free-text normalization

pub mod assignment;
pub mod inventory;
pub mod request;
pub mod text;
pub mod volunteer;
