//! Delivery assignment lifecycle.
//!
//! A delivery assignment pairs a volunteer with a request and a target date.
//! Only `scheduled` assignments can change; `completed` is final and
//! `cancelled` can only be brought back by rescheduling.
//!
//! # Modules
//!
//! - `types` - Assignment status and actions
//! - `error` - Transition errors
//! - `service` - Transition rules

pub mod error;
pub mod service;
pub mod types;

pub use error::AssignmentTransitionError;
pub use service::AssignmentTransitions;
pub use types::{AssignmentAction, AssignmentStatus};
