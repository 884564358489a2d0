//! Donation-delivery request domain.
//!
//! # Modules
//!
//! - `types` - Status, priority, and item status vocabularies
//! - `error` - Form validation errors
//! - `draft` - Request form normalization
//! - `stock` - Advisory over-commitment checks

pub mod draft;
pub mod error;
pub mod stock;
pub mod types;

pub use draft::{ProductLine, RequestDraft, RequestForm, clamp_quantity, normalize_line};
pub use error::DraftError;
pub use stock::{StockShortfall, check_stock};
pub use types::{RequestItemStatus, RequestPriority, RequestStatus};
