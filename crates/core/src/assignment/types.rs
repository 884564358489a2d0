//! Delivery assignment types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of a delivery assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    /// Planned for a date.
    #[default]
    Scheduled,
    /// Delivered.
    Completed,
    /// Called off.
    Cancelled,
}

impl AssignmentStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "scheduled" => Some(Self::Scheduled),
            "completed" => Some(Self::Completed),
            "cancelled" | "canceled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

impl fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of a valid transition, carrying the fields to write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignmentAction {
    /// Mark delivered.
    Complete {
        /// Always `Completed`.
        new_status: AssignmentStatus,
        /// Delivery date.
        completed_date: NaiveDate,
    },
    /// Call off.
    Cancel {
        /// Always `Cancelled`.
        new_status: AssignmentStatus,
    },
    /// Move to another date.
    Reschedule {
        /// Always `Scheduled`.
        new_status: AssignmentStatus,
        /// New target date.
        scheduled_date: NaiveDate,
    },
}

impl AssignmentAction {
    /// Returns the new status resulting from this action.
    #[must_use]
    pub fn new_status(&self) -> AssignmentStatus {
        match self {
            Self::Complete { new_status, .. }
            | Self::Cancel { new_status }
            | Self::Reschedule { new_status, .. } => *new_status,
        }
    }
}
