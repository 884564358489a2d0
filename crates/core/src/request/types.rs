//! Request domain vocabularies.
//!
//! Statuses and priorities are persisted as plain strings, so each type has a
//! canonical `as_str` form and a lenient `parse` that accepts the spellings
//! older clients send (`"in progress"`, `"In-Progress"`).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a donation-delivery request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    /// Just received, nothing planned yet.
    #[default]
    New,
    /// Being worked on.
    InProgress,
    /// A delivery date has been set.
    Scheduled,
    /// Delivered.
    Completed,
    /// Called off.
    Cancelled,
}

impl RequestStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::InProgress => "in_progress",
            Self::Scheduled => "scheduled",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match normalize_token(s).as_str() {
            "new" => Some(Self::New),
            "in_progress" => Some(Self::InProgress),
            "scheduled" => Some(Self::Scheduled),
            "completed" => Some(Self::Completed),
            "cancelled" | "canceled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Urgency of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestPriority {
    /// Whenever convenient.
    Low,
    /// Normal handling.
    #[default]
    Medium,
    /// Ahead of the queue.
    High,
    /// Immediately.
    Urgent,
}

impl RequestPriority {
    /// Returns the string representation of the priority.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }

    /// Parses a priority from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match normalize_token(s).as_str() {
            "low" => Some(Self::Low),
            "medium" | "normal" => Some(Self::Medium),
            "high" => Some(Self::High),
            "urgent" => Some(Self::Urgent),
            _ => None,
        }
    }
}

impl fmt::Display for RequestPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Status of one requested product line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestItemStatus {
    /// Asked for, not yet handed over.
    #[default]
    Requested,
    /// Handed over.
    Fulfilled,
    /// Dropped from the request.
    Cancelled,
}

impl RequestItemStatus {
    /// Returns the string representation of the item status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Requested => "requested",
            Self::Fulfilled => "fulfilled",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parses an item status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match normalize_token(s).as_str() {
            "requested" => Some(Self::Requested),
            "fulfilled" => Some(Self::Fulfilled),
            "cancelled" | "canceled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

impl fmt::Display for RequestItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lowercases and folds spaces and dashes into underscores.
fn normalize_token(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("new", RequestStatus::New)]
    #[case("in progress", RequestStatus::InProgress)]
    #[case("In-Progress", RequestStatus::InProgress)]
    #[case("in_progress", RequestStatus::InProgress)]
    #[case("SCHEDULED", RequestStatus::Scheduled)]
    #[case("completed", RequestStatus::Completed)]
    #[case("canceled", RequestStatus::Cancelled)]
    fn test_status_parse(#[case] input: &str, #[case] expected: RequestStatus) {
        assert_eq!(RequestStatus::parse(input), Some(expected));
    }

    #[test]
    fn test_status_parse_rejects_unknown() {
        assert_eq!(RequestStatus::parse("archived"), None);
        assert_eq!(RequestStatus::parse(""), None);
    }

    #[test]
    fn test_status_roundtrips_through_as_str() {
        for status in [
            RequestStatus::New,
            RequestStatus::InProgress,
            RequestStatus::Scheduled,
            RequestStatus::Completed,
            RequestStatus::Cancelled,
        ] {
            assert_eq!(RequestStatus::parse(status.as_str()), Some(status));
        }
    }

    #[test]
    fn test_status_serde() {
        let json = serde_json::to_string(&RequestStatus::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");
        let back: RequestStatus = serde_json::from_str("\"cancelled\"").unwrap();
        assert_eq!(back, RequestStatus::Cancelled);
    }

    #[test]
    fn test_priority_parse_and_default() {
        assert_eq!(RequestPriority::default(), RequestPriority::Medium);
        assert_eq!(RequestPriority::parse("Urgent"), Some(RequestPriority::Urgent));
        assert_eq!(RequestPriority::parse("normal"), Some(RequestPriority::Medium));
        assert_eq!(RequestPriority::parse("critical"), None);
        assert_eq!(format!("{}", RequestPriority::High), "high");
    }

    #[test]
    fn test_item_status() {
        assert_eq!(RequestItemStatus::default().as_str(), "requested");
        assert_eq!(
            RequestItemStatus::parse("fulfilled"),
            Some(RequestItemStatus::Fulfilled)
        );
    }
}
