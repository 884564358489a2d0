//! Volunteer availability.
//!
//! Availability is persisted as JSON text on the volunteer row. Several
//! shapes exist in stored data, all accepted by `Availability::parse`:
//!
//! - `{"days": ["monday", "friday"], "notes": "mornings"}` (canonical)
//! - `["monday", "friday"]`
//! - `{"monday": true, "tuesday": false}`

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Errors raised while reading availability JSON.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AvailabilityError {
    /// Not valid JSON.
    #[error("Availability is not valid JSON: {0}")]
    InvalidJson(String),

    /// A day name could not be understood.
    #[error("Unknown day in availability: {0}")]
    UnknownDay(String),

    /// JSON of an unsupported shape.
    #[error("Unsupported availability format")]
    UnsupportedShape,
}

/// Days of the week a volunteer can help, plus free-form notes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Availability {
    days: Vec<Weekday>,
    /// Free-form notes ("after 5pm").
    pub notes: Option<String>,
}

#[derive(Serialize, Deserialize)]
struct AvailabilityRepr {
    #[serde(default)]
    days: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    notes: Option<String>,
}

impl Availability {
    /// Creates availability for the given days.
    #[must_use]
    pub fn new(days: impl IntoIterator<Item = Weekday>, notes: Option<String>) -> Self {
        let mut availability = Self {
            days: Vec::new(),
            notes,
        };
        for day in days {
            availability.add_day(day);
        }
        availability
    }

    /// Parses stored availability text.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid JSON, unknown day names, or unsupported
    /// shapes.
    pub fn parse(text: &str) -> Result<Self, AvailabilityError> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| AvailabilityError::InvalidJson(e.to_string()))?;
        Self::from_value(&value)
    }

    /// Reads availability from an already-decoded JSON value.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown day names or unsupported shapes.
    pub fn from_value(value: &Value) -> Result<Self, AvailabilityError> {
        match value {
            Value::Null => Ok(Self::default()),
            Value::Array(items) => {
                let days = items
                    .iter()
                    .map(|item| item.as_str().ok_or(AvailabilityError::UnsupportedShape))
                    .map(|name| name.and_then(parse_day))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Self::new(days, None))
            }
            Value::Object(map) if map.contains_key("days") || map.contains_key("notes") => {
                let repr: AvailabilityRepr = serde_json::from_value(value.clone())
                    .map_err(|_| AvailabilityError::UnsupportedShape)?;
                let days = repr
                    .days
                    .iter()
                    .map(|d| parse_day(d))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Self::new(days, repr.notes))
            }
            Value::Object(map) => {
                let mut days = Vec::new();
                for (name, flag) in map {
                    let day = parse_day(name)?;
                    match flag {
                        Value::Bool(true) => days.push(day),
                        Value::Bool(false) | Value::Null => {}
                        _ => return Err(AvailabilityError::UnsupportedShape),
                    }
                }
                Ok(Self::new(days, None))
            }
            _ => Err(AvailabilityError::UnsupportedShape),
        }
    }

    /// Serializes to the canonical stored form.
    #[must_use]
    pub fn to_json(&self) -> String {
        self.to_value().to_string()
    }

    /// Returns the canonical JSON value.
    #[must_use]
    pub fn to_value(&self) -> Value {
        let repr = AvailabilityRepr {
            days: self.days.iter().map(|d| day_name(*d).to_string()).collect(),
            notes: self.notes.clone(),
        };
        serde_json::to_value(repr).unwrap_or(Value::Null)
    }

    /// Days available, Monday first.
    #[must_use]
    pub fn days(&self) -> &[Weekday] {
        &self.days
    }

    /// Returns true if the volunteer is available on the date's weekday.
    #[must_use]
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.days.contains(&date.weekday())
    }

    fn add_day(&mut self, day: Weekday) {
        if !self.days.contains(&day) {
            self.days.push(day);
            self.days.sort_by_key(Weekday::num_days_from_monday);
        }
    }
}

fn parse_day(name: &str) -> Result<Weekday, AvailabilityError> {
    name.trim()
        .parse::<Weekday>()
        .map_err(|_| AvailabilityError::UnknownDay(name.to_string()))
}

fn day_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}
