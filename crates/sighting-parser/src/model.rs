use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of fractional digits kept on parsed latitude/longitude values.
pub const COORDINATE_PRECISION: i32 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Rounds both axes to [`COORDINATE_PRECISION`] digits, ties to even.
    pub fn rounded(&self) -> Self {
        Self {
            latitude: round_coordinate(self.latitude),
            longitude: round_coordinate(self.longitude),
        }
    }
}

fn round_coordinate(value: f64) -> f64 {
    let scale = 10f64.powi(COORDINATE_PRECISION);
    (value * scale).round_ties_even() / scale
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Subject {
    Unknown,
    Named(String),
}

impl Subject {
    pub fn named(name: impl Into<String>) -> Self {
        Subject::Named(name.into())
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Subject::Unknown)
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Subject::Unknown => None,
            Subject::Named(name) => Some(name),
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subject::Unknown => f.write_str("unknown"),
            Subject::Named(name) => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quality {
    Absent,
    Score(f64),
}

impl Quality {
    pub fn score(&self) -> Option<f64> {
        match self {
            Quality::Absent => None,
            Quality::Score(value) => Some(*value),
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Quality::Absent)
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quality::Absent => f.write_str("-"),
            Quality::Score(value) => write!(f, "{value}"),
        }
    }
}

/// One report extracted from a chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SightingRecord {
    pub latitude: f64,
    pub longitude: f64,
    pub subject: Subject,
    pub quality: Quality,
    pub expiration: DateTime<Utc>,
}

impl SightingRecord {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }
}
