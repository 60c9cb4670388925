use chrono::{DateTime, TimeDelta, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use super::DurationPattern;
use crate::errors::{DurationError, TimeUnit};

/// A duration pattern whose capture groups map, in order, onto `units`.
pub struct RegexPattern {
    name: &'static str,
    regex: Lazy<Regex>,
    units: &'static [TimeUnit],
}

// "30 sec", "30sec", "30 seconds"
pub static SECONDS_WORD: RegexPattern = RegexPattern {
    name: "SECONDS_WORD",
    regex: Lazy::new(|| compile(r"(?i)(\d+)\s?sec")),
    units: &[TimeUnit::Seconds],
};

// "10 min", "10min", "10 minutes"
pub static MINUTES_WORD: RegexPattern = RegexPattern {
    name: "MINUTES_WORD",
    regex: Lazy::new(|| compile(r"(?i)(\d+)\s?min")),
    units: &[TimeUnit::Minutes],
};

// "14m 9s", "14m9s"
pub static COMPOUND_MINUTES_SECONDS: RegexPattern = RegexPattern {
    name: "COMPOUND_MINUTES_SECONDS",
    regex: Lazy::new(|| compile(r"(?i)(\d+)m\s?(\d+)s")),
    units: &[TimeUnit::Minutes, TimeUnit::Seconds],
};

// "15s " (needs trailing whitespace)
pub static SECONDS_COMPACT: RegexPattern = RegexPattern {
    name: "SECONDS_COMPACT",
    regex: Lazy::new(|| compile(r"(?i)(\d+)\s?s\s")),
    units: &[TimeUnit::Seconds],
};

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("duration pattern must compile")
}

impl RegexPattern {
    fn offset(&self, amount: &str, unit: TimeUnit) -> Result<TimeDelta, DurationError> {
        let value: i64 = amount
            .parse()
            .map_err(|_| DurationError::InvalidAmount {
                pattern: self.name,
                amount: amount.to_string(),
            })?;
        let delta = match unit {
            TimeUnit::Seconds => TimeDelta::try_seconds(value),
            TimeUnit::Minutes => TimeDelta::try_minutes(value),
        };
        delta.ok_or(DurationError::OutOfRange {
            pattern: self.name,
            amount: value,
            unit,
        })
    }
}

impl DurationPattern for RegexPattern {
    fn name(&self) -> &'static str {
        self.name
    }

    fn resolve(&self, fragment: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>, DurationError> {
        let captures = self
            .regex
            .captures(fragment)
            .ok_or(DurationError::NoMatch { pattern: self.name })?;

        let mut expiration = now;
        for (index, unit) in self.units.iter().enumerate() {
            let amount = captures.get(index + 1).map_or("", |m| m.as_str());
            let offset = self.offset(amount, *unit)?;
            expiration = expiration
                .checked_add_signed(offset)
                .ok_or(DurationError::OutOfRange {
                    pattern: self.name,
                    amount: offset.num_seconds(),
                    unit: TimeUnit::Seconds,
                })?;
        }
        Ok(expiration)
    }
}
