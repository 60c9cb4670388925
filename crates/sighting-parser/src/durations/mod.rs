mod patterns;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::errors::DurationError;

pub use patterns::{
    RegexPattern, COMPOUND_MINUTES_SECONDS, MINUTES_WORD, SECONDS_COMPACT, SECONDS_WORD,
};

pub trait DurationPattern: Sync {
    fn name(&self) -> &'static str;

    /// Resolves `fragment` to an absolute timestamp relative to `now`.
    ///
    /// Returns [`DurationError::NoMatch`] when the pattern does not apply, so
    /// the next pattern can be tried.
    fn resolve(&self, fragment: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>, DurationError>;
}

/// Timestamp returned when no relative duration could be recovered.
pub fn default_expiration() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH
}

pub fn default_patterns() -> [&'static dyn DurationPattern; 4] {
    [
        &SECONDS_WORD,
        &MINUTES_WORD,
        &COMPOUND_MINUTES_SECONDS,
        &SECONDS_COMPACT,
    ]
}

pub fn parse_duration(fragment: &str, now: DateTime<Utc>) -> DateTime<Utc> {
    parse_with_patterns(fragment, now, &default_patterns())
}

/// Applies `patterns` in order; the first one that matches decides the result.
///
/// A matching pattern whose amount cannot be converted yields the default
/// expiration without consulting later patterns.
pub fn parse_with_patterns(
    fragment: &str,
    now: DateTime<Utc>,
    patterns: &[&dyn DurationPattern],
) -> DateTime<Utc> {
    for pattern in patterns {
        match pattern.resolve(fragment, now) {
            Ok(expiration) => return expiration,
            Err(DurationError::NoMatch { .. }) => continue,
            Err(err) => {
                debug!(pattern = pattern.name(), error = %err, "discarding duration");
                return default_expiration();
            }
        }
    }

    default_expiration()
}
