//! Extracts sighting reports (location, subject, IV and expiration) from
//! free-form chat messages.

pub mod clock;
pub mod config;
pub mod durations;
pub mod errors;
pub mod extractors;
mod message;
pub mod model;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::ParserConfig;
pub use errors::{ConfigError, DurationError, TimeUnit};
pub use message::{parse_message, MessageParser};
pub use model::{Coordinates, Quality, SightingRecord, Subject};

#[cfg(test)]
mod tests;
