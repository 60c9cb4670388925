use chrono::{DateTime, TimeDelta, Utc};
use once_cell::sync::Lazy;
use tracing::{debug, trace};

use crate::clock::{Clock, SystemClock};
use crate::config::{ParserConfig, DEFAULT_MAX_EXPIRATION_MINUTES};
use crate::durations;
use crate::errors::ConfigError;
use crate::extractors::{
    CoordinateExtractor, DecimalCoordinates, IvQuality, NameTableSubjects, QualityExtractor,
    SubjectExtractor,
};
use crate::model::SightingRecord;

static DEFAULT_PARSER: Lazy<MessageParser> = Lazy::new(MessageParser::default);

/// Parses `message` with the built-in extractors, the system clock and the
/// default expiration horizon.
pub fn parse_message(message: &str) -> Vec<SightingRecord> {
    DEFAULT_PARSER.parse_message(message)
}

fn has_line_break(text: &str) -> bool {
    text.contains(['\n', '\r'])
}

/// Splits on `\r\n` or `\n`, keeping empty lines.
fn split_lines(message: &str) -> impl Iterator<Item = &str> {
    message
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
}

fn collapse_lines(message: &str) -> String {
    message.replace(['\n', '\r'], " ")
}

pub struct MessageParser {
    max_horizon: TimeDelta,
    coordinates: Box<dyn CoordinateExtractor>,
    subjects: Box<dyn SubjectExtractor>,
    quality: Box<dyn QualityExtractor>,
    clock: Box<dyn Clock>,
}

impl Default for MessageParser {
    fn default() -> Self {
        Self {
            max_horizon: TimeDelta::minutes(DEFAULT_MAX_EXPIRATION_MINUTES),
            coordinates: Box::new(DecimalCoordinates),
            subjects: Box::new(NameTableSubjects::default()),
            quality: Box::new(IvQuality),
            clock: Box::new(SystemClock),
        }
    }
}

impl MessageParser {
    pub fn new(config: &ParserConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut subjects = NameTableSubjects::default();
        subjects.extend(&config.subjects);

        Ok(Self {
            max_horizon: config.max_horizon()?,
            subjects: Box::new(subjects),
            ..Self::default()
        })
    }

    pub fn with_coordinates(mut self, extractor: impl CoordinateExtractor + 'static) -> Self {
        self.coordinates = Box::new(extractor);
        self
    }

    pub fn with_subjects(mut self, extractor: impl SubjectExtractor + 'static) -> Self {
        self.subjects = Box::new(extractor);
        self
    }

    pub fn with_quality(mut self, extractor: impl QualityExtractor + 'static) -> Self {
        self.quality = Box::new(extractor);
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn max_horizon(&self) -> TimeDelta {
        self.max_horizon
    }

    /// Extracts every report found in `message`, in line order.
    ///
    /// A multi-line message is first parsed line by line. When that yields
    /// nothing, or a single record whose subject is unknown, the lines are
    /// joined with spaces and parsed again as one report.
    pub fn parse_message(&self, message: &str) -> Vec<SightingRecord> {
        if !has_line_break(message) {
            return self.parse_line(message).into_iter().collect();
        }

        let line_results: Vec<SightingRecord> = split_lines(message)
            .filter_map(|line| self.parse_line(line))
            .collect();

        let needs_fallback = match line_results.as_slice() {
            [] => true,
            [only] => only.subject.is_unknown(),
            _ => false,
        };

        if !needs_fallback {
            trace!(records = line_results.len(), "parsed message line by line");
            return line_results;
        }

        trace!(
            line_records = line_results.len(),
            "reparsing message as a single report"
        );
        self.parse_line(&collapse_lines(message))
            .into_iter()
            .collect()
    }

    /// Parses one fragment; `None` only when it holds no coordinates.
    pub fn parse_line(&self, fragment: &str) -> Option<SightingRecord> {
        let Some(coordinates) = self.coordinates.parse_coordinates(fragment) else {
            debug!(fragment, "no coordinates found in fragment");
            return None;
        };
        let coordinates = coordinates.rounded();

        let now = self.clock.now();
        let quality = self.quality.parse_quality(fragment);
        let raw_expiration = durations::parse_duration(fragment, now);
        let subject = self.subjects.parse_subject(fragment);

        Some(SightingRecord {
            latitude: coordinates.latitude,
            longitude: coordinates.longitude,
            subject,
            quality,
            expiration: self.cap_expiration(raw_expiration, now),
        })
    }

    pub fn parse_duration(&self, fragment: &str) -> DateTime<Utc> {
        durations::parse_duration(fragment, self.clock.now())
    }

    fn cap_expiration(&self, expiration: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
        match now.checked_add_signed(self.max_horizon) {
            Some(limit) => expiration.min(limit),
            None => expiration,
        }
    }
}
