use chrono::{DateTime, TimeDelta, TimeZone, Utc};

use crate::durations::{self, default_expiration, DurationPattern, SECONDS_COMPACT};
use crate::errors::{ConfigError, DurationError};
use crate::extractors::{
    CoordinateExtractor, DecimalCoordinates, IvQuality, NameTableSubjects, QualityExtractor,
    SubjectExtractor,
};
use crate::model::{Coordinates, Quality, Subject};
use crate::{FixedClock, MessageParser, ParserConfig};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 7, 1, 12, 0, 0).unwrap()
}

fn parser() -> MessageParser {
    MessageParser::default().with_clock(FixedClock(now()))
}

fn has_at_most_seven_decimals(value: f64) -> bool {
    let scaled = value * 1e7;
    (scaled - scaled.round()).abs() < 1e-6
}

#[test]
fn compound_minutes_seconds_expiration() {
    let record = parser()
        .parse_line("Aerodactyl | 14m 9s | 34.008105111711,-118.49775510959")
        .expect("line should parse");

    assert_eq!(record.subject, Subject::named("Aerodactyl"));
    assert_eq!(record.latitude, 34.0081051);
    assert_eq!(record.longitude, -118.4977551);
    assert_eq!(record.quality, Quality::Absent);
    assert_eq!(
        record.expiration,
        now() + TimeDelta::minutes(14) + TimeDelta::seconds(9)
    );
}

#[test]
fn compact_seconds_expiration() {
    let record = parser()
        .parse_line("Lickitung | 15s | 40.69465351234,-73.99434315197")
        .expect("line should parse");

    assert_eq!(record.subject, Subject::named("Lickitung"));
    assert_eq!(record.latitude, 40.6946535);
    assert_eq!(record.longitude, -73.9943432);
    assert_eq!(record.expiration, now() + TimeDelta::seconds(15));
}

#[test]
fn line_without_coordinates_is_rejected() {
    assert!(parser().parse_line("Pikachu 10 min IV 98").is_none());
    assert!(parser().parse_line("").is_none());
}

#[test]
fn single_line_message_matches_line_parser() {
    let parser = parser();
    let fragment = "Snorlax 41.2,-74.2 IV 87 5 min";

    let records = parser.parse_message(fragment);
    let line = parser.parse_line(fragment).expect("line should parse");

    assert_eq!(records, vec![line]);
    assert!(parser.parse_message("no location here").is_empty());
}

#[test]
fn single_known_subject_line_does_not_fall_back() {
    let records = parser().parse_message("Pikachu 40.0,-73.0\n10 min");

    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.subject, Subject::named("Pikachu"));
    assert_eq!(record.latitude, 40.0);
    assert_eq!(record.longitude, -73.0);
    // The duration sits on a line that was never merged in.
    assert_eq!(record.expiration, default_expiration());
}

#[test]
fn multiple_reports_keep_line_order() {
    let records = parser().parse_message("Snorlax 41.2,-74.2\nPikachu 40.1,-73.1");

    let subjects: Vec<_> = records.iter().map(|r| r.subject.clone()).collect();
    assert_eq!(
        subjects,
        vec![Subject::named("Snorlax"), Subject::named("Pikachu")]
    );
    assert_eq!(records[0].coordinates(), Coordinates::new(41.2, -74.2));
    assert_eq!(records[1].coordinates(), Coordinates::new(40.1, -73.1));
}

#[test]
fn crlf_and_blank_lines_are_split() {
    let records = parser().parse_message("Pikachu 40.1,-73.1\r\n\r\nSnorlax 41.2,-74.2 20 sec");

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].subject, Subject::named("Pikachu"));
    assert_eq!(records[1].subject, Subject::named("Snorlax"));
    assert_eq!(records[1].expiration, now() + TimeDelta::seconds(20));
}

#[test]
fn scattered_fields_fall_back_to_whole_message() {
    let records = parser().parse_message("Dragonite\n34.0,-118.0\n10 min IV 98");

    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.subject, Subject::named("Dragonite"));
    assert_eq!(record.quality, Quality::Score(98.0));
    assert_eq!(record.expiration, now() + TimeDelta::minutes(10));
}

#[test]
fn unknown_single_result_is_reparsed() {
    let records = parser().parse_message("40.0,-73.0\nnothing useful");

    assert_eq!(records.len(), 1);
    assert!(records[0].subject.is_unknown());
    assert_eq!(records[0].coordinates(), Coordinates::new(40.0, -73.0));
}

#[test]
fn two_unknown_results_are_kept() {
    let records = parser().parse_message("40.0,-73.0\n41.0,-74.0");

    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| r.subject.is_unknown()));
}

#[test]
fn message_without_coordinates_is_empty() {
    let records = parser().parse_message("Pikachu\n10 min\r\nIV 100");
    assert!(records.is_empty());
}

#[test]
fn expiration_is_capped_at_horizon() {
    let parser = parser();
    let records = parser.parse_message("Snorlax 40.0,-73.0 45 min");

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].expiration, now() + parser.max_horizon());
}

#[test]
fn configured_horizon_and_subjects_apply() {
    let config = ParserConfig::from_toml_str(
        r#"
max_expiration_minutes = 60
subjects = ["Togepi"]
"#,
    )
    .expect("config should parse");
    let parser = MessageParser::new(&config)
        .expect("valid config")
        .with_clock(FixedClock(now()));

    let record = parser
        .parse_line("Togepi 45 min 40.0,-73.0")
        .expect("line should parse");
    assert_eq!(record.subject, Subject::named("Togepi"));
    assert_eq!(record.expiration, now() + TimeDelta::minutes(45));
}

#[test]
fn coordinates_are_rounded_to_seven_digits() {
    let records = parser().parse_message(
        "Eevee 51.50735091234567,-0.12775829999999\nJolteon -33.868819999999,151.20929999999",
    );

    assert_eq!(records.len(), 2);
    for record in &records {
        assert!(has_at_most_seven_decimals(record.latitude));
        assert!(has_at_most_seven_decimals(record.longitude));
    }
    assert_eq!(records[0].latitude, 51.5073509);
    assert_eq!(records[1].longitude, 151.2093);
}

#[test]
fn repeated_parses_are_identical() {
    let message = "Mewtwo 40.1,-73.1 IV 100 3 min\nMew 41.2,-74.2 12 sec";
    let parser = parser();
    assert_eq!(parser.parse_message(message), parser.parse_message(message));
}

#[test]
fn duration_patterns_apply_in_priority_order() {
    let at = now();

    // "sec" wins even when "min" appears earlier in the text.
    assert_eq!(
        durations::parse_duration("10 min then 5 sec", at),
        at + TimeDelta::seconds(5)
    );
    assert_eq!(
        durations::parse_duration("7MIN", at),
        at + TimeDelta::minutes(7)
    );
    assert_eq!(
        durations::parse_duration("3m9s left", at),
        at + TimeDelta::minutes(3) + TimeDelta::seconds(9)
    );
    assert_eq!(
        durations::parse_duration("45 seconds", at),
        at + TimeDelta::seconds(45)
    );
}

#[test]
fn compact_seconds_needs_trailing_whitespace() {
    let at = now();
    assert_eq!(durations::parse_duration("gone in 15s", at), default_expiration());
    assert_eq!(
        durations::parse_duration("gone in 15s\t!", at),
        at + TimeDelta::seconds(15)
    );
}

#[test]
fn unparseable_amounts_fall_back_to_default() {
    let at = now();

    assert_eq!(
        durations::parse_duration("99999999999999999999 sec and 10 min", at),
        default_expiration()
    );
    assert_eq!(
        durations::parse_duration("9223372036854775807 min", at),
        default_expiration()
    );
    assert_eq!(durations::parse_duration("soon", at), default_expiration());
}

#[test]
fn pattern_reports_conversion_errors() {
    let err = SECONDS_COMPACT
        .resolve("99999999999999999999s ", now())
        .expect_err("amount overflows i64");
    assert!(matches!(err, DurationError::InvalidAmount { .. }));

    let err = SECONDS_COMPACT
        .resolve("no duration", now())
        .expect_err("nothing to match");
    assert!(matches!(err, DurationError::NoMatch { pattern: "SECONDS_COMPACT" }));
}

struct FixedSubject;

impl SubjectExtractor for FixedSubject {
    fn parse_subject(&self, _fragment: &str) -> Subject {
        Subject::named("Ditto")
    }
}

struct NoQuality;

impl QualityExtractor for NoQuality {
    fn parse_quality(&self, _fragment: &str) -> Quality {
        Quality::Absent
    }
}

#[test]
fn injected_subject_and_quality_extractors_are_used() {
    let parser = parser().with_subjects(FixedSubject).with_quality(NoQuality);

    let records = parser.parse_message("Pidgey 40.0,-73.0 IV 99\n41.0,-74.0");
    assert_eq!(records.len(), 2);
    assert!(records
        .iter()
        .all(|r| r.subject == Subject::named("Ditto") && r.quality.is_absent()));
}

#[test]
fn decimal_coordinates_skip_partial_numbers() {
    let extractor = DecimalCoordinates;

    assert_eq!(
        extractor.parse_coordinates("at 1234.5,6.7 or 12.5, -45.25"),
        Some(Coordinates::new(12.5, -45.25))
    );
    assert_eq!(extractor.parse_coordinates("40,-73"), None);
}

#[test]
fn iv_quality_forms() {
    let extractor = IvQuality;

    assert_eq!(extractor.parse_quality("IV: 98.5"), Quality::Score(98.5));
    assert_eq!(extractor.parse_quality("87 iv Snorlax"), Quality::Score(87.0));
    assert_eq!(extractor.parse_quality("Dratini 100%"), Quality::Score(100.0));
    assert_eq!(extractor.parse_quality("IV 250"), Quality::Absent);
    assert_eq!(extractor.parse_quality("Dratini"), Quality::Absent);
}

#[test]
fn name_table_matches_first_name_in_text() {
    let subjects = NameTableSubjects::default();

    assert_eq!(
        subjects.parse_subject("wild mr. mime near Pikachu"),
        Subject::named("Mr. Mime")
    );
    assert_eq!(
        subjects.parse_subject("FARFETCH'D 40.0,-73.0"),
        Subject::named("Farfetch'd")
    );
    assert_eq!(subjects.parse_subject("Togepi"), Subject::Unknown);
}

#[test]
fn config_rejects_invalid_values() {
    assert!(matches!(
        ParserConfig::from_toml_str("max_expiration_minutes = 0"),
        Err(ConfigError::Validation(_))
    ));
    assert!(matches!(
        ParserConfig::from_toml_str("subjects = [\"  \"]"),
        Err(ConfigError::Validation(_))
    ));
    assert!(matches!(
        ParserConfig::from_toml_str("horizon = 5"),
        Err(ConfigError::Toml(_))
    ));
    assert_eq!(
        ParserConfig::from_toml_str("").expect("empty config"),
        ParserConfig::default()
    );
}

#[test]
fn record_serializes_sentinels() {
    let record = parser()
        .parse_line("40.0,-73.0")
        .expect("line should parse");
    let json = serde_json::to_value(&record).expect("serialize record");

    assert_eq!(json["subject"], "unknown");
    assert_eq!(json["quality"], "absent");
    assert_eq!(json["latitude"], 40.0);
}
