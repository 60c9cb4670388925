use once_cell::sync::Lazy;
use regex::Regex;

use super::CoordinateExtractor;
use crate::model::Coordinates;

// Both axes need a fractional part; the leading class keeps us from starting
// inside a longer number.
static DECIMAL_PAIR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|[^\d.])(-?\d{1,3}\.\d+)\s*,\s*(-?\d{1,3}\.\d+)")
        .expect("coordinate pattern must compile")
});

/// Finds the first `lat,lng` pair of decimal degrees in a fragment.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecimalCoordinates;

impl CoordinateExtractor for DecimalCoordinates {
    fn parse_coordinates(&self, fragment: &str) -> Option<Coordinates> {
        DECIMAL_PAIR.captures_iter(fragment).find_map(|captures| {
            let latitude = captures.get(1)?.as_str().parse::<f64>().ok()?;
            let longitude = captures.get(2)?.as_str().parse::<f64>().ok()?;
            Some(Coordinates::new(latitude, longitude))
        })
    }
}
