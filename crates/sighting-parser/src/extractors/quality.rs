use once_cell::sync::Lazy;
use regex::Regex;

use super::QualityExtractor;
use crate::model::Quality;

const MAX_SCORE: f64 = 100.0;

static IV_FORMS: Lazy<[Regex; 3]> = Lazy::new(|| {
    [
        r"(?i)\bIV\s*[:=]?\s*(\d{1,3}(?:\.\d+)?)",
        r"(?i)\b(\d{1,3}(?:\.\d+)?)\s*IV\b",
        r"\b(\d{1,3}(?:\.\d+)?)\s*%",
    ]
    .map(|pattern| Regex::new(pattern).expect("quality pattern must compile"))
});

/// Reads an IV percentage written as `IV 98`, `IV: 98.5`, `98 IV` or `98%`.
#[derive(Debug, Clone, Copy, Default)]
pub struct IvQuality;

impl QualityExtractor for IvQuality {
    fn parse_quality(&self, fragment: &str) -> Quality {
        IV_FORMS
            .iter()
            .flat_map(|regex| regex.captures_iter(fragment))
            .filter_map(|captures| captures.get(1)?.as_str().parse::<f64>().ok())
            .find(|score| (0.0..=MAX_SCORE).contains(score))
            .map_or(Quality::Absent, Quality::Score)
    }
}
