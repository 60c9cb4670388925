mod coordinates;
mod quality;
mod subjects;

use crate::model::{Coordinates, Quality, Subject};

pub use coordinates::DecimalCoordinates;
pub use quality::IvQuality;
pub use subjects::{NameTableSubjects, DEFAULT_SUBJECT_NAMES};

pub trait CoordinateExtractor: Send + Sync {
    fn parse_coordinates(&self, fragment: &str) -> Option<Coordinates>;
}

pub trait SubjectExtractor: Send + Sync {
    /// Returns [`Subject::Unknown`] when nothing in `fragment` is recognized.
    fn parse_subject(&self, fragment: &str) -> Subject;
}

pub trait QualityExtractor: Send + Sync {
    /// Returns [`Quality::Absent`] when `fragment` carries no score.
    fn parse_quality(&self, fragment: &str) -> Quality;
}
