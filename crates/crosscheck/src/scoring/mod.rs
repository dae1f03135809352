//! Quality scoring: five dimensions folded into a weighted composite.

pub mod composite;
pub mod dimensions;

pub use composite::{
    DimensionWeights, LetterGrade, ScoreDetails, ScoreLabel, Scorecard, score_collection,
};
pub use dimensions::{TimelinessDetail, UniquenessDetail};
