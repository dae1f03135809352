//! Weighted composite scoring and its qualitative bands.

use chrono::NaiveDateTime;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::checks::{DuplicateFinding, GapFinding, OrphanFinding};
use crate::input::DatasetCollection;

use super::dimensions::{
    TimelinessDetail, UniquenessDetail, score_completeness, score_consistency, score_timeliness,
    score_uniqueness, score_validity,
};

/// Composite scores never exceed this, matching the completeness cap.
const COMPOSITE_CAP: f64 = 92.0;

/// Every extra dataset in a run makes integration mistakes more likely,
/// so the composite pays a small flat penalty per additional dataset.
const INTEGRATION_PENALTY_PER_DATASET: f64 = 1.5;

/// Relative weight of each dimension in the composite.
///
/// Consistency only exists across datasets; single-dataset runs zero it
/// out and spread its weight over the remaining dimensions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DimensionWeights {
    pub completeness: f64,
    pub uniqueness: f64,
    pub validity: f64,
    pub consistency: f64,
    pub timeliness: f64,
}

impl DimensionWeights {
    /// Weights for runs with two or more datasets.
    pub fn multi_dataset() -> Self {
        DimensionWeights {
            completeness: 0.20,
            uniqueness: 0.20,
            validity: 0.15,
            consistency: 0.30,
            timeliness: 0.15,
        }
    }

    /// Weights for single-dataset runs, where consistency is undefined.
    pub fn single_dataset() -> Self {
        DimensionWeights {
            completeness: 0.32,
            uniqueness: 0.28,
            validity: 0.25,
            consistency: 0.0,
            timeliness: 0.15,
        }
    }
}

/// Qualitative band for a score, as shown in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreLabel {
    Excellent,
    Good,
    Fair,
    Poor,
    Critical,
    NotApplicable,
}

impl ScoreLabel {
    /// Band for a score; `None` maps to [`ScoreLabel::NotApplicable`].
    pub fn for_score(score: Option<f64>) -> Self {
        match score {
            None => ScoreLabel::NotApplicable,
            Some(s) if s >= 90.0 => ScoreLabel::Excellent,
            Some(s) if s >= 80.0 => ScoreLabel::Good,
            Some(s) if s >= 70.0 => ScoreLabel::Fair,
            Some(s) if s >= 60.0 => ScoreLabel::Poor,
            Some(_) => ScoreLabel::Critical,
        }
    }

    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            ScoreLabel::Excellent => "Excellent",
            ScoreLabel::Good => "Good",
            ScoreLabel::Fair => "Fair",
            ScoreLabel::Poor => "Poor",
            ScoreLabel::Critical => "Critical",
            ScoreLabel::NotApplicable => "N/A",
        }
    }

    /// Hex color used by report renderers.
    pub fn color(&self) -> &'static str {
        match self {
            ScoreLabel::Excellent => "#10B981",
            ScoreLabel::Good => "#34D399",
            ScoreLabel::Fair => "#F59E0B",
            ScoreLabel::Poor => "#F97316",
            ScoreLabel::Critical => "#EF4444",
            ScoreLabel::NotApplicable => "#9CA3AF",
        }
    }
}

/// Letter grade for the composite score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LetterGrade {
    A,
    B,
    C,
    D,
    F,
}

impl LetterGrade {
    pub fn for_score(score: f64) -> Self {
        if score >= 90.0 {
            LetterGrade::A
        } else if score >= 80.0 {
            LetterGrade::B
        } else if score >= 70.0 {
            LetterGrade::C
        } else if score >= 60.0 {
            LetterGrade::D
        } else {
            LetterGrade::F
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LetterGrade::A => "A",
            LetterGrade::B => "B",
            LetterGrade::C => "C",
            LetterGrade::D => "D",
            LetterGrade::F => "F",
        }
    }
}

/// Supporting detail behind the dimension scores.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreDetails {
    /// Raw (undamped) completeness percentage per dataset.
    pub completeness_by_dataset: IndexMap<String, f64>,
    /// Base and penalty behind the uniqueness score.
    pub uniqueness: UniquenessDetail,
    /// Up to 8 column-level validity issues, `dataset.column: problem`.
    pub validity_issues: Vec<String>,
    /// Pooled orphan and gap finding count behind the consistency score;
    /// `None` for single-dataset runs.
    pub consistency_issue_count: Option<usize>,
    /// Freshness evidence behind the timeliness score.
    pub timeliness: TimelinessDetail,
}

/// All dimension scores plus the weighted composite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scorecard {
    pub completeness: f64,
    pub uniqueness: f64,
    pub validity: f64,
    /// `None` for single-dataset runs.
    pub consistency: Option<f64>,
    pub timeliness: f64,
    pub composite: f64,
    pub label: ScoreLabel,
    pub grade: LetterGrade,
    pub weights: DimensionWeights,
    pub details: ScoreDetails,
}

impl Scorecard {
    /// Dimension name/score pairs in display order.
    pub fn dimension_entries(&self) -> [(&'static str, Option<f64>); 5] {
        [
            ("Completeness", Some(self.completeness)),
            ("Uniqueness", Some(self.uniqueness)),
            ("Validity", Some(self.validity)),
            ("Consistency", self.consistency),
            ("Timeliness", Some(self.timeliness)),
        ]
    }
}

/// Score every dimension and fold them into the composite.
pub fn score_collection(
    collection: &DatasetCollection,
    orphans: &[OrphanFinding],
    duplicates: &[DuplicateFinding],
    gaps: &[GapFinding],
    now: NaiveDateTime,
) -> Scorecard {
    let (completeness, completeness_by_dataset) = score_completeness(collection);
    let (uniqueness, uniqueness_detail) = score_uniqueness(collection, duplicates);
    let (validity, validity_issues) = score_validity(collection, now);
    let consistency = score_consistency(collection, orphans, gaps);
    let (timeliness, timeliness_detail) = score_timeliness(collection, now);
    let consistency_issue_count = if collection.len() >= 2 {
        Some(orphans.len() + gaps.len())
    } else {
        None
    };

    let weights = if collection.len() >= 2 {
        DimensionWeights::multi_dataset()
    } else {
        DimensionWeights::single_dataset()
    };

    let entries = [
        (Some(completeness), weights.completeness),
        (Some(uniqueness), weights.uniqueness),
        (Some(validity), weights.validity),
        (consistency, weights.consistency),
        (Some(timeliness), weights.timeliness),
    ];
    let mut weighted = 0.0;
    let mut total_weight = 0.0;
    for (score, weight) in entries {
        if let Some(score) = score {
            if weight > 0.0 {
                weighted += score * weight;
                total_weight += weight;
            }
        }
    }
    let mut composite = if total_weight > 0.0 {
        weighted / total_weight
    } else {
        0.0
    };
    composite -= INTEGRATION_PENALTY_PER_DATASET * collection.len().saturating_sub(1) as f64;
    let composite = round1(composite.clamp(0.0, COMPOSITE_CAP));

    Scorecard {
        completeness,
        uniqueness,
        validity,
        consistency,
        timeliness,
        composite,
        label: ScoreLabel::for_score(Some(composite)),
        grade: LetterGrade::for_score(composite),
        weights,
        details: ScoreDetails {
            completeness_by_dataset,
            uniqueness: uniqueness_detail,
            validity_issues,
            consistency_issue_count,
            timeliness: timeliness_detail,
        },
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
