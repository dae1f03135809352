//! Crosscheck: cross-dataset quality analysis for related tabular exports.
//!
//! Crosscheck loads a handful of related CSV exports (orders and customers,
//! leads and conversions) and checks how well they fit together rather than
//! judging each file in isolation.
//!
//! # Core Principles
//!
//! - **Relationships first**: join keys are discovered, never configured
//! - **Deterministic**: the same input always produces the same report
//! - **Tolerant**: one unreadable file never sinks the run
//!
//! # Example
//!
//! ```no_run
//! use std::path::PathBuf;
//! use crosscheck::Crosscheck;
//!
//! let engine = Crosscheck::new();
//! let outcome = engine.analyze_paths(&[
//!     PathBuf::from("orders.csv"),
//!     PathBuf::from("customers.csv"),
//! ]);
//!
//! if let Some(report) = outcome.report {
//!     println!("Composite score: {}", report.scorecard.composite);
//!     println!("Findings: {}", report.findings.len());
//! }
//! ```

pub mod checks;
pub mod error;
pub mod impact;
pub mod input;
pub mod joins;
pub mod recommend;
pub mod scoring;
pub mod semantic;
pub mod similarity;

mod crosscheck;

pub use crate::crosscheck::{
    AnalysisReport, Crosscheck, CrosscheckConfig, DatasetProfile, ReportSummary, RunOutcome,
    SeverityCounts,
};
pub use checks::{Finding, Severity};
pub use error::{CrosscheckError, Result};
pub use impact::{ImpactEstimate, ValueColumn};
pub use input::{Dataset, DatasetCollection, Parser, ParserConfig, SourceMetadata};
pub use recommend::Recommendation;
pub use scoring::{LetterGrade, ScoreLabel, Scorecard};
pub use semantic::{BusinessDomain, EntityKind, SemanticType};
