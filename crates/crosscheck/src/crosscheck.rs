//! Main Crosscheck struct and public API.

use std::path::PathBuf;

use chrono::{DateTime, NaiveDateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::checks::{
    DedupeConfig, Finding, Severity, check_duplicates, check_gaps, check_orphans,
};
use crate::error::Result;
use crate::impact::{ImpactEstimate, ValueColumn, estimate_impact};
use crate::input::{DatasetCollection, LoadFailure, Parser, ParserConfig, SourceMetadata};
use crate::joins::{JoinCandidate, JoinConfig, infer_join_candidates};
use crate::recommend::{Recommendation, generate_recommendations};
use crate::scoring::{Scorecard, score_collection};
use crate::semantic::{
    DomainInference, EntityKind, SemanticType, classify_columns, detect_entity, infer_domain,
};

/// Configuration for a Crosscheck run.
#[derive(Debug, Clone, Default)]
pub struct CrosscheckConfig {
    /// Parser configuration.
    pub parser: ParserConfig,
    /// Join-candidate discovery configuration.
    pub joins: JoinConfig,
    /// Duplicate-detection configuration.
    pub dedupe: DedupeConfig,
    /// Explicit monetary column for impact estimation.
    pub value_column: Option<ValueColumn>,
    /// Reference time for freshness checks (None = now).
    pub reference_now: Option<NaiveDateTime>,
}

/// Profile of one loaded dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetProfile {
    pub name: String,
    pub row_count: usize,
    pub column_count: usize,
    /// Entity the dataset most likely represents.
    pub entity: EntityKind,
    /// Semantic type per column, in column order.
    pub column_types: IndexMap<String, SemanticType>,
    /// File provenance, when the dataset came from disk.
    pub source: Option<SourceMetadata>,
}

/// Finding counts by severity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeverityCounts {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

/// Roll-up numbers for the top of a report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSummary {
    pub dataset_count: usize,
    pub total_rows: usize,
    pub finding_count: usize,
    pub findings_by_severity: SeverityCounts,
}

/// Full result of analyzing a collection of related datasets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// When the analysis ran.
    pub generated_at: DateTime<Utc>,
    pub summary: ReportSummary,
    /// Per-dataset profiles, in load order.
    pub datasets: Vec<DatasetProfile>,
    /// Business domain the collection appears to come from.
    pub domain: DomainInference,
    /// Join candidates the checks ran on.
    pub join_candidates: Vec<JoinCandidate>,
    /// All findings: orphans, then duplicates, then gaps.
    pub findings: Vec<Finding>,
    pub scorecard: Scorecard,
    pub impact: ImpactEstimate,
    pub recommendations: Vec<Recommendation>,
}

impl AnalysisReport {
    /// Serialize the report as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Findings of one check, via the tag each variant carries.
    pub fn orphan_findings(&self) -> impl Iterator<Item = &crate::checks::OrphanFinding> {
        self.findings.iter().filter_map(|f| match f {
            Finding::Orphan(o) => Some(o),
            _ => None,
        })
    }

    pub fn duplicate_findings(&self) -> impl Iterator<Item = &crate::checks::DuplicateFinding> {
        self.findings.iter().filter_map(|f| match f {
            Finding::Duplicate(d) => Some(d),
            _ => None,
        })
    }

    pub fn gap_findings(&self) -> impl Iterator<Item = &crate::checks::GapFinding> {
        self.findings.iter().filter_map(|f| match f {
            Finding::Gap(g) => Some(g),
            _ => None,
        })
    }
}

/// Result of an end-to-end run over files, keeping per-file failures
/// separate from the analysis itself.
#[derive(Debug)]
pub struct RunOutcome {
    /// The report, when at least one file loaded.
    pub report: Option<AnalysisReport>,
    /// Files that could not be loaded.
    pub failures: Vec<LoadFailure>,
}

/// The main Crosscheck analysis engine.
pub struct Crosscheck {
    config: CrosscheckConfig,
    parser: Parser,
}

impl Crosscheck {
    /// Create a new Crosscheck instance with default configuration.
    pub fn new() -> Self {
        Self::with_config(CrosscheckConfig::default())
    }

    /// Create a Crosscheck instance with custom configuration.
    pub fn with_config(config: CrosscheckConfig) -> Self {
        let parser = Parser::with_config(config.parser.clone());
        Self { config, parser }
    }

    /// Load the given files and analyze whatever loads successfully.
    ///
    /// A file that fails to parse never aborts the run; it is reported in
    /// the outcome and the analysis proceeds on the rest.
    pub fn analyze_paths(&self, paths: &[PathBuf]) -> RunOutcome {
        let loaded = self.parser.load_files(paths);
        if loaded.collection.is_empty() {
            return RunOutcome {
                report: None,
                failures: loaded.failures,
            };
        }
        let report = self.analyze_with_sources(&loaded.collection, &loaded.sources);
        RunOutcome {
            report: Some(report),
            failures: loaded.failures,
        }
    }

    /// Analyze an in-memory collection.
    pub fn analyze(&self, collection: &DatasetCollection) -> AnalysisReport {
        self.analyze_with_sources(collection, &IndexMap::new())
    }

    /// Analyze a collection, attaching file provenance where available.
    pub fn analyze_with_sources(
        &self,
        collection: &DatasetCollection,
        sources: &IndexMap<String, SourceMetadata>,
    ) -> AnalysisReport {
        let now = self
            .config
            .reference_now
            .unwrap_or_else(|| Utc::now().naive_utc());

        let join_candidates = infer_join_candidates(collection, &self.config.joins);
        let orphans = check_orphans(collection, &join_candidates);
        let duplicates = check_duplicates(collection, &self.config.dedupe);
        let gaps = check_gaps(collection, &join_candidates);

        let scorecard = score_collection(collection, &orphans, &duplicates, &gaps, now);
        let impact = estimate_impact(
            collection,
            &orphans,
            &duplicates,
            &gaps,
            self.config.value_column.as_ref(),
        );
        let recommendations =
            generate_recommendations(&orphans, &duplicates, &gaps, &scorecard);

        let datasets: Vec<DatasetProfile> = collection
            .iter()
            .map(|dataset| DatasetProfile {
                name: dataset.name.clone(),
                row_count: dataset.row_count(),
                column_count: dataset.column_count(),
                entity: detect_entity(dataset),
                column_types: classify_columns(dataset),
                source: sources.get(&dataset.name).cloned(),
            })
            .collect();

        let findings: Vec<Finding> = orphans
            .into_iter()
            .map(Finding::Orphan)
            .chain(duplicates.into_iter().map(Finding::Duplicate))
            .chain(gaps.into_iter().map(Finding::Gap))
            .collect();

        let summary = summarize(collection, &findings);

        AnalysisReport {
            generated_at: Utc::now(),
            summary,
            datasets,
            domain: infer_domain(collection),
            join_candidates,
            findings,
            scorecard,
            impact,
            recommendations,
        }
    }
}

impl Default for Crosscheck {
    fn default() -> Self {
        Self::new()
    }
}

fn summarize(collection: &DatasetCollection, findings: &[Finding]) -> ReportSummary {
    let mut by_severity = SeverityCounts::default();
    for finding in findings {
        match finding.severity() {
            Severity::Critical => by_severity.critical += 1,
            Severity::High => by_severity.high += 1,
            Severity::Medium => by_severity.medium += 1,
            Severity::Low => by_severity.low += 1,
        }
    }
    ReportSummary {
        dataset_count: collection.len(),
        total_rows: collection.total_rows(),
        finding_count: findings.len(),
        findings_by_severity: by_severity,
    }
}
