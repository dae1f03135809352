//! Cross-dataset integration checks.
//!
//! Three checks run over a loaded collection: orphan detection across join
//! candidates, duplicate entity detection within each dataset, and process
//! flow gap detection across pipeline stages. Each produces plain finding
//! records; scoring and reporting consume them through the [`Finding`]
//! union.

pub mod duplicates;
pub mod finding;
pub mod gaps;
pub mod orphans;

pub use duplicates::{DedupeConfig, check_duplicates};
pub use finding::{
    DuplicateFinding, DuplicateGroup, DuplicateKind, Finding, FuzzyNamePair, GapFinding,
    OrphanFinding, SampleRows, Severity,
};
pub use gaps::check_gaps;
pub use orphans::check_orphans;
