//! Semantic classification: column types, entity kinds, business domain.

pub mod lexicon;

mod column;
mod domain;
mod entity;

pub use column::{classify_column, classify_columns, SemanticType};
pub use domain::{infer_domain, BusinessDomain, DomainInference};
pub use entity::{detect_entity, EntityKind};
