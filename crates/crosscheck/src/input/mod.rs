//! Input parsing and dataset handling.

mod parser;
mod source;

pub use parser::{normalize_column_name, LoadedData, Parser, ParserConfig};
pub use source::{Dataset, DatasetCollection, LoadFailure, SourceMetadata};
