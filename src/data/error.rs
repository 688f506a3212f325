use std::path::PathBuf;

use thiserror::Error;

/// The dataset could not be read or is not a product listing table.
///
/// Fatal to the load; nothing is cached and nothing is retried.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed parquet: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("malformed arrow batch: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("missing required column '{0}'")]
    MissingColumn(String),

    #[error("row {row}, column '{column}': invalid value '{value}'")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },

    #[error("expected a top-level array of record objects")]
    NotRecords,

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),
}

/// A filter state that would silently select an inverted range.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("invalid price range: min {min} is greater than max {max}")]
    InvalidPriceRange { min: u64, max: u64 },
}
