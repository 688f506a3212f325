/// Data layer: core types, loading, filtering and aggregation.
///
/// Nothing in here depends on the UI.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → ProductTable (cached once per process)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  price range ∧ rating set ∧ name search → ProductTable
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate │  histograms, rating counts, top-N, means
///   └───────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  format   │  display templates for metrics and table cells
///   └──────────┘
/// ```
///
/// `pipeline::render` chains the last three for one filter state.

pub mod aggregate;
pub mod error;
pub mod filter;
pub mod format;
pub mod loader;
pub mod model;
pub mod pipeline;
