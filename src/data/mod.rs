/// Data layer: core types, loading, filtering, and summary metrics.
///
/// Architecture:
/// ```text
///  .csv / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file once → Arc<Dataset> (DatasetCache)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Dataset  │  Vec<Record>, Schema with optional-column positions
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  magnitude ∧ depth ∧ country → FilteredView (indices)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  summary  │  count, mean magnitude, tsunami total
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod summary;
