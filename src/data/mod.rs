/// Data layer: core types, loading, and column selection.
///
/// Architecture:
/// ```text
///  .csv (comma / tab / whitespace / semicolon, `#` comments)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  delimiter cascade → Table
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Table    │  named, uniformly typed columns
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  select   │  numeric columns, projections, group partitions
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod select;
