/// Data layer: core types, loading, and normalization.
///
/// Architecture:
/// ```text
///  .xlsx / .ods / .csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  read cells → locate header → extract raw samples
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ normalize  │  parse timestamps/temperatures, drop bad rows, sort
///   └───────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Series   │  immutable time-sorted Vec<Sample>
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod normalize;
