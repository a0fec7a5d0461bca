/// Data layer: tagged arrays, log loading, column schemas, the transform
/// pipeline and export.
///
/// Architecture:
/// ```text
///  neu.dat / rho.dat / erg.dat / ...
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse log → LogTable   (schema: named columns)
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ TaggedSeries  │  values + unit + label, against time
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ pipeline  │  tob shift → derive → smooth
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  export   │  csv / json / parquet / table
///   └──────────┘
/// ```

pub mod export;
pub mod loader;
pub mod model;
pub mod pipeline;
pub mod schema;
