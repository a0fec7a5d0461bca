use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors raised while loading logs or post-processing series.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{category} component not recognized: '{value}'")]
    ComponentNotRecognized { category: &'static str, value: String },

    #[error("cannot convert '{from}' to '{to}': incompatible dimensions")]
    IncompatibleUnits { from: String, to: String },

    #[error("'{unit}' has half-integer exponents; its square root is not representable")]
    FractionalExponent { unit: String },

    #[error("length mismatch: {left} values against {right}")]
    LengthMismatch { left: usize, right: usize },

    #[error("series '{name}' has {len} samples, at least {min} required")]
    SeriesTooShort { name: String, len: usize, min: usize },

    #[error("{path}: column {column} out of range ({width} columns)")]
    ColumnOutOfRange {
        path: PathBuf,
        column: String,
        width: usize,
    },

    #[error("{path}:{line}: '{token}' is not a number")]
    Parse {
        path: PathBuf,
        line: usize,
        token: String,
    },

    #[error("{0}: log contains no data rows")]
    EmptyLog(PathBuf),

    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid simulation configuration: {0}")]
    InvalidConfig(String),

    #[error("no gravitational waves in a {dim}D simulation")]
    NoGravitationalWaves { dim: u8 },

    #[error("no {what} found in the search window")]
    PeakNotFound { what: &'static str },

    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Arrow: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Parquet: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn not_recognized(category: &'static str, value: &str) -> Self {
        Error::ComponentNotRecognized {
            category,
            value: value.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
