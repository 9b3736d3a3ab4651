use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValuationError {
    /// Collection-time data corruption. Never retried; the caller decides
    /// whether to skip the record or surface it.
    #[error("invalid listing input: {0}")]
    InvalidInput(#[from] InvalidInput),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidInput {
    #[error("asking price must be positive, got {0}")]
    NonPositivePrice(i64),

    #[error("odometer reading must not be negative, got {0} km")]
    NegativeOdometer(i64),

    #[error("model year {year} is outside the plausible range {min}..={max}")]
    ImplausibleModelYear { year: i32, min: i32, max: i32 },
}

#[derive(Debug, Error)]
pub enum ReferenceLoadError {
    #[error("failed to read reference sheet {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error in reference sheet: {0}")]
    Csv(#[from] csv::Error),
}
