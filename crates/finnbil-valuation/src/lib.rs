//! Depreciation-based valuation of used-car listings.
//!
//! Normalizes the seller's free-text variant, looks up the original list
//! price in an injected [`ReferencePriceTable`], applies a tabulated
//! depreciation curve and grades mileage, price and trim into one combined
//! recommendation. Scoring is pure and synchronous; a scorer and a loaded
//! table can be shared across threads.

pub mod batch;
pub mod depreciation;
pub mod error;
pub mod grade;
pub mod normalize;
pub mod reference;
pub mod scorer;

pub use batch::{
    BatchReport, ListingStatistics, RejectedListing, ScoredListing, ValueRange, YearRange,
};
pub use depreciation::{DepreciationCurve, DepreciationForecast, ForecastYear};
pub use error::{InvalidInput, ReferenceLoadError, ValuationError};
pub use grade::{combine_grades, Grade, Recommendation};
pub use normalize::{normalize_variant, NormalizedVariant, TrimLevel};
pub use reference::{
    load_reference_sheet, parse_reference_sheet, CachedReferenceTable, ParsedSheet,
    ReferencePriceTable, ReferencePrices, ReferenceRecord,
};
pub use scorer::{DataQualityWarning, PriceComparison, ValuationResult, ValueScorer};
