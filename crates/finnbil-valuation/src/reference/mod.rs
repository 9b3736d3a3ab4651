//! Historical list prices the scorer compares asking prices against.
//!
//! The scorer only sees the [`ReferencePriceTable`] trait. Loading, caching
//! and matching policy belong to the implementations in this module.

mod cached;
mod sheet;
mod table;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub use cached::CachedReferenceTable;
pub use sheet::{load_reference_sheet, parse_reference_sheet, ParsedSheet};
pub use table::ReferencePrices;

/// Lookup of the manufacturer list price at the time of sale.
///
/// `variant` is the seller's free text; implementations normalize it
/// themselves so the trim can pick between rows of one base model. `None`
/// is an expected outcome (no matching model/year) and makes the scorer
/// fall back to mileage and trim grading.
pub trait ReferencePriceTable {
    fn lookup_original_price(&self, variant: &str, model_year: i32) -> Option<Decimal>;
}

impl<T: ReferencePriceTable + ?Sized> ReferencePriceTable for &T {
    fn lookup_original_price(&self, variant: &str, model_year: i32) -> Option<Decimal> {
        (**self).lookup_original_price(variant, model_year)
    }
}

/// One row of the historical price sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceRecord {
    /// Price-list year the row was published under.
    pub year: i32,
    pub model_name: String,
    /// Whole currency units.
    pub list_price: i64,
}
