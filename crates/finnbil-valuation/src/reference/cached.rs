use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use rust_decimal::Decimal;

use super::sheet::load_reference_sheet;
use super::{ReferencePriceTable, ReferencePrices};

/// Reference table backed by a price sheet on disk.
///
/// The sheet is read on first lookup and served from memory afterwards; it
/// is never reloaded. A missing or unreadable sheet is logged once and
/// behaves as an empty table, so scoring degrades to mileage and trim.
#[derive(Debug)]
pub struct CachedReferenceTable {
    path: PathBuf,
    prices: OnceLock<ReferencePrices>,
}

impl CachedReferenceTable {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            prices: OnceLock::new(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.prices.get().is_some()
    }

    /// The loaded table, reading the sheet if this is the first access.
    pub fn prices(&self) -> &ReferencePrices {
        self.prices.get_or_init(|| match load_reference_sheet(&self.path) {
            Ok(parsed) => {
                tracing::info!(
                    path = %self.path.display(),
                    records = parsed.prices.len(),
                    years = ?parsed.prices.years(),
                    skipped_rows = parsed.skipped_rows,
                    "loaded reference price sheet"
                );
                parsed.prices
            }
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "reference price sheet unavailable; price grading disabled"
                );
                ReferencePrices::default()
            }
        })
    }
}

impl ReferencePriceTable for CachedReferenceTable {
    fn lookup_original_price(&self, variant: &str, model_year: i32) -> Option<Decimal> {
        self.prices().lookup_original_price(variant, model_year)
    }
}
