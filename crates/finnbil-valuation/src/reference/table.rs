use std::collections::BTreeSet;

use rust_decimal::{Decimal, RoundingStrategy};

use super::{ReferencePriceTable, ReferenceRecord};
use crate::normalize::{base_model_tokens, normalize_variant, TrimLevel};

/// Year offsets tried in order when the exact model year has no match.
const YEAR_FALLBACK_OFFSETS: [i32; 5] = [0, 1, -1, 2, -2];

/// Candidates must score above this to count as a match.
const MIN_SIMILARITY: f64 = 0.3;

/// Bonus per shared token that separates otherwise similar models.
const IMPORTANT_TOKEN_BONUS: f64 = 0.1;

const IMPORTANT_TOKENS: [&str; 4] = ["hybrid", "phev", "awd-i", "2wd"];

/// In-memory reference table, read-only once built.
#[derive(Debug, Clone, Default)]
pub struct ReferencePrices {
    entries: Vec<Entry>,
}

#[derive(Debug, Clone)]
struct Entry {
    record: ReferenceRecord,
    tokens: BTreeSet<String>,
    trim: TrimLevel,
}

impl ReferencePrices {
    #[must_use]
    pub fn new(records: Vec<ReferenceRecord>) -> Self {
        let entries = records
            .into_iter()
            .map(|record| {
                let normalized = normalize_variant(&record.model_name);
                Entry {
                    tokens: normalized.tokens(),
                    trim: normalized.trim_level,
                    record,
                }
            })
            .collect();
        Self { entries }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = &ReferenceRecord> {
        self.entries.iter().map(|e| &e.record)
    }

    /// Distinct price-list years, ascending.
    #[must_use]
    pub fn years(&self) -> Vec<i32> {
        self.entries
            .iter()
            .map(|e| e.record.year)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Best match within a single price-list year.
    ///
    /// Several trims usually share one base model and tie on the best score.
    /// Among those, rows of the listing's own trim win; when the trim is
    /// unknown or has no row that year, the tie resolves to the mean of all
    /// tied list prices.
    #[allow(clippy::float_cmp)]
    fn match_in_year(
        &self,
        query: &BTreeSet<String>,
        trim: TrimLevel,
        year: i32,
    ) -> Option<Decimal> {
        let mut best_score = MIN_SIMILARITY;
        let mut best: Vec<&Entry> = Vec::new();

        for entry in self.entries.iter().filter(|e| e.record.year == year) {
            let score = similarity(query, &entry.tokens);
            if score > best_score {
                best_score = score;
                best.clear();
                best.push(entry);
            } else if score == best_score && !best.is_empty() {
                best.push(entry);
            }
        }

        let same_trim: Vec<i64> = best
            .iter()
            .filter(|e| trim != TrimLevel::Unknown && e.trim == trim)
            .map(|e| e.record.list_price)
            .collect();
        if !same_trim.is_empty() {
            return Some(mean_price(&same_trim));
        }

        let all: Vec<i64> = best.iter().map(|e| e.record.list_price).collect();
        (!all.is_empty()).then(|| mean_price(&all))
    }
}

fn mean_price(prices: &[i64]) -> Decimal {
    let sum: Decimal = prices.iter().copied().map(Decimal::from).sum();
    let mean = sum / Decimal::from(prices.len());
    mean.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

impl ReferencePriceTable for ReferencePrices {
    fn lookup_original_price(&self, variant: &str, model_year: i32) -> Option<Decimal> {
        let normalized = normalize_variant(variant);
        let query = base_model_tokens(&normalized.base_model);
        if query.is_empty() {
            return None;
        }

        YEAR_FALLBACK_OFFSETS.iter().find_map(|offset| {
            let year = model_year.checked_add(*offset)?;
            let price = self.match_in_year(&query, normalized.trim_level, year);
            if price.is_some() && *offset != 0 {
                tracing::debug!(
                    variant,
                    model_year,
                    used_year = year,
                    "reference price taken from adjacent year"
                );
            }
            price
        })
    }
}

/// Token Jaccard overlap plus a bonus for shared important tokens, capped at 1.
#[allow(clippy::cast_precision_loss)]
fn similarity(query: &BTreeSet<String>, candidate: &BTreeSet<String>) -> f64 {
    let union = query.union(candidate).count();
    if union == 0 {
        return 0.0;
    }
    let common: Vec<&String> = query.intersection(candidate).collect();
    let important = common
        .iter()
        .filter(|t| IMPORTANT_TOKENS.contains(&t.as_str()))
        .count();

    let base = common.len() as f64 / union as f64;
    (base + important as f64 * IMPORTANT_TOKEN_BONUS).min(1.0)
}
