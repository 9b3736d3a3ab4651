//! Scoring many listings at once and summarizing the outcome.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use finnbil_core::ListingAttributes;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::error::ValuationError;
use crate::grade::Grade;
use crate::reference::ReferencePriceTable;
use crate::scorer::{ValuationResult, ValueScorer};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoredListing {
    pub listing: ListingAttributes,
    pub valuation: ValuationResult,
}

/// A record that never reached grading, with the reason it was dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedListing {
    pub label: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    /// Scored listings, best value first.
    pub ranked: Vec<ScoredListing>,
    pub rejected: Vec<RejectedListing>,
    /// Count per overall grade; every grade is present, possibly with 0.
    pub grade_distribution: BTreeMap<Grade, usize>,
    /// Listings with an A or B overall grade.
    pub good_deals: usize,
    pub statistics: ListingStatistics,
}

/// Market summary over the listings of one batch.
///
/// Price, mileage and year ranges cover scored listings only; sold and
/// rejected cards count towards `total_listings`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListingStatistics {
    pub total_listings: usize,
    pub sold_count: usize,
    pub price: Option<ValueRange>,
    pub mileage: Option<ValueRange>,
    pub year_range: Option<YearRange>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ValueRange {
    pub min: i64,
    pub max: i64,
    /// Arithmetic mean, rounded to two decimals.
    pub mean: Decimal,
}

impl ValueRange {
    fn from_values(values: impl IntoIterator<Item = i64>) -> Option<Self> {
        let mut count = 0_u64;
        let mut sum = 0_i128;
        let mut min = i64::MAX;
        let mut max = i64::MIN;
        for value in values {
            count += 1;
            sum += i128::from(value);
            min = min.min(value);
            max = max.max(value);
        }
        if count == 0 {
            return None;
        }
        let mean = Decimal::try_from_i128_with_scale(sum, 0)
            .ok()?
            .checked_div(Decimal::from(count))?
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        Some(Self { min, max, mean })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearRange {
    pub min: i32,
    pub max: i32,
}

impl ListingStatistics {
    fn from_scored(scored: &[ScoredListing], rejected: usize) -> Self {
        let listings = || scored.iter().map(|s| &s.listing);
        let year_range = listings()
            .map(|l| l.model_year)
            .fold(None, |range: Option<YearRange>, year| {
                Some(range.map_or(YearRange { min: year, max: year }, |r| YearRange {
                    min: r.min.min(year),
                    max: r.max.max(year),
                }))
            });

        Self {
            total_listings: scored.len() + rejected,
            sold_count: 0,
            price: ValueRange::from_values(listings().map(|l| l.asking_price)),
            mileage: ValueRange::from_values(listings().map(|l| l.odometer_km)),
            year_range,
        }
    }
}

impl BatchReport {
    fn from_scored(mut scored: Vec<ScoredListing>, rejected: Vec<RejectedListing>) -> Self {
        scored.sort_by(rank_order);

        let mut grade_distribution: BTreeMap<Grade, usize> =
            Grade::ALL.into_iter().map(|g| (g, 0)).collect();
        for entry in &scored {
            *grade_distribution
                .entry(entry.valuation.overall_grade)
                .or_default() += 1;
        }
        let good_deals = scored.iter().filter(|s| s.valuation.is_good_deal()).count();
        let statistics = ListingStatistics::from_scored(&scored, rejected.len());

        Self {
            ranked: scored,
            rejected,
            grade_distribution,
            good_deals,
            statistics,
        }
    }

    #[must_use]
    pub fn total_scored(&self) -> usize {
        self.ranked.len()
    }

    #[must_use]
    pub fn best(&self) -> Option<&ScoredListing> {
        self.ranked.first()
    }

    #[must_use]
    pub fn worst(&self) -> Option<&ScoredListing> {
        self.ranked.last()
    }

    /// Records a listing that was dropped before scoring, e.g. a sold car
    /// or a card missing its price.
    pub fn push_rejected(&mut self, label: impl Into<String>, reason: impl ToString) {
        self.rejected.push(RejectedListing {
            label: label.into(),
            reason: reason.to_string(),
        });
        self.statistics.total_listings += 1;
    }

    /// Records a card whose price reads "solgt"; it is rejected from scoring
    /// and counted in the sold statistics.
    pub fn push_sold(&mut self, label: impl Into<String>) {
        self.push_rejected(label, "sold");
        self.statistics.sold_count += 1;
    }
}

/// Low mileage per year first, then better overall grade, then the most
/// underpriced. Listings without a price comparison sort after those with one.
fn rank_order(a: &ScoredListing, b: &ScoredListing) -> Ordering {
    let (va, vb) = (&a.valuation, &b.valuation);
    va.mileage_per_year
        .cmp(&vb.mileage_per_year)
        .then_with(|| va.overall_grade.cmp(&vb.overall_grade))
        .then_with(
            || match (va.actual_vs_expected_pct(), vb.actual_vs_expected_pct()) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
        )
}

impl ValueScorer {
    /// Scores every listing, collecting invalid ones instead of failing.
    ///
    /// The ranking is deterministic for a given input; listings that tie on
    /// every ranking key keep their input order.
    pub fn score_batch<T>(&self, listings: &[ListingAttributes], table: &T) -> BatchReport
    where
        T: ReferencePriceTable + ?Sized,
    {
        let mut scored = Vec::with_capacity(listings.len());
        let mut rejected = Vec::new();

        for listing in listings {
            match self.score(listing, table) {
                Ok(valuation) => scored.push(ScoredListing {
                    listing: listing.clone(),
                    valuation,
                }),
                Err(ValuationError::InvalidInput(reason)) => {
                    tracing::warn!(
                        variant = %listing.variant,
                        error = %reason,
                        "skipping invalid listing"
                    );
                    rejected.push(RejectedListing {
                        label: listing.variant.clone(),
                        reason: reason.to_string(),
                    });
                }
            }
        }

        let report = BatchReport::from_scored(scored, rejected);
        tracing::info!(
            scored = report.total_scored(),
            rejected = report.rejected.len(),
            good_deals = report.good_deals,
            avg_price = ?report.statistics.price.map(|p| p.mean),
            "batch scored"
        );
        report
    }
}
