//! The value scorer: one listing plus a reference table in, one valuation out.

use chrono::Datelike;
use finnbil_core::{AppConfig, ListingAttributes};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::depreciation::DepreciationCurve;
use crate::error::{InvalidInput, ValuationError};
use crate::grade::{combine_grades, Grade, Recommendation};
use crate::normalize::{normalize_variant, NormalizedVariant};
use crate::reference::ReferencePriceTable;

/// Earliest model year accepted as real data.
pub const MIN_MODEL_YEAR: i32 = 1900;

/// Price comparison against the depreciation curve.
///
/// Present only when the reference table knew the model, so the three
/// figures are always available together or not at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceComparison {
    /// Manufacturer list price when the car was new.
    pub original_price: Decimal,
    pub expected_value_today: Decimal,
    /// `(asking - expected) / expected`; negative means underpriced.
    pub actual_vs_expected_pct: Decimal,
}

/// Non-fatal data issues noticed while scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataQualityWarning {
    /// Model year is after the evaluation year; scored as a brand-new car.
    FutureModelYear { model_year: i32, evaluation_year: i32 },
}

impl std::fmt::Display for DataQualityWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataQualityWarning::FutureModelYear {
                model_year,
                evaluation_year,
            } => write!(
                f,
                "model year {model_year} is after evaluation year {evaluation_year}; treated as age 0"
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValuationResult {
    pub variant: NormalizedVariant,
    pub age_years: u32,
    /// Cumulative depreciation applied for `age_years`.
    pub depreciation: Decimal,
    pub price_comparison: Option<PriceComparison>,
    /// `odometer_km / max(age, 1)`.
    pub mileage_per_year: Decimal,
    pub mileage_grade: Grade,
    pub price_grade: Grade,
    pub trim_grade: Grade,
    pub overall_grade: Grade,
    pub recommendation: Recommendation,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<DataQualityWarning>,
}

impl ValuationResult {
    #[must_use]
    pub fn original_price(&self) -> Option<Decimal> {
        self.price_comparison.as_ref().map(|p| p.original_price)
    }

    #[must_use]
    pub fn expected_value_today(&self) -> Option<Decimal> {
        self.price_comparison.as_ref().map(|p| p.expected_value_today)
    }

    #[must_use]
    pub fn actual_vs_expected_pct(&self) -> Option<Decimal> {
        self.price_comparison
            .as_ref()
            .map(|p| p.actual_vs_expected_pct)
    }

    #[must_use]
    pub fn is_good_deal(&self) -> bool {
        self.recommendation == Recommendation::Recommended
    }
}

/// Scores listings against a depreciation curve at a fixed evaluation year.
///
/// Holds no mutable state; one scorer can be shared by any number of threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueScorer {
    curve: DepreciationCurve,
    evaluation_year: i32,
}

impl ValueScorer {
    #[must_use]
    pub fn new(curve: DepreciationCurve, evaluation_year: i32) -> Self {
        Self {
            curve,
            evaluation_year,
        }
    }

    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            DepreciationCurve::from_selection(config.depreciation_curve),
            config.evaluation_year,
        )
    }

    /// New-car curve evaluated at the current UTC year.
    #[must_use]
    pub fn for_current_year() -> Self {
        Self::new(DepreciationCurve::new_car(), chrono::Utc::now().year())
    }

    #[must_use]
    pub fn evaluation_year(&self) -> i32 {
        self.evaluation_year
    }

    #[must_use]
    pub fn curve(&self) -> &DepreciationCurve {
        &self.curve
    }

    /// Values one listing.
    ///
    /// A reference miss is not an error: the price grade falls back to `C`
    /// and the result carries no price comparison.
    ///
    /// # Errors
    ///
    /// Returns [`ValuationError::InvalidInput`] for a non-positive asking
    /// price, a negative odometer reading, or a model year outside
    /// `1900..=evaluation_year + 1`.
    pub fn score<T>(
        &self,
        listing: &ListingAttributes,
        table: &T,
    ) -> Result<ValuationResult, ValuationError>
    where
        T: ReferencePriceTable + ?Sized,
    {
        self.validate(listing)?;

        let variant = normalize_variant(&listing.variant);
        let mut warnings = Vec::new();

        let age_years = match u32::try_from(self.evaluation_year - listing.model_year) {
            Ok(age) => age,
            Err(_) => {
                let warning = DataQualityWarning::FutureModelYear {
                    model_year: listing.model_year,
                    evaluation_year: self.evaluation_year,
                };
                tracing::warn!(variant = %listing.variant, %warning, "data quality warning");
                warnings.push(warning);
                0
            }
        };
        let depreciation = self.curve.cumulative(age_years);

        let price_comparison = table
            .lookup_original_price(&listing.variant, listing.model_year)
            .filter(|price| price.is_sign_positive() && !price.is_zero())
            .and_then(|original_price| self.compare_price(listing, original_price, age_years));

        let price_grade = price_comparison
            .as_ref()
            .map_or(Grade::NEUTRAL, |p| Grade::for_price_deviation(p.actual_vs_expected_pct));

        let mileage_per_year =
            Decimal::from(listing.odometer_km) / Decimal::from(age_years.max(1));
        let mileage_grade = Grade::for_mileage_per_year(mileage_per_year);
        let trim_grade = Grade::for_trim(variant.trim_level);
        let overall_grade = combine_grades(mileage_grade, price_grade, trim_grade);

        tracing::debug!(
            variant = %listing.variant,
            base_model = %variant.base_model,
            trim = %variant.trim_level,
            age_years,
            reference_hit = price_comparison.is_some(),
            %mileage_grade,
            %price_grade,
            %trim_grade,
            %overall_grade,
            "scored listing"
        );

        Ok(ValuationResult {
            variant,
            age_years,
            depreciation,
            price_comparison,
            mileage_per_year,
            mileage_grade,
            price_grade,
            trim_grade,
            overall_grade,
            recommendation: Recommendation::for_grade(overall_grade),
            warnings,
        })
    }

    /// `None` when the deviation is not representable, e.g. a reference
    /// price so small its expected value rounds to zero.
    fn compare_price(
        &self,
        listing: &ListingAttributes,
        original_price: Decimal,
        age_years: u32,
    ) -> Option<PriceComparison> {
        let expected_value_today = self.curve.expected_value(original_price, age_years);
        let actual_vs_expected_pct = Decimal::from(listing.asking_price)
            .checked_sub(expected_value_today)
            .and_then(|diff| diff.checked_div(expected_value_today));
        if actual_vs_expected_pct.is_none() {
            tracing::warn!(
                variant = %listing.variant,
                %original_price,
                %expected_value_today,
                "price deviation out of range; price graded neutral"
            );
        }
        Some(PriceComparison {
            original_price,
            expected_value_today,
            actual_vs_expected_pct: actual_vs_expected_pct?,
        })
    }

    fn validate(&self, listing: &ListingAttributes) -> Result<(), InvalidInput> {
        if listing.asking_price <= 0 {
            return Err(InvalidInput::NonPositivePrice(listing.asking_price));
        }
        if listing.odometer_km < 0 {
            return Err(InvalidInput::NegativeOdometer(listing.odometer_km));
        }
        let max = self.evaluation_year.saturating_add(1);
        if !(MIN_MODEL_YEAR..=max).contains(&listing.model_year) {
            return Err(InvalidInput::ImplausibleModelYear {
                year: listing.model_year,
                min: MIN_MODEL_YEAR,
                max,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "scorer_test.rs"]
mod tests;
