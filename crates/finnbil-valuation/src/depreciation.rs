//! Tabulated cumulative depreciation curves.
//!
//! Both curves are the yearly declining-balance rates of the Norwegian
//! industry standard (20/14/13/12/11/10 % for cars bought new,
//! 17/11/11/11/11/10 % for cars bought used) compounded per year and rounded
//! to two decimals.

use finnbil_core::CurveSelection;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Oldest tabulated age; older cars use this rate.
pub const MAX_TABULATED_AGE: u32 = 6;

/// Cumulative fractional value loss by vehicle age.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepreciationCurve {
    /// Index `n` holds the cumulative rate for age `n + 1`.
    cumulative: [Decimal; MAX_TABULATED_AGE as usize],
    /// Index `n` holds the loss during year `n + 1`, as a share of the value
    /// at the start of that year.
    yearly: [Decimal; MAX_TABULATED_AGE as usize],
}

impl DepreciationCurve {
    #[must_use]
    pub fn new_car() -> Self {
        Self {
            cumulative: [
                dec!(0.20),
                dec!(0.31),
                dec!(0.40),
                dec!(0.47),
                dec!(0.53),
                dec!(0.58),
            ],
            yearly: [
                dec!(0.20),
                dec!(0.14),
                dec!(0.13),
                dec!(0.12),
                dec!(0.11),
                dec!(0.10),
            ],
        }
    }

    #[must_use]
    pub fn used_car() -> Self {
        Self {
            cumulative: [
                dec!(0.17),
                dec!(0.26),
                dec!(0.34),
                dec!(0.41),
                dec!(0.48),
                dec!(0.53),
            ],
            yearly: [
                dec!(0.17),
                dec!(0.11),
                dec!(0.11),
                dec!(0.11),
                dec!(0.11),
                dec!(0.10),
            ],
        }
    }

    #[must_use]
    pub fn from_selection(selection: CurveSelection) -> Self {
        match selection {
            CurveSelection::NewCar => Self::new_car(),
            CurveSelection::UsedCar => Self::used_car(),
        }
    }

    /// Cumulative depreciation for a car of the given age.
    ///
    /// Age 0 is the identity case (no loss); ages past the table clamp to
    /// the last tabulated rate.
    #[must_use]
    pub fn cumulative(&self, age_years: u32) -> Decimal {
        if age_years == 0 {
            return Decimal::ZERO;
        }
        let age = age_years.min(MAX_TABULATED_AGE) as usize;
        self.cumulative[age - 1]
    }

    /// Expected market value of a car that cost `original_price` new.
    ///
    /// The retained share never exceeds one, so this cannot overflow; for
    /// prices near `Decimal`'s precision limit it may round to zero.
    #[must_use]
    pub fn expected_value(&self, original_price: Decimal, age_years: u32) -> Decimal {
        original_price * (Decimal::ONE - self.cumulative(age_years))
    }

    /// Share of value lost during the year in which the car reaches
    /// `age_years`. Age 0 is treated as the first year; ages past the table
    /// use the last rate.
    #[must_use]
    pub fn yearly_rate(&self, age_years: u32) -> Decimal {
        let age = age_years.clamp(1, MAX_TABULATED_AGE) as usize;
        self.yearly[age - 1]
    }

    /// Project the value of a car worth `current_value` today over the next
    /// `years_ahead` calendar years, applying one yearly rate per year on the
    /// declining balance.
    ///
    /// Amounts are rounded to whole kroner each year. Projection stops early
    /// if the calendar year or value leaves the representable range.
    #[must_use]
    pub fn forecast(
        &self,
        current_value: Decimal,
        current_age: u32,
        from_year: i32,
        years_ahead: u32,
    ) -> DepreciationForecast {
        let mut years = Vec::new();
        let mut value = current_value;

        for step in 1..=years_ahead {
            let (Some(age_years), Some(year)) = (
                current_age.checked_add(step),
                i32::try_from(step).ok().and_then(|s| from_year.checked_add(s)),
            ) else {
                break;
            };
            let yearly_rate = self.yearly_rate(age_years);
            let Some(depreciation_amount) = value.checked_mul(yearly_rate) else {
                break;
            };
            let depreciation_amount = round_kroner(depreciation_amount);
            value -= depreciation_amount;
            years.push(ForecastYear {
                year,
                age_years,
                yearly_rate,
                depreciation_amount,
                estimated_value: value,
            });
        }

        DepreciationForecast {
            current_age,
            current_value,
            total_depreciation: current_value - value,
            final_value: value,
            years,
        }
    }
}

fn round_kroner(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// One projected calendar year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastYear {
    pub year: i32,
    pub age_years: u32,
    pub yearly_rate: Decimal,
    pub depreciation_amount: Decimal,
    pub estimated_value: Decimal,
}

/// Year-by-year value projection from today's price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepreciationForecast {
    pub current_age: u32,
    pub current_value: Decimal,
    pub years: Vec<ForecastYear>,
    pub total_depreciation: Decimal,
    pub final_value: Decimal,
}

impl DepreciationForecast {
    /// Total loss as a fraction of today's value; zero for a zero value.
    #[must_use]
    pub fn total_depreciation_pct(&self) -> Decimal {
        self.total_depreciation
            .checked_div(self.current_value)
            .unwrap_or(Decimal::ZERO)
    }
}

impl Default for DepreciationCurve {
    fn default() -> Self {
        Self::new_car()
    }
}
