use anyhow::Context;
use finnbil_core::ListingAttributes;
use finnbil_valuation::{
    DepreciationForecast, ReferencePriceTable, ScoredListing, ValuationResult, ValueScorer,
};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::output::{fmt_km, fmt_money, fmt_opt, fmt_pct};

#[derive(Serialize)]
struct ScoreOutput {
    #[serde(flatten)]
    scored: ScoredListing,
    #[serde(skip_serializing_if = "Option::is_none")]
    forecast: Option<DepreciationForecast>,
}

/// Score one listing given on the command line, optionally projecting its
/// asking price `forecast_years` ahead.
///
/// # Errors
///
/// Returns an error if the listing is invalid (non-positive price, negative
/// odometer, implausible year) or the JSON output cannot be serialized.
pub(crate) fn run_score<T>(
    scorer: &ValueScorer,
    table: &T,
    listing: ListingAttributes,
    forecast_years: Option<u32>,
    json: bool,
) -> anyhow::Result<()>
where
    T: ReferencePriceTable + ?Sized,
{
    let valuation = scorer
        .score(&listing, table)
        .with_context(|| format!("cannot score \"{}\"", listing.variant))?;

    let forecast = forecast_years.map(|years| {
        scorer.curve().forecast(
            Decimal::from(listing.asking_price),
            valuation.age_years,
            scorer.evaluation_year(),
            years,
        )
    });

    if json {
        let output = ScoreOutput {
            scored: ScoredListing { listing, valuation },
            forecast,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    print_valuation(&listing, &valuation, scorer.evaluation_year());
    if let Some(forecast) = &forecast {
        print_forecast(forecast);
    }
    Ok(())
}

fn print_valuation(listing: &ListingAttributes, valuation: &ValuationResult, evaluation_year: i32) {
    println!("Listing:    {}", listing.variant);
    println!(
        "Model:      {} ({} trim)",
        valuation.variant.base_model, valuation.variant.trim_level
    );
    println!(
        "Age:        {} years (as of {evaluation_year}), depreciation {}%",
        valuation.age_years,
        (valuation.depreciation * Decimal::ONE_HUNDRED).normalize()
    );
    println!();
    println!("Asking price:     {}", fmt_money(listing.asking_price.into()));
    println!(
        "Original price:   {}",
        fmt_opt(valuation.original_price(), fmt_money)
    );
    println!(
        "Expected today:   {}",
        fmt_opt(valuation.expected_value_today(), fmt_money)
    );
    println!(
        "Vs. expected:     {}",
        fmt_opt(valuation.actual_vs_expected_pct(), fmt_pct)
    );
    if valuation.price_comparison.is_none() {
        println!("                  (no reference price found; price graded neutral)");
    }
    println!();
    println!(
        "Mileage: {}  {}/yr",
        valuation.mileage_grade,
        fmt_km(valuation.mileage_per_year)
    );
    println!("Price:   {}", valuation.price_grade);
    println!("Trim:    {}", valuation.trim_grade);
    println!("Overall: {}  {}", valuation.overall_grade, valuation.recommendation);

    for warning in &valuation.warnings {
        eprintln!("warning: {warning}");
    }
}

fn print_forecast(forecast: &DepreciationForecast) {
    println!();
    println!("{:<6}{:<5}{:<7}{:<14}VALUE", "YEAR", "AGE", "RATE", "LOSS");
    for year in &forecast.years {
        println!(
            "{:<6}{:<5}{:<7}{:<14}{}",
            year.year,
            year.age_years,
            format!("{}%", (year.yearly_rate * Decimal::ONE_HUNDRED).normalize()),
            fmt_money(year.depreciation_amount),
            fmt_money(year.estimated_value)
        );
    }
    println!(
        "Total loss {} ({}), final value {}",
        fmt_money(forecast.total_depreciation),
        fmt_pct(-forecast.total_depreciation_pct()),
        fmt_money(forecast.final_value)
    );
}
