use std::path::Path;

use anyhow::Context;
use finnbil_core::{ListingError, ScrapedListing};
use finnbil_valuation::{BatchReport, ReferencePriceTable, ValueScorer};

use crate::output::{fmt_km, fmt_money, fmt_opt, fmt_pct, truncate};

/// Score every listing in a scraper JSON file and print the ranked report.
///
/// Cards that cannot become listings (sold, missing fields) and listings the
/// scorer rejects are reported, not fatal.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a JSON array of
/// listing cards.
pub(crate) fn run_batch<T>(
    scorer: &ValueScorer,
    table: &T,
    path: &Path,
    json: bool,
) -> anyhow::Result<()>
where
    T: ReferencePriceTable + ?Sized,
{
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read listings from {}", path.display()))?;
    let cards: Vec<ScrapedListing> = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a JSON array of listings", path.display()))?;

    let report = build_report(scorer, table, &cards);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

pub(crate) fn build_report<T>(scorer: &ValueScorer, table: &T, cards: &[ScrapedListing]) -> BatchReport
where
    T: ReferencePriceTable + ?Sized,
{
    let mut listings = Vec::with_capacity(cards.len());
    let mut unconverted = Vec::new();
    for card in cards {
        match card.to_listing() {
            Ok(listing) => listings.push(listing),
            Err(e) => {
                tracing::debug!(label = card.label(), error = %e, "skipping scraped card");
                unconverted.push((card.label().to_string(), e));
            }
        }
    }

    let mut report = scorer.score_batch(&listings, table);
    for (label, err) in unconverted {
        match err {
            ListingError::Sold { .. } => report.push_sold(label),
            other => report.push_rejected(label, other),
        }
    }
    report
}

fn print_report(report: &BatchReport) {
    if report.ranked.is_empty() {
        println!("no listings could be scored");
    } else {
        println!(
            "{:<5}{:<7}{:<13}{:<14}{:<11}LISTING",
            "RANK", "GRADE", "KM/YR", "PRICE", "VS. EXP."
        );
        for (i, entry) in report.ranked.iter().enumerate() {
            let v = &entry.valuation;
            println!(
                "{:<5}{:<7}{:<13}{:<14}{:<11}{} ({})",
                i + 1,
                v.overall_grade.to_string(),
                fmt_km(v.mileage_per_year),
                fmt_money(entry.listing.asking_price.into()),
                fmt_opt(v.actual_vs_expected_pct(), fmt_pct),
                truncate(&entry.listing.variant, 45),
                entry.listing.model_year
            );
        }
    }

    println!();
    println!(
        "scored {}, rejected {}, good deals {}",
        report.total_scored(),
        report.rejected.len(),
        report.good_deals
    );
    let distribution: Vec<String> = report
        .grade_distribution
        .iter()
        .map(|(grade, count)| format!("{grade}: {count}"))
        .collect();
    println!("grades: {}", distribution.join("  "));

    let stats = &report.statistics;
    println!(
        "listings {}, sold {}",
        stats.total_listings, stats.sold_count
    );
    if let Some(price) = stats.price {
        println!(
            "price:   avg {}  range {} - {}",
            fmt_money(price.mean),
            fmt_money(price.min.into()),
            fmt_money(price.max.into())
        );
    }
    if let Some(mileage) = stats.mileage {
        println!(
            "mileage: avg {}  range {} - {}",
            fmt_km(mileage.mean),
            fmt_km(mileage.min.into()),
            fmt_km(mileage.max.into())
        );
    }
    if let Some(years) = stats.year_range {
        println!("years:   {} - {}", years.min, years.max);
    }

    if let (Some(best), Some(worst)) = (report.best(), report.worst()) {
        println!("best:  {} ({})", best.listing.variant, best.valuation.recommendation);
        println!("worst: {} ({})", worst.listing.variant, worst.valuation.recommendation);
    }

    if !report.rejected.is_empty() {
        println!();
        println!("rejected:");
        for rejected in &report.rejected {
            println!("  {}: {}", rejected.label, rejected.reason);
        }
    }
}
