//! End-to-end scoring against a price sheet written to a temp file.
//!
//! Exercises the path the CLI takes: scraped JSON cards are converted to
//! listings, the reference sheet is loaded lazily through
//! `CachedReferenceTable`, and the batch report is built from the results.

use std::io::Write;

use finnbil_core::{CurveSelection, ListingError, ScrapedListing};
use finnbil_valuation::{
    CachedReferenceTable, DepreciationCurve, Grade, ReferencePriceTable, ValueScorer,
};
use rust_decimal_macros::dec;

const SHEET: &str = "\
01.11.2019
Modellnavn,Type,Dører,Seter,Motor,Effekt,Drift,Gir,Lengde,Vekt,Forbruk,CO2,NOx,Pris
RAV4 Hybrid AWD-i Executive,SUV,5,5,2.5,222/163,AWD,aut,4600,1750,\"4,8\",109,3,\"527 100\"
RAV4 Hybrid 2WD Active,SUV,5,5,2.5,218/160,2WD,aut,4600,1650,\"4,5\",102,3,\"414 900\"

01.11.2021
Modellnavn,Type,Dører,Seter,Motor,Effekt,Drift,Gir,Lengde,Vekt,Forbruk,CO2,NOx,Pris
RAV4 Plug-in Hybrid AWD-i Style,SUV,5,5,2.5,306/225,AWD,aut,4600,1900,\"1,0\",22,1,\"579 900\"
";

const CARDS: &str = r#"[
    {"name": "Toyota RAV4 Hybrid AWD-i Executive aut", "year": 2019, "mileage": 60000, "price": 350000,
     "link": "https://www.finn.no/car/used/ad.html?finnkode=100", "finn_code": "100"},
    {"name": "Toyota RAV4 Plug-in Hybrid AWD-i Style", "year": 2022, "mileage": 25000, "price": "389 000 kr"},
    {"name": "Toyota RAV4 Hybrid 2WD Active", "year": 2019, "mileage": 150000, "price": "Solgt"},
    {"name": "Toyota RAV4 Hybrid 2WD Active", "year": 2019, "mileage": 150000}
]"#;

fn sheet_file() -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("create temp sheet");
    file.write_all(SHEET.as_bytes()).expect("write temp sheet");
    file
}

#[test]
fn single_listing_scores_against_loaded_sheet() {
    let file = sheet_file();
    let table = CachedReferenceTable::new(file.path());
    let scorer = ValueScorer::new(DepreciationCurve::new_car(), 2024);

    let cards: Vec<ScrapedListing> = serde_json::from_str(CARDS).unwrap();
    let listing = cards[0].to_listing().unwrap();
    let result = scorer.score(&listing, &table).unwrap();

    // "Toyota" stays in the base model, so the match is fuzzy rather than
    // exact, but it still resolves to the Executive row.
    assert_eq!(result.original_price(), Some(dec!(527100)));
    assert_eq!(result.expected_value_today(), Some(dec!(247737)));
    assert_eq!(result.price_grade, Grade::F);
    assert_eq!(result.mileage_grade, Grade::B);
    assert_eq!(result.overall_grade, Grade::B);
}

#[test]
fn plug_in_model_falls_back_to_previous_price_list() {
    let file = sheet_file();
    let table = CachedReferenceTable::new(file.path());

    // No 2022 or 2023 list; 2021 is one year back.
    let price = table.lookup_original_price("RAV4 PHEV AWD-i", 2022);
    assert_eq!(price, Some(dec!(579900)));
}

#[test]
fn batch_from_scraped_cards_reports_rejections() {
    let file = sheet_file();
    let table = CachedReferenceTable::new(file.path());
    let scorer = ValueScorer::new(DepreciationCurve::from_selection(CurveSelection::NewCar), 2024);

    let cards: Vec<ScrapedListing> = serde_json::from_str(CARDS).unwrap();
    let mut listings = Vec::new();
    let mut conversion_failures = Vec::new();
    for card in &cards {
        match card.to_listing() {
            Ok(listing) => listings.push(listing),
            Err(e) => conversion_failures.push((card.label().to_owned(), e)),
        }
    }

    let mut report = scorer.score_batch(&listings, &table);
    for (label, err) in conversion_failures {
        match err {
            ListingError::Sold { .. } => report.push_sold(label),
            other => report.push_rejected(label, other),
        }
    }

    assert_eq!(report.total_scored(), 2);
    assert_eq!(report.rejected.len(), 2);
    assert!(report.rejected[0].reason.contains("sold"));
    assert!(report.rejected[1].reason.contains("price"));

    let stats = &report.statistics;
    assert_eq!(stats.total_listings, 4);
    assert_eq!(stats.sold_count, 1);
    assert_eq!(stats.price.unwrap().mean, dec!(369500));
    assert_eq!(stats.year_range.map(|y| (y.min, y.max)), Some((2019, 2022)));

    // 12 500 km/yr for the plug-in against 12 000 km/yr for the Executive.
    let best = report.best().unwrap();
    assert_eq!(best.listing.model_year, 2019);
    assert_eq!(report.grade_distribution.values().sum::<usize>(), 2);
}

#[test]
fn missing_sheet_scores_without_price_grade() {
    let table = CachedReferenceTable::new("/nonexistent/finnbil/rav4.csv");
    let scorer = ValueScorer::new(DepreciationCurve::new_car(), 2024);
    let cards: Vec<ScrapedListing> = serde_json::from_str(CARDS).unwrap();

    let result = scorer.score(&cards[0].to_listing().unwrap(), &table).unwrap();
    assert!(result.price_comparison.is_none());
    assert_eq!(result.price_grade, Grade::C);
    // Mileage B, neutral price, Executive promotes to A.
    assert_eq!(result.overall_grade, Grade::A);
}
