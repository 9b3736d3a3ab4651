//! Listing records as they arrive from the fetch layer and as the scorer
//! consumes them.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::ListingError;

/// Attributes of one advertised car, ready for valuation.
///
/// Values are taken as collected; range checks (positive price, non-negative
/// odometer, plausible year) happen when the listing is scored so that
/// corrupt records surface as errors instead of being silently graded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingAttributes {
    /// Seller-provided model/trim text, e.g. `"RAV4 Hybrid AWD-i Executive aut"`.
    pub variant: String,
    /// First year of registration.
    pub model_year: i32,
    pub odometer_km: i64,
    /// Whole currency units (NOK).
    pub asking_price: i64,
}

/// Price cell of a scraped card: either a number or a marker such as `"Solgt"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScrapedPrice {
    Amount(i64),
    Text(String),
}

/// One car card from a search results page, in the shape the scraper emits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapedListing {
    pub name: Option<String>,
    pub year: Option<i32>,
    /// Odometer reading in km.
    pub mileage: Option<i64>,
    pub price: Option<ScrapedPrice>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub finn_code: Option<String>,
}

impl ScrapedListing {
    /// Display label used in reports when the name is missing.
    #[must_use]
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("(unnamed)")
    }

    /// Converts the scraped card into [`ListingAttributes`].
    ///
    /// # Errors
    ///
    /// Returns [`ListingError`] when name, year, mileage or price is missing,
    /// when the car is marked as sold, or when the price text holds no digits.
    pub fn to_listing(&self) -> Result<ListingAttributes, ListingError> {
        let name = self
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or(ListingError::MissingField { field: "name" })?;
        let model_year = self.year.ok_or(ListingError::MissingField { field: "year" })?;
        let odometer_km = self
            .mileage
            .ok_or(ListingError::MissingField { field: "mileage" })?;

        let asking_price = match &self.price {
            None => return Err(ListingError::MissingField { field: "price" }),
            Some(ScrapedPrice::Amount(amount)) => *amount,
            Some(ScrapedPrice::Text(raw)) => parse_price_text(name, raw)?,
        };

        Ok(ListingAttributes {
            variant: name.to_string(),
            model_year,
            odometer_km,
            asking_price,
        })
    }
}

/// First amount in the text, with thousands grouped by space or dot.
static PRICE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{1,3}(?:[\s.]\d{3})+|\d+").expect("valid price regex"));

/// Parses price text such as `"349 000 kr"`; `"Solgt"` means the car is gone.
/// Only the first amount counts, so fees quoted after the price are ignored.
fn parse_price_text(name: &str, raw: &str) -> Result<i64, ListingError> {
    if raw.to_lowercase().contains("solgt") {
        return Err(ListingError::Sold {
            name: name.to_string(),
        });
    }

    PRICE_RE
        .find(raw)
        .map(|m| m.as_str().chars().filter(char::is_ascii_digit).collect::<String>())
        .and_then(|digits| digits.parse::<i64>().ok())
        .ok_or_else(|| ListingError::UnparseablePrice {
            name: name.to_string(),
            raw: raw.to_string(),
        })
}
