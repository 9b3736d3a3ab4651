use finnbil_valuation::CachedReferenceTable;

use crate::output::fmt_money;

/// Print the reference price sheet, optionally limited to one price-list year.
///
/// A missing sheet is not an error here either; it prints a notice so the
/// operator can fix `FINNBIL_REFERENCE_CSV`.
pub(crate) fn run_reference(table: &CachedReferenceTable, year: Option<i32>) {
    let prices = table.prices();
    if prices.is_empty() {
        println!(
            "no reference prices loaded from {}",
            table.path().display()
        );
        return;
    }

    let rows: Vec<_> = prices
        .records()
        .filter(|r| year.is_none_or(|y| r.year == y))
        .collect();

    if rows.is_empty() {
        let available: Vec<String> = prices.years().iter().map(ToString::to_string).collect();
        println!(
            "no reference prices for {}; available years: {}",
            year.map(|y| y.to_string()).unwrap_or_default(),
            available.join(", ")
        );
        return;
    }

    println!("{:<6}{:<14}MODEL", "YEAR", "LIST PRICE");
    for record in rows {
        println!(
            "{:<6}{:<14}{}",
            record.year,
            fmt_money(record.list_price.into()),
            record.model_name
        );
    }
}
