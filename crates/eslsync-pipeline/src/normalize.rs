//! Conversion of raw spreadsheet rows into [`UpdateRecord`]s.
//!
//! Each row is normalized independently: a row with a missing identifier or
//! an unreadable price yields a [`RowError`] and the rest of the upload is
//! unaffected.

use std::str::FromStr;

use eslsync_core::{IisCommand, PricingMode, UpdateRecord};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::columns::{
    ColumnLayout, BRAND_NAME, CURRENT_RETAIL, DESCRIPTION, PRODUCT_CODE, PRODUCT_ID,
};
use crate::error::RowError;
use crate::sheet::{RawRow, Sheet};
use crate::types::SkippedRow;

/// Tax-inclusive markup applied to `Current Retail` (7.53 %).
pub const TAX_MARKUP: Decimal = Decimal::from_parts(10753, 0, 0, false, 4);

/// Fixed divisor from `price1` to the secondary-currency `price2`.
pub const SECONDARY_PRICE_DIVISOR: Decimal = Decimal::from_parts(18, 0, 0, false, 1);

/// How prices and enrichment fields are derived for every row of an upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DerivationMode {
    Direct,
    TaxAdjusted,
}

/// Records that survived normalization plus diagnostics for those that did not.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRows {
    pub records: Vec<UpdateRecord>,
    pub skipped: Vec<SkippedRow>,
    pub rows_attempted: usize,
}

/// Normalizes every row of `sheet`, collecting failures instead of stopping.
#[must_use]
pub fn normalize_rows(sheet: &Sheet, pricing_mode: PricingMode) -> NormalizedRows {
    let layout = ColumnLayout::resolve(sheet.headers().iter().map(String::as_str), pricing_mode);
    tracing::debug!(
        mode = ?layout.mode,
        stock_column = layout.stock_column.as_deref().unwrap_or("<none>"),
        "resolved column layout"
    );

    let mut records = Vec::with_capacity(sheet.rows().len());
    let mut skipped = Vec::new();

    for row in sheet.rows() {
        match normalize_row(row, &layout) {
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::warn!(row = row.row_number(), error = %e, "skipping row");
                skipped.push(SkippedRow {
                    row: row.row_number(),
                    reason: e.to_string(),
                });
            }
        }
    }

    NormalizedRows {
        records,
        skipped,
        rows_attempted: sheet.rows().len(),
    }
}

/// Normalizes a single row according to `layout`.
///
/// # Errors
///
/// - [`RowError::MissingCell`] if `Product ID`, `Product Code`, or
///   `Current Retail` is absent or blank.
/// - [`RowError::InvalidPrice`] if `Current Retail` is not a number.
/// - [`RowError::PriceOutOfRange`] if the tax markup overflows.
pub fn normalize_row(row: &RawRow, layout: &ColumnLayout) -> Result<UpdateRecord, RowError> {
    let sku = required_text(row, PRODUCT_ID)?;
    let item_short_name = required_text(row, PRODUCT_CODE)?;
    let retail = required_price(row, CURRENT_RETAIL)?;

    let (price1, price2, item_name, manufacturer) = match layout.mode {
        DerivationMode::Direct => (retail, None, None, None),
        DerivationMode::TaxAdjusted => {
            let (price1, price2) = tax_adjusted_prices(retail)?;
            (
                price1,
                Some(price2),
                Some(optional_text(row, DESCRIPTION)),
                Some(optional_text(row, BRAND_NAME)),
            )
        }
    };

    let inventory = layout
        .stock_column
        .as_deref()
        .and_then(|column| row.get(column))
        .and_then(parse_stock)
        .unwrap_or(0);

    Ok(UpdateRecord {
        command: IisCommand::Update,
        sku,
        item_short_name,
        item_name,
        manufacturer,
        price1,
        price2,
        inventory,
    })
}

/// Applies the tax markup and secondary-currency conversion, each rounded
/// to cents (midpoints away from zero).
///
/// # Errors
///
/// Returns [`RowError::PriceOutOfRange`] if the multiplication overflows.
pub fn tax_adjusted_prices(retail: Decimal) -> Result<(Decimal, Decimal), RowError> {
    let out_of_range = || RowError::PriceOutOfRange {
        value: retail.to_string(),
    };
    let price1 = retail
        .checked_mul(TAX_MARKUP)
        .ok_or_else(out_of_range)?
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let price2 = price1
        .checked_div(SECONDARY_PRICE_DIVISOR)
        .ok_or_else(out_of_range)?
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    Ok((price1, price2))
}

/// Parses a stock cell as a float and truncates toward zero.
///
/// Returns `None` for blank, non-numeric, or non-finite values.
#[must_use]
pub fn parse_stock(raw: &str) -> Option<i64> {
    let value = raw.trim().parse::<f64>().ok()?;
    if !value.is_finite() {
        return None;
    }
    #[allow(clippy::cast_possible_truncation)]
    Some(value.trunc() as i64)
}

fn required_text(row: &RawRow, column: &'static str) -> Result<String, RowError> {
    row.get(column)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .ok_or(RowError::MissingCell { column })
}

fn optional_text(row: &RawRow, column: &str) -> String {
    row.get(column).map(str::trim).unwrap_or_default().to_owned()
}

fn required_price(row: &RawRow, column: &'static str) -> Result<Decimal, RowError> {
    let raw = row
        .get(column)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(RowError::MissingCell { column })?;

    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .map_err(|_| RowError::InvalidPrice {
            column,
            value: raw.to_owned(),
        })
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
