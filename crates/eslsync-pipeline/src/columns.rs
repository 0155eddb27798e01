//! Column names of the retail export and stock-column discovery.

use eslsync_core::PricingMode;

use crate::normalize::DerivationMode;

pub const PRODUCT_ID: &str = "Product ID";
pub const PRODUCT_CODE: &str = "Product Code";
pub const CURRENT_RETAIL: &str = "Current Retail";
pub const DESCRIPTION: &str = "Description";
pub const BRAND_NAME: &str = "Brand Name";
/// Preferred stock column; matched exactly, before any alias.
pub const ACT_ON_HAND: &str = "Act On Hand";

/// Normalized spellings accepted for the stock-quantity column.
const STOCK_ALIASES: [&str; 4] = ["qtyonhand", "quantityonhand", "onhand", "stock"];

/// Lower-cases a header and removes all whitespace, e.g. `"Qty On Hand"` → `"qtyonhand"`.
#[must_use]
pub fn normalize_column_name(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Returns the first column, in column order, whose normalized name is a
/// known stock alias.
pub fn resolve_stock_column<'a, I>(columns: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    columns
        .into_iter()
        .find(|name| STOCK_ALIASES.contains(&normalize_column_name(name).as_str()))
}

/// Per-upload decisions derived from the header row alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnLayout {
    pub mode: DerivationMode,
    /// Column to read `inventory` from, if the sheet has one.
    pub stock_column: Option<String>,
}

impl ColumnLayout {
    /// Inspects the header names once so every row is normalized the same way.
    ///
    /// [`PricingMode::Auto`] picks tax-adjusted pricing when the enriched
    /// schema's `Description` or `Brand Name` column is present.
    pub fn resolve<'a, I>(columns: I, pricing_mode: PricingMode) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let columns: Vec<&str> = columns.into_iter().collect();

        let mode = match pricing_mode {
            PricingMode::Direct => DerivationMode::Direct,
            PricingMode::TaxAdjusted => DerivationMode::TaxAdjusted,
            PricingMode::Auto => {
                if columns.iter().any(|c| *c == DESCRIPTION || *c == BRAND_NAME) {
                    DerivationMode::TaxAdjusted
                } else {
                    DerivationMode::Direct
                }
            }
        };

        let stock_column = if columns.contains(&ACT_ON_HAND) {
            Some(ACT_ON_HAND)
        } else {
            resolve_stock_column(columns.iter().copied())
        };

        Self {
            mode,
            stock_column: stock_column.map(str::to_owned),
        }
    }
}
