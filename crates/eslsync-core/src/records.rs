use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Integration command carried by each item in a batch payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum IisCommand {
    #[default]
    #[serde(rename = "UPDATE")]
    Update,
}

/// A normalized price/inventory update for one shelf label, in the item
/// shape the ESL integration endpoint expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRecord {
    #[serde(rename = "IIS_COMMAND")]
    pub command: IisCommand,
    /// Trimmed `Product ID`; never empty.
    pub sku: String,
    /// Trimmed `Product Code`; never empty.
    pub item_short_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub price1: Decimal,
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub price2: Option<Decimal>,
    pub inventory: i64,
}
