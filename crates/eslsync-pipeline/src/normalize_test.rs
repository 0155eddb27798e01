use super::*;

use crate::columns::ACT_ON_HAND;

fn sheet(headers: &[&str], rows: &[&[Option<&str>]]) -> Sheet {
    Sheet::new(
        headers.iter().map(|h| (*h).to_owned()).collect(),
        rows.iter()
            .map(|cells| cells.iter().map(|c| c.map(str::to_owned)).collect())
            .collect(),
    )
}

fn direct_layout() -> ColumnLayout {
    ColumnLayout {
        mode: DerivationMode::Direct,
        stock_column: Some(ACT_ON_HAND.to_owned()),
    }
}

fn row(cells: &[(&str, Option<&str>)]) -> RawRow {
    RawRow::new(
        2,
        cells
            .iter()
            .map(|(name, value)| ((*name).to_owned(), value.map(str::to_owned)))
            .collect(),
    )
}

// -----------------------------------------------------------------------
// normalize_row
// -----------------------------------------------------------------------

#[test]
fn direct_row_trims_identifiers_and_keeps_price_verbatim() {
    let raw = row(&[
        (PRODUCT_ID, Some("  1001 ")),
        (PRODUCT_CODE, Some("\tAPPLE-GALA ")),
        (CURRENT_RETAIL, Some("3.49")),
        (ACT_ON_HAND, Some("12")),
    ]);
    let record = normalize_row(&raw, &direct_layout()).expect("row should normalize");
    assert_eq!(record.command, IisCommand::Update);
    assert_eq!(record.sku, "1001");
    assert_eq!(record.item_short_name, "APPLE-GALA");
    assert_eq!(record.price1, Decimal::new(349, 2));
    assert_eq!(record.price2, None);
    assert_eq!(record.item_name, None);
    assert_eq!(record.manufacturer, None);
    assert_eq!(record.inventory, 12);
}

#[test]
fn missing_product_id_fails_row() {
    let raw = row(&[
        (PRODUCT_ID, None),
        (PRODUCT_CODE, Some("APPLE")),
        (CURRENT_RETAIL, Some("1.00")),
    ]);
    let err = normalize_row(&raw, &direct_layout()).unwrap_err();
    assert_eq!(err, RowError::MissingCell { column: PRODUCT_ID });
}

#[test]
fn blank_product_code_fails_row() {
    let raw = row(&[
        (PRODUCT_ID, Some("1001")),
        (PRODUCT_CODE, Some("   ")),
        (CURRENT_RETAIL, Some("1.00")),
    ]);
    let err = normalize_row(&raw, &direct_layout()).unwrap_err();
    assert_eq!(
        err,
        RowError::MissingCell {
            column: PRODUCT_CODE
        }
    );
}

#[test]
fn absent_product_code_column_fails_row() {
    let raw = row(&[(PRODUCT_ID, Some("1001")), (CURRENT_RETAIL, Some("1.00"))]);
    assert!(matches!(
        normalize_row(&raw, &direct_layout()),
        Err(RowError::MissingCell { column }) if column == PRODUCT_CODE
    ));
}

#[test]
fn unparseable_price_fails_row() {
    let raw = row(&[
        (PRODUCT_ID, Some("1001")),
        (PRODUCT_CODE, Some("APPLE")),
        (CURRENT_RETAIL, Some("N/A")),
    ]);
    let err = normalize_row(&raw, &direct_layout()).unwrap_err();
    assert_eq!(
        err,
        RowError::InvalidPrice {
            column: CURRENT_RETAIL,
            value: "N/A".to_owned()
        }
    );
}

#[test]
fn scientific_notation_price_is_accepted() {
    let raw = row(&[
        (PRODUCT_ID, Some("1001")),
        (PRODUCT_CODE, Some("APPLE")),
        (CURRENT_RETAIL, Some("1.5e1")),
    ]);
    let record = normalize_row(&raw, &direct_layout()).expect("row should normalize");
    assert_eq!(record.price1, Decimal::new(15, 0));
}

#[test]
fn tax_adjusted_prices_for_one_hundred() {
    let (price1, price2) = tax_adjusted_prices(Decimal::new(10000, 2)).unwrap();
    assert_eq!(price1, Decimal::new(10753, 2));
    assert_eq!(price2, Decimal::new(5974, 2));
}

#[test]
fn tax_adjusted_prices_round_to_cents() {
    // 2.99 * 1.0753 = 3.215147 -> 3.22; 3.22 / 1.8 = 1.7888.. -> 1.79
    let (price1, price2) = tax_adjusted_prices(Decimal::new(299, 2)).unwrap();
    assert_eq!(price1, Decimal::new(322, 2));
    assert_eq!(price2, Decimal::new(179, 2));
}

#[test]
fn tax_adjusted_row_populates_enrichment_fields() {
    let layout = ColumnLayout {
        mode: DerivationMode::TaxAdjusted,
        stock_column: None,
    };
    let raw = row(&[
        (PRODUCT_ID, Some("1001")),
        (PRODUCT_CODE, Some("APPLE")),
        (CURRENT_RETAIL, Some("100")),
        (DESCRIPTION, Some(" Gala Apple 1lb ")),
        (BRAND_NAME, None),
    ]);
    let record = normalize_row(&raw, &layout).expect("row should normalize");
    assert_eq!(record.price1, Decimal::new(10753, 2));
    assert_eq!(record.price2, Some(Decimal::new(5974, 2)));
    assert_eq!(record.item_name.as_deref(), Some("Gala Apple 1lb"));
    assert_eq!(record.manufacturer.as_deref(), Some(""));
}

#[test]
fn missing_stock_columns_default_inventory_to_zero() {
    let layout = ColumnLayout {
        mode: DerivationMode::Direct,
        stock_column: None,
    };
    let raw = row(&[
        (PRODUCT_ID, Some("1001")),
        (PRODUCT_CODE, Some("APPLE")),
        (CURRENT_RETAIL, Some("1.00")),
    ]);
    assert_eq!(normalize_row(&raw, &layout).unwrap().inventory, 0);
}

#[test]
fn unparseable_stock_defaults_to_zero_without_failing_row() {
    let raw = row(&[
        (PRODUCT_ID, Some("1001")),
        (PRODUCT_CODE, Some("APPLE")),
        (CURRENT_RETAIL, Some("1.00")),
        (ACT_ON_HAND, Some("lots")),
    ]);
    assert_eq!(normalize_row(&raw, &direct_layout()).unwrap().inventory, 0);
}

#[test]
fn parse_stock_truncates_fractions() {
    assert_eq!(parse_stock("7.9"), Some(7));
    assert_eq!(parse_stock(" -2.5 "), Some(-2));
    assert_eq!(parse_stock("12"), Some(12));
    assert_eq!(parse_stock("nan"), None);
    assert_eq!(parse_stock(""), None);
}

// -----------------------------------------------------------------------
// normalize_rows
// -----------------------------------------------------------------------

#[test]
fn one_bad_row_in_ten_is_skipped_and_reported() {
    let ids: Vec<String> = (1..=10).map(|i| format!("SKU{i}")).collect();
    let rows: Vec<Vec<Option<&str>>> = ids
        .iter()
        .enumerate()
        .map(|(idx, id)| {
            let sku = if idx == 4 { None } else { Some(id.as_str()) };
            vec![sku, Some("CODE"), Some("2.00")]
        })
        .collect();
    let row_refs: Vec<&[Option<&str>]> = rows.iter().map(Vec::as_slice).collect();
    let sheet = sheet(&[PRODUCT_ID, PRODUCT_CODE, CURRENT_RETAIL], &row_refs);

    let normalized = normalize_rows(&sheet, PricingMode::Auto);

    assert_eq!(normalized.rows_attempted, 10);
    assert_eq!(normalized.records.len(), 9);
    assert!(normalized.records.iter().all(|r| r.sku != "SKU5"));
    assert_eq!(normalized.skipped.len(), 1);
    assert_eq!(normalized.skipped[0].row, 6);
    assert!(normalized.skipped[0].reason.contains(PRODUCT_ID));
}

#[test]
fn normalize_rows_uses_aliased_stock_column() {
    let sheet = sheet(
        &[PRODUCT_ID, PRODUCT_CODE, CURRENT_RETAIL, "QTY ON HAND"],
        &[&[Some("1"), Some("A"), Some("1.00"), Some("5.0")]],
    );
    let normalized = normalize_rows(&sheet, PricingMode::Auto);
    assert_eq!(normalized.records[0].inventory, 5);
}

#[test]
fn normalize_rows_auto_mode_switches_on_enriched_headers() {
    let sheet = sheet(
        &[PRODUCT_ID, PRODUCT_CODE, CURRENT_RETAIL, DESCRIPTION, BRAND_NAME],
        &[&[
            Some("1"),
            Some("A"),
            Some("100.00"),
            Some("Gala"),
            Some("Orchard Co"),
        ]],
    );
    let normalized = normalize_rows(&sheet, PricingMode::Auto);
    let record = &normalized.records[0];
    assert_eq!(record.price1, Decimal::new(10753, 2));
    assert_eq!(record.manufacturer.as_deref(), Some("Orchard Co"));
}

#[test]
fn normalize_rows_with_every_row_invalid_yields_no_records() {
    let sheet = sheet(
        &[PRODUCT_ID, PRODUCT_CODE, CURRENT_RETAIL],
        &[
            &[None, Some("A"), Some("1.00")],
            &[Some("2"), Some("B"), Some("free")],
        ],
    );
    let normalized = normalize_rows(&sheet, PricingMode::Auto);
    assert!(normalized.records.is_empty());
    assert_eq!(normalized.skipped.len(), 2);
}
