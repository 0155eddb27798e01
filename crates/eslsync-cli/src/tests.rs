use super::*;

#[test]
fn parses_convert_with_file_only() {
    let cli = Cli::try_parse_from(["eslsync-cli", "convert", "prices.xlsx"])
        .expect("expected valid cli args");

    match cli.command {
        Commands::Convert(args) => {
            assert_eq!(args.file, PathBuf::from("prices.xlsx"));
            assert!(args.skip_rows.is_none());
            assert!(args.mode.is_none());
        }
        other => panic!("expected convert, got: {other:?}"),
    }
}

#[test]
fn parses_preview_with_overrides() {
    let cli = Cli::try_parse_from([
        "eslsync-cli",
        "preview",
        "prices.xlsx",
        "--skip-rows",
        "0",
        "--mode",
        "tax_adjusted",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Preview(SheetArgs {
            skip_rows: Some(0),
            mode: Some(PricingMode::TaxAdjusted),
            ..
        })
    ));
}

#[test]
fn rejects_unknown_mode() {
    let result = Cli::try_parse_from(["eslsync-cli", "preview", "prices.xlsx", "--mode", "gross"]);
    assert!(result.is_err());
}

#[test]
fn missing_subcommand_is_an_error() {
    assert!(Cli::try_parse_from(["eslsync-cli"]).is_err());
}

#[test]
fn overrides_replace_only_given_settings() {
    let args = SheetArgs {
        file: PathBuf::from("prices.xlsx"),
        skip_rows: None,
        mode: Some(PricingMode::Direct),
    };
    let mut settings = PipelineSettings::default();
    args.apply(&mut settings);

    assert_eq!(settings.pricing_mode, PricingMode::Direct);
    assert_eq!(settings.sheet_skip_rows, 1);
    assert_eq!(settings.batch_size, PipelineSettings::MAX_BATCH_SIZE);
}
