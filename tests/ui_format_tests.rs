use btc_ticker::ui::format::{
    base_asset, format_quote_volume_millions, format_signed_pct, format_signed_usd,
    format_thousands, format_usd, format_volume,
};

#[test]
fn thousands_grouping() {
    assert_eq!(format_thousands(0.0, 2), "0.00");
    assert_eq!(format_thousands(999.994, 2), "999.99");
    assert_eq!(format_thousands(1_000.0, 2), "1,000.00");
    assert_eq!(format_thousands(64_123.456, 2), "64,123.46");
    assert_eq!(format_thousands(1_234_567.0, 0), "1,234,567");
    assert_eq!(format_thousands(-1_234.5, 1), "-1,234.5");
    // Rounds to zero: no stray minus sign.
    assert_eq!(format_thousands(-0.001, 2), "0.00");
}

#[test]
fn price_and_change_formats() {
    assert_eq!(format_usd(64_123.456), "$64,123.46");
    assert_eq!(format_signed_pct(1.234), "+1.23%");
    assert_eq!(format_signed_pct(-0.5), "-0.50%");
    assert_eq!(format_signed_pct(0.0), "+0.00%");
    assert_eq!(format_signed_usd(1_234.5), "$+1,234.50");
    assert_eq!(format_signed_usd(-12.0), "$-12.00");
}

#[test]
fn volume_formats() {
    assert_eq!(format_volume(21_034.551, "BTC"), "21,035 BTC");
    assert_eq!(format_quote_volume_millions(1_364_110_233.91), "$1,364M");
    assert_eq!(format_quote_volume_millions(400_000.0), "$0M");
}

#[test]
fn base_asset_strips_known_quote() {
    assert_eq!(base_asset("BTCUSDT"), "BTC");
    assert_eq!(base_asset("ETHBTC"), "ETH");
    assert_eq!(base_asset("SOLFDUSD"), "SOL");
    assert_eq!(base_asset("USDT"), "USDT");
    assert_eq!(base_asset("XYZ"), "XYZ");
}
