use std::time::Duration;

use btc_ticker::config::Config;

#[test]
fn parse_full_toml() {
    let toml_str = r#"
[binance]
rest_base_url = "https://api.binance.com"
symbol = "ethusdt"
request_timeout_ms = 2500

[refresh]
auto_refresh = false
interval_secs = 7

[ui]
refresh_rate_ms = 250

[logging]
level = "debug"
"#;
    let config = Config::from_toml_str(toml_str).unwrap();
    assert_eq!(config.binance.symbol, "ETHUSDT");
    assert_eq!(config.binance.request_timeout(), Duration::from_millis(2500));
    assert!(!config.refresh.auto_refresh);
    assert_eq!(config.refresh.interval_secs, 7);
    assert_eq!(config.ui.refresh_rate_ms, 250);
    assert_eq!(config.logging.level, "debug");

    let refresh = config.refresh.to_refresh_config();
    assert!(!refresh.auto_refresh);
    assert_eq!(refresh.interval_secs, 7);
}

#[test]
fn interval_outside_range_is_rejected() {
    for secs in [0, 11, 60] {
        let toml_str = format!(
            r#"
[binance]
rest_base_url = "https://api.binance.com"
symbol = "BTCUSDT"

[refresh]
interval_secs = {}
"#,
            secs
        );
        let err = Config::from_toml_str(&toml_str).unwrap_err();
        assert!(
            format!("{:#}", err).contains("refresh.interval_secs"),
            "unexpected error for {}s: {:#}",
            secs,
            err
        );
    }
}

#[test]
fn interval_bounds_are_accepted() {
    for secs in [1, 10] {
        let toml_str = format!(
            r#"
[binance]
rest_base_url = "https://api.binance.com"
symbol = "BTCUSDT"

[refresh]
interval_secs = {}
"#,
            secs
        );
        assert!(Config::from_toml_str(&toml_str).is_ok());
    }
}

#[test]
fn blank_symbol_is_rejected() {
    let toml_str = r#"
[binance]
rest_base_url = "https://api.binance.com"
symbol = "   "
"#;
    assert!(Config::from_toml_str(toml_str).is_err());
}

#[test]
fn missing_binance_section_is_rejected() {
    assert!(Config::from_toml_str("[refresh]\ninterval_secs = 3\n").is_err());
}

#[test]
fn shipped_default_config_loads() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("config/default.toml");
    let config = Config::load_from_path(&path).unwrap();
    assert_eq!(config.binance.symbol, "BTCUSDT");
    assert!(config.refresh.auto_refresh);
    assert_eq!(config.refresh.interval_secs, 3);
}
