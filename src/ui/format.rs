use chrono::{DateTime, Local, Utc};

const QUOTE_ASSETS: [&str; 6] = ["USDT", "USDC", "FDUSD", "BUSD", "BTC", "ETH"];

/// Fixed decimals with `,` thousands separators, e.g. `64,123.46`.
pub fn format_thousands(value: f64, decimals: usize) -> String {
    let raw = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match raw.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (raw.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let negative = value < 0.0 && raw.chars().any(|c| c.is_ascii_digit() && c != '0');
    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

pub fn format_usd(value: f64) -> String {
    if value < 0.0 {
        format!("-${}", format_thousands(value.abs(), 2))
    } else {
        format!("${}", format_thousands(value, 2))
    }
}

/// `+1.23%` / `-0.50%`.
pub fn format_signed_pct(value: f64) -> String {
    format!("{:+.2}%", value)
}

/// `$+1,234.50` / `$-12.00`.
pub fn format_signed_usd(value: f64) -> String {
    let sign = if value < 0.0 { '-' } else { '+' };
    format!("${}{}", sign, format_thousands(value.abs(), 2))
}

pub fn format_volume(value: f64, base_asset: &str) -> String {
    format!("{} {}", format_thousands(value, 0), base_asset)
}

/// Quote volume in whole millions, e.g. `$1,532M`.
pub fn format_quote_volume_millions(value: f64) -> String {
    format!("${}M", format_thousands(value / 1e6, 0))
}

pub fn format_clock(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%H:%M:%S").to_string()
}

/// `BTCUSDT` -> `BTC`. Falls back to the full symbol when no known quote
/// asset suffix matches.
pub fn base_asset(symbol: &str) -> &str {
    QUOTE_ASSETS
        .iter()
        .find_map(|quote| {
            symbol
                .strip_suffix(quote)
                .filter(|base| !base.is_empty())
        })
        .unwrap_or(symbol)
}
