use serde::Deserialize;

/// Deserialize Binance string-encoded numbers to f64.
pub fn string_to_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    s.trim().parse::<f64>().map_err(serde::de::Error::custom)
}

/// Accepts either `"123.45"` or `123.45`.
pub fn string_or_number_to_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let v = serde_json::Value::deserialize(deserializer)?;
    match v {
        serde_json::Value::String(s) => s.trim().parse::<f64>().map_err(serde::de::Error::custom),
        serde_json::Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| serde::de::Error::custom("invalid number")),
        _ => Err(serde::de::Error::custom("invalid numeric value")),
    }
}

/// GET /api/v3/ticker/price?symbol=...
#[derive(Debug, Deserialize)]
pub struct TickerPriceResponse {
    pub symbol: String,
    #[serde(deserialize_with = "string_or_number_to_f64")]
    pub price: f64,
}

/// GET /api/v3/ticker/24hr?symbol=...
///
/// Only the fields the engine consumes are decoded; the rest are ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticker24hrResponse {
    pub symbol: String,
    #[serde(deserialize_with = "string_to_f64")]
    pub price_change: f64,
    #[serde(deserialize_with = "string_to_f64")]
    pub price_change_percent: f64,
    #[serde(deserialize_with = "string_to_f64")]
    pub high_price: f64,
    #[serde(deserialize_with = "string_to_f64")]
    pub low_price: f64,
    #[serde(deserialize_with = "string_to_f64")]
    pub volume: f64,
    #[serde(deserialize_with = "string_to_f64")]
    pub quote_volume: f64,
}

/// Binance API error response.
#[derive(Debug, Deserialize)]
pub struct BinanceApiErrorResponse {
    pub code: i64,
    pub msg: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_accepts_string_or_number() {
        let s: TickerPriceResponse =
            serde_json::from_str(r#"{"symbol":"BTCUSDT","price":"64123.45000000"}"#).unwrap();
        assert!((s.price - 64_123.45).abs() < 1e-9);

        let n: TickerPriceResponse =
            serde_json::from_str(r#"{"symbol":"BTCUSDT","price":64123.5}"#).unwrap();
        assert!((n.price - 64_123.5).abs() < 1e-9);
    }

    #[test]
    fn price_rejects_non_numeric() {
        assert!(serde_json::from_str::<TickerPriceResponse>(
            r#"{"symbol":"BTCUSDT","price":"abc"}"#
        )
        .is_err());
        assert!(
            serde_json::from_str::<TickerPriceResponse>(r#"{"symbol":"BTCUSDT","price":null}"#)
                .is_err()
        );
    }

    #[test]
    fn parse_24hr_ticker() {
        let body = r#"{
            "symbol": "BTCUSDT",
            "priceChange": "-94.99999800",
            "priceChangePercent": "-95.960",
            "weightedAvgPrice": "0.29628482",
            "prevClosePrice": "0.10002000",
            "lastPrice": "4.00000200",
            "lastQty": "200.00000000",
            "bidPrice": "4.00000000",
            "askPrice": "4.00000200",
            "openPrice": "99.00000000",
            "highPrice": "100.00000000",
            "lowPrice": "0.10000000",
            "volume": "8913.30000000",
            "quoteVolume": "15.30000000",
            "openTime": 1499783499040,
            "closeTime": 1499869899040,
            "firstId": 28385,
            "lastId": 28460,
            "count": 76
        }"#;
        let t: Ticker24hrResponse = serde_json::from_str(body).unwrap();
        assert_eq!(t.symbol, "BTCUSDT");
        assert!((t.price_change + 94.999998).abs() < 1e-9);
        assert!((t.price_change_percent + 95.96).abs() < 1e-9);
        assert!((t.high_price - 100.0).abs() < f64::EPSILON);
        assert!((t.low_price - 0.1).abs() < f64::EPSILON);
        assert!((t.volume - 8913.3).abs() < 1e-9);
        assert!((t.quote_volume - 15.3).abs() < 1e-9);
    }

    #[test]
    fn missing_24hr_field_is_an_error() {
        let body = r#"{"symbol":"BTCUSDT","priceChange":"1","priceChangePercent":"1",
            "highPrice":"2","lowPrice":"1","volume":"3"}"#;
        assert!(serde_json::from_str::<Ticker24hrResponse>(body).is_err());
    }
}
