//! Decoding of NSE option-chain responses

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use common::Symbol;
use ordered_float::OrderedFloat;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::types::{OptionChainSnapshot, OptionLegQuote, StrikeRow};
use crate::Result;

/// Timestamp layout used by the NSE API, e.g. `16-Oct-2026 15:30:00`
pub const NSE_TIMESTAMP_FORMAT: &str = "%d-%b-%Y %H:%M:%S";

#[derive(Debug, Deserialize)]
struct NseResponse {
    records: NseRecords,
}

#[derive(Debug, Deserialize)]
struct NseRecords {
    #[serde(default)]
    timestamp: Option<String>,
    #[serde(rename = "underlyingValue")]
    underlying_value: f64,
    #[serde(default)]
    data: Vec<NseStrike>,
}

#[derive(Debug, Deserialize)]
struct NseStrike {
    #[serde(rename = "strikePrice")]
    strike_price: Option<f64>,
    #[serde(rename = "CE")]
    call: Option<NseQuote>,
    #[serde(rename = "PE")]
    put: Option<NseQuote>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NseQuote {
    underlying: Option<String>,
    open_interest: Option<f64>,
    #[serde(rename = "changeinOpenInterest")]
    change_in_open_interest: Option<f64>,
    total_traded_volume: Option<f64>,
    implied_volatility: Option<f64>,
    last_price: Option<f64>,
    change: Option<f64>,
}

impl From<&NseQuote> for OptionLegQuote {
    fn from(quote: &NseQuote) -> Self {
        // NSE reports contract counts as JSON numbers that may carry a fraction
        let contracts = |v: Option<f64>| v.filter(|x| x.is_finite()).unwrap_or(0.0).max(0.0).round() as u64;
        let price = |v: Option<f64>| v.filter(|x| x.is_finite()).unwrap_or(0.0);

        OptionLegQuote {
            open_interest: contracts(quote.open_interest),
            open_interest_change: price(quote.change_in_open_interest).round() as i64,
            volume: contracts(quote.total_traded_volume),
            implied_volatility: price(quote.implied_volatility),
            last_price: price(quote.last_price),
            price_change: price(quote.change),
        }
    }
}

fn leg(quote: Option<&NseQuote>) -> OptionLegQuote {
    quote.map(OptionLegQuote::from).unwrap_or_default()
}

impl OptionChainSnapshot {
    /// Decode the NSE option-chain API response.
    ///
    /// Rows without a strike are skipped and missing sides decode as zeroed
    /// quotes. When the response spans several expiries the same strike
    /// appears more than once; those rows are merged by summing contract
    /// counts. The symbol is taken from the quotes' `underlying` field,
    /// falling back to `fallback_symbol`.
    pub fn from_nse_json(json: &str, fallback_symbol: &Symbol) -> Result<Self> {
        let response: NseResponse = serde_json::from_str(json)?;
        let records = response.records;

        let mut symbol: Option<Symbol> = None;
        let mut by_strike: BTreeMap<OrderedFloat<f64>, StrikeRow> = BTreeMap::new();
        let mut skipped = 0usize;

        for entry in &records.data {
            let Some(strike) = entry.strike_price else {
                skipped += 1;
                continue;
            };

            if symbol.is_none() {
                symbol = entry
                    .call
                    .iter()
                    .chain(entry.put.iter())
                    .find_map(|q| q.underlying.as_deref())
                    .map(Symbol::new);
            }

            let call = leg(entry.call.as_ref());
            let put = leg(entry.put.as_ref());

            by_strike
                .entry(OrderedFloat(strike))
                .and_modify(|row| {
                    row.call.merge(&call);
                    row.put.merge(&put);
                })
                .or_insert_with(|| StrikeRow::new(strike, call, put));
        }

        if skipped > 0 {
            warn!(skipped, "Skipped NSE rows without a strike price");
        }

        let timestamp = records.timestamp.as_deref().and_then(|ts| {
            NaiveDateTime::parse_from_str(ts.trim(), NSE_TIMESTAMP_FORMAT)
                .map_err(|e| debug!(timestamp = ts, error = %e, "Unrecognised NSE timestamp"))
                .ok()
        });

        let symbol = symbol.unwrap_or_else(|| fallback_symbol.clone());
        let rows: Vec<StrikeRow> = by_strike.into_values().collect();

        debug!(
            symbol = %symbol,
            strikes = rows.len(),
            entries = records.data.len(),
            "Decoded NSE option chain"
        );

        Ok(OptionChainSnapshot::new(symbol, records.underlying_value, rows)?.with_timestamp(timestamp))
    }

    /// Decode either the NSE API response or the plain snapshot JSON shape
    pub fn from_json(json: &str, fallback_symbol: &Symbol) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;

        if value.get("records").is_some() {
            Self::from_nse_json(json, fallback_symbol)
        } else {
            Ok(serde_json::from_value(value)?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ChainError;
    use assert_matches::assert_matches;

    const NSE_SAMPLE: &str = r#"{
        "records": {
            "timestamp": "16-Oct-2026 15:30:00",
            "underlyingValue": 24012.35,
            "data": [
                {
                    "strikePrice": 24100,
                    "expiryDate": "23-Oct-2026",
                    "CE": {"underlying": "NIFTY", "openInterest": 5000, "changeinOpenInterest": 300,
                           "totalTradedVolume": 12000, "impliedVolatility": 12.4, "lastPrice": 80.5, "change": -4.2}
                },
                {
                    "strikePrice": 24000,
                    "expiryDate": "23-Oct-2026",
                    "CE": {"underlying": "NIFTY", "openInterest": 3000, "changeinOpenInterest": -100,
                           "totalTradedVolume": 9000, "impliedVolatility": 13.1, "lastPrice": 130.0, "change": 5.0},
                    "PE": {"underlying": "NIFTY", "openInterest": 4000, "changeinOpenInterest": 250,
                           "totalTradedVolume": 11000, "impliedVolatility": 13.5, "lastPrice": 110.0, "change": -3.0}
                },
                {
                    "strikePrice": 24000,
                    "expiryDate": "30-Oct-2026",
                    "PE": {"underlying": "NIFTY", "openInterest": 1000, "changeinOpenInterest": -50,
                           "totalTradedVolume": 500, "impliedVolatility": 14.0, "lastPrice": 170.0, "change": 1.0}
                },
                {"expiryDate": "30-Oct-2026"}
            ]
        }
    }"#;

    #[test]
    fn test_decode_nse_response() {
        let snapshot = OptionChainSnapshot::from_nse_json(NSE_SAMPLE, &Symbol::default()).unwrap();

        assert_eq!(snapshot.symbol().as_str(), "NIFTY");
        assert_eq!(snapshot.underlying_value(), 24012.35);
        assert_eq!(snapshot.strikes().collect::<Vec<_>>(), vec![24000.0, 24100.0]);

        let ts = snapshot.timestamp().unwrap();
        assert_eq!(ts.format("%Y-%m-%d %H:%M").to_string(), "2026-10-16 15:30");

        let atm = &snapshot.rows()[0];
        assert_eq!(atm.call.open_interest, 3000);
        assert_eq!(atm.call.open_interest_change, -100);
        assert_eq!(atm.call.last_price, 130.0);

        // 24000 PE appears for two expiries and is merged
        assert_eq!(atm.put.open_interest, 5000);
        assert_eq!(atm.put.open_interest_change, 200);
        assert_eq!(atm.put.volume, 11500);
        assert_eq!(atm.put.last_price, 110.0);

        // Missing PE decodes as a zeroed quote
        assert_eq!(snapshot.rows()[1].put, OptionLegQuote::default());
    }

    #[test]
    fn test_symbol_falls_back_when_absent() {
        let json = r#"{"records": {"underlyingValue": 52000, "data": [{"strikePrice": 52000}]}}"#;
        let snapshot = OptionChainSnapshot::from_nse_json(json, &Symbol::new("BANKNIFTY")).unwrap();

        assert_eq!(snapshot.symbol().as_str(), "BANKNIFTY");
        assert_eq!(snapshot.strike_step(), 100.0);
        assert!(snapshot.timestamp().is_none());
    }

    #[test]
    fn test_bad_timestamp_is_ignored() {
        let json = r#"{"records": {"timestamp": "yesterday", "underlyingValue": 100, "data": []}}"#;
        let snapshot = OptionChainSnapshot::from_nse_json(json, &Symbol::default()).unwrap();

        assert!(snapshot.timestamp().is_none());
        assert!(snapshot.is_empty());
    }

    #[test]
    fn test_malformed_json_is_a_decode_error() {
        assert_matches!(
            OptionChainSnapshot::from_nse_json("{\"records\": 5}", &Symbol::default()),
            Err(ChainError::Decode(_))
        );
        assert_matches!(
            OptionChainSnapshot::from_json("not json", &Symbol::default()),
            Err(ChainError::Decode(_))
        );
    }

    #[test]
    fn test_from_json_detects_shape() {
        let nse = OptionChainSnapshot::from_json(NSE_SAMPLE, &Symbol::default()).unwrap();
        assert_eq!(nse.len(), 2);

        let plain = r#"{"symbol": "FINNIFTY", "underlying_value": 23500, "rows": [{"strike": 23500}]}"#;
        let plain = OptionChainSnapshot::from_json(plain, &Symbol::default()).unwrap();
        assert_eq!(plain.symbol().as_str(), "FINNIFTY");
        assert_eq!(plain.len(), 1);
    }
}
