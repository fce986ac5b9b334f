//! Trip-currency to home-currency conversion.
//!
//! Rates are expressed as "home units per one trip unit". A rates table is
//! the `rates` object of a `latest/<HOME>` response (1 HOME = x CODE), which
//! is inverted here. When no table is available, or it lacks the code, a
//! small built-in table is used and anything else converts at 1.0.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;

pub const DEFAULT_HOME_CURRENCY: &str = "TWD";

/// Stand-in code shown before a trip sets its currency.
const PLACEHOLDER_CODE: &str = "CUR";

/// TWD per one unit of each code.
const FALLBACK_RATES: &[(&str, f64)] = &[("JPY", 0.22), ("USD", 31.5), ("KRW", 0.024)];

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RateOrigin {
    Table,
    Fallback,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rate {
    pub value: f64,
    pub origin: RateOrigin,
}

#[derive(Debug, Deserialize)]
struct RatesResponse {
    rates: HashMap<String, f64>,
}

/// Rates quoted against a home currency.
#[derive(Debug, Clone, Default)]
pub struct RateTable {
    per_home: HashMap<String, f64>,
}

impl RateTable {
    pub fn from_json(body: &str) -> Result<Self> {
        let resp: RatesResponse = serde_json::from_str(body).context("parsing rates response")?;
        let per_home = resp
            .rates
            .into_iter()
            .map(|(code, v)| (code.to_ascii_uppercase(), v))
            .collect();
        Ok(Self { per_home })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let body = fs::read_to_string(path)
            .with_context(|| format!("reading rates from {}", path.display()))?;
        Self::from_json(&body)
    }

    /// Home units per one unit of `code`.
    pub fn home_per_unit(&self, code: &str) -> Option<f64> {
        let per_home = *self.per_home.get(&code.to_ascii_uppercase())?;
        (per_home.is_finite() && per_home > 0.0).then(|| 1.0 / per_home)
    }
}

pub fn is_lookup_code(code: &str) -> bool {
    code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) && code != PLACEHOLDER_CODE
}

fn fallback_rate(code: &str, home: &str) -> Rate {
    let upper = code.to_ascii_uppercase();
    let quoted = home.eq_ignore_ascii_case(DEFAULT_HOME_CURRENCY);
    match FALLBACK_RATES.iter().find(|(c, _)| quoted && *c == upper) {
        Some((_, value)) => Rate {
            value: *value,
            origin: RateOrigin::Fallback,
        },
        None => Rate {
            value: 1.0,
            origin: RateOrigin::Neutral,
        },
    }
}

/// Resolve a rate from `code` into `home`, preferring the table when one
/// loaded. The table must be quoted against `home`.
pub fn resolve_rate(code: &str, home: &str, table: Option<&RateTable>) -> Rate {
    if is_lookup_code(code) {
        if let Some(value) = table.and_then(|t| t.home_per_unit(code)) {
            return Rate {
                value,
                origin: RateOrigin::Table,
            };
        }
    }
    let rate = fallback_rate(code, home);
    tracing::warn!(code, home, rate = rate.value, "no live rate, using fallback");
    rate
}

/// Convert and round to whole home units.
pub fn convert(amount: f64, rate: Rate) -> Result<i64> {
    if !amount.is_finite() {
        return Err(anyhow!("Amount is not a number: {}", amount));
    }
    Ok((amount * rate.value).round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"{"result":"success","base_code":"TWD","rates":{"TWD":1,"JPY":4.5,"usd":0.032,"XXX":0}}"#;

    #[test]
    fn table_is_inverted() {
        let table = RateTable::from_json(BODY).unwrap();
        let rate = resolve_rate("JPY", "TWD", Some(&table));
        assert_eq!(rate.origin, RateOrigin::Table);
        assert!((rate.value - 1.0 / 4.5).abs() < 1e-12);
        assert_eq!(resolve_rate("usd", "TWD", Some(&table)).origin, RateOrigin::Table);
    }

    #[test]
    fn zero_rate_falls_back() {
        let table = RateTable::from_json(BODY).unwrap();
        let rate = resolve_rate("XXX", "TWD", Some(&table));
        assert_eq!(rate.origin, RateOrigin::Neutral);
        assert_eq!(rate.value, 1.0);
    }

    #[test]
    fn fallback_table() {
        assert_eq!(resolve_rate("JPY", "TWD", None).value, 0.22);
        assert_eq!(resolve_rate("USD", "TWD", None).value, 31.5);
        assert_eq!(resolve_rate("KRW", "TWD", None).value, 0.024);
        let eur = resolve_rate("EUR", "TWD", None);
        assert_eq!(eur.origin, RateOrigin::Neutral);
        assert_eq!(eur.value, 1.0);
    }

    #[test]
    fn fallback_only_applies_to_twd_home() {
        let jpy = resolve_rate("JPY", "USD", None);
        assert_eq!(jpy.origin, RateOrigin::Neutral);
        assert_eq!(jpy.value, 1.0);
        assert_eq!(convert(1000.0, jpy).unwrap(), 1000);
        assert_eq!(resolve_rate("jpy", "twd", None).value, 0.22);
    }

    #[test]
    fn placeholder_and_bad_codes_skip_table() {
        let table = RateTable::from_json(r#"{"rates":{"CUR":2.0,"JP":2.0}}"#).unwrap();
        assert_eq!(resolve_rate("CUR", "TWD", Some(&table)).origin, RateOrigin::Neutral);
        assert_eq!(resolve_rate("JP", "TWD", Some(&table)).origin, RateOrigin::Neutral);
        assert!(!is_lookup_code("J1Y"));
    }

    #[test]
    fn converts_to_whole_units() {
        let rate = resolve_rate("JPY", "TWD", None);
        assert_eq!(convert(1000.0, rate).unwrap(), 220);
        assert_eq!(convert(1234.0, rate).unwrap(), 271);
        assert!(convert(f64::NAN, rate).is_err());
    }

    #[test]
    fn malformed_response_is_error() {
        assert!(RateTable::from_json("{}").is_err());
        assert!(RateTable::from_json("not json").is_err());
    }
}
