//! Exact decimal numbers on the wire.
//!
//! Amounts and weights travel as JSON numbers with a fixed number of fraction
//! digits (`90.00`, `1.5`). They are never parsed through `f64`: the raw JSON
//! token is read with [`RawValue`] and converted to an integer of minor units,
//! and serialization writes the decimal text back verbatim. Input may also be
//! a JSON string holding the same decimal text.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer, de::Error as _, ser::Error as _};
use serde_json::value::RawValue;

/// Money amount in minor units (cents), written with exactly two decimals.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(pub i64);

impl Amount {
    pub const SCALE: u32 = 2;

    pub const fn cents(self) -> i64 {
        self.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let raw = RawValue::from_string(self.to_string()).map_err(S::Error::custom)?;
        raw.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Box::<RawValue>::deserialize(deserializer)?;
        parse_raw(raw.get(), Self::SCALE)
            .map(Amount)
            .map_err(D::Error::custom)
    }
}

/// Participant weight in millionths, written with the fraction digits it
/// needs (`1`, `0.5`, `2.333333`). Negative weights are rejected on input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShareWeight(pub i64);

impl ShareWeight {
    pub const SCALE: u32 = 6;
    pub const ONE: ShareWeight = ShareWeight(1_000_000);

    pub const fn micros(self) -> i64 {
        self.0
    }
}

impl Default for ShareWeight {
    fn default() -> Self {
        Self::ONE
    }
}

impl fmt::Display for ShareWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let (units, frac) = (abs / 1_000_000, abs % 1_000_000);
        if frac == 0 {
            return write!(f, "{sign}{units}");
        }
        let digits = format!("{frac:06}");
        write!(f, "{sign}{units}.{}", digits.trim_end_matches('0'))
    }
}

impl Serialize for ShareWeight {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let raw = RawValue::from_string(self.to_string()).map_err(S::Error::custom)?;
        raw.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ShareWeight {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Box::<RawValue>::deserialize(deserializer)?;
        let micros = parse_raw(raw.get(), Self::SCALE).map_err(D::Error::custom)?;
        if micros < 0 {
            return Err(D::Error::custom("share must be >= 0"));
        }
        Ok(ShareWeight(micros))
    }
}

/// Parse a raw JSON token (number or string) into units of `10^-scale`.
fn parse_raw(raw: &str, scale: u32) -> Result<i64, String> {
    let raw = raw.trim();
    let text = match raw.strip_prefix('"').and_then(|s| s.strip_suffix('"')) {
        Some(inner) => inner.trim(),
        None => raw,
    };
    parse_decimal(text, scale)
}

/// Parse `[-]digits[.digits]` with at most `scale` fraction digits.
pub fn parse_decimal(text: &str, scale: u32) -> Result<i64, String> {
    let (negative, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    let (int_part, frac_part) = body.split_once('.').unwrap_or((body, ""));

    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if int_part.is_empty() || !all_digits(int_part) || !all_digits(frac_part) {
        return Err(format!("invalid decimal: {text:?}"));
    }
    if body.ends_with('.') {
        return Err(format!("invalid decimal: {text:?}"));
    }
    if frac_part.len() > scale as usize {
        return Err(format!("at most {scale} decimals allowed: {text:?}"));
    }

    let overflow = || format!("value out of range: {text:?}");
    let int_value: i64 = int_part.parse().map_err(|_| overflow())?;
    let mut frac_value: i64 = if frac_part.is_empty() {
        0
    } else {
        frac_part.parse().map_err(|_| overflow())?
    };
    for _ in frac_part.len()..scale as usize {
        frac_value *= 10;
    }

    let value = int_value
        .checked_mul(10_i64.pow(scale))
        .and_then(|v| v.checked_add(frac_value))
        .ok_or_else(overflow)?;
    Ok(if negative { -value } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    struct Wrapper {
        amount: Amount,
        share: Option<ShareWeight>,
    }

    #[test]
    fn amount_serializes_with_two_decimals() {
        let json = serde_json::to_string(&Wrapper {
            amount: Amount(3000),
            share: Some(ShareWeight(1_500_000)),
        })
        .unwrap();
        assert_eq!(json, r#"{"amount":30.00,"share":1.5}"#);

        assert_eq!(Amount(-5).to_string(), "-0.05");
        assert_eq!(Amount(12345).to_string(), "123.45");
        assert_eq!(ShareWeight::ONE.to_string(), "1");
        assert_eq!(ShareWeight(0).to_string(), "0");
    }

    #[test]
    fn amount_accepts_number_or_string() {
        let w: Wrapper = serde_json::from_str(r#"{"amount": 90, "share": "0.25"}"#).unwrap();
        assert_eq!(w.amount, Amount(9000));
        assert_eq!(w.share, Some(ShareWeight(250_000)));

        let w: Wrapper = serde_json::from_str(r#"{"amount": "12.3"}"#).unwrap();
        assert_eq!(w.amount, Amount(1230));
        assert_eq!(w.share, None);

        let w: Wrapper = serde_json::from_str(r#"{"amount": 0.07}"#).unwrap();
        assert_eq!(w.amount, Amount(7));
    }

    #[test]
    fn amount_rejects_extra_precision() {
        assert!(serde_json::from_str::<Wrapper>(r#"{"amount": 1.005}"#).is_err());
        assert!(serde_json::from_str::<Wrapper>(r#"{"amount": 1e2}"#).is_err());
        assert!(serde_json::from_str::<Wrapper>(r#"{"amount": "abc"}"#).is_err());
        assert!(serde_json::from_str::<Wrapper>(r#"{"amount": true}"#).is_err());
    }

    #[test]
    fn share_rejects_negative() {
        assert!(serde_json::from_str::<Wrapper>(r#"{"amount": 1, "share": -1}"#).is_err());
        assert!(
            serde_json::from_str::<Wrapper>(r#"{"amount": 1, "share": 0.0000001}"#).is_err()
        );
    }

    #[test]
    fn parse_decimal_cases() {
        assert_eq!(parse_decimal("10", 2), Ok(1000));
        assert_eq!(parse_decimal("-0.5", 2), Ok(-50));
        assert_eq!(parse_decimal("+3.14", 2), Ok(314));
        assert!(parse_decimal("1.", 2).is_err());
        assert!(parse_decimal(".5", 2).is_err());
        assert!(parse_decimal("", 2).is_err());
        assert!(parse_decimal("99999999999999999999", 2).is_err());
    }
}
