//! Participant weights.
//!
//! A [`Weight`] is a non-negative rational stored as an integer number of
//! millionths, so a split like `1 : 3` or `0.5 : 1.5` stays exact through the
//! whole allocation.

use std::{fmt, str::FromStr};

use serde::Serialize;

use crate::{EngineError, ResultEngine};

/// Number of fractional digits a weight can carry.
pub const WEIGHT_SCALE_DIGITS: u32 = 6;

const WEIGHT_SCALE: i64 = 10_i64.pow(WEIGHT_SCALE_DIGITS);

/// Proportional part of an event assigned to one participant.
///
/// A weight of 0 is legal and means "included but owes nothing".
///
/// ```rust
/// use engine::Weight;
///
/// assert_eq!(Weight::default(), Weight::ONE);
/// assert_eq!("1.5".parse::<Weight>().unwrap().micros(), 1_500_000);
/// assert!("-1".parse::<Weight>().is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Weight(i64);

impl Weight {
    pub const ZERO: Weight = Weight(0);
    pub const ONE: Weight = Weight(WEIGHT_SCALE);

    /// Builds a weight from millionths, rejecting negative values.
    pub fn from_micros(micros: i64) -> ResultEngine<Self> {
        if micros < 0 {
            return Err(EngineError::InvalidWeight(
                "weight must be >= 0".to_string(),
            ));
        }
        Ok(Self(micros))
    }

    /// Builds a weight from a whole number of units.
    #[must_use]
    pub const fn units(units: u32) -> Self {
        Self(units as i64 * WEIGHT_SCALE)
    }

    /// Wraps a stored value without validation.
    ///
    /// Used when loading snapshots; the balance calculator re-validates.
    pub(crate) const fn from_raw(micros: i64) -> Self {
        Self(micros)
    }

    #[must_use]
    pub const fn micros(self) -> i64 {
        self.0
    }

    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }
}

impl Default for Weight {
    fn default() -> Self {
        Self::ONE
    }
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let units = abs / WEIGHT_SCALE as u64;
        let frac = abs % WEIGHT_SCALE as u64;
        if frac == 0 {
            return write!(f, "{sign}{units}");
        }
        let digits = format!("{frac:06}");
        write!(f, "{sign}{units}.{}", digits.trim_end_matches('0'))
    }
}

impl FromStr for Weight {
    type Err = EngineError;

    /// Parses a non-negative decimal with up to six fractional digits.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::InvalidWeight(format!("invalid weight: {}", s.trim()));

        let trimmed = s.trim().strip_prefix('+').unwrap_or(s.trim());
        if trimmed.starts_with('-') {
            return Err(EngineError::InvalidWeight(
                "weight must be >= 0".to_string(),
            ));
        }

        let (units_str, frac_str) = match trimmed.split_once('.') {
            Some((units, frac)) => (units, frac),
            None => (trimmed, ""),
        };
        if units_str.is_empty() || !units_str.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        if !frac_str.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        if frac_str.len() > WEIGHT_SCALE_DIGITS as usize {
            return Err(EngineError::InvalidWeight(format!(
                "weight supports at most {WEIGHT_SCALE_DIGITS} decimals"
            )));
        }

        let units: i64 = units_str.parse().map_err(|_| invalid())?;
        let frac: i64 = if frac_str.is_empty() {
            0
        } else {
            let padded = format!("{frac_str:0<6}");
            padded.parse().map_err(|_| invalid())?
        };

        units
            .checked_mul(WEIGHT_SCALE)
            .and_then(|v| v.checked_add(frac))
            .map(Weight)
            .ok_or_else(|| EngineError::InvalidWeight("weight too large".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_whole_and_fractional_weights() {
        assert_eq!("3".parse::<Weight>().unwrap(), Weight::units(3));
        assert_eq!("0".parse::<Weight>().unwrap(), Weight::ZERO);
        assert_eq!("0.25".parse::<Weight>().unwrap().micros(), 250_000);
        assert_eq!(" 2.000001 ".parse::<Weight>().unwrap().micros(), 2_000_001);
    }

    #[test]
    fn rejects_negative_and_overprecise_weights() {
        assert!("-0.5".parse::<Weight>().is_err());
        assert!("0.0000001".parse::<Weight>().is_err());
        assert!("".parse::<Weight>().is_err());
        assert!("1/3".parse::<Weight>().is_err());
        assert!(Weight::from_micros(-1).is_err());
    }

    #[test]
    fn display_trims_trailing_zeros() {
        assert_eq!(Weight::ONE.to_string(), "1");
        assert_eq!(Weight::from_micros(1_500_000).unwrap().to_string(), "1.5");
        assert_eq!(Weight::from_micros(10).unwrap().to_string(), "0.00001");
    }
}
