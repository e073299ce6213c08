//! Balance delta arithmetic over decimal strings
//!
//! Balances stay decimal strings end to end. They are parsed into
//! arbitrary-precision integers only to apply a delta, then formatted back in
//! canonical form: no sign for non-negative values, no leading zeros.
//!
//! Operand grammar:
//!
//! ```text
//! balance := digit+                 (a leading '-' only when negatives are allowed)
//! delta   := ('+' | '-')? digit+
//! ```
//!
//! Anything else, including whitespace, underscores and empty strings, is a
//! `ComputationError`. Malformed operands are never treated as zero.

use num_bigint::{BigInt, BigUint, Sign};
use shared_types::AssetKind;

use crate::error::ComputationError;

/// Applies pending balance deltas to their base snapshots.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumericDelta {
    allow_negative: bool,
}

impl NumericDelta {
    /// Rejects any result below zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepts negative bases and results.
    pub fn allowing_negative() -> Self {
        Self {
            allow_negative: true,
        }
    }

    pub fn allows_negative(&self) -> bool {
        self.allow_negative
    }

    /// Computes `base + delta` for an asset of the given kind.
    pub fn apply(
        &self,
        kind: AssetKind,
        base: &str,
        delta: &str,
    ) -> Result<String, ComputationError> {
        if kind != AssetKind::General {
            return Err(ComputationError::UnsupportedAssetKind(kind));
        }

        let base_value = self.parse_balance(base)?;
        let delta_value =
            parse_signed(delta).ok_or_else(|| ComputationError::MalformedDelta(delta.to_string()))?;

        let sum = base_value + delta_value;
        if sum.sign() == Sign::Minus && !self.allow_negative {
            return Err(ComputationError::NegativeBalance {
                base: base.to_string(),
                delta: delta.to_string(),
            });
        }

        Ok(sum.to_string())
    }

    /// Validates a stored balance and returns its canonical form, so
    /// `"007"` reads as `"7"`.
    pub fn canonicalize(&self, balance: &str) -> Result<String, ComputationError> {
        self.parse_balance(balance).map(|value| value.to_string())
    }

    /// True if `balance` is well formed and already canonical.
    pub fn is_canonical(&self, balance: &str) -> bool {
        self.canonicalize(balance)
            .is_ok_and(|canonical| canonical == balance)
    }

    fn parse_balance(&self, balance: &str) -> Result<BigInt, ComputationError> {
        if self.allow_negative {
            parse_signed(balance)
        } else {
            parse_unsigned(balance).map(|magnitude| BigInt::from_biguint(Sign::Plus, magnitude))
        }
        .ok_or_else(|| ComputationError::MalformedBase(balance.to_string()))
    }
}

fn parse_unsigned(s: &str) -> Option<BigUint> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse::<BigUint>().ok()
}

fn parse_signed(s: &str) -> Option<BigInt> {
    let (sign, digits) = match s.as_bytes().first() {
        Some(b'-') => (Sign::Minus, &s[1..]),
        Some(b'+') => (Sign::Plus, &s[1..]),
        _ => (Sign::Plus, s),
    };
    // from_biguint normalizes a zero magnitude, so "-0" reads as zero.
    parse_unsigned(digits).map(|magnitude| BigInt::from_biguint(sign, magnitude))
}
