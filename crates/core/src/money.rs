//! Exact decimal money amounts.

use core::ops::Neg;
use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_object::ValueObject;

/// A signed, single-currency amount.
///
/// Backed by [`Decimal`] so that `0.1 + 0.2 == 0.3` holds and balances never
/// drift. Arithmetic is checked: overflow yields `None` instead of panicking.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl ValueObject for Money {}

impl Money {
    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    pub const fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Strictly greater than zero.
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Strictly less than zero.
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }

    pub fn checked_sub(self, rhs: Money) -> Option<Money> {
        self.0.checked_sub(rhs.0).map(Money)
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Self::Output {
        Money(-self.0)
    }
}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl From<i64> for Money {
    fn from(value: i64) -> Self {
        Self(Decimal::from(value))
    }
}

impl From<Money> for Decimal {
    fn from(value: Money) -> Self {
        value.0
    }
}

impl FromStr for Money {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim())
            .map(Money)
            .map_err(|e| DomainError::invalid_argument(format!("invalid amount {s:?}: {e}")))
    }
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_sums_are_exact() {
        let a: Money = "0.1".parse().unwrap();
        let b: Money = "0.2".parse().unwrap();
        assert_eq!(a.checked_add(b), Some("0.3".parse().unwrap()));
    }

    #[test]
    fn sign_predicates() {
        assert!(Money::from(5).is_positive());
        assert!(!Money::zero().is_positive());
        assert!(!Money::zero().is_negative());
        assert!(Money::zero().is_zero());
        assert!((-Money::from(5)).is_negative());
    }

    #[test]
    fn overflow_is_reported_not_panicking() {
        let max = Money::new(Decimal::MAX);
        assert_eq!(max.checked_add(Money::from(1)), None);
        assert_eq!((-max).checked_sub(Money::from(1)), None);
    }

    #[test]
    fn parse_failure_is_invalid_argument() {
        let err = "ten dollars".parse::<Money>().unwrap_err();
        assert!(matches!(err, DomainError::InvalidArgument(_)));
    }

    #[test]
    fn serializes_as_decimal_string() {
        let m = Money::new(Decimal::new(12_50, 2));
        assert_eq!(serde_json::to_string(&m).unwrap(), "\"12.50\"");
        let back: Money = serde_json::from_str("\"12.50\"").unwrap();
        assert_eq!(back, m);
    }
}
