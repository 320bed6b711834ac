//! Domain error model.

use thiserror::Error;

use crate::money::Money;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Every failure is synchronous and leaves the aggregate untouched; callers
/// handle it at the call site.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// An argument was rejected (non-positive amount, negative opening
    /// balance, unparsable amount).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A withdrawal would drive the balance below zero.
    #[error("insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds { requested: Money, available: Money },

    /// A domain invariant was violated (e.g. a corrupt history on rehydration).
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn insufficient_funds(requested: Money, available: Money) -> Self {
        Self::InsufficientFunds {
            requested,
            available,
        }
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    /// Whether this is the "not enough money" failure.
    pub fn is_insufficient_funds(&self) -> bool {
        matches!(self, Self::InsufficientFunds { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_funds_message_names_both_amounts() {
        let err = DomainError::insufficient_funds(Money::from(600), Money::from(500));
        assert_eq!(
            err.to_string(),
            "insufficient funds: requested 600, available 500"
        );
        assert!(err.is_insufficient_funds());
    }

    #[test]
    fn invalid_argument_carries_message() {
        let err = DomainError::invalid_argument("Deposit amount must be positive");
        assert_eq!(
            err.to_string(),
            "invalid argument: Deposit amount must be positive"
        );
        assert!(!err.is_insufficient_funds());
    }
}
