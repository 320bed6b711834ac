use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bankbook_core::Money;

/// What kind of balance-affecting event a record describes.
///
/// A transfer has no kind of its own: it shows up as a `Withdrawal` on the
/// sender and a `Deposit` on the recipient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    AccountCreated,
    Deposit,
    Withdrawal,
}

impl TransactionKind {
    /// Human-readable label, as shown in statements.
    pub fn label(&self) -> &'static str {
        match self {
            TransactionKind::AccountCreated => "Account Created",
            TransactionKind::Deposit => "Deposit",
            TransactionKind::Withdrawal => "Withdrawal",
        }
    }
}

impl core::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

/// Immutable snapshot of one balance-affecting event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    kind: TransactionKind,
    /// Signed: positive for creation/deposit, negative for withdrawal.
    amount: Money,
    /// Balance right after this event. Never recomputed.
    balance_after: Money,
    timestamp: DateTime<Utc>,
}

impl TransactionRecord {
    pub fn new(
        kind: TransactionKind,
        amount: Money,
        balance_after: Money,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            kind,
            amount,
            balance_after,
            timestamp,
        }
    }

    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    pub fn balance_after(&self) -> Money {
        self.balance_after
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

impl core::fmt::Display for TransactionRecord {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{} {:<15} {:>12} -> {}",
            self.timestamp.to_rfc3339(),
            self.kind.label(),
            self.amount,
            self.balance_after
        )
    }
}
