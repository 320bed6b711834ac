//! Banking module: a single holder's account and its transaction log.
//!
//! Pure domain logic only: no IO, no persistence, no shared state.

pub mod account;
pub mod record;

pub use account::{Account, AccountCommand, DepositFunds, OpenAccount, WithdrawFunds};
pub use record::{TransactionKind, TransactionRecord};
