use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bankbook_core::{AccountId, Aggregate, AggregateRoot, DomainError, DomainResult, Money};

use crate::record::{TransactionKind, TransactionRecord};

/// Aggregate root: a single holder's account.
///
/// Owns its balance and its transaction log exclusively. The log is
/// append-only and every entry is produced through [`Aggregate::apply`], so
/// `balance` always equals the `balance_after` of the last record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    id: AccountId,
    holder: String,
    balance: Money,
    transactions: Vec<TransactionRecord>,
}

/// Command: OpenAccount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenAccount {
    pub initial_balance: Money,
    pub occurred_at: DateTime<Utc>,
}

/// Command: DepositFunds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositFunds {
    pub amount: Money,
    pub occurred_at: DateTime<Utc>,
}

/// Command: WithdrawFunds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawFunds {
    pub amount: Money,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountCommand {
    Open(OpenAccount),
    Deposit(DepositFunds),
    Withdraw(WithdrawFunds),
}

impl Account {
    /// Empty, not-yet-opened instance. Only reachable through `open`/`rehydrate`.
    fn empty(id: AccountId, holder: String) -> Self {
        Self {
            id,
            holder,
            balance: Money::zero(),
            transactions: Vec::new(),
        }
    }

    /// Open an account with a zero balance.
    pub fn new(holder: impl Into<String>) -> Self {
        let mut account = Self::empty(AccountId::new(), holder.into());
        account.apply(&TransactionRecord::new(
            TransactionKind::AccountCreated,
            Money::zero(),
            Money::zero(),
            Utc::now(),
        ));
        account
    }

    /// Open an account with an initial balance.
    ///
    /// Fails with `InvalidArgument` when `initial_balance` is negative; no
    /// account is created in that case.
    pub fn open(holder: impl Into<String>, initial_balance: Money) -> DomainResult<Self> {
        Self::open_with_id(AccountId::new(), holder, initial_balance)
    }

    pub fn open_with_id(
        id: AccountId,
        holder: impl Into<String>,
        initial_balance: Money,
    ) -> DomainResult<Self> {
        let mut account = Self::empty(id, holder.into());
        let command = AccountCommand::Open(OpenAccount {
            initial_balance,
            occurred_at: Utc::now(),
        });
        account
            .execute(&command)
            .map_err(|e| account.rejected("open", e))?;
        Ok(account)
    }

    /// Rebuild an account from a previously captured history.
    ///
    /// The history must start with the single `AccountCreated` record, every
    /// `balance_after` must match the running balance and stay non-negative,
    /// and timestamps must never go backwards.
    pub fn rehydrate(
        id: AccountId,
        holder: impl Into<String>,
        records: impl IntoIterator<Item = TransactionRecord>,
    ) -> DomainResult<Self> {
        let mut account = Self::empty(id, holder.into());
        for (index, record) in records.into_iter().enumerate() {
            account.ensure_replayable(index, &record)?;
            account.apply(&record);
        }
        if account.transactions.is_empty() {
            return Err(DomainError::invariant("history is empty"));
        }
        Ok(account)
    }

    pub fn id_typed(&self) -> AccountId {
        self.id
    }

    pub fn holder(&self) -> &str {
        &self.holder
    }

    /// Current balance. No side effects.
    pub fn check_balance(&self) -> Money {
        self.balance
    }

    /// The full, ordered log. Records are immutable; the slice is a shared
    /// borrow, so the log cannot be changed through it.
    pub fn transaction_history(&self) -> &[TransactionRecord] {
        &self.transactions
    }

    /// Add `amount` to the balance and return the new balance.
    pub fn deposit(&mut self, amount: Money) -> DomainResult<Money> {
        let command = AccountCommand::Deposit(DepositFunds {
            amount,
            occurred_at: Utc::now(),
        });
        self.execute(&command)
            .map_err(|e| self.rejected("deposit", e))?;
        Ok(self.balance)
    }

    /// Take `amount` from the balance and return the new balance.
    pub fn withdraw(&mut self, amount: Money) -> DomainResult<Money> {
        let command = AccountCommand::Withdraw(WithdrawFunds {
            amount,
            occurred_at: Utc::now(),
        });
        self.execute(&command)
            .map_err(|e| self.rejected("withdraw", e))?;
        Ok(self.balance)
    }

    /// Move `amount` from this account to `recipient`; returns this account's
    /// new balance.
    ///
    /// Both legs are decided before either is applied, so a rejected transfer
    /// leaves both accounts exactly as they were.
    pub fn transfer(&mut self, recipient: &mut Account, amount: Money) -> DomainResult<Money> {
        let occurred_at = Utc::now();

        let debit = self
            .handle(&AccountCommand::Withdraw(WithdrawFunds {
                amount,
                occurred_at,
            }))
            .map_err(|e| self.rejected("transfer", e))?;
        let credit = recipient
            .handle(&AccountCommand::Deposit(DepositFunds {
                amount,
                occurred_at,
            }))
            .map_err(|e| recipient.rejected("transfer", e))?;

        for record in &debit {
            self.apply(record);
        }
        for record in &credit {
            recipient.apply(record);
        }

        tracing::info!(
            from = %self.id,
            to = %recipient.id,
            amount = %amount,
            "transfer completed"
        );
        Ok(self.balance)
    }

    fn rejected(&self, operation: &'static str, err: DomainError) -> DomainError {
        tracing::warn!(
            account_id = %self.id,
            operation,
            error = %err,
            "operation rejected"
        );
        err
    }

    fn ensure_opened(&self) -> Result<(), DomainError> {
        if self.transactions.is_empty() {
            return Err(DomainError::invariant("account has not been opened"));
        }
        Ok(())
    }

    /// Timestamps never go backwards, even if the wall clock does.
    fn stamp(&self, occurred_at: DateTime<Utc>) -> DateTime<Utc> {
        match self.transactions.last() {
            Some(last) if last.timestamp() > occurred_at => last.timestamp(),
            _ => occurred_at,
        }
    }

    fn handle_open(&self, cmd: &OpenAccount) -> Result<Vec<TransactionRecord>, DomainError> {
        if !self.transactions.is_empty() {
            return Err(DomainError::invariant("account already opened"));
        }
        if cmd.initial_balance.is_negative() {
            return Err(DomainError::invalid_argument(
                "Initial balance cannot be negative",
            ));
        }

        Ok(vec![TransactionRecord::new(
            TransactionKind::AccountCreated,
            cmd.initial_balance,
            cmd.initial_balance,
            cmd.occurred_at,
        )])
    }

    fn handle_deposit(&self, cmd: &DepositFunds) -> Result<Vec<TransactionRecord>, DomainError> {
        self.ensure_opened()?;

        if !cmd.amount.is_positive() {
            return Err(DomainError::invalid_argument(
                "Deposit amount must be positive",
            ));
        }

        let balance_after = self
            .balance
            .checked_add(cmd.amount)
            .ok_or_else(|| DomainError::invalid_argument("deposit would overflow the balance"))?;

        Ok(vec![TransactionRecord::new(
            TransactionKind::Deposit,
            cmd.amount,
            balance_after,
            self.stamp(cmd.occurred_at),
        )])
    }

    fn handle_withdraw(&self, cmd: &WithdrawFunds) -> Result<Vec<TransactionRecord>, DomainError> {
        self.ensure_opened()?;

        if !cmd.amount.is_positive() {
            return Err(DomainError::invalid_argument(
                "Withdrawal amount must be positive",
            ));
        }
        if cmd.amount > self.balance {
            return Err(DomainError::insufficient_funds(cmd.amount, self.balance));
        }

        // amount <= balance and both are non-negative: cannot overflow.
        let balance_after = self
            .balance
            .checked_sub(cmd.amount)
            .ok_or_else(|| DomainError::invariant("withdrawal underflowed the balance"))?;

        Ok(vec![TransactionRecord::new(
            TransactionKind::Withdrawal,
            -cmd.amount,
            balance_after,
            self.stamp(cmd.occurred_at),
        )])
    }

    fn ensure_replayable(&self, index: usize, record: &TransactionRecord) -> Result<(), DomainError> {
        let amount = record.amount();
        match (index, record.kind()) {
            (0, TransactionKind::AccountCreated) => {
                if amount.is_negative() {
                    return Err(DomainError::invariant("opening balance is negative"));
                }
            }
            (0, kind) => {
                return Err(DomainError::invariant(format!(
                    "history must start with AccountCreated, found {kind:?}"
                )));
            }
            (_, TransactionKind::AccountCreated) => {
                return Err(DomainError::invariant(format!(
                    "AccountCreated at position {index}; it may only appear first"
                )));
            }
            (_, TransactionKind::Deposit) if !amount.is_positive() => {
                return Err(DomainError::invariant(format!(
                    "deposit at position {index} is not positive"
                )));
            }
            (_, TransactionKind::Withdrawal) if !amount.is_negative() => {
                return Err(DomainError::invariant(format!(
                    "withdrawal at position {index} is not negative"
                )));
            }
            _ => {}
        }

        let expected = if index == 0 {
            Some(amount)
        } else {
            self.balance.checked_add(amount)
        };
        if expected != Some(record.balance_after()) {
            return Err(DomainError::invariant(format!(
                "balance_after at position {index} does not match the running balance"
            )));
        }
        if record.balance_after().is_negative() {
            return Err(DomainError::invariant(format!(
                "balance goes negative at position {index}"
            )));
        }
        if let Some(last) = self.transactions.last() {
            if record.timestamp() < last.timestamp() {
                return Err(DomainError::invariant(format!(
                    "timestamp at position {index} is earlier than its predecessor"
                )));
            }
        }
        Ok(())
    }
}

impl AggregateRoot for Account {
    type Id = AccountId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.transactions.len() as u64
    }
}

impl Aggregate for Account {
    type Command = AccountCommand;
    type Event = TransactionRecord;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        self.balance = event.balance_after();
        self.transactions.push(event.clone());

        tracing::debug!(
            account_id = %self.id,
            kind = %event.kind(),
            amount = %event.amount(),
            balance = %self.balance,
            "transaction recorded"
        );
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            AccountCommand::Open(cmd) => self.handle_open(cmd),
            AccountCommand::Deposit(cmd) => self.handle_deposit(cmd),
            AccountCommand::Withdraw(cmd) => self.handle_withdraw(cmd),
        }
    }
}
