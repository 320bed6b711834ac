//! Walks two accounts through a deposit, a withdrawal and a transfer, then
//! prints balances and histories (one JSON object per record) to stdout.

use anyhow::{Context, Result};

use bankbook_banking::Account;
use bankbook_core::Money;

fn print_history(account: &Account) -> Result<()> {
    println!();
    println!("{}'s Transaction History:", account.holder());
    for record in account.transaction_history() {
        let line = serde_json::to_string(record).context("failed to encode transaction record")?;
        println!("{line}");
    }
    Ok(())
}

fn main() -> Result<()> {
    bankbook_observability::init();

    let mut alice = Account::open("Alice", Money::from(1000)).context("opening Alice's account")?;
    let mut bob = Account::open("Bob", Money::from(500)).context("opening Bob's account")?;
    tracing::info!(alice = %alice.id_typed(), bob = %bob.id_typed(), "accounts opened");

    alice.deposit(Money::from(500))?;
    alice.withdraw(Money::from(200))?;
    alice
        .transfer(&mut bob, Money::from(300))
        .context("transferring from Alice to Bob")?;

    println!("Alice's Balance: {}", alice.check_balance());
    println!("Bob's Balance: {}", bob.check_balance());

    print_history(&alice)?;
    print_history(&bob)?;

    Ok(())
}
