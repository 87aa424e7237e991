// Fungible balance ledger and the asset-transfer capability the market
// settles through.
//
// The market core never moves value itself: it asks an `AssetTransfer` to
// debit the bettor and credit the escrow, or to pay rewards back out. Any
// balance failure aborts the enclosing operation before the market mutates
// its own state, so a failed call leaves everything untouched.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::error::MarketError;

/// Asset-transfer capability consumed by the market.
///
/// `debit` and `credit` operate on a fungible balance ledger keyed by account
/// identity. Failures propagate unmodified as Balance errors.
pub trait AssetTransfer {
    fn debit(&mut self, account: &str, amount: u128) -> Result<(), MarketError>;

    fn credit(&mut self, account: &str, amount: u128) -> Result<(), MarketError>;

    /// Debit `from` then credit `to`. The debit carries all the failure modes;
    /// nothing is credited when it fails.
    fn transfer(&mut self, from: &str, to: &str, amount: u128) -> Result<(), MarketError> {
        self.debit(from, amount)?;
        self.credit(to, amount)
    }
}

/// A single recorded balance movement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Transfer {
    pub id: String,
    pub from: Option<String>,
    pub to: String,
    pub amount: u128,
}

impl Transfer {
    fn deposit(to: &str, amount: u128) -> Self {
        Self {
            id: format!("tx_{}", Uuid::new_v4().simple()),
            from: None,
            to: to.to_string(),
            amount,
        }
    }

    fn movement(from: &str, to: &str, amount: u128) -> Self {
        Self {
            id: format!("tx_{}", Uuid::new_v4().simple()),
            from: Some(from.to_string()),
            to: to.to_string(),
            amount,
        }
    }
}

/// In-memory balance ledger.
///
/// Accounts spring into existence when first credited; debiting an unknown
/// account fails rather than silently creating a negative balance.
#[derive(Debug, Default)]
pub struct Ledger {
    balances: HashMap<String, u128>,
    transfers: Vec<Transfer>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an account with an initial balance.
    pub fn register(&mut self, account: &str, initial: u128) {
        self.balances.insert(account.to_string(), initial);
        self.transfers.push(Transfer::deposit(account, initial));
        info!(account, initial, "account registered");
    }

    pub fn balance(&self, account: &str) -> u128 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    /// Sum of all balances; conserved by `transfer`.
    pub fn total_supply(&self) -> u128 {
        self.balances.values().sum()
    }

    pub fn transfers(&self) -> &[Transfer] {
        &self.transfers
    }
}

impl AssetTransfer for Ledger {
    fn debit(&mut self, account: &str, amount: u128) -> Result<(), MarketError> {
        let balance = self
            .balances
            .get_mut(account)
            .ok_or_else(|| MarketError::AccountNotFound(account.to_string()))?;
        if *balance < amount {
            return Err(MarketError::InsufficientBalance(format!(
                "{}: {} < {}",
                account, balance, amount
            )));
        }
        *balance -= amount;
        Ok(())
    }

    fn credit(&mut self, account: &str, amount: u128) -> Result<(), MarketError> {
        let balance = self.balances.entry(account.to_string()).or_insert(0);
        *balance += amount;
        Ok(())
    }

    fn transfer(&mut self, from: &str, to: &str, amount: u128) -> Result<(), MarketError> {
        self.debit(from, amount)?;
        self.credit(to, amount)?;
        self.transfers.push(Transfer::movement(from, to, amount));
        info!(from, to, amount, "transfer");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_register_and_balance() {
        let mut ledger = Ledger::new();
        ledger.register("alice", 1000);
        assert_eq!(ledger.balance("alice"), 1000);
        assert_eq!(ledger.balance("bob"), 0);
        assert_eq!(ledger.total_supply(), 1000);
    }

    #[test]
    fn test_debit_insufficient() {
        let mut ledger = Ledger::new();
        ledger.register("alice", 100);

        let err = ledger.debit("alice", 101).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Balance);
        // failed debit leaves the balance untouched
        assert_eq!(ledger.balance("alice"), 100);
    }

    #[test]
    fn test_debit_unknown_account() {
        let mut ledger = Ledger::new();
        let err = ledger.debit("ghost", 1).unwrap_err();
        assert_eq!(err, MarketError::AccountNotFound("ghost".to_string()));
    }

    #[test]
    fn test_credit_creates_account() {
        let mut ledger = Ledger::new();
        ledger.credit("escrow_1", 500).unwrap();
        assert_eq!(ledger.balance("escrow_1"), 500);
    }

    #[test]
    fn test_transfer_conserves_supply() {
        let mut ledger = Ledger::new();
        ledger.register("alice", 1000);
        ledger.transfer("alice", "bob", 300).unwrap();
        assert_eq!(ledger.balance("alice"), 700);
        assert_eq!(ledger.balance("bob"), 300);
        assert_eq!(ledger.total_supply(), 1000);
        assert_eq!(ledger.transfers().len(), 2);

        // failed transfer moves nothing
        assert!(ledger.transfer("alice", "bob", 10_000).is_err());
        assert_eq!(ledger.balance("alice"), 700);
        assert_eq!(ledger.balance("bob"), 300);
        assert_eq!(ledger.transfers().len(), 2);
    }
}
