//! In-memory [`Ledger`] implementation.
//!
//! [`MemoryLedger`] keeps balances and allowances in `HashMap`s with no
//! persistence. It backs the scenario tests and local simulations; a real
//! deployment plugs the engine into its own asset ledger through the
//! [`Ledger`] trait.

use std::collections::HashMap;

use crate::error::LedgerError;
use crate::traits::Ledger;
use crate::types::{Address, Amount};

/// Balance and allowance store for a single fungible asset.
#[derive(Clone, Debug, Default)]
pub struct MemoryLedger {
    /// Account → balance. Zero balances are not stored.
    balances: HashMap<Address, Amount>,
    /// (owner, spender) → remaining allowance.
    allowances: HashMap<(Address, Address), Amount>,
    /// Sum of all balances.
    total_supply: Amount,
}

impl MemoryLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create `amount` new units in `to`'s account.
    pub fn mint(&mut self, to: &Address, amount: Amount) -> Result<(), LedgerError> {
        let supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(LedgerError::ValueOverflow)?;
        let balance = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(LedgerError::ValueOverflow)?;
        self.total_supply = supply;
        self.set_balance(to, balance);
        Ok(())
    }

    /// Sum of all account balances.
    pub fn total_supply(&self) -> Amount {
        self.total_supply
    }

    /// Number of accounts with a nonzero balance.
    pub fn account_count(&self) -> usize {
        self.balances.len()
    }

    fn set_balance(&mut self, account: &Address, balance: Amount) {
        if balance == 0 {
            self.balances.remove(account);
        } else {
            self.balances.insert(*account, balance);
        }
    }

    /// Validate and apply a balance move. Nothing is written unless every
    /// check passes.
    fn move_balance(&mut self, from: &Address, to: &Address, amount: Amount) -> Result<(), LedgerError> {
        let from_balance = self.balance_of(from);
        if from_balance < amount {
            return Err(LedgerError::InsufficientBalance {
                have: from_balance,
                need: amount,
            });
        }
        if from == to {
            return Ok(());
        }
        let to_balance = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(LedgerError::ValueOverflow)?;
        self.set_balance(from, from_balance - amount);
        self.set_balance(to, to_balance);
        Ok(())
    }
}

impl Ledger for MemoryLedger {
    fn balance_of(&self, account: &Address) -> Amount {
        self.balances.get(account).copied().unwrap_or(0)
    }

    fn allowance(&self, owner: &Address, spender: &Address) -> Amount {
        self.allowances
            .get(&(*owner, *spender))
            .copied()
            .unwrap_or(0)
    }

    fn approve(&mut self, owner: &Address, spender: &Address, amount: Amount) -> Result<(), LedgerError> {
        if amount == 0 {
            self.allowances.remove(&(*owner, *spender));
        } else {
            self.allowances.insert((*owner, *spender), amount);
        }
        Ok(())
    }

    fn transfer(&mut self, from: &Address, to: &Address, amount: Amount) -> Result<(), LedgerError> {
        self.move_balance(from, to, amount)
    }

    fn transfer_from(
        &mut self,
        spender: &Address,
        owner: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        let allowed = self.allowance(owner, spender);
        if allowed < amount {
            return Err(LedgerError::InsufficientAllowance {
                have: allowed,
                need: amount,
            });
        }
        self.move_balance(owner, to, amount)?;
        self.approve(owner, spender, allowed - amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(seed: u8) -> Address {
        Address([seed; 20])
    }

    #[test]
    fn new_ledger_is_empty() {
        let ledger = MemoryLedger::new();
        assert_eq!(ledger.total_supply(), 0);
        assert_eq!(ledger.account_count(), 0);
        assert_eq!(ledger.balance_of(&addr(1)), 0);
    }

    #[test]
    fn mint_credits_and_tracks_supply() {
        let mut ledger = MemoryLedger::new();
        ledger.mint(&addr(1), 500).unwrap();
        ledger.mint(&addr(2), 250).unwrap();
        assert_eq!(ledger.balance_of(&addr(1)), 500);
        assert_eq!(ledger.total_supply(), 750);
    }

    #[test]
    fn mint_overflow_rejected_without_effect() {
        let mut ledger = MemoryLedger::new();
        ledger.mint(&addr(1), Amount::MAX).unwrap();
        assert_eq!(ledger.mint(&addr(2), 1), Err(LedgerError::ValueOverflow));
        assert_eq!(ledger.balance_of(&addr(2)), 0);
        assert_eq!(ledger.total_supply(), Amount::MAX);
    }

    #[test]
    fn transfer_moves_funds() {
        let mut ledger = MemoryLedger::new();
        ledger.mint(&addr(1), 100).unwrap();
        ledger.transfer(&addr(1), &addr(2), 40).unwrap();
        assert_eq!(ledger.balance_of(&addr(1)), 60);
        assert_eq!(ledger.balance_of(&addr(2)), 40);
        assert_eq!(ledger.total_supply(), 100);
    }

    #[test]
    fn transfer_entire_balance_removes_account() {
        let mut ledger = MemoryLedger::new();
        ledger.mint(&addr(1), 100).unwrap();
        ledger.transfer(&addr(1), &addr(2), 100).unwrap();
        assert_eq!(ledger.account_count(), 1);
    }

    #[test]
    fn transfer_insufficient_balance() {
        let mut ledger = MemoryLedger::new();
        ledger.mint(&addr(1), 10).unwrap();
        let err = ledger.transfer(&addr(1), &addr(2), 11).unwrap_err();
        assert_eq!(err, LedgerError::InsufficientBalance { have: 10, need: 11 });
        assert_eq!(ledger.balance_of(&addr(1)), 10);
    }

    #[test]
    fn self_transfer_is_noop() {
        let mut ledger = MemoryLedger::new();
        ledger.mint(&addr(1), 10).unwrap();
        ledger.transfer(&addr(1), &addr(1), 10).unwrap();
        assert_eq!(ledger.balance_of(&addr(1)), 10);
    }

    #[test]
    fn transfer_from_consumes_allowance() {
        let mut ledger = MemoryLedger::new();
        ledger.mint(&addr(1), 100).unwrap();
        ledger.approve(&addr(1), &addr(9), 70).unwrap();
        ledger.transfer_from(&addr(9), &addr(1), &addr(9), 50).unwrap();
        assert_eq!(ledger.allowance(&addr(1), &addr(9)), 20);
        assert_eq!(ledger.balance_of(&addr(9)), 50);
    }

    #[test]
    fn transfer_from_without_allowance() {
        let mut ledger = MemoryLedger::new();
        ledger.mint(&addr(1), 100).unwrap();
        let err = ledger
            .transfer_from(&addr(9), &addr(1), &addr(9), 1)
            .unwrap_err();
        assert_eq!(err, LedgerError::InsufficientAllowance { have: 0, need: 1 });
    }

    #[test]
    fn transfer_from_insufficient_balance_keeps_allowance() {
        let mut ledger = MemoryLedger::new();
        ledger.mint(&addr(1), 10).unwrap();
        ledger.approve(&addr(1), &addr(9), 50).unwrap();
        let err = ledger
            .transfer_from(&addr(9), &addr(1), &addr(9), 20)
            .unwrap_err();
        assert_eq!(err, LedgerError::InsufficientBalance { have: 10, need: 20 });
        assert_eq!(ledger.allowance(&addr(1), &addr(9)), 50);
        assert_eq!(ledger.balance_of(&addr(1)), 10);
    }

    #[test]
    fn approve_overwrites() {
        let mut ledger = MemoryLedger::new();
        ledger.approve(&addr(1), &addr(2), 5).unwrap();
        ledger.approve(&addr(1), &addr(2), 3).unwrap();
        assert_eq!(ledger.allowance(&addr(1), &addr(2)), 3);
        ledger.approve(&addr(1), &addr(2), 0).unwrap();
        assert_eq!(ledger.allowance(&addr(1), &addr(2)), 0);
    }
}
