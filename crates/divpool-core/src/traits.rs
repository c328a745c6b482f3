//! Trait interfaces for the divpool engine.
//!
//! These traits define the contracts between components:
//! - [`Ledger`]: balance and allowance service for the pooled asset
//!   ([`MemoryLedger`](crate::ledger::MemoryLedger) implements it in memory)
//! - [`WithdrawalQueue`]: time-locked custody of unstaked payouts
//!   (divpool-engine's `TimeLocker` implements it)

use crate::error::{LedgerError, LockerError};
use crate::types::{Address, Amount, CallContext, Timestamp};

/// Atomic balance and allowance service for the pooled asset.
///
/// Every mutating call either applies completely or fails without touching
/// any balance or allowance. The engine relies on this: it performs its
/// ledger movement before committing its own state, so a failed transfer
/// leaves the whole operation without effect.
pub trait Ledger {
    /// Current balance of `account`.
    fn balance_of(&self, account: &Address) -> Amount;

    /// Amount `spender` may still pull from `owner`.
    fn allowance(&self, owner: &Address, spender: &Address) -> Amount;

    /// Set the allowance of `spender` over `owner`'s funds to `amount`.
    fn approve(&mut self, owner: &Address, spender: &Address, amount: Amount) -> Result<(), LedgerError>;

    /// Move `amount` from `from` to `to`, authorized by `from` itself.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::InsufficientBalance`] if `from` holds less than `amount`
    /// - [`LedgerError::ValueOverflow`] if crediting `to` would overflow
    fn transfer(&mut self, from: &Address, to: &Address, amount: Amount) -> Result<(), LedgerError>;

    /// Move `amount` from `owner` to `to` on behalf of `spender`, consuming allowance.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::InsufficientAllowance`] if `spender` may pull less than `amount`
    /// - [`LedgerError::InsufficientBalance`] if `owner` holds less than `amount`
    /// - [`LedgerError::ValueOverflow`] if crediting `to` would overflow
    fn transfer_from(
        &mut self,
        spender: &Address,
        owner: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<(), LedgerError>;
}

/// Time-locked custody for payouts released by the staking pool.
///
/// The pool hands its payout over inside [`queue_withdrawal`](Self::queue_withdrawal):
/// the queue moves the funds from the pool's account into its own and
/// records an entry that matures after the configured delay.
pub trait WithdrawalQueue {
    /// Ledger account holding the locked funds.
    fn address(&self) -> Address;

    /// Pool this queue accepts deposits from, if wired.
    fn linked_pool(&self) -> Option<Address>;

    /// Lock `amount` for `owner`, moving it from the calling pool's account.
    ///
    /// `ctx.sender` must be the linked pool. Returns the maturity timestamp
    /// of the new entry.
    ///
    /// # Errors
    ///
    /// - [`LockerError::Unauthorized`] if `ctx.sender` is not the linked pool
    /// - [`LockerError::ZeroAmount`] if `amount` is zero
    /// - [`LockerError::InsufficientBalance`] if the pool cannot fund the entry
    fn queue_withdrawal<L: Ledger + ?Sized>(
        &mut self,
        ledger: &mut L,
        ctx: &CallContext,
        owner: Address,
        amount: Amount,
    ) -> Result<Timestamp, LockerError>;
}
