//! Time-locked withdrawal queue.
//!
//! [`TimeLocker`] holds unstaked payouts for a fixed delay. Each address has
//! a FIFO of independently maturing entries, so unstaking twice before the
//! first unlock never overwrites or blocks earlier funds. Maturity is checked
//! lazily on [`TimeLocker::unlock`]; nothing expires in the background.
//!
//! Entry lifecycle: `Pending` on deposit, `Matured` once
//! `now >= maturity`, released (and deleted) on unlock.

use std::collections::{HashMap, VecDeque};

use divpool_core::error::LockerError;
use divpool_core::traits::{Ledger, WithdrawalQueue};
use divpool_core::types::{Address, Amount, CallContext, Timestamp};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Lifecycle state of a queued withdrawal that has not been released yet.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum WithdrawalState {
    Pending,
    Matured,
}

/// A payout waiting out the unstake delay.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct LockedWithdrawal {
    pub owner: Address,
    pub amount: Amount,
    pub queued_at: Timestamp,
    pub maturity: Timestamp,
}

impl LockedWithdrawal {
    pub fn is_matured(&self, now: Timestamp) -> bool {
        now >= self.maturity
    }

    pub fn state(&self, now: Timestamp) -> WithdrawalState {
        if self.is_matured(now) {
            WithdrawalState::Matured
        } else {
            WithdrawalState::Pending
        }
    }

    /// Seconds until maturity, or 0 if already matured.
    pub fn remaining_secs(&self, now: Timestamp) -> u64 {
        self.maturity.saturating_sub(now)
    }
}

/// Custody account for unstaked payouts.
#[derive(Clone, Debug)]
pub struct TimeLocker {
    /// Ledger account holding every locked payout.
    address: Address,
    /// Account allowed to wire the locker to its pool.
    owner: Address,
    /// Seconds between queueing and maturity.
    delay: u64,
    /// The only pool allowed to queue withdrawals. Set once.
    pool: Option<Address>,
    /// Per-owner FIFO of locked payouts, oldest first.
    queues: HashMap<Address, VecDeque<LockedWithdrawal>>,
    /// Sum of all queued amounts.
    total_locked: Amount,
}

impl TimeLocker {
    pub fn new(address: Address, owner: Address, delay: u64) -> Self {
        Self {
            address,
            owner,
            delay,
            pool: None,
            queues: HashMap::new(),
            total_locked: 0,
        }
    }

    /// Bind the locker to the pool allowed to queue withdrawals.
    ///
    /// Owner only, and only once.
    ///
    /// # Errors
    ///
    /// - [`LockerError::NotOwner`] if the caller is not the locker owner
    /// - [`LockerError::AlreadyLinked`] if a pool is already bound
    pub fn link(&mut self, ctx: &CallContext, pool: Address) -> Result<(), LockerError> {
        if ctx.sender != self.owner {
            warn!(caller = %ctx.sender, "locker: link rejected from non-owner");
            return Err(LockerError::NotOwner(ctx.sender));
        }
        if let Some(existing) = self.pool {
            return Err(LockerError::AlreadyLinked(existing));
        }
        self.pool = Some(pool);
        info!(%pool, locker = %self.address, "locker: linked to pool");
        Ok(())
    }

    /// Release every matured entry queued for the caller.
    ///
    /// Matured entries are paid out oldest first in a single ledger transfer
    /// and deleted. Entries that have not matured stay queued. Returns the
    /// amount released.
    ///
    /// # Errors
    ///
    /// - [`LockerError::NothingQueued`] if the caller has no entries
    /// - [`LockerError::NotMatured`] if the oldest entry is still pending
    pub fn unlock<L: Ledger + ?Sized>(
        &mut self,
        ledger: &mut L,
        ctx: &CallContext,
    ) -> Result<Amount, LockerError> {
        let owner = ctx.sender;
        let now = ctx.timestamp;
        let queue = match self.queues.get(&owner) {
            Some(q) if !q.is_empty() => q,
            _ => return Err(LockerError::NothingQueued(owner)),
        };

        let matured = queue.iter().take_while(|e| e.is_matured(now)).count();
        if matured == 0 {
            let maturity = queue.front().map(|e| e.maturity).unwrap_or(now);
            return Err(LockerError::NotMatured { now, maturity });
        }
        let released = queue
            .iter()
            .take(matured)
            .try_fold(0, |acc: Amount, e| acc.checked_add(e.amount))
            .ok_or(LockerError::ValueOverflow)?;

        ledger.transfer(&self.address, &owner, released)?;

        if let Some(queue) = self.queues.get_mut(&owner) {
            queue.drain(..matured);
            if queue.is_empty() {
                self.queues.remove(&owner);
            }
        }
        self.total_locked -= released;

        debug!(%owner, released, entries = matured, "locker: unlocked");
        Ok(released)
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    /// Unstake delay in seconds.
    pub fn delay(&self) -> u64 {
        self.delay
    }

    /// Entries queued for `owner`, oldest first.
    pub fn entries(&self, owner: &Address) -> impl Iterator<Item = &LockedWithdrawal> {
        self.queues.get(owner).into_iter().flat_map(|q| q.iter())
    }

    /// Total still locked for `owner`, matured or not.
    pub fn locked_balance(&self, owner: &Address) -> Amount {
        self.entries(owner)
            .fold(0, |acc: Amount, e| acc.saturating_add(e.amount))
    }

    /// Amount `owner` could unlock at `now`.
    pub fn unlockable_balance(&self, owner: &Address, now: Timestamp) -> Amount {
        self.entries(owner)
            .take_while(|e| e.is_matured(now))
            .fold(0, |acc: Amount, e| acc.saturating_add(e.amount))
    }

    /// Maturity of `owner`'s oldest queued entry.
    pub fn next_maturity(&self, owner: &Address) -> Option<Timestamp> {
        self.entries(owner).next().map(|e| e.maturity)
    }

    /// Sum of every queued amount across all owners.
    pub fn total_locked(&self) -> Amount {
        self.total_locked
    }
}

impl WithdrawalQueue for TimeLocker {
    fn address(&self) -> Address {
        self.address
    }

    fn linked_pool(&self) -> Option<Address> {
        self.pool
    }

    fn queue_withdrawal<L: Ledger + ?Sized>(
        &mut self,
        ledger: &mut L,
        ctx: &CallContext,
        owner: Address,
        amount: Amount,
    ) -> Result<Timestamp, LockerError> {
        let depositor = ctx.sender;
        if self.pool != Some(depositor) {
            warn!(%depositor, "locker: rejected deposit from unlinked account");
            return Err(LockerError::Unauthorized(depositor));
        }
        if amount == 0 {
            return Err(LockerError::ZeroAmount);
        }
        let maturity = ctx
            .timestamp
            .checked_add(self.delay)
            .ok_or(LockerError::ValueOverflow)?;
        let total_locked = self
            .total_locked
            .checked_add(amount)
            .ok_or(LockerError::ValueOverflow)?;

        ledger.transfer(&depositor, &self.address, amount)?;

        self.queues.entry(owner).or_default().push_back(LockedWithdrawal {
            owner,
            amount,
            queued_at: ctx.timestamp,
            maturity,
        });
        self.total_locked = total_locked;

        debug!(%owner, amount, maturity, "locker: withdrawal queued");
        Ok(maturity)
    }
}
