//! Staking pool: the dividend accumulator and participant ledger.
//!
//! [`StakingPool`] owns the staked total, the reward accumulator, every
//! participant's principal and reward baseline, the admin registry and the
//! dividend log. Unstaked payouts leave through a [`WithdrawalQueue`].
//!
//! Every mutating operation follows the same order: validate, compute the
//! new values, move funds on the [`Ledger`], then commit. A rejected ledger
//! call therefore leaves the pool exactly as it was.
//!
//! # Conservation
//!
//! Floor rounding means the pool's ledger balance always covers every
//! outstanding entitlement, with a few units of dust left over. When the last
//! active participant unstakes they receive the pool's entire balance, so the
//! pool is drained to exactly zero once everyone has exited.

use std::collections::HashMap;

use divpool_core::error::{LockerError, StakingError};
use divpool_core::math::U256;
use divpool_core::traits::{Ledger, WithdrawalQueue};
use divpool_core::types::{Address, Amount, CallContext, Timestamp};
use tracing::{debug, info, warn};

use crate::accumulator::RewardAccumulator;
use crate::admin::AdminRegistry;
use crate::dividend_log::{DividendLog, DividendRecord, Posting};

/// Per-address staking record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Participant {
    /// Amount currently staked.
    pub principal: Amount,
    /// Accumulator value at the last settlement.
    pub reward_baseline: U256,
    /// Dividends realized over the record's lifetime (withdrawn, reinvested,
    /// folded into a new stake or paid out on unstake).
    pub lifetime_dividends: Amount,
}

impl Participant {
    pub fn is_active(&self) -> bool {
        self.principal > 0
    }
}

/// Result of a successful unstake.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Unstaked {
    /// Principal released from the pool.
    pub principal: Amount,
    /// Total handed to the withdrawal queue (principal plus dividends).
    pub payout: Amount,
    /// When the queued payout can be unlocked.
    pub maturity: Timestamp,
}

impl Unstaked {
    /// Dividend share of the payout.
    pub fn dividends(&self) -> Amount {
        self.payout - self.principal
    }
}

/// Proportional staking pool with dividend accrual.
#[derive(Clone, Debug)]
pub struct StakingPool {
    /// Ledger account holding staked funds and undistributed dividends.
    address: Address,
    /// Withdrawal queue account unstaked payouts are sent to.
    locker: Address,
    minimum_stake: Amount,
    total_staked: Amount,
    accumulator: RewardAccumulator,
    participants: HashMap<Address, Participant>,
    admins: AdminRegistry,
    dividends: DividendLog,
}

impl StakingPool {
    /// Create an empty pool owned by `owner`.
    ///
    /// `locker` is the account of the withdrawal queue this pool pays
    /// unstaked funds into.
    pub fn new(address: Address, owner: Address, locker: Address, minimum_stake: Amount) -> Self {
        Self {
            address,
            locker,
            minimum_stake,
            total_staked: 0,
            accumulator: RewardAccumulator::new(),
            participants: HashMap::new(),
            admins: AdminRegistry::new(owner),
            dividends: DividendLog::new(),
        }
    }

    // ------------------------------------------------------------------
    // Participant operations
    // ------------------------------------------------------------------

    /// Stake `amount`, pulling it from the caller through the ledger.
    ///
    /// The caller must have approved the pool for at least `amount`. Any
    /// dividends pending on an existing stake are folded into principal first,
    /// so staking again never forfeits accrued rewards.
    ///
    /// Returns the caller's new principal.
    ///
    /// # Errors
    ///
    /// - [`StakingError::InsufficientAllowance`] if the approval is below `amount`
    /// - [`StakingError::BelowMinimum`] if `amount` is under the configured minimum
    /// - [`StakingError::ZeroAmount`] if `amount` is zero (reachable only with a zero minimum)
    /// - [`StakingError::InsufficientBalance`] if the caller cannot fund the stake
    pub fn stake<L: Ledger + ?Sized>(
        &mut self,
        ledger: &mut L,
        ctx: &CallContext,
        amount: Amount,
    ) -> Result<Amount, StakingError> {
        let staker = ctx.sender;
        let allowance = ledger.allowance(&staker, &self.address);
        if allowance < amount {
            return Err(StakingError::InsufficientAllowance {
                have: allowance,
                need: amount,
            });
        }
        if amount < self.minimum_stake {
            return Err(StakingError::BelowMinimum {
                amount,
                minimum: self.minimum_stake,
            });
        }
        if amount == 0 {
            return Err(StakingError::ZeroAmount);
        }

        let current = self.participants.get(&staker).copied().unwrap_or_default();
        let folded = self.pending_for(&current)?;
        let added = folded
            .checked_add(amount)
            .ok_or(StakingError::ArithmeticOverflow)?;
        let principal = current
            .principal
            .checked_add(added)
            .ok_or(StakingError::ArithmeticOverflow)?;
        let total_staked = self
            .total_staked
            .checked_add(added)
            .ok_or(StakingError::ArithmeticOverflow)?;

        ledger.transfer_from(&self.address, &staker, &self.address, amount)?;

        self.participants.insert(
            staker,
            Participant {
                principal,
                reward_baseline: self.accumulator.value(),
                lifetime_dividends: current.lifetime_dividends.saturating_add(folded),
            },
        );
        self.total_staked = total_staked;
        self.dividends.mark_stake_changed();

        debug!(%staker, amount, folded, principal, total_staked, "pool: stake");
        Ok(principal)
    }

    /// Release the caller's entire stake plus pending dividends into the
    /// withdrawal queue.
    ///
    /// # Errors
    ///
    /// - [`StakingError::NoStake`] if the caller has nothing staked
    /// - [`StakingError::Locker`] with [`LockerError::Unauthorized`] if `queue`
    ///   is not this pool's linked queue
    pub fn unstake<L, Q>(
        &mut self,
        ledger: &mut L,
        queue: &mut Q,
        ctx: &CallContext,
    ) -> Result<Unstaked, StakingError>
    where
        L: Ledger + ?Sized,
        Q: WithdrawalQueue,
    {
        let owner = ctx.sender;
        let current = self.active_participant(&owner)?;
        if queue.address() != self.locker || queue.linked_pool() != Some(self.address) {
            warn!(queue = %queue.address(), pool = %self.address, "pool: withdrawal queue not linked");
            return Err(LockerError::Unauthorized(self.address).into());
        }

        let pending = self.pending_for(&current)?;
        let mut payout = current
            .principal
            .checked_add(pending)
            .ok_or(StakingError::ArithmeticOverflow)?;
        let total_staked = self
            .total_staked
            .checked_sub(current.principal)
            .ok_or(StakingError::ArithmeticOverflow)?;
        if total_staked == 0 {
            // Last one out sweeps the truncation dust.
            payout = payout.max(ledger.balance_of(&self.address));
        }

        let maturity = queue.queue_withdrawal(ledger, &ctx.forwarded_by(self.address), owner, payout)?;

        self.participants.insert(
            owner,
            Participant {
                principal: 0,
                reward_baseline: self.accumulator.value(),
                lifetime_dividends: current
                    .lifetime_dividends
                    .saturating_add(payout - current.principal),
            },
        );
        self.total_staked = total_staked;
        self.dividends.mark_stake_changed();

        debug!(%owner, principal = current.principal, payout, maturity, total_staked, "pool: unstake");
        Ok(Unstaked {
            principal: current.principal,
            payout,
            maturity,
        })
    }

    /// Pay the caller's pending dividends directly, leaving principal staked.
    ///
    /// Returns the amount paid. A zero entitlement succeeds without touching
    /// the ledger.
    ///
    /// # Errors
    ///
    /// - [`StakingError::NoStake`] if the caller has no record, or has a record
    ///   with zero principal (fully unstaked, so nothing can be pending)
    pub fn withdraw_dividends<L: Ledger + ?Sized>(
        &mut self,
        ledger: &mut L,
        ctx: &CallContext,
    ) -> Result<Amount, StakingError> {
        let owner = ctx.sender;
        let current = self.active_participant(&owner)?;
        let pending = self.pending_for(&current)?;

        if pending > 0 {
            ledger.transfer(&self.address, &owner, pending)?;
        }

        self.participants.insert(
            owner,
            Participant {
                reward_baseline: self.accumulator.value(),
                lifetime_dividends: current.lifetime_dividends.saturating_add(pending),
                ..current
            },
        );

        debug!(%owner, pending, "pool: withdraw dividends");
        Ok(pending)
    }

    /// Fold the caller's pending dividends into principal.
    ///
    /// No funds move: dividends already sit in the pool's account. Returns
    /// the caller's new principal. Fails with [`StakingError::NoStake`] under
    /// the same conditions as [`withdraw_dividends`](Self::withdraw_dividends).
    pub fn reinvest(&mut self, ctx: &CallContext) -> Result<Amount, StakingError> {
        let owner = ctx.sender;
        let current = self.active_participant(&owner)?;
        let pending = self.pending_for(&current)?;
        let principal = current
            .principal
            .checked_add(pending)
            .ok_or(StakingError::ArithmeticOverflow)?;
        let total_staked = self
            .total_staked
            .checked_add(pending)
            .ok_or(StakingError::ArithmeticOverflow)?;

        self.participants.insert(
            owner,
            Participant {
                principal,
                reward_baseline: self.accumulator.value(),
                lifetime_dividends: current.lifetime_dividends.saturating_add(pending),
            },
        );
        self.total_staked = total_staked;
        if pending > 0 {
            self.dividends.mark_stake_changed();
        }

        debug!(%owner, pending, principal, "pool: reinvest");
        Ok(principal)
    }

    // ------------------------------------------------------------------
    // Admin operations
    // ------------------------------------------------------------------

    /// Distribute `amount` to all current stakers in proportion to principal.
    ///
    /// Pulls `amount` from the admin through the ledger. Returns how the
    /// posting landed in the dividend log.
    ///
    /// # Errors
    ///
    /// - [`StakingError::NotAdmin`] if the caller may not post dividends
    /// - [`StakingError::NoStakers`] if nothing is staked
    /// - [`StakingError::ZeroAmount`] if `amount` is zero
    /// - [`StakingError::InsufficientAllowance`] / [`StakingError::InsufficientBalance`]
    ///   if the admin cannot fund the dividend
    pub fn post_dividend<L: Ledger + ?Sized>(
        &mut self,
        ledger: &mut L,
        ctx: &CallContext,
        amount: Amount,
    ) -> Result<Posting, StakingError> {
        let admin = ctx.sender;
        if !self.admins.is_admin(&admin) {
            warn!(%admin, "pool: dividend rejected from non-admin");
            return Err(StakingError::NotAdmin(admin));
        }
        if self.total_staked == 0 {
            return Err(StakingError::NoStakers);
        }
        if amount == 0 {
            return Err(StakingError::ZeroAmount);
        }
        let next = self.accumulator.preview(amount, self.total_staked)?;

        ledger.transfer_from(&self.address, &admin, &self.address, amount)?;

        self.accumulator.commit(next);
        let posting = self
            .dividends
            .record(amount, self.total_staked, ctx.timestamp);

        info!(%admin, amount, total_staked = self.total_staked, ?posting, "pool: dividend posted");
        Ok(posting)
    }

    /// Grant dividend-posting rights. Owner only.
    pub fn add_admin(&mut self, ctx: &CallContext, account: Address) -> Result<bool, StakingError> {
        self.admins.add(&ctx.sender, account)
    }

    /// Revoke dividend-posting rights. Owner only; the owner cannot be removed.
    pub fn remove_admin(&mut self, ctx: &CallContext, account: &Address) -> Result<bool, StakingError> {
        self.admins.remove(&ctx.sender, account)
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn locker(&self) -> Address {
        self.locker
    }

    pub fn owner(&self) -> Address {
        self.admins.owner()
    }

    pub fn minimum_stake(&self) -> Amount {
        self.minimum_stake
    }

    pub fn is_admin(&self, account: &Address) -> bool {
        self.admins.is_admin(account)
    }

    pub fn admins(&self) -> &AdminRegistry {
        &self.admins
    }

    /// Sum of all principals.
    pub fn total_staked(&self) -> Amount {
        self.total_staked
    }

    /// Principal currently staked by `account`.
    pub fn get_stake(&self, account: &Address) -> Amount {
        self.participants
            .get(account)
            .map(|p| p.principal)
            .unwrap_or(0)
    }

    /// Dividends `account` could withdraw or reinvest right now.
    pub fn unrealized_gains(&self, account: &Address) -> Result<Amount, StakingError> {
        match self.participants.get(account) {
            Some(p) => self.pending_for(p),
            None => Ok(0),
        }
    }

    /// Number of records in the dividend log.
    pub fn get_dividend_count(&self) -> usize {
        self.dividends.len()
    }

    pub fn dividend(&self, index: usize) -> Option<&DividendRecord> {
        self.dividends.get(index)
    }

    pub fn dividends(&self) -> &DividendLog {
        &self.dividends
    }

    /// Current reward-per-share accumulator value.
    pub fn accumulator(&self) -> U256 {
        self.accumulator.value()
    }

    pub fn participant(&self, account: &Address) -> Option<&Participant> {
        self.participants.get(account)
    }

    /// Number of participants with a nonzero stake.
    pub fn participant_count(&self) -> usize {
        self.participants.values().filter(|p| p.is_active()).count()
    }

    // ------------------------------------------------------------------
    // Internal
    // ------------------------------------------------------------------

    fn pending_for(&self, participant: &Participant) -> Result<Amount, StakingError> {
        self.accumulator
            .pending(participant.principal, participant.reward_baseline)
    }

    fn active_participant(&self, account: &Address) -> Result<Participant, StakingError> {
        self.participants
            .get(account)
            .filter(|p| p.is_active())
            .copied()
            .ok_or(StakingError::NoStake(*account))
    }
}
