//! Scaled reward-per-share accumulator.
//!
//! Each dividend advances the accumulator by
//! `amount * ACCUMULATOR_PRECISION / total_staked` (floor). A participant's
//! entitlement is `principal * (acc - baseline) / ACCUMULATOR_PRECISION`,
//! where `baseline` is the accumulator value at their last settlement.
//! Posting a dividend is O(1) regardless of the number of participants.

use divpool_core::error::StakingError;
use divpool_core::math::{self, U256};
use divpool_core::types::Amount;

/// Monotonically non-decreasing reward-per-share value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RewardAccumulator {
    value: U256,
}

impl RewardAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> U256 {
        self.value
    }

    /// Accumulator value after distributing `amount` over `total_staked`.
    ///
    /// Pure: the caller commits the result with [`commit`](Self::commit)
    /// once the dividend funds have actually moved.
    pub fn preview(&self, amount: Amount, total_staked: Amount) -> Result<U256, StakingError> {
        if total_staked == 0 {
            return Err(StakingError::NoStakers);
        }
        let increment =
            math::reward_per_share(amount, total_staked).ok_or(StakingError::ArithmeticOverflow)?;
        self.value
            .checked_add(increment)
            .ok_or(StakingError::ArithmeticOverflow)
    }

    /// Store a value previously obtained from [`preview`](Self::preview).
    pub fn commit(&mut self, next: U256) {
        debug_assert!(next >= self.value, "accumulator must not decrease");
        self.value = next;
    }

    /// Dividends accrued by `principal` since `baseline`.
    pub fn pending(&self, principal: Amount, baseline: U256) -> Result<Amount, StakingError> {
        if principal == 0 || baseline >= self.value {
            return Ok(0);
        }
        math::entitlement(principal, self.value - baseline).ok_or(StakingError::ArithmeticOverflow)
    }
}
