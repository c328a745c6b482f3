//! # divpool-engine
//! Staking pool, admin registry and withdrawal locker.
//!
//! [`StakingPool`] accounts stakes and distributes dividends pro rata through
//! a scaled accumulator. Unstaked payouts are handed to a [`TimeLocker`],
//! which releases them after a fixed delay. [`Deployment`] builds a linked
//! pair from a [`StakingConfig`].
//!
//! Components never hold balances themselves: every value movement goes
//! through a [`Ledger`](divpool_core::traits::Ledger) passed in by the caller.

pub mod accumulator;
pub mod admin;
pub mod config;
pub mod deployment;
pub mod dividend_log;
pub mod locker;
pub mod pool;

pub use accumulator::RewardAccumulator;
pub use admin::AdminRegistry;
pub use config::StakingConfig;
pub use deployment::Deployment;
pub use dividend_log::{DividendLog, DividendRecord, Posting};
pub use locker::{LockedWithdrawal, TimeLocker, WithdrawalState};
pub use pool::{Participant, StakingPool, Unstaked};
