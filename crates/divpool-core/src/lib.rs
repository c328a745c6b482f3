//! # divpool-core
//! Foundation types and traits for the divpool staking engine.
//!
//! All monetary values are integer base units of the pooled asset. Nothing in
//! this crate performs floating-point arithmetic.

pub mod constants;
pub mod error;
pub mod ledger;
pub mod math;
pub mod traits;
pub mod types;

pub use ledger::MemoryLedger;
pub use math::U256;
pub use traits::{Ledger, WithdrawalQueue};
pub use types::{Address, Amount, CallContext, Timestamp};
