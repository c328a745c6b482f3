//! Error types for the divpool engine.
use thiserror::Error;

use crate::types::{Address, Amount, Timestamp};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("allowance low: have {have}, need {need}")] InsufficientAllowance { have: Amount, need: Amount },
    #[error("insufficient balance: have {have}, need {need}")] InsufficientBalance { have: Amount, need: Amount },
    #[error("value overflow")] ValueOverflow,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LockerError {
    #[error("unauthorized caller: {0}")] Unauthorized(Address),
    #[error("only owner may configure the locker: {0}")] NotOwner(Address),
    #[error("locker already linked to pool {0}")] AlreadyLinked(Address),
    #[error("withdrawal not matured: now {now}, matures at {maturity}")] NotMatured { now: Timestamp, maturity: Timestamp },
    #[error("nothing queued for {0}")] NothingQueued(Address),
    #[error("zero-value withdrawal")] ZeroAmount,
    #[error("insufficient balance: have {have}, need {need}")] InsufficientBalance { have: Amount, need: Amount },
    #[error("value overflow")] ValueOverflow,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StakingError {
    #[error("allowance low: have {have}, need {need}")] InsufficientAllowance { have: Amount, need: Amount },
    #[error("insufficient balance: have {have}, need {need}")] InsufficientBalance { have: Amount, need: Amount },
    #[error("stake too low: {amount} below minimum {minimum}")] BelowMinimum { amount: Amount, minimum: Amount },
    #[error("zero amount")] ZeroAmount,
    #[error("only admin may post dividends: {0}")] NotAdmin(Address),
    #[error("only owner may manage admins: {0}")] NotOwner(Address),
    #[error("owner cannot be removed from admins")] OwnerNotRemovable,
    #[error("no stakers to receive a dividend")] NoStakers,
    #[error("no stake for {0}")] NoStake(Address),
    #[error("arithmetic overflow")] ArithmeticOverflow,
    #[error(transparent)] Locker(#[from] LockerError),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("config io: {0}")] Io(String),
    #[error("config parse: {0}")] Parse(String),
    #[error("invalid value for {var}: {value}")] InvalidEnv { var: String, value: String },
    #[error("invalid config: {0}")] Invalid(String),
}

impl From<LedgerError> for StakingError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::InsufficientAllowance { have, need } => Self::InsufficientAllowance { have, need },
            LedgerError::InsufficientBalance { have, need } => Self::InsufficientBalance { have, need },
            LedgerError::ValueOverflow => Self::ArithmeticOverflow,
        }
    }
}

impl From<LedgerError> for LockerError {
    fn from(err: LedgerError) -> Self {
        match err {
            // The locker only ever moves its own funds, so an allowance
            // failure can only surface as a balance shortfall.
            LedgerError::InsufficientAllowance { have, need }
            | LedgerError::InsufficientBalance { have, need } => Self::InsufficientBalance { have, need },
            LedgerError::ValueOverflow => Self::ValueOverflow,
        }
    }
}

#[derive(Error, Debug)]
pub enum DivpoolError {
    #[error(transparent)] Ledger(#[from] LedgerError),
    #[error(transparent)] Staking(#[from] StakingError),
    #[error(transparent)] Locker(#[from] LockerError),
    #[error(transparent)] Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staking_messages_carry_distinguishing_text() {
        let who = Address([1u8; 20]);
        let cases: Vec<(StakingError, &str)> = vec![
            (StakingError::InsufficientAllowance { have: 0, need: 5 }, "allowance low"),
            (StakingError::BelowMinimum { amount: 999, minimum: 1000 }, "stake too low"),
            (StakingError::NotAdmin(who), "only admin"),
            (StakingError::NotOwner(who), "only owner"),
            (StakingError::NoStakers, "no stakers"),
            (StakingError::NoStake(who), "no stake"),
        ];
        for (err, needle) in cases {
            assert!(err.to_string().contains(needle), "{err} missing {needle}");
        }
    }

    #[test]
    fn locker_messages_carry_distinguishing_text() {
        let who = Address([2u8; 20]);
        assert!(LockerError::Unauthorized(who).to_string().contains("unauthorized"));
        assert!(LockerError::NothingQueued(who).to_string().contains("nothing queued"));
        let err = LockerError::NotMatured { now: 5, maturity: 10 };
        assert!(err.to_string().contains("not matured"));
    }

    #[test]
    fn ledger_error_maps_into_staking_taxonomy() {
        let err: StakingError = LedgerError::InsufficientAllowance { have: 1, need: 2 }.into();
        assert_eq!(err, StakingError::InsufficientAllowance { have: 1, need: 2 });
        let err: StakingError = LedgerError::InsufficientBalance { have: 3, need: 4 }.into();
        assert_eq!(err, StakingError::InsufficientBalance { have: 3, need: 4 });
        let err: StakingError = LedgerError::ValueOverflow.into();
        assert_eq!(err, StakingError::ArithmeticOverflow);
    }

    #[test]
    fn locker_error_is_transparent_inside_staking() {
        let who = Address([3u8; 20]);
        let err: StakingError = LockerError::Unauthorized(who).into();
        assert_eq!(err.to_string(), LockerError::Unauthorized(who).to_string());
    }

    #[test]
    fn umbrella_wraps_each_domain() {
        let err: DivpoolError = StakingError::NoStakers.into();
        assert!(matches!(err, DivpoolError::Staking(StakingError::NoStakers)));
        let err: DivpoolError = ConfigError::Invalid("x".into()).into();
        assert!(err.to_string().contains("invalid config"));
    }
}
