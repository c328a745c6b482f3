//! Pool constants. All monetary values in base units (1 token = 10^18 units).

use crate::types::Amount;

/// One whole token expressed in base units.
pub const UNIT: Amount = 1_000_000_000_000_000_000;

/// Fixed-point denominator of the reward accumulator.
///
/// The accumulator stores `dividend * ACCUMULATOR_PRECISION / total_staked`.
/// While a principal stays below this precision, the floor-rounded
/// entitlement on a dividend is at most one base unit below the exact
/// proportional share.
pub const ACCUMULATOR_PRECISION: Amount = 1_000_000_000_000_000_000_000_000_000_000_000_000;

/// Seconds in one day.
pub const DAY_SECS: u64 = 86_400;

/// Default number of days an unstaked payout stays locked.
pub const DEFAULT_UNSTAKE_DAYS: u64 = 30;

/// Default unstake delay in seconds (30 days).
pub const DEFAULT_UNSTAKE_DELAY_SECS: u64 = DEFAULT_UNSTAKE_DAYS * DAY_SECS;

/// Default minimum stake, in base units.
pub const DEFAULT_MINIMUM_STAKE: Amount = 1_000;

/// Longest unstake delay a deployment accepts (4 years).
pub const MAX_UNSTAKE_DELAY_SECS: u64 = 4 * 365 * DAY_SECS;

/// Domain labels used when deriving contract account addresses.
pub const POOL_ADDRESS_LABEL: &[u8] = b"divpool/staking-pool";
pub const LOCKER_ADDRESS_LABEL: &[u8] = b"divpool/time-locker";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precision_exceeds_unit() {
        assert!(ACCUMULATOR_PRECISION > UNIT);
        assert_eq!(ACCUMULATOR_PRECISION / UNIT, UNIT);
    }

    #[test]
    fn default_delay_is_thirty_days() {
        assert_eq!(DEFAULT_UNSTAKE_DELAY_SECS, 2_592_000);
        assert!(DEFAULT_UNSTAKE_DELAY_SECS < MAX_UNSTAKE_DELAY_SECS);
    }

    #[test]
    fn address_labels_differ() {
        assert_ne!(POOL_ADDRESS_LABEL, LOCKER_ADDRESS_LABEL);
    }
}
