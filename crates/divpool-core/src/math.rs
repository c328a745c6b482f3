//! 256-bit fixed-point helpers for the reward accumulator.
//!
//! `dividend * ACCUMULATOR_PRECISION` does not fit in 128 bits for realistic
//! token amounts, so every accumulator product is formed in [`U256`] and
//! narrowed back to an [`Amount`] with an explicit overflow check.

use uint::construct_uint;

use crate::constants::ACCUMULATOR_PRECISION;
use crate::types::Amount;

construct_uint! {
    /// Unsigned 256-bit integer (four 64-bit limbs).
    pub struct U256(4);
}

/// The accumulator precision as a 256-bit value.
pub fn precision() -> U256 {
    U256::from(ACCUMULATOR_PRECISION)
}

/// `a * b / denominator` with a 256-bit intermediate, rounding down.
///
/// Returns `None` when `denominator` is zero or the product overflows 256 bits.
pub fn mul_div_floor(a: U256, b: U256, denominator: U256) -> Option<U256> {
    if denominator.is_zero() {
        return None;
    }
    a.checked_mul(b).map(|product| product / denominator)
}

/// Narrow a 256-bit value to an [`Amount`], or `None` if it does not fit.
pub fn to_amount(value: U256) -> Option<Amount> {
    if value > U256::from(Amount::MAX) {
        return None;
    }
    Some(value.as_u128())
}

/// Accumulator increment for distributing `dividend` over `total_staked`.
///
/// `dividend * ACCUMULATOR_PRECISION / total_staked`, floor-rounded.
pub fn reward_per_share(dividend: Amount, total_staked: Amount) -> Option<U256> {
    mul_div_floor(U256::from(dividend), precision(), U256::from(total_staked))
}

/// Entitlement of `principal` over an accumulator delta, floor-rounded.
///
/// `principal * delta / ACCUMULATOR_PRECISION`.
pub fn entitlement(principal: Amount, delta: U256) -> Option<Amount> {
    mul_div_floor(U256::from(principal), delta, precision()).and_then(to_amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::UNIT;
    use proptest::prelude::*;

    #[test]
    fn mul_div_rejects_zero_denominator() {
        assert_eq!(mul_div_floor(U256::one(), U256::one(), U256::zero()), None);
    }

    #[test]
    fn mul_div_rounds_down() {
        let r = mul_div_floor(U256::from(10u64), U256::from(10u64), U256::from(3u64)).unwrap();
        assert_eq!(r, U256::from(33u64));
    }

    #[test]
    fn mul_div_detects_overflow() {
        assert_eq!(mul_div_floor(U256::MAX, U256::from(2u64), U256::one()), None);
    }

    #[test]
    fn to_amount_bounds() {
        assert_eq!(to_amount(U256::from(Amount::MAX)), Some(Amount::MAX));
        assert_eq!(to_amount(U256::from(Amount::MAX) + U256::one()), None);
        assert_eq!(to_amount(U256::zero()), Some(0));
    }

    #[test]
    fn reward_per_share_exact_halving() {
        let rps = reward_per_share(UNIT, 2 * UNIT).unwrap();
        assert_eq!(rps, precision() / U256::from(2u64));
    }

    #[test]
    fn reward_per_share_zero_total_is_none() {
        assert_eq!(reward_per_share(UNIT, 0), None);
    }

    #[test]
    fn entitlement_of_full_share() {
        // One full reward-per-share unit pays exactly the principal.
        assert_eq!(entitlement(7 * UNIT, precision()), Some(7 * UNIT));
    }

    #[test]
    fn thirds_of_a_million_tokens() {
        let stake = 1_000_000 * UNIT;
        let rps = reward_per_share(stake, 3 * stake).unwrap();
        // floor(10^24 / 3)
        assert_eq!(entitlement(stake, rps), Some(333_333_333_333_333_333_333_333));
    }

    proptest! {
        #[test]
        fn entitlement_within_one_unit_of_exact(
            share in 1u128..=1_000_000_000 * UNIT,
            rest in 0u128..=1_000_000_000 * UNIT,
            dividend in 1u128..=1_000_000_000 * UNIT,
        ) {
            let total = share + rest;
            let rps = reward_per_share(dividend, total).unwrap();
            let paid = entitlement(share, rps).unwrap();
            let exact = to_amount(
                mul_div_floor(U256::from(dividend), U256::from(share), U256::from(total)).unwrap(),
            ).unwrap();
            prop_assert!(paid <= exact, "overpaid: {} > {}", paid, exact);
            prop_assert!(exact - paid <= 1, "truncation too large: {} vs {}", paid, exact);
        }
    }
}
