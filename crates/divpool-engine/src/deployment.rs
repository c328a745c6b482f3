//! Bootstrap: build a linked pool and locker pair.
//!
//! The locker is created first and linked to the pool's precomputed address,
//! so from the moment [`Deployment::deploy`] returns the locker accepts
//! withdrawals from that pool only.

use divpool_core::constants::{LOCKER_ADDRESS_LABEL, POOL_ADDRESS_LABEL};
use divpool_core::error::DivpoolError;
use divpool_core::traits::Ledger;
use divpool_core::types::{Address, Amount, CallContext};
use tracing::info;

use crate::config::StakingConfig;
use crate::locker::TimeLocker;
use crate::pool::{StakingPool, Unstaked};

/// A wired pool and its withdrawal locker.
#[derive(Clone, Debug)]
pub struct Deployment {
    pub pool: StakingPool,
    pub locker: TimeLocker,
}

impl Deployment {
    /// Validate `config`, derive both contract addresses from
    /// `(owner, salt)` and link the locker to the pool.
    ///
    /// `owner` becomes owner of both components and the initial admin.
    pub fn deploy(owner: Address, config: &StakingConfig, salt: u64) -> Result<Self, DivpoolError> {
        config.validate()?;

        let pool_address = Address::derive(&owner, POOL_ADDRESS_LABEL, salt);
        let locker_address = Address::derive(&owner, LOCKER_ADDRESS_LABEL, salt);

        let mut locker = TimeLocker::new(locker_address, owner, config.unstake_delay_secs);
        // Linking happens at construction, before any timestamp matters.
        locker.link(&CallContext::new(owner, 0), pool_address)?;
        let pool = StakingPool::new(pool_address, owner, locker_address, config.minimum_stake);

        info!(
            %owner,
            pool = %pool_address,
            locker = %locker_address,
            minimum_stake = config.minimum_stake,
            delay = config.unstake_delay_secs,
            "deployment: pool and locker wired"
        );
        Ok(Self { pool, locker })
    }

    /// Unstake through this deployment's own locker.
    pub fn unstake<L: Ledger + ?Sized>(
        &mut self,
        ledger: &mut L,
        ctx: &CallContext,
    ) -> Result<Unstaked, DivpoolError> {
        Ok(self.pool.unstake(ledger, &mut self.locker, ctx)?)
    }

    /// Release the caller's matured withdrawals.
    pub fn unlock<L: Ledger + ?Sized>(
        &mut self,
        ledger: &mut L,
        ctx: &CallContext,
    ) -> Result<Amount, DivpoolError> {
        Ok(self.locker.unlock(ledger, ctx)?)
    }
}
