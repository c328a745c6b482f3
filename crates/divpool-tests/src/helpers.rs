//! Shared test helpers for scenario and property tests.

use divpool_core::constants::UNIT;
use divpool_core::error::{DivpoolError, StakingError};
use divpool_core::ledger::MemoryLedger;
use divpool_core::traits::{Ledger, WithdrawalQueue};
use divpool_core::types::{Address, Amount, CallContext, Timestamp};
use divpool_engine::{Deployment, Posting, StakingConfig};

/// Starting clock for every harness.
pub const GENESIS_TIME: Timestamp = 1_700_000_000;

/// One million whole tokens.
pub const STAKE: Amount = 1_000_000 * UNIT;

/// Balance minted to each test user.
pub const USER_FUNDS: Amount = 10_000_000 * UNIT;

/// Balance minted to the owner for posting dividends.
pub const OWNER_FUNDS: Amount = 1_000_000_000 * UNIT;

/// Deterministic address from a seed byte.
pub fn addr(seed: u8) -> Address {
    Address([seed; 20])
}

pub fn owner() -> Address {
    addr(0xAA)
}

/// Install a `RUST_LOG` driven subscriber writing through the test harness.
///
/// Safe to call from every test; only the first call installs.
pub fn init_tracing() {
    use tracing_subscriber::filter::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_test_writer())
        .try_init();
}

/// A deployed pool and locker over a funded in-memory ledger, with a clock.
pub struct Harness {
    pub ledger: MemoryLedger,
    pub deployment: Deployment,
    pub now: Timestamp,
}

impl Harness {
    /// Deploy with the default config. The owner and users `1..=4` are funded.
    pub fn new() -> Self {
        Self::with_config(&StakingConfig::default())
    }

    pub fn with_config(config: &StakingConfig) -> Self {
        init_tracing();
        let deployment = Deployment::deploy(owner(), config, 0).unwrap();
        let mut h = Self {
            ledger: MemoryLedger::new(),
            deployment,
            now: GENESIS_TIME,
        };
        h.fund(owner(), OWNER_FUNDS).unwrap();
        for seed in 1..=4 {
            h.fund(addr(seed), USER_FUNDS).unwrap();
        }
        h
    }

    /// Mint `amount` to `who`.
    pub fn fund(&mut self, who: Address, amount: Amount) -> Result<(), DivpoolError> {
        self.ledger.mint(&who, amount)?;
        Ok(())
    }

    pub fn ctx(&self, sender: Address) -> CallContext {
        CallContext::new(sender, self.now)
    }

    pub fn pool_address(&self) -> Address {
        self.deployment.pool.address()
    }

    pub fn locker_address(&self) -> Address {
        self.deployment.locker.address()
    }

    pub fn balance(&self, account: &Address) -> Amount {
        self.ledger.balance_of(account)
    }

    pub fn pool_balance(&self) -> Amount {
        self.balance(&self.pool_address())
    }

    pub fn locker_balance(&self) -> Amount {
        self.balance(&self.locker_address())
    }

    pub fn advance(&mut self, secs: u64) {
        self.now += secs;
    }

    pub fn approve(&mut self, who: Address, amount: Amount) {
        let pool = self.pool_address();
        self.ledger.approve(&who, &pool, amount).unwrap();
    }

    /// Approve exactly `amount` and stake it.
    pub fn stake(&mut self, who: Address, amount: Amount) -> Result<Amount, StakingError> {
        self.approve(who, amount);
        let ctx = self.ctx(who);
        self.deployment.pool.stake(&mut self.ledger, &ctx, amount)
    }

    /// Stake and check the new principal grew by `amount` with no gains left pending.
    pub fn assert_stake(&mut self, who: Address, amount: Amount) {
        let before = self.deployment.pool.get_stake(&who);
        let pending = self.deployment.pool.unrealized_gains(&who).unwrap_or(0);
        let principal = self.stake(who, amount).unwrap();
        assert_eq!(principal, before + pending + amount, "stake does not match input");
        assert_eq!(self.deployment.pool.unrealized_gains(&who).unwrap(), 0);
    }

    /// Approve exactly `amount` and post it as a dividend.
    pub fn post_dividend(&mut self, who: Address, amount: Amount) -> Result<Posting, StakingError> {
        self.approve(who, amount);
        let ctx = self.ctx(who);
        self.deployment.pool.post_dividend(&mut self.ledger, &ctx, amount)
    }

    pub fn withdraw(&mut self, who: Address) -> Result<Amount, StakingError> {
        let ctx = self.ctx(who);
        self.deployment.pool.withdraw_dividends(&mut self.ledger, &ctx)
    }

    pub fn reinvest(&mut self, who: Address) -> Result<Amount, StakingError> {
        let ctx = self.ctx(who);
        self.deployment.pool.reinvest(&ctx)
    }

    pub fn unstake(&mut self, who: Address) -> Result<Amount, DivpoolError> {
        let ctx = self.ctx(who);
        Ok(self.deployment.unstake(&mut self.ledger, &ctx)?.payout)
    }

    pub fn unlock(&mut self, who: Address) -> Result<Amount, DivpoolError> {
        let ctx = self.ctx(who);
        self.deployment.unlock(&mut self.ledger, &ctx)
    }

    /// Unstake, wait out the delay plus a day, unlock, and return what
    /// reached the caller's wallet.
    ///
    /// Checks the locker received exactly the payout and released it all.
    pub fn unstake_and_unlock(&mut self, who: Address) -> Amount {
        let wallet_before = self.balance(&who);
        let locker_before = self.locker_balance();

        let payout = self.unstake(who).unwrap();
        assert_eq!(self.locker_balance(), locker_before + payout, "locker balance");

        self.advance(self.deployment.locker.delay() + divpool_core::constants::DAY_SECS);
        let released = self.unlock(who).unwrap();
        assert_eq!(released, payout, "released differs from payout");

        let received = self.balance(&who) - wallet_before;
        assert_eq!(received, payout);
        received
    }

    /// The locker accepts deposits from this harness's pool only.
    pub fn is_wired(&self) -> bool {
        self.deployment.locker.linked_pool() == Some(self.pool_address())
            && self.deployment.pool.locker() == self.locker_address()
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}
