//! Registry of accounts allowed to post dividends.

use std::collections::BTreeSet;

use divpool_core::error::StakingError;
use divpool_core::types::Address;
use tracing::{info, warn};

/// Owner-controlled set of dividend posters.
///
/// The owner is always an admin and cannot be removed. Only the owner may
/// grant or revoke admin rights.
#[derive(Clone, Debug)]
pub struct AdminRegistry {
    owner: Address,
    admins: BTreeSet<Address>,
}

impl AdminRegistry {
    pub fn new(owner: Address) -> Self {
        Self {
            owner,
            admins: BTreeSet::new(),
        }
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    /// Whether `account` may post dividends.
    pub fn is_admin(&self, account: &Address) -> bool {
        *account == self.owner || self.admins.contains(account)
    }

    /// Explicitly granted admins, in address order. The owner is not listed.
    pub fn admins(&self) -> impl Iterator<Item = &Address> {
        self.admins.iter()
    }

    /// Grant admin rights. Returns `false` if `account` already had them.
    pub fn add(&mut self, caller: &Address, account: Address) -> Result<bool, StakingError> {
        self.ensure_owner(caller)?;
        if account == self.owner {
            return Ok(false);
        }
        let added = self.admins.insert(account);
        info!(%account, added, "admin: granted");
        Ok(added)
    }

    /// Revoke admin rights. Returns `false` if `account` was not an admin.
    pub fn remove(&mut self, caller: &Address, account: &Address) -> Result<bool, StakingError> {
        self.ensure_owner(caller)?;
        if *account == self.owner {
            return Err(StakingError::OwnerNotRemovable);
        }
        let removed = self.admins.remove(account);
        info!(%account, removed, "admin: revoked");
        Ok(removed)
    }

    fn ensure_owner(&self, caller: &Address) -> Result<(), StakingError> {
        if *caller != self.owner {
            warn!(%caller, "admin: rejected call from non-owner");
            return Err(StakingError::NotOwner(*caller));
        }
        Ok(())
    }
}
