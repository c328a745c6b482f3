//! Account addresses, amounts and the per-call execution context.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Amount of the pooled asset, in base units.
pub type Amount = u128;

/// Unix timestamp in seconds.
pub type Timestamp = u64;

/// A 20-byte account address on the ledger.
///
/// Participants, admins and the contract accounts themselves (pool and
/// locker) are all identified by an `Address`.
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default,
)]
pub struct Address(pub [u8; 20]);

impl Address {
    /// The zero address.
    pub const ZERO: Self = Self([0u8; 20]);

    /// Create an address from a byte array.
    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Return the underlying bytes.
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Check if this is the zero address.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }

    /// Derive a contract account address from its deployer and a domain label.
    ///
    /// The address is the first 20 bytes of
    /// `BLAKE3(deployer || label || salt_le)`, so the same deployer can
    /// create several independent deployments by varying `salt`.
    pub fn derive(deployer: &Address, label: &[u8], salt: u64) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&deployer.0);
        hasher.update(label);
        hasher.update(&salt.to_le_bytes());
        let digest = hasher.finalize();
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&digest.as_bytes()[..20]);
        Self(bytes)
    }

    /// Parse a hex address, with or without a `0x` prefix.
    pub fn from_hex(s: &str) -> Option<Self> {
        let raw = s.strip_prefix("0x").unwrap_or(s);
        let decoded = hex::decode(raw).ok()?;
        let bytes: [u8; 20] = decoded.try_into().ok()?;
        Some(Self(bytes))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Caller identity and clock reading for a single operation.
///
/// Supplied by the execution environment on every mutating call. The engine
/// never reads a clock of its own; maturity checks compare against
/// `timestamp`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CallContext {
    /// Account invoking the operation.
    pub sender: Address,
    /// Environment time at the moment of the call.
    pub timestamp: Timestamp,
}

impl CallContext {
    pub fn new(sender: Address, timestamp: Timestamp) -> Self {
        Self { sender, timestamp }
    }

    /// The same moment in time, invoked by a different account.
    pub fn forwarded_by(&self, sender: Address) -> Self {
        Self {
            sender,
            timestamp: self.timestamp,
        }
    }
}
