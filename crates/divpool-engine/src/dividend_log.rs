//! Append-only audit trail of dividend postings.
//!
//! Consecutive postings with no change to the staked total in between are
//! merged into one record. The log is observational only: payouts are
//! computed from the reward accumulator, never from these records.

use divpool_core::types::{Amount, Timestamp};
use serde::{Deserialize, Serialize};

/// One distribution event (or a run of merged postings).
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct DividendRecord {
    /// Funds injected, summed across merged postings.
    pub amount: Amount,
    /// Total staked when the record was opened.
    pub stake_baseline: Amount,
    /// Timestamp of the first posting folded into this record.
    pub posted_at: Timestamp,
}

/// How a posting was recorded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Posting {
    /// Opened a new record at this index.
    Appended(usize),
    /// Summed into the existing record at this index.
    Merged(usize),
}

#[derive(Clone, Debug, Default)]
pub struct DividendLog {
    records: Vec<DividendRecord>,
    /// Set whenever the staked total changes; cleared by the next posting.
    stake_changed: bool,
}

impl DividendLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Note that the staked total changed, so the next posting opens a new record.
    pub fn mark_stake_changed(&mut self) {
        self.stake_changed = true;
    }

    /// Record a posting of `amount` against `total_staked`.
    ///
    /// Merged amounts saturate; every posted unit passed through the ledger,
    /// so a real sum never exceeds the asset's supply.
    pub fn record(&mut self, amount: Amount, total_staked: Amount, now: Timestamp) -> Posting {
        if !self.stake_changed {
            if let Some(last) = self.records.last_mut() {
                last.amount = last.amount.saturating_add(amount);
                return Posting::Merged(self.records.len() - 1);
            }
        }
        self.records.push(DividendRecord {
            amount,
            stake_baseline: total_staked,
            posted_at: now,
        });
        self.stake_changed = false;
        Posting::Appended(self.records.len() - 1)
    }

    /// Whether the next posting would merge into the latest record.
    pub fn would_merge(&self) -> bool {
        !self.stake_changed && !self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&DividendRecord> {
        self.records.get(index)
    }

    pub fn latest(&self) -> Option<&DividendRecord> {
        self.records.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DividendRecord> {
        self.records.iter()
    }

    /// Sum of every dividend ever posted.
    pub fn total_distributed(&self) -> Amount {
        self.records
            .iter()
            .fold(0, |acc: Amount, r| acc.saturating_add(r.amount))
    }
}
