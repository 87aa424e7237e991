// One-time claim gate per participant.
//
// Records are created lazily on the first successful claim and never deleted;
// the claimed flag goes false -> true exactly once per participant.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::MarketError;
use crate::models::ClaimRecord;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClaimTracker {
    records: HashMap<String, ClaimRecord>,
}

impl ClaimTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// False for unknown participants.
    pub fn has_claimed(&self, account: &str) -> bool {
        self.records.get(account).map(|r| r.claimed).unwrap_or(false)
    }

    pub fn get(&self, account: &str) -> Option<&ClaimRecord> {
        self.records.get(account)
    }

    /// Mark a payout as made. Fails State("already claimed") on a second call
    /// for the same participant and records nothing.
    pub fn record(&mut self, account: &str, paid: u128) -> Result<(), MarketError> {
        if self.has_claimed(account) {
            return Err(MarketError::AlreadyClaimed(account.to_string()));
        }
        self.records.insert(
            account.to_string(),
            ClaimRecord {
                account: account.to_string(),
                claimed: true,
                paid,
            },
        );
        Ok(())
    }

    /// Total paid out so far across all participants.
    pub fn total_paid(&self) -> u128 {
        self.records.values().map(|r| r.paid).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_participant_defaults_false() {
        let tracker = ClaimTracker::new();
        assert!(!tracker.has_claimed("p1"));
        assert!(tracker.get("p1").is_none());
    }

    #[test]
    fn test_record_once() {
        let mut tracker = ClaimTracker::new();
        tracker.record("p1", 13_125).unwrap();
        assert!(tracker.has_claimed("p1"));
        assert_eq!(tracker.get("p1").unwrap().paid, 13_125);

        let err = tracker.record("p1", 99).unwrap_err();
        assert_eq!(err, MarketError::AlreadyClaimed("p1".to_string()));
        // first record untouched
        assert_eq!(tracker.get("p1").unwrap().paid, 13_125);
        assert_eq!(tracker.total_paid(), 13_125);
    }
}
