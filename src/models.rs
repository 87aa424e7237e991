// Data models for the parimutuel settlement engine

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::MarketError;

/// Market lifecycle status. `Settled` is terminal; there is no way back to `Open`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum MarketStatus {
    #[serde(rename = "open")]
    Open,
    #[serde(rename = "settled")]
    Settled,
}

impl MarketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarketStatus::Open => "open",
            MarketStatus::Settled => "settled",
        }
    }
}

/// The fixed set of outcome labels for one market.
///
/// Two or three labels (two competing sides, optionally a draw), all non-empty
/// and pairwise distinct. Immutable after construction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutcomeSet {
    labels: Vec<String>,
}

impl OutcomeSet {
    pub fn new(labels: Vec<String>) -> Result<Self, MarketError> {
        if labels.len() < 2 {
            return Err(MarketError::TooFewOutcomes(labels.len()));
        }
        if labels.len() > 3 {
            return Err(MarketError::TooManyOutcomes(labels.len()));
        }
        for (i, label) in labels.iter().enumerate() {
            if label.is_empty() {
                return Err(MarketError::EmptyOutcome(format!("label at index {}", i)));
            }
            if labels[..i].contains(label) {
                return Err(MarketError::DuplicateOutcome(label.clone()));
            }
        }
        Ok(Self { labels })
    }

    /// Two competing sides, no draw.
    pub fn versus(side_a: &str, side_b: &str) -> Result<Self, MarketError> {
        Self::new(vec![side_a.to_string(), side_b.to_string()])
    }

    /// Two competing sides plus a draw outcome.
    pub fn versus_with_draw(side_a: &str, side_b: &str, draw: &str) -> Result<Self, MarketError> {
        Self::new(vec![side_a.to_string(), side_b.to_string(), draw.to_string()])
    }

    pub fn contains(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Validates a candidate winning outcome against this set.
    pub fn check_member(&self, label: &str) -> Result<(), MarketError> {
        if label.is_empty() {
            return Err(MarketError::EmptyOutcome("winning outcome".to_string()));
        }
        if !self.contains(label) {
            return Err(MarketError::UnknownOutcome(label.to_string()));
        }
        Ok(())
    }
}

/// Static configuration for one market instance, supplied at instantiation by
/// the external factory. Never mutated by the engine except the cutoff, which
/// the admin may move while the market is open.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MarketConfig {
    /// Unique market identifier
    pub id: String,
    /// Human-readable label, e.g. "League of Legends - EU LCS - FNC vs G2"
    pub label: String,
    /// Asset denomination all amounts are expressed in
    pub denom: String,
    /// Fee withheld from the gross pool before distribution, in basis points
    pub fee_bps: u64,
    /// Authority for resolution and admin operations
    pub admin_addr: String,
    /// Account the fee is swept to at resolution
    pub treasury_addr: String,
    /// Bets are accepted strictly before this unix timestamp, if set
    pub betting_closes_at: Option<u64>,
    /// Escrow account holding the pooled stakes
    pub escrow_addr: String,
}

impl MarketConfig {
    pub fn new(
        id: &str,
        label: &str,
        denom: &str,
        fee_bps: u64,
        admin_addr: &str,
        treasury_addr: &str,
        betting_closes_at: Option<u64>,
    ) -> Result<Self, MarketError> {
        if fee_bps > 10_000 {
            return Err(MarketError::InvalidFee(fee_bps));
        }
        Ok(Self {
            id: id.to_string(),
            label: label.to_string(),
            denom: denom.to_string(),
            fee_bps,
            admin_addr: admin_addr.to_string(),
            treasury_addr: treasury_addr.to_string(),
            betting_closes_at,
            escrow_addr: format!("escrow_{}", Uuid::new_v4().simple()),
        })
    }
}

/// A single accepted bet. Append-only: never mutated or deleted once recorded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Bet {
    /// Unique bet ID
    pub id: String,
    /// Account that placed the bet
    pub account: String,
    /// Chosen outcome label
    pub outcome: String,
    /// Amount staked, in base units of the market denom
    pub amount: u128,
    /// Global insertion order; stable per participant
    pub seq: u64,
    /// Host-supplied timestamp at acceptance
    pub placed_at: u64,
}

impl Bet {
    pub fn new(account: &str, outcome: &str, amount: u128, seq: u64, placed_at: u64) -> Self {
        Self {
            id: format!("bet_{}", Uuid::new_v4().simple()),
            account: account.to_string(),
            outcome: outcome.to_string(),
            amount,
            seq,
            placed_at,
        }
    }
}

/// One-time payout record for a participant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClaimRecord {
    pub account: String,
    pub claimed: bool,
    /// Amount paid out of escrow, recorded once claimed
    pub paid: u128,
}

/// Read-only view of a market's aggregate state for host-level reporting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub id: String,
    pub label: String,
    pub denom: String,
    pub fee_bps: u64,
    pub status: MarketStatus,
    pub outcomes: Vec<String>,
    pub winner: Option<String>,
    pub total_pool: u128,
    /// Per-outcome totals, in the order of `outcomes`
    pub outcome_totals: Vec<u128>,
    pub bet_count: usize,
    pub betting_closes_at: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_outcome_set_accepts_two_and_three_sides() {
        let set = OutcomeSet::versus("FNC", "G2").unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.contains("FNC"));
        assert!(!set.contains("TSM"));

        let set = OutcomeSet::versus_with_draw("home", "away", "draw").unwrap();
        assert_eq!(set.len(), 3);
        assert!(set.contains("draw"));
    }

    #[test]
    fn test_outcome_set_rejects_bad_shapes() {
        assert!(matches!(
            OutcomeSet::new(vec!["only".to_string()]),
            Err(MarketError::TooFewOutcomes(1))
        ));
        assert!(matches!(
            OutcomeSet::new(vec![
                "a".to_string(),
                "b".to_string(),
                "c".to_string(),
                "d".to_string()
            ]),
            Err(MarketError::TooManyOutcomes(4))
        ));
        assert!(matches!(
            OutcomeSet::versus("FNC", ""),
            Err(MarketError::EmptyOutcome(_))
        ));
        assert!(matches!(
            OutcomeSet::versus("FNC", "FNC"),
            Err(MarketError::DuplicateOutcome(_))
        ));
    }

    #[test]
    fn test_check_member() {
        let set = OutcomeSet::versus("team1", "team2").unwrap();
        assert!(set.check_member("team1").is_ok());
        assert_eq!(
            set.check_member("").unwrap_err().kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            set.check_member("team3").unwrap_err().kind(),
            ErrorKind::Validation
        );
    }

    #[test]
    fn test_config_rejects_fee_above_ten_thousand_bps() {
        let err = MarketConfig::new("m1", "label", "chip", 10_001, "admin", "treasury", None)
            .unwrap_err();
        assert_eq!(err, MarketError::InvalidFee(10_001));

        let config =
            MarketConfig::new("m1", "label", "chip", 250, "admin", "treasury", None).unwrap();
        assert!(config.escrow_addr.starts_with("escrow_"));
    }
}
