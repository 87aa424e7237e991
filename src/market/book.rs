// Append-only bet ledger with running aggregates.
//
// Bets are recorded in global insertion order and never mutated or deleted.
// Per-outcome totals and the overall pool are maintained on every append, so
// sum(total_for(o)) == total_pool() holds in every reachable state.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::{Bet, OutcomeSet};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BetBook {
    bets: Vec<Bet>,
    /// outcome label -> total staked on it; keys are exactly the outcome set
    totals: HashMap<String, u128>,
    total_pool: u128,
}

impl BetBook {
    pub fn new(outcomes: &OutcomeSet) -> Self {
        let totals = outcomes
            .labels()
            .iter()
            .map(|label| (label.clone(), 0))
            .collect();
        Self {
            bets: Vec::new(),
            totals,
            total_pool: 0,
        }
    }

    /// Append a validated bet. Caller guarantees amount > 0 and a known outcome.
    pub fn append(&mut self, account: &str, outcome: &str, amount: u128, placed_at: u64) -> Bet {
        let seq = self.bets.len() as u64;
        let bet = Bet::new(account, outcome, amount, seq, placed_at);
        *self.totals.entry(outcome.to_string()).or_insert(0) += amount;
        self.total_pool += amount;
        self.bets.push(bet.clone());
        bet
    }

    /// All of a participant's bets in insertion order; empty if none.
    pub fn get_bets(&self, account: &str) -> Vec<&Bet> {
        self.bets.iter().filter(|b| b.account == account).collect()
    }

    pub fn bet_count(&self) -> usize {
        self.bets.len()
    }

    pub fn total_pool(&self) -> u128 {
        self.total_pool
    }

    pub fn total_for(&self, outcome: &str) -> u128 {
        self.totals.get(outcome).copied().unwrap_or(0)
    }

    /// Sum of one participant's stakes on one outcome.
    pub fn stake_of(&self, account: &str, outcome: &str) -> u128 {
        self.bets
            .iter()
            .filter(|b| b.account == account && b.outcome == outcome)
            .map(|b| b.amount)
            .sum()
    }

    /// Per-outcome stake totals for one participant.
    pub fn account_stakes(&self, account: &str) -> HashMap<String, u128> {
        let mut stakes: HashMap<String, u128> =
            self.totals.keys().map(|label| (label.clone(), 0)).collect();
        for bet in self.bets.iter().filter(|b| b.account == account) {
            *stakes.entry(bet.outcome.clone()).or_insert(0) += bet.amount;
        }
        stakes
    }

    /// Accounts that placed at least one bet, in first-bet order.
    pub fn accounts(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for bet in &self.bets {
            if !seen.contains(&bet.account.as_str()) {
                seen.push(bet.account.as_str());
            }
        }
        seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OutcomeSet;

    fn book() -> BetBook {
        BetBook::new(&OutcomeSet::versus("team1", "team2").unwrap())
    }

    #[test]
    fn test_totals_track_every_append() {
        let mut book = book();
        book.append("p1", "team1", 2_000, 10);
        book.append("p1", "team2", 3_000, 11);
        book.append("p2", "team2", 10_000, 12);

        assert_eq!(book.total_pool(), 15_000);
        assert_eq!(book.total_for("team1"), 2_000);
        assert_eq!(book.total_for("team2"), 13_000);
        assert_eq!(book.total_for("team1") + book.total_for("team2"), book.total_pool());
    }

    #[test]
    fn test_get_bets_insertion_order() {
        let mut book = book();
        book.append("p1", "team1", 2_000, 10);
        book.append("p2", "team2", 10_000, 11);
        book.append("p1", "team2", 3_000, 12);
        book.append("p1", "team1", 3_000, 13);

        let bets = book.get_bets("p1");
        assert_eq!(bets.len(), 3);
        assert_eq!(bets[0].seq, 0);
        assert_eq!(bets[1].seq, 2);
        assert_eq!(bets[2].seq, 3);
        assert_eq!(bets[0].outcome, "team1");
        assert_eq!(bets[1].outcome, "team2");

        assert!(book.get_bets("nobody").is_empty());
    }

    #[test]
    fn test_stake_of_sums_per_outcome() {
        let mut book = book();
        book.append("p1", "team1", 2_000, 10);
        book.append("p1", "team2", 3_000, 11);
        book.append("p1", "team1", 3_000, 12);

        assert_eq!(book.stake_of("p1", "team1"), 5_000);
        assert_eq!(book.stake_of("p1", "team2"), 3_000);
        assert_eq!(book.stake_of("p2", "team1"), 0);

        let stakes = book.account_stakes("p1");
        assert_eq!(stakes["team1"], 5_000);
        assert_eq!(stakes["team2"], 3_000);
    }

    #[test]
    fn test_accounts_first_bet_order() {
        let mut book = book();
        book.append("p2", "team2", 1_000, 10);
        book.append("p1", "team1", 1_000, 11);
        book.append("p2", "team1", 1_000, 12);
        assert_eq!(book.accounts(), vec!["p2", "p1"]);
    }
}
