// Parimutuel market state machine.
//
// Orchestrates the bet book, the resolver and the claim tracker behind two
// states: Open (bets accepted) and Settled (terminal, rewards claimable).
// The host drives one state-changing call at a time; every operation is
// all-or-nothing, so a failed call leaves the market exactly as it was.

pub mod book;
pub mod claims;
pub mod settlement;

use std::collections::HashMap;

use tracing::info;

use crate::error::MarketError;
use crate::ledger::AssetTransfer;
use crate::models::{Bet, ClaimRecord, MarketConfig, MarketSnapshot, MarketStatus, OutcomeSet};
use crate::resolver::{AdminResolver, OutcomeResolver};

use book::BetBook;
use claims::ClaimTracker;

#[derive(Debug)]
pub struct Market {
    config: MarketConfig,
    outcomes: OutcomeSet,
    status: MarketStatus,
    /// Fixed forever once the market settles
    winner: Option<String>,
    book: BetBook,
    claims: ClaimTracker,
    resolver: Box<dyn OutcomeResolver>,
}

impl Market {
    /// Open a market with resolution folded in: the config's admin is the
    /// resolver authority.
    pub fn open(config: MarketConfig, outcomes: OutcomeSet) -> Self {
        let resolver = AdminResolver::new(&config.admin_addr, outcomes.clone());
        info!(market = %config.id, label = %config.label, "market opened");
        Self {
            book: BetBook::new(&outcomes),
            claims: ClaimTracker::new(),
            resolver: Box::new(resolver),
            status: MarketStatus::Open,
            winner: None,
            config,
            outcomes,
        }
    }

    /// Open a market bound to a separately-held resolver component. The
    /// resolver must report over exactly this market's outcome set and must
    /// not have a winner yet.
    pub fn with_resolver(
        config: MarketConfig,
        outcomes: OutcomeSet,
        resolver: Box<dyn OutcomeResolver>,
    ) -> Result<Self, MarketError> {
        if resolver.outcomes() != &outcomes {
            return Err(MarketError::ResolverMismatch(format!(
                "market {:?} vs resolver {:?}",
                outcomes.labels(),
                resolver.outcomes().labels()
            )));
        }
        if resolver.has_winner() {
            return Err(MarketError::AlreadyResolved(
                "resolver already holds a winner".to_string(),
            ));
        }
        info!(market = %config.id, label = %config.label, "market opened with external resolver");
        Ok(Self {
            book: BetBook::new(&outcomes),
            claims: ClaimTracker::new(),
            resolver,
            status: MarketStatus::Open,
            winner: None,
            config,
            outcomes,
        })
    }

    // === BETTING ===

    /// Accept a stake on one outcome. Debits the caller and credits the
    /// market escrow through the asset-transfer capability, then records the
    /// bet; either both happen or neither.
    ///
    /// `now` is the host-supplied timestamp, compared against the optional
    /// betting cutoff.
    pub fn place_bet(
        &mut self,
        caller: &str,
        amount: u128,
        outcome: &str,
        now: u64,
        assets: &mut dyn AssetTransfer,
    ) -> Result<Bet, MarketError> {
        if self.status != MarketStatus::Open {
            return Err(MarketError::MarketSettled(self.config.id.clone()));
        }
        if let Some(cutoff) = self.config.betting_closes_at {
            // bets are accepted strictly before the cutoff
            if now >= cutoff {
                return Err(MarketError::BettingClosed(format!(
                    "cutoff {} reached at {}",
                    cutoff, now
                )));
            }
        }
        if amount == 0 {
            return Err(MarketError::InvalidAmount(
                "bet amount must be positive".to_string(),
            ));
        }
        self.outcomes.check_member(outcome)?;

        assets.transfer(caller, &self.config.escrow_addr, amount)?;
        let bet = self.book.append(caller, outcome, amount, now);

        info!(
            market = %self.config.id,
            caller,
            amount,
            outcome,
            total_pool = self.book.total_pool(),
            "bet accepted"
        );
        Ok(bet)
    }

    // === RESOLUTION ===

    /// Report the true outcome and settle the market. Delegates the
    /// authorization, validation and write-once checks to the resolver, then
    /// sweeps the fee from escrow to the treasury and transitions
    /// Open -> Settled.
    ///
    /// All fallible steps run before any write: a rejected fee sweep leaves
    /// the market fully Open and resolvable again later.
    pub fn resolve(
        &mut self,
        caller: &str,
        outcome: &str,
        assets: &mut dyn AssetTransfer,
    ) -> Result<(), MarketError> {
        if self.status != MarketStatus::Open {
            return Err(MarketError::MarketSettled(self.config.id.clone()));
        }
        self.resolver.check_winner(caller, outcome)?;

        let fee = settlement::fee_amount(self.book.total_pool(), self.config.fee_bps);
        if fee > 0 {
            assets.transfer(&self.config.escrow_addr, &self.config.treasury_addr, fee)?;
        }

        // cannot fail after check_winner above
        self.resolver.set_winner(caller, outcome)?;
        self.status = MarketStatus::Settled;
        self.winner = Some(outcome.to_string());
        info!(
            market = %self.config.id,
            winner = outcome,
            fee_collected = fee,
            total_pool = self.book.total_pool(),
            "market settled"
        );
        Ok(())
    }

    /// Move the betting cutoff while the market is still open. Admin only.
    pub fn update_cutoff(
        &mut self,
        caller: &str,
        betting_closes_at: Option<u64>,
    ) -> Result<(), MarketError> {
        if caller != self.config.admin_addr {
            return Err(MarketError::Unauthorized(caller.to_string()));
        }
        if self.status != MarketStatus::Open {
            return Err(MarketError::MarketSettled(self.config.id.clone()));
        }
        self.config.betting_closes_at = betting_closes_at;
        info!(market = %self.config.id, ?betting_closes_at, "betting cutoff updated");
        Ok(())
    }

    // === SETTLEMENT / CLAIMS ===

    /// The caller's share of the net pool for the resolved outcome. Only
    /// valid once settled.
    pub fn get_rewards(&self, account: &str) -> Result<u128, MarketError> {
        match &self.winner {
            Some(winner) => Ok(self.reward_on(account, winner)),
            None => Err(MarketError::NotSettled(self.config.id.clone())),
        }
    }

    /// Forecast of the caller's reward were `outcome` to win, against the
    /// current book. Valid at any time; the value moves as bets arrive.
    pub fn get_potential_rewards(
        &self,
        account: &str,
        outcome: &str,
    ) -> Result<u128, MarketError> {
        self.outcomes.check_member(outcome)?;
        Ok(self.reward_on(account, outcome))
    }

    /// Pay out the caller's reward from escrow, exactly once per participant.
    pub fn claim_rewards(
        &mut self,
        caller: &str,
        assets: &mut dyn AssetTransfer,
    ) -> Result<u128, MarketError> {
        let winner = match &self.winner {
            Some(winner) => winner.clone(),
            None => return Err(MarketError::NotSettled(self.config.id.clone())),
        };
        if self.claims.has_claimed(caller) {
            return Err(MarketError::AlreadyClaimed(caller.to_string()));
        }
        let payout = self.reward_on(caller, &winner);
        if payout == 0 {
            return Err(MarketError::NothingToClaim(caller.to_string()));
        }

        assets.transfer(&self.config.escrow_addr, caller, payout)?;
        self.claims.record(caller, payout)?;

        info!(market = %self.config.id, caller, payout, "rewards claimed");
        Ok(payout)
    }

    /// False for participants that never claimed.
    pub fn has_claimed(&self, account: &str) -> bool {
        self.claims.has_claimed(account)
    }

    pub fn claim_record(&self, account: &str) -> Option<&ClaimRecord> {
        self.claims.get(account)
    }

    fn reward_on(&self, account: &str, outcome: &str) -> u128 {
        let stake = self.book.stake_of(account, outcome);
        let total_on_winner = self.book.total_for(outcome);
        let net = settlement::net_pool(self.book.total_pool(), self.config.fee_bps);
        settlement::reward(stake, total_on_winner, net)
    }

    // === QUERIES ===

    pub fn status(&self) -> MarketStatus {
        self.status
    }

    pub fn winner(&self) -> Option<&str> {
        self.winner.as_deref()
    }

    pub fn config(&self) -> &MarketConfig {
        &self.config
    }

    pub fn outcomes(&self) -> &OutcomeSet {
        &self.outcomes
    }

    pub fn get_bets(&self, account: &str) -> Vec<&Bet> {
        self.book.get_bets(account)
    }

    pub fn total_pool(&self) -> u128 {
        self.book.total_pool()
    }

    pub fn total_for(&self, outcome: &str) -> u128 {
        self.book.total_for(outcome)
    }

    pub fn stake_of(&self, account: &str, outcome: &str) -> u128 {
        self.book.stake_of(account, outcome)
    }

    pub fn account_stakes(&self, account: &str) -> HashMap<String, u128> {
        self.book.account_stakes(account)
    }

    pub fn snapshot(&self) -> MarketSnapshot {
        MarketSnapshot {
            id: self.config.id.clone(),
            label: self.config.label.clone(),
            denom: self.config.denom.clone(),
            fee_bps: self.config.fee_bps,
            status: self.status,
            outcomes: self.outcomes.labels().to_vec(),
            winner: self.winner.clone(),
            total_pool: self.book.total_pool(),
            outcome_totals: self
                .outcomes
                .labels()
                .iter()
                .map(|label| self.book.total_for(label))
                .collect(),
            bet_count: self.book.bet_count(),
            betting_closes_at: self.config.betting_closes_at,
        }
    }
}
