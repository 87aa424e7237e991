// Outcome resolvers - the single-write register of the true outcome.
//
// A market treats its resolver as an opaque capability: it holds the outcome
// set and accepts exactly one write of the winning label. Two interchangeable
// shapes exist. `AdminResolver` is the resolution-folded-into-the-market
// variant; `OracleResolver` is a separate addressable component a market can
// be constructed with. Market logic never depends on which one it holds.

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::error::MarketError;
use crate::models::OutcomeSet;

pub trait OutcomeResolver: std::fmt::Debug {
    /// The outcome set this resolver reports over. Must match the market's.
    fn outcomes(&self) -> &OutcomeSet;

    /// Run every precondition of `set_winner` without writing anything.
    ///
    /// Fails Authorization for a non-authority caller, Validation for an
    /// empty or unknown label, State if a winner was already set. A caller
    /// that needs to interleave other fallible work between the checks and
    /// the write (the market does, for the fee sweep) calls this first;
    /// `set_winner` with the same arguments then cannot fail.
    fn check_winner(&self, caller: &str, outcome: &str) -> Result<(), MarketError>;

    /// Record the true outcome. Exactly one successful call per resolver;
    /// the stored label never changes afterwards. Same failure modes as
    /// `check_winner`.
    fn set_winner(&mut self, caller: &str, outcome: &str) -> Result<(), MarketError>;

    /// The recorded outcome, absent before resolution. Pure.
    fn get_winner(&self) -> Option<&str>;

    fn has_winner(&self) -> bool {
        self.get_winner().is_some()
    }
}

fn check_write(
    authority: &str,
    outcomes: &OutcomeSet,
    winner: &Option<String>,
    caller: &str,
    outcome: &str,
) -> Result<(), MarketError> {
    if caller != authority {
        return Err(MarketError::Unauthorized(caller.to_string()));
    }
    outcomes.check_member(outcome)?;
    if winner.is_some() {
        return Err(MarketError::AlreadyResolved(
            "winner can only be set once".to_string(),
        ));
    }
    Ok(())
}

/// Embedded resolver: the market admin reports the outcome directly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdminResolver {
    authority: String,
    outcomes: OutcomeSet,
    winner: Option<String>,
}

impl AdminResolver {
    pub fn new(authority: &str, outcomes: OutcomeSet) -> Self {
        Self {
            authority: authority.to_string(),
            outcomes,
            winner: None,
        }
    }

    pub fn authority(&self) -> &str {
        &self.authority
    }
}

impl OutcomeResolver for AdminResolver {
    fn outcomes(&self) -> &OutcomeSet {
        &self.outcomes
    }

    fn check_winner(&self, caller: &str, outcome: &str) -> Result<(), MarketError> {
        check_write(&self.authority, &self.outcomes, &self.winner, caller, outcome)
    }

    fn set_winner(&mut self, caller: &str, outcome: &str) -> Result<(), MarketError> {
        self.check_winner(caller, outcome)?;
        self.winner = Some(outcome.to_string());
        info!(caller, outcome, "winner set by admin");
        Ok(())
    }

    fn get_winner(&self) -> Option<&str> {
        self.winner.as_deref()
    }
}

/// Standalone resolver component with its own identity, reporting for one
/// event. A market built with `Market::with_resolver` must carry the same
/// outcome set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OracleResolver {
    pub id: String,
    pub label: String,
    authority: String,
    outcomes: OutcomeSet,
    winner: Option<String>,
}

impl OracleResolver {
    pub fn new(label: &str, authority: &str, outcomes: OutcomeSet) -> Self {
        Self {
            id: format!("resolver_{}", Uuid::new_v4().simple()),
            label: label.to_string(),
            authority: authority.to_string(),
            outcomes,
            winner: None,
        }
    }

    pub fn authority(&self) -> &str {
        &self.authority
    }
}

impl OutcomeResolver for OracleResolver {
    fn outcomes(&self) -> &OutcomeSet {
        &self.outcomes
    }

    fn check_winner(&self, caller: &str, outcome: &str) -> Result<(), MarketError> {
        check_write(&self.authority, &self.outcomes, &self.winner, caller, outcome)
    }

    fn set_winner(&mut self, caller: &str, outcome: &str) -> Result<(), MarketError> {
        self.check_winner(caller, outcome)?;
        self.winner = Some(outcome.to_string());
        info!(resolver = %self.id, caller, outcome, "winner reported");
        Ok(())
    }

    fn get_winner(&self) -> Option<&str> {
        self.winner.as_deref()
    }
}
