// Error types for the parimutuel settlement engine

use serde::{Deserialize, Serialize};

/// Broad class of a failure, used by callers that only care which family of
/// precondition was violated rather than the exact variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    /// Malformed input: bad amounts, unknown or empty outcome labels, zero-reward claims
    Validation,
    /// Caller is not the authority the operation requires
    Authorization,
    /// Operation is not legal in the market's current lifecycle state
    State,
    /// Propagated unmodified from the asset-transfer capability
    Balance,
}

/// Every way a settlement operation can fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarketError {
    EmptyOutcome(String),
    DuplicateOutcome(String),
    UnknownOutcome(String),
    TooFewOutcomes(usize),
    TooManyOutcomes(usize),
    InvalidAmount(String),
    InvalidFee(u64),
    ResolverMismatch(String),
    NothingToClaim(String),
    Unauthorized(String),
    MarketSettled(String),
    BettingClosed(String),
    AlreadyResolved(String),
    NotSettled(String),
    AlreadyClaimed(String),
    InsufficientBalance(String),
    AccountNotFound(String),
}

impl MarketError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            MarketError::EmptyOutcome(_)
            | MarketError::DuplicateOutcome(_)
            | MarketError::UnknownOutcome(_)
            | MarketError::TooFewOutcomes(_)
            | MarketError::TooManyOutcomes(_)
            | MarketError::InvalidAmount(_)
            | MarketError::InvalidFee(_)
            | MarketError::ResolverMismatch(_)
            | MarketError::NothingToClaim(_) => ErrorKind::Validation,
            MarketError::Unauthorized(_) => ErrorKind::Authorization,
            MarketError::MarketSettled(_)
            | MarketError::BettingClosed(_)
            | MarketError::AlreadyResolved(_)
            | MarketError::NotSettled(_)
            | MarketError::AlreadyClaimed(_) => ErrorKind::State,
            MarketError::InsufficientBalance(_) | MarketError::AccountNotFound(_) => {
                ErrorKind::Balance
            }
        }
    }
}

impl std::fmt::Display for MarketError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MarketError::EmptyOutcome(msg) => write!(f, "Outcome label is empty: {}", msg),
            MarketError::DuplicateOutcome(msg) => write!(f, "Duplicate outcome label: {}", msg),
            MarketError::UnknownOutcome(msg) => write!(f, "Outcome not in market: {}", msg),
            MarketError::TooFewOutcomes(n) => {
                write!(f, "Market needs at least 2 outcomes, got {}", n)
            }
            MarketError::TooManyOutcomes(n) => {
                write!(f, "Market supports at most 3 outcomes, got {}", n)
            }
            MarketError::InvalidAmount(msg) => write!(f, "Invalid amount: {}", msg),
            MarketError::InvalidFee(bps) => {
                write!(f, "Fee must be between 0 and 10000 bps, got {}", bps)
            }
            MarketError::ResolverMismatch(msg) => {
                write!(f, "Resolver outcome set mismatch: {}", msg)
            }
            MarketError::NothingToClaim(msg) => write!(f, "no rewards to claim: {}", msg),
            MarketError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            MarketError::MarketSettled(msg) => write!(f, "Market already settled: {}", msg),
            MarketError::BettingClosed(msg) => write!(f, "Bets no longer accepted: {}", msg),
            MarketError::AlreadyResolved(msg) => write!(f, "Winner already set: {}", msg),
            MarketError::NotSettled(msg) => write!(f, "market not settled: {}", msg),
            MarketError::AlreadyClaimed(msg) => write!(f, "already claimed: {}", msg),
            MarketError::InsufficientBalance(msg) => write!(f, "Insufficient balance: {}", msg),
            MarketError::AccountNotFound(msg) => write!(f, "Account not found: {}", msg),
        }
    }
}

impl std::error::Error for MarketError {}
