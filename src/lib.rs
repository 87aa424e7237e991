/// Parimutuel wagering settlement engine
///
/// Bet intake into an escrowed pool, one-time outcome resolution,
/// proportional reward computation and one-time claim tracking. The host
/// drives the engine one call at a time and supplies caller identity,
/// timestamps and the asset-transfer capability.

pub mod error;
pub mod ledger;
pub mod market;
pub mod models;
pub mod resolver;

pub use error::{ErrorKind, MarketError};
pub use ledger::{AssetTransfer, Ledger, Transfer};
pub use market::book::BetBook;
pub use market::claims::ClaimTracker;
pub use market::settlement::{fee_amount, mul_ratio, net_pool, reward, BPS_DENOMINATOR};
pub use market::Market;
pub use models::{
    Bet, ClaimRecord, MarketConfig, MarketSnapshot, MarketStatus, OutcomeSet,
};
pub use resolver::{AdminResolver, OracleResolver, OutcomeResolver};
