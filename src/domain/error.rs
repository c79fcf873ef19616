//! Domain validation errors for the parlay aggregate.
//!
//! Returned by `try_new` constructors when a domain invariant is
//! violated. Application-level validation normally rejects bad input
//! before an aggregate is ever constructed; these exist so the aggregate
//! cannot be built in an invalid state regardless of the caller.

use thiserror::Error;

use super::id::MarketId;

/// Errors that occur when domain invariants are violated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A parlay needs at least two legs.
    #[error("parlay requires at least 2 legs, got {got}")]
    TooFewLegs { got: usize },

    /// Each leg market may appear at most once.
    #[error("duplicate market {market_id} in leg set")]
    DuplicateMarket { market_id: MarketId },

    /// Locked odds must be a price in (0, 1].
    #[error("locked odds for market {market_id} out of range: {odds}")]
    OddsOutOfRange {
        market_id: MarketId,
        odds: rust_decimal::Decimal,
    },

    /// One locked odds value is required per leg.
    #[error("locked odds count {odds} does not match leg count {legs}")]
    LockedOddsMismatch { legs: usize, odds: usize },

    /// Gross stake must be positive.
    #[error("stake must be positive, got {stake}")]
    NonPositiveStake { stake: rust_decimal::Decimal },

    /// Fees may not consume the whole stake.
    #[error("fees {fees} leave no net stake from {stake}")]
    FeesExceedStake {
        stake: rust_decimal::Decimal,
        fees: rust_decimal::Decimal,
    },
}
