use rust_decimal::Decimal;
use thiserror::Error;

use crate::domain::MarketId;

/// Quote-stage errors: a malformed leg set or a combination the AMM will
/// not price. All of these abort the operation before any state mutation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuoteError {
    #[error("parlay requires at least {minimum} legs, got {got}")]
    TooFewLegs { got: usize, minimum: usize },

    #[error("parlay supports at most {maximum} legs, got {got}")]
    TooManyLegs { got: usize, maximum: usize },

    #[error("duplicate market {market_id} in leg set")]
    DuplicateMarket { market_id: MarketId },

    #[error("position {position} is invalid for market {market_id} with {position_count} positions")]
    InvalidPosition {
        market_id: MarketId,
        position: u8,
        position_count: u8,
    },

    #[error("stake must be positive, got {stake}")]
    NonPositiveStake { stake: Decimal },

    #[error("market {market_id} quoted non-positive odds {odds}")]
    InvalidOdds { market_id: MarketId, odds: Decimal },

    #[error("combined quote {combined_quote} below protocol floor {floor}")]
    InvalidCombination {
        combined_quote: Decimal,
        floor: Decimal,
    },

    #[error("quoted payout {quoted} below minimum acceptable {minimum}")]
    SlippageExceeded { quoted: Decimal, minimum: Decimal },
}

/// Risk cap breaches. Any of these abort a purchase with no exposure or
/// ledger mutation left behind.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RiskError {
    #[error("stake {stake} exceeds per-parlay cap {limit}")]
    StakeCapExceeded { stake: Decimal, limit: Decimal },

    #[error(
        "market {market_id} exposure cap exceeded: {current} + {additional} > {limit}"
    )]
    MarketExposureCapExceeded {
        market_id: MarketId,
        current: Decimal,
        additional: Decimal,
        limit: Decimal,
    },

    #[error("global exposure cap exceeded: {current} + {additional} > {limit}")]
    GlobalExposureCapExceeded {
        current: Decimal,
        additional: Decimal,
        limit: Decimal,
    },
}

/// Settlement-stage errors.
///
/// `NotYetResolved` is a recoverable "try again later" condition, not a
/// fault; callers (including automated sweepers) are expected to retry.
/// Idempotent re-entry (re-resolving a recorded leg, re-exercising an
/// exercised leg, touching a finalized parlay) is deliberately *not* an
/// error and is reported through the outcome enums on the settlement
/// engine instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SettlementError {
    #[error("unknown parlay {parlay_id}")]
    ParlayNotFound { parlay_id: String },

    #[error("market {market_id} is not a leg of parlay {parlay_id}")]
    NotALegOfThisParlay {
        parlay_id: String,
        market_id: MarketId,
    },

    #[error("market {market_id} has not resolved yet")]
    NotYetResolved { market_id: MarketId },
}

/// Collateral conversion errors surfaced from the adapter port.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CollateralError {
    #[error("unsupported collateral token {token}")]
    UnsupportedToken { token: String },

    #[error("conversion of {amount} {token} failed: {reason}")]
    ConversionFailed {
        token: String,
        amount: Decimal,
        reason: String,
    },
}

/// Configuration errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Treasury errors surfaced from the payout port.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreasuryError {
    #[error("payment of {amount} to {account} failed: {reason}")]
    PaymentFailed {
        account: String,
        amount: Decimal,
        reason: String,
    },
}

/// Top-level error type for the crate.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Quote(#[from] QuoteError),

    #[error(transparent)]
    Domain(#[from] crate::domain::error::DomainError),

    #[error(transparent)]
    Risk(#[from] RiskError),

    #[error(transparent)]
    Settlement(#[from] SettlementError),

    #[error(transparent)]
    Collateral(#[from] CollateralError),

    #[error(transparent)]
    Treasury(#[from] TreasuryError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Convenience result alias used across the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
