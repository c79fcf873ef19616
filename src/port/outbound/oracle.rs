//! Leg market oracle port.
//!
//! The engine never owns leg markets; it reads their state through this
//! trait. Resolution is externally driven and may arrive in any order,
//! which is why every consumer of this port is idempotent.

use async_trait::async_trait;

use crate::domain::{Amount, MarketId, MarketResolution, Odds};
use crate::error::QuoteError;

/// Read-only view of the individual leg markets.
#[async_trait]
pub trait MarketOracle: Send + Sync {
    /// Authoritative resolution state for a market.
    async fn resolution(&self, market_id: &MarketId) -> MarketResolution;

    /// Number of positions the market offers (2 for binary, 3 for
    /// ternary).
    ///
    /// # Errors
    ///
    /// Returns `QuoteError::InvalidPosition` context material when the
    /// market is unknown to the oracle.
    async fn position_count(&self, market_id: &MarketId) -> Option<u8>;

    /// Current odds (implied-probability price) for buying `position` at
    /// the given notional stake.
    ///
    /// Odds move with the book, which is why the registry always
    /// re-quotes at execution time.
    async fn odds(&self, market_id: &MarketId, position: u8, notional: Amount) -> Option<Odds>;
}

/// Validate a chosen position against the oracle's position count.
///
/// Shared by the quote engine and the registry so both reject the same
/// inputs identically.
pub(crate) async fn validate_position<O: MarketOracle + ?Sized>(
    oracle: &O,
    market_id: &MarketId,
    position: u8,
) -> Result<(), QuoteError> {
    let count = oracle.position_count(market_id).await.unwrap_or(0);
    if position >= count {
        return Err(QuoteError::InvalidPosition {
            market_id: market_id.clone(),
            position,
            position_count: count,
        });
    }
    Ok(())
}
