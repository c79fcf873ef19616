//! Scripted in-memory market oracle.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::domain::{Amount, MarketId, MarketResolution, Odds};
use crate::port::outbound::oracle::MarketOracle;

#[derive(Debug, Clone)]
struct MarketScript {
    position_count: u8,
    odds: Odds,
    resolution: MarketResolution,
}

/// A settable [`MarketOracle`] for tests.
///
/// Markets start open with a fixed odds value for every position; tests
/// flip them to resolved or cancelled at the exact point the scenario
/// needs. Unknown markets report no position count and no odds.
#[derive(Debug, Default)]
pub struct ScriptedOracle {
    markets: RwLock<HashMap<MarketId, MarketScript>>,
}

impl ScriptedOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an open market with `position_count` positions, quoting
    /// `odds` for every position at any notional.
    pub fn add_market(&self, market_id: impl Into<MarketId>, position_count: u8, odds: Odds) {
        self.markets.write().insert(
            market_id.into(),
            MarketScript {
                position_count,
                odds,
                resolution: MarketResolution::Open,
            },
        );
    }

    /// Resolve a market with the given winning position.
    pub fn resolve(&self, market_id: impl Into<MarketId>, winner: u8) {
        self.set_resolution(market_id.into(), MarketResolution::Resolved(winner));
    }

    /// Cancel a market.
    pub fn cancel(&self, market_id: impl Into<MarketId>) {
        self.set_resolution(market_id.into(), MarketResolution::Cancelled);
    }

    /// Change the odds a market quotes from now on.
    pub fn set_odds(&self, market_id: impl Into<MarketId>, odds: Odds) {
        if let Some(script) = self.markets.write().get_mut(&market_id.into()) {
            script.odds = odds;
        }
    }

    fn set_resolution(&self, market_id: MarketId, resolution: MarketResolution) {
        if let Some(script) = self.markets.write().get_mut(&market_id) {
            script.resolution = resolution;
        }
    }
}

#[async_trait]
impl MarketOracle for ScriptedOracle {
    async fn resolution(&self, market_id: &MarketId) -> MarketResolution {
        self.markets
            .read()
            .get(market_id)
            .map_or(MarketResolution::Open, |script| script.resolution)
    }

    async fn position_count(&self, market_id: &MarketId) -> Option<u8> {
        self.markets
            .read()
            .get(market_id)
            .map(|script| script.position_count)
    }

    async fn odds(&self, market_id: &MarketId, position: u8, _notional: Amount) -> Option<Odds> {
        let markets = self.markets.read();
        let script = markets.get(market_id)?;
        (position < script.position_count).then_some(script.odds)
    }
}
