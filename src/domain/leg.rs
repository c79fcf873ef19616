//! Leg value types and the per-leg state machine.

use serde::{Deserialize, Serialize};

use super::id::MarketId;

/// One (market, chosen position) pair inside a parlay.
///
/// Captured at creation time and immutable thereafter. `position` is an
/// index into the leg market's position set (0-based); validity against
/// the market's actual position count is checked when quoting.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Leg {
    market_id: MarketId,
    position: u8,
}

impl Leg {
    /// Create a new leg.
    pub fn new(market_id: impl Into<MarketId>, position: u8) -> Self {
        Self {
            market_id: market_id.into(),
            position,
        }
    }

    /// Get the leg market ID.
    #[must_use]
    pub const fn market_id(&self) -> &MarketId {
        &self.market_id
    }

    /// Get the chosen position index.
    #[must_use]
    pub const fn position(&self) -> u8 {
        self.position
    }
}

/// Recorded resolution state of a leg inside a parlay.
///
/// Transitions are write-once: `Pending` moves to exactly one terminal
/// state and never back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LegState {
    /// Underlying market has not been recorded as resolved.
    Pending,
    /// Chosen position won; the leg's odds stay in the surviving product.
    Won,
    /// Chosen position lost; the whole ticket pays zero.
    Lost,
    /// Underlying market was cancelled; the leg is removed from the odds
    /// product and its stake share refunded.
    Cancelled,
}

impl LegState {
    /// Returns true if the leg is still awaiting resolution.
    #[must_use]
    pub const fn is_pending(self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Returns true once the leg has a recorded terminal outcome.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !self.is_pending()
    }
}

/// Authoritative resolution read from the leg market oracle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarketResolution {
    /// Market is still trading; nothing to settle yet.
    Open,
    /// Market was cancelled; stakes are returned.
    Cancelled,
    /// Market resolved with the given winning position index.
    Resolved(u8),
}

impl MarketResolution {
    /// Map this resolution onto the leg state for a chosen position.
    ///
    /// Returns `None` while the market is still open.
    #[must_use]
    pub fn leg_state_for(self, chosen: u8) -> Option<LegState> {
        match self {
            Self::Open => None,
            Self::Cancelled => Some(LegState::Cancelled),
            Self::Resolved(winner) if winner == chosen => Some(LegState::Won),
            Self::Resolved(_) => Some(LegState::Lost),
        }
    }
}
