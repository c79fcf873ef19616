//! Builders for domain primitives used across tests.
//!
//! Provides concise factory functions for legs, fee breakdowns and the
//! reference four-leg parlay so tests focus on assertions rather than
//! construction boilerplate.

use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::domain::{
    AccountId, Amount, FeeBreakdown, Leg, MarketId, Odds, ParlayId, ParlayMarket,
};

/// Create a [`MarketId`] from a string.
pub fn market_id(id: &str) -> MarketId {
    MarketId::new(id)
}

/// Create a [`Leg`] from a market name and position.
pub fn leg(market: &str, position: u8) -> Leg {
    Leg::new(market, position)
}

/// The standard 5% AMM + 2% safe-box split on a gross stake, no
/// referrer.
pub fn fees_7pct(stake_gross: Amount) -> FeeBreakdown {
    FeeBreakdown::new(
        stake_gross * dec!(0.05),
        stake_gross * dec!(0.02),
        Decimal::ZERO,
    )
}

/// Build a parlay with the given legs and odds, stake 10 and the
/// standard fee split.
pub fn parlay(id: &str, legs: Vec<Leg>, odds: Vec<Odds>) -> ParlayMarket {
    ParlayMarket::try_new(
        ParlayId::from(id),
        AccountId::new("buyer"),
        None,
        legs,
        odds,
        dec!(10),
        fees_7pct(dec!(10)),
        Utc::now(),
    )
    .unwrap()
}

/// The reference four-leg ticket: odds 0.5 / 0.4 / 0.25 / 0.8 on markets
/// `game-1` through `game-4`, combined quote 0.04, net stake 9.3,
/// locked payout 232.5.
pub fn reference_parlay(id: &str) -> ParlayMarket {
    parlay(
        id,
        vec![
            leg("game-1", 0),
            leg("game-2", 1),
            leg("game-3", 0),
            leg("game-4", 2),
        ],
        vec![dec!(0.5), dec!(0.4), dec!(0.25), dec!(0.8)],
    )
}
