//! Quote engine: combines per-leg odds into one locked price.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::debug;

use crate::config::EngineConfig;
use crate::domain::{floor_amount, Amount, Leg, Odds, ParlayQuote};
use crate::error::{Error, QuoteError};
use crate::port::outbound::oracle::{validate_position, MarketOracle};

use super::fees::{check_combination_floor, check_stake_cap, FeeSchedule};

/// Prices a leg set against live oracle odds.
///
/// Pure read path: quoting never mutates engine state. The registry
/// calls back into this engine at execution time so a purchase is always
/// priced from fresh odds, never from a stale client-supplied quote.
pub struct QuoteEngine {
    config: EngineConfig,
    fees: FeeSchedule,
    oracle: Arc<dyn MarketOracle>,
}

impl QuoteEngine {
    /// Create a quote engine.
    #[must_use]
    pub fn new(config: EngineConfig, oracle: Arc<dyn MarketOracle>) -> Self {
        let fees = FeeSchedule::new(&config.fees);
        Self {
            config,
            fees,
            oracle,
        }
    }

    /// Price a parlay purchase.
    ///
    /// Validates the leg set, reads one odds value per leg at the given
    /// notional, combines them into the locked quote and applies the fee
    /// split. `referred` only shapes the fee breakdown; the buyer's net
    /// stake is identical either way.
    ///
    /// # Errors
    ///
    /// `QuoteError` for a malformed leg set or a combination below the
    /// protocol floor; `RiskError` when the stake exceeds the per-parlay
    /// cap.
    pub async fn buy_quote(
        &self,
        legs: &[Leg],
        stake_gross: Amount,
        referred: bool,
    ) -> Result<ParlayQuote, Error> {
        if stake_gross <= Decimal::ZERO {
            return Err(QuoteError::NonPositiveStake { stake: stake_gross }.into());
        }
        check_stake_cap(stake_gross, &self.config.risk)?;

        if legs.len() < 2 {
            return Err(QuoteError::TooFewLegs {
                got: legs.len(),
                minimum: 2,
            }
            .into());
        }
        if legs.len() > self.config.limits.max_legs {
            return Err(QuoteError::TooManyLegs {
                got: legs.len(),
                maximum: self.config.limits.max_legs,
            }
            .into());
        }
        for (i, leg) in legs.iter().enumerate() {
            if legs[..i].iter().any(|l| l.market_id() == leg.market_id()) {
                return Err(QuoteError::DuplicateMarket {
                    market_id: leg.market_id().clone(),
                }
                .into());
            }
        }

        let mut locked_odds: Vec<Odds> = Vec::with_capacity(legs.len());
        for leg in legs {
            validate_position(self.oracle.as_ref(), leg.market_id(), leg.position()).await?;
            let odds = self
                .oracle
                .odds(leg.market_id(), leg.position(), stake_gross)
                .await
                .unwrap_or(Decimal::ZERO);
            if odds <= Decimal::ZERO || odds > Decimal::ONE {
                return Err(QuoteError::InvalidOdds {
                    market_id: leg.market_id().clone(),
                    odds,
                }
                .into());
            }
            locked_odds.push(odds);
        }

        let combined_quote: Odds = locked_odds.iter().product();
        check_combination_floor(combined_quote, &self.config.risk)?;

        let fees = self.fees.split(stake_gross, referred);
        let stake_net = stake_gross - fees.total();
        let potential_payout = floor_amount(stake_net / combined_quote);

        debug!(
            legs = legs.len(),
            combined_quote = %combined_quote,
            stake_net = %stake_net,
            potential_payout = %potential_payout,
            "Quoted parlay"
        );

        Ok(ParlayQuote::new(
            combined_quote,
            locked_odds,
            stake_gross,
            stake_net,
            potential_payout,
            fees,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LimitsConfig, RiskConfig};
    use crate::error::RiskError;
    use crate::testkit::oracle::ScriptedOracle;
    use rust_decimal_macros::dec;

    fn oracle() -> Arc<ScriptedOracle> {
        let oracle = ScriptedOracle::new();
        oracle.add_market("game-1", 2, dec!(0.5));
        oracle.add_market("game-2", 3, dec!(0.4));
        oracle.add_market("game-3", 2, dec!(0.25));
        oracle.add_market("game-4", 3, dec!(0.8));
        Arc::new(oracle)
    }

    fn engine() -> QuoteEngine {
        QuoteEngine::new(EngineConfig::default(), oracle())
    }

    fn four_legs() -> Vec<Leg> {
        vec![
            Leg::new("game-1", 0),
            Leg::new("game-2", 1),
            Leg::new("game-3", 0),
            Leg::new("game-4", 2),
        ]
    }

    #[tokio::test]
    async fn quotes_the_reference_ticket() {
        let quote = engine().buy_quote(&four_legs(), dec!(10), false).await.unwrap();
        assert_eq!(quote.combined_quote(), dec!(0.04));
        assert_eq!(quote.stake_net(), dec!(9.3));
        assert_eq!(quote.potential_payout(), dec!(232.5));
        assert_eq!(quote.exposure(), dec!(223.2));
    }

    #[tokio::test]
    async fn rejects_one_leg() {
        let err = engine()
            .buy_quote(&[Leg::new("game-1", 0)], dec!(10), false)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Quote(QuoteError::TooFewLegs { got: 1, .. })
        ));
    }

    #[tokio::test]
    async fn rejects_too_many_legs() {
        let config = EngineConfig {
            limits: LimitsConfig { max_legs: 3 },
            ..Default::default()
        };
        let engine = QuoteEngine::new(config, oracle());
        let err = engine.buy_quote(&four_legs(), dec!(10), false).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Quote(QuoteError::TooManyLegs { got: 4, maximum: 3 })
        ));
    }

    #[tokio::test]
    async fn rejects_duplicate_market() {
        let legs = vec![Leg::new("game-1", 0), Leg::new("game-1", 1)];
        let err = engine().buy_quote(&legs, dec!(10), false).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Quote(QuoteError::DuplicateMarket { .. })
        ));
    }

    #[tokio::test]
    async fn rejects_position_outside_market_range() {
        // game-1 is binary; position 2 does not exist.
        let legs = vec![Leg::new("game-1", 2), Leg::new("game-2", 0)];
        let err = engine().buy_quote(&legs, dec!(10), false).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Quote(QuoteError::InvalidPosition {
                position: 2,
                position_count: 2,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn rejects_combination_below_floor() {
        let config = EngineConfig {
            risk: RiskConfig {
                min_combined_quote: dec!(0.05),
                ..Default::default()
            },
            ..Default::default()
        };
        let engine = QuoteEngine::new(config, oracle());
        // Combined quote 0.04 < 0.05 floor.
        let err = engine.buy_quote(&four_legs(), dec!(10), false).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Quote(QuoteError::InvalidCombination { .. })
        ));
    }

    #[tokio::test]
    async fn rejects_stake_above_cap() {
        let err = engine()
            .buy_quote(&four_legs(), dec!(5000), false)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Risk(RiskError::StakeCapExceeded { .. })));
    }

    #[tokio::test]
    async fn rejects_non_positive_stake() {
        let err = engine()
            .buy_quote(&four_legs(), Decimal::ZERO, false)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Quote(QuoteError::NonPositiveStake { .. })
        ));
    }

    #[tokio::test]
    async fn unknown_market_is_an_invalid_position() {
        let legs = vec![Leg::new("nowhere", 0), Leg::new("game-2", 0)];
        let err = engine().buy_quote(&legs, dec!(10), false).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Quote(QuoteError::InvalidPosition {
                position_count: 0,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn referred_quote_keeps_net_stake_identical() {
        let plain = engine().buy_quote(&four_legs(), dec!(10), false).await.unwrap();
        let referred = engine().buy_quote(&four_legs(), dec!(10), true).await.unwrap();
        assert_eq!(plain.stake_net(), referred.stake_net());
        assert_eq!(plain.potential_payout(), referred.potential_payout());
        assert!(referred.fees().referrer_fee() > Decimal::ZERO);
    }
}
