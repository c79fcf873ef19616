//! Parlay registry: the purchase path.
//!
//! Ordering is the whole game here: exposure is reserved in the ledger
//! *before* any collateral is converted and before the record becomes
//! observable, and every later failure rolls that reservation back. A
//! parlay therefore only ever appears in the store fully funded, fully
//! reserved and fully initialized.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::domain::{AccountId, Amount, Leg, MarketId, ParlayId, ParlayMarket, ParlayQuote};
use crate::error::{CollateralError, Error, QuoteError};
use crate::port::outbound::collateral::{CollateralAdapter, CollateralSpec};

use super::quote::QuoteEngine;
use super::state::EngineState;

/// How a purchase is funded.
#[derive(Debug, Clone)]
pub enum Funding {
    /// Gross stake paid directly in the settlement currency.
    Direct(Amount),
    /// Stake raised by converting a collateral token at purchase time.
    Collateral(CollateralSpec),
}

/// A purchase request.
#[derive(Debug, Clone)]
pub struct CreateParlay {
    /// Buyer account credited with refunds and the final payout.
    pub buyer: AccountId,
    /// Optional referrer; carves a share out of the safe-box fee.
    pub referrer: Option<AccountId>,
    /// Chosen (market, position) pairs, one per leg.
    pub legs: Vec<Leg>,
    /// Stake funding.
    pub funding: Funding,
    /// Reject the purchase if the freshly quoted payout comes in below
    /// this. `None` accepts any quote that passes the protocol checks.
    pub min_acceptable_payout: Option<Amount>,
}

/// Creates parlays against shared engine state.
pub struct ParlayRegistry {
    state: Arc<EngineState>,
    quotes: Arc<QuoteEngine>,
    collateral: Arc<dyn CollateralAdapter>,
}

impl ParlayRegistry {
    /// Create a registry over shared state.
    #[must_use]
    pub fn new(
        state: Arc<EngineState>,
        quotes: Arc<QuoteEngine>,
        collateral: Arc<dyn CollateralAdapter>,
    ) -> Self {
        Self {
            state,
            quotes,
            collateral,
        }
    }

    /// Execute a purchase.
    ///
    /// Always re-quotes from live odds; a previously obtained
    /// [`ParlayQuote`] is advisory only. Collateral is quoted first, the
    /// parlay priced at the quoted proceeds, exposure reserved, and only
    /// then is the conversion executed for real. Any surplus the real
    /// conversion produces over its own quote stays with the pool.
    ///
    /// # Errors
    ///
    /// Quote, risk and collateral errors, each leaving no trace in the
    /// ledger or the store.
    pub async fn create_parlay(&self, request: CreateParlay) -> Result<ParlayMarket, Error> {
        let stake_gross = match &request.funding {
            Funding::Direct(stake) => *stake,
            Funding::Collateral(spec) => self.collateral.quote_convert(spec).await?,
        };

        let referred = request.referrer.is_some();
        let quote = self.quotes.buy_quote(&request.legs, stake_gross, referred).await?;

        if let Some(minimum) = request.min_acceptable_payout {
            if quote.potential_payout() < minimum {
                return Err(QuoteError::SlippageExceeded {
                    quoted: quote.potential_payout(),
                    minimum,
                }
                .into());
            }
        }

        let markets: Vec<MarketId> = request
            .legs
            .iter()
            .map(|leg| leg.market_id().clone())
            .collect();
        let exposure = quote.exposure();
        self.state.ledger().try_register(&markets, exposure)?;

        if let Funding::Collateral(spec) = &request.funding {
            if let Err(err) = self.settle_collateral(spec, stake_gross).await {
                self.state.ledger().release(&markets, exposure);
                return Err(err.into());
            }
        }

        let parlay = match self.build_record(&request, &quote) {
            Ok(parlay) => parlay,
            Err(err) => {
                self.state.ledger().release(&markets, exposure);
                return Err(err);
            }
        };

        self.state.ledger().record_fees(quote.fees());
        info!(
            parlay_id = %parlay.id(),
            buyer = %parlay.buyer(),
            legs = parlay.leg_count(),
            stake_gross = %parlay.stake_gross(),
            combined_quote = %parlay.combined_quote(),
            potential_payout = %parlay.initial_payout(),
            "Created parlay"
        );
        self.state.insert(parlay.clone());
        Ok(parlay)
    }

    /// Run the real conversion and check it delivered the quoted proceeds.
    async fn settle_collateral(
        &self,
        spec: &CollateralSpec,
        quoted: Amount,
    ) -> Result<(), CollateralError> {
        let actual = self.collateral.convert(spec).await?;
        if actual < quoted {
            return Err(CollateralError::ConversionFailed {
                token: spec.token.clone(),
                amount: spec.amount,
                reason: format!("conversion delivered {actual}, quoted {quoted}"),
            });
        }
        Ok(())
    }

    fn build_record(
        &self,
        request: &CreateParlay,
        quote: &ParlayQuote,
    ) -> Result<ParlayMarket, Error> {
        Ok(ParlayMarket::try_new(
            ParlayId::new(),
            request.buyer.clone(),
            request.referrer.clone(),
            request.legs.clone(),
            quote.locked_odds().to_vec(),
            quote.stake_gross(),
            quote.fees().clone(),
            Utc::now(),
        )?)
    }
}
