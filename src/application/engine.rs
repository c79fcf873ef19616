//! The engine facade wiring the services over one shared state.

use std::sync::Arc;

use crate::config::EngineConfig;
use crate::domain::{Amount, Leg, LegBalance, MarketId, ParlayId, ParlayMarket, ParlayQuote};
use crate::error::{Error, Result};
use crate::port::outbound::collateral::CollateralAdapter;
use crate::port::outbound::oracle::MarketOracle;
use crate::port::outbound::treasury::Treasury;

use super::ledger::AmmLedger;
use super::quote::QuoteEngine;
use super::registry::{CreateParlay, ParlayRegistry};
use super::settlement::{ExerciseOutcome, ParlayExercise, ResolveOutcome, SettlementEngine};
use super::state::EngineState;

/// Facade over the quote, registry and settlement services.
///
/// Construct one per deployment with the outbound adapters; every method
/// is `&self` and safe to call from any task.
pub struct ParlayEngine {
    state: Arc<EngineState>,
    quotes: Arc<QuoteEngine>,
    registry: ParlayRegistry,
    settlement: SettlementEngine,
}

impl ParlayEngine {
    /// Wire up the engine. Validates the configuration before any
    /// service is constructed.
    ///
    /// # Errors
    ///
    /// `ConfigError` for an invalid configuration.
    pub fn new(
        config: EngineConfig,
        oracle: Arc<dyn MarketOracle>,
        collateral: Arc<dyn CollateralAdapter>,
        treasury: Arc<dyn Treasury>,
    ) -> Result<Self, Error> {
        config.validate()?;

        let state = Arc::new(EngineState::new(&config.risk));
        let quotes = Arc::new(QuoteEngine::new(config, oracle.clone()));
        let registry = ParlayRegistry::new(state.clone(), quotes.clone(), collateral);
        let settlement = SettlementEngine::new(state.clone(), oracle, treasury);

        Ok(Self {
            state,
            quotes,
            registry,
            settlement,
        })
    }

    /// Price a parlay without committing anything.
    ///
    /// # Errors
    ///
    /// Quote and risk errors; see [`QuoteEngine::buy_quote`].
    pub async fn quote_parlay(
        &self,
        legs: &[Leg],
        stake_gross: Amount,
        referred: bool,
    ) -> Result<ParlayQuote> {
        self.quotes.buy_quote(legs, stake_gross, referred).await
    }

    /// Execute a purchase. Re-quotes from live odds.
    ///
    /// # Errors
    ///
    /// See [`ParlayRegistry::create_parlay`].
    pub async fn create_parlay(&self, request: CreateParlay) -> Result<ParlayMarket> {
        self.registry.create_parlay(request).await
    }

    /// Record a leg market's resolution onto a parlay.
    ///
    /// # Errors
    ///
    /// See [`SettlementEngine::resolve_leg`].
    pub async fn resolve_leg(
        &self,
        parlay_id: &ParlayId,
        market_id: &MarketId,
    ) -> Result<ResolveOutcome> {
        self.settlement.resolve_leg(parlay_id, market_id).await
    }

    /// Exercise one leg of a parlay.
    ///
    /// # Errors
    ///
    /// See [`SettlementEngine::exercise_leg`].
    pub async fn exercise_leg(
        &self,
        parlay_id: &ParlayId,
        market_id: &MarketId,
    ) -> Result<ExerciseOutcome> {
        self.settlement.exercise_leg(parlay_id, market_id).await
    }

    /// Sweep a whole ticket, finalizing it when nothing remains
    /// outstanding.
    ///
    /// # Errors
    ///
    /// See [`SettlementEngine::exercise_parlay`].
    pub async fn exercise_parlay(&self, parlay_id: &ParlayId) -> Result<ParlayExercise> {
        self.settlement.exercise_parlay(parlay_id).await
    }

    /// Read-only snapshot of a parlay, if it exists.
    #[must_use]
    pub fn parlay(&self, parlay_id: &ParlayId) -> Option<ParlayMarket> {
        self.state.snapshot(parlay_id)
    }

    /// Per-leg payout contribution view.
    ///
    /// # Errors
    ///
    /// `ParlayNotFound` for an unknown ID.
    pub fn leg_balances(&self, parlay_id: &ParlayId) -> Result<Vec<LegBalance>> {
        self.settlement.leg_balances(parlay_id)
    }

    /// The exposure and fee ledger.
    #[must_use]
    pub fn ledger(&self) -> &AmmLedger {
        self.state.ledger()
    }

    /// Number of stored parlays (all phases).
    #[must_use]
    pub fn parlay_count(&self) -> usize {
        self.state.parlay_count()
    }
}
