//! Settlement engine: resolution recording, leg exercise and ticket
//! finalization.
//!
//! Locking discipline: the oracle is always read *before* the parlay
//! mutex is taken and the treasury is always paid *after* it is dropped,
//! so no lock is ever held across an await. Funds owed to the buyer are
//! tracked separately from the monotonic exercised/finalized flags: a
//! payment claim is taken under the lock (at most one payer), and a
//! failed transfer hands the claim back, so every entry point re-attempts
//! owed-but-unpaid transfers until one succeeds.
//!
//! Re-entry is routine, not exceptional: resolution feeds arrive in any
//! order and sweepers retry, so repeat calls report what already happened
//! through the outcome enums instead of erroring.

use std::sync::Arc;

use chrono::Utc;
use parking_lot::Mutex;
use tracing::{debug, info};

use crate::domain::{Amount, LegBalance, LegState, MarketId, ParlayId, ParlayMarket};
use crate::error::{Error, SettlementError};
use crate::port::outbound::oracle::MarketOracle;
use crate::port::outbound::treasury::{PayoutKind, Treasury};

use super::state::EngineState;

/// Result of recording a leg resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveOutcome {
    /// The terminal state was newly recorded.
    Recorded(LegState),
    /// The leg already had a recorded terminal state; nothing changed.
    AlreadyRecorded,
    /// The parlay is finalized; nothing can change anymore.
    AlreadySettled,
}

/// Result of exercising a single leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExerciseOutcome {
    /// The leg's effect was committed now. `refund` is non-zero only for
    /// a cancelled leg.
    Applied { state: LegState, refund: Amount },
    /// The leg had already been exercised; nothing changed.
    AlreadyExercised,
    /// The parlay is finalized; nothing can change anymore.
    AlreadySettled,
}

/// Result of a whole-ticket exercise sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParlayExercise {
    /// Every leg settled; the ticket is now terminal. `payout` is the
    /// amount transferred to the buyer (zero for a voided ticket).
    Finalized { payout: Amount },
    /// Some legs are still awaiting resolution.
    Partial { exercised: usize, pending: usize },
    /// The parlay was already finalized before this call.
    AlreadySettled,
}

/// Drives parlays from purchase to terminal settlement.
pub struct SettlementEngine {
    state: Arc<EngineState>,
    oracle: Arc<dyn MarketOracle>,
    treasury: Arc<dyn Treasury>,
}

impl SettlementEngine {
    /// Create a settlement engine over shared state.
    #[must_use]
    pub fn new(
        state: Arc<EngineState>,
        oracle: Arc<dyn MarketOracle>,
        treasury: Arc<dyn Treasury>,
    ) -> Self {
        Self {
            state,
            oracle,
            treasury,
        }
    }

    /// Record the oracle's resolution of one leg market onto the parlay.
    ///
    /// Write-once per leg. Safe to call from multiple feeds for the same
    /// market; later calls report [`ResolveOutcome::AlreadyRecorded`].
    ///
    /// # Errors
    ///
    /// `ParlayNotFound`, `NotALegOfThisParlay`, or `NotYetResolved` when
    /// the oracle still reports the market open (retry later).
    pub async fn resolve_leg(
        &self,
        parlay_id: &ParlayId,
        market_id: &MarketId,
    ) -> Result<ResolveOutcome, Error> {
        let handle = self.handle(parlay_id)?;

        let (index, position) = {
            let parlay = handle.lock();
            if parlay.is_finalized() {
                return Ok(ResolveOutcome::AlreadySettled);
            }
            let index = self.leg_index(&parlay, parlay_id, market_id)?;
            if parlay.legs()[index].state().is_terminal() {
                return Ok(ResolveOutcome::AlreadyRecorded);
            }
            (index, parlay.legs()[index].leg().position())
        };

        let resolution = self.oracle.resolution(market_id).await;
        let Some(state) = resolution.leg_state_for(position) else {
            return Err(SettlementError::NotYetResolved {
                market_id: market_id.clone(),
            }
            .into());
        };

        let mut parlay = handle.lock();
        if parlay.is_finalized() {
            return Ok(ResolveOutcome::AlreadySettled);
        }
        if parlay.record_resolution(index, state) {
            debug!(parlay_id = %parlay_id, market_id = %market_id, state = ?state, "Recorded leg resolution");
            Ok(ResolveOutcome::Recorded(state))
        } else {
            Ok(ResolveOutcome::AlreadyRecorded)
        }
    }

    /// Exercise one leg: record its resolution if needed, commit its
    /// effect, and pay the cancellation refund when one is due.
    ///
    /// Finalizes the ticket as a side effect when this was the last
    /// outstanding leg. Repeat calls are no-op successes, except that any
    /// owed-but-unpaid transfer (a refund or final payout whose earlier
    /// delivery failed) is re-attempted.
    ///
    /// # Errors
    ///
    /// The same errors as [`Self::resolve_leg`]; exercising an unresolved
    /// leg is `NotYetResolved`. Treasury failures leave the owed funds
    /// claimable by the next call.
    pub async fn exercise_leg(
        &self,
        parlay_id: &ParlayId,
        market_id: &MarketId,
    ) -> Result<ExerciseOutcome, Error> {
        let handle = self.handle(parlay_id)?;

        if self.resolve_leg(parlay_id, market_id).await? == ResolveOutcome::AlreadySettled {
            self.settle_due(parlay_id, &handle).await?;
            return Ok(ExerciseOutcome::AlreadySettled);
        }

        let applied = {
            let mut parlay = handle.lock();
            if parlay.is_finalized() {
                None
            } else {
                let index = self.leg_index(&parlay, parlay_id, market_id)?;
                // Resolution is recorded at this point, so a None here
                // can only mean the leg was already exercised.
                parlay
                    .mark_exercised(index)
                    .map(|refund| (parlay.legs()[index].state(), refund))
            }
        };

        let Some((state, refund)) = applied else {
            // Nothing new to commit, but a prior failed transfer may have
            // left funds owed.
            self.settle_due(parlay_id, &handle).await?;
            let finalized = handle.lock().is_finalized();
            return Ok(if finalized {
                ExerciseOutcome::AlreadySettled
            } else {
                ExerciseOutcome::AlreadyExercised
            });
        };

        self.try_finalize(parlay_id, &handle);
        self.settle_due(parlay_id, &handle).await?;

        Ok(ExerciseOutcome::Applied { state, refund })
    }

    /// Sweep the whole ticket: exercise every leg whose market has
    /// resolved, then finalize if nothing remains outstanding.
    ///
    /// Legs whose markets are still open are skipped without error, which
    /// makes this safe to call from a periodic sweeper.
    ///
    /// # Errors
    ///
    /// `ParlayNotFound`, or treasury failures when a due payment cannot
    /// be made.
    pub async fn exercise_parlay(&self, parlay_id: &ParlayId) -> Result<ParlayExercise, Error> {
        let handle = self.handle(parlay_id)?;

        let outstanding: Option<Vec<(usize, MarketId, u8)>> = {
            let parlay = handle.lock();
            if parlay.is_finalized() {
                None
            } else {
                Some(
                    parlay
                        .legs()
                        .iter()
                        .enumerate()
                        .filter(|(_, entry)| !entry.is_exercised())
                        .map(|(i, entry)| (i, entry.leg().market_id().clone(), entry.leg().position()))
                        .collect(),
                )
            }
        };
        let Some(outstanding) = outstanding else {
            self.settle_due(parlay_id, &handle).await?;
            return Ok(ParlayExercise::AlreadySettled);
        };

        let mut resolutions = Vec::with_capacity(outstanding.len());
        for (index, market_id, position) in &outstanding {
            let state = self.oracle.resolution(market_id).await.leg_state_for(*position);
            resolutions.push((*index, state));
        }

        let counts = {
            let mut parlay = handle.lock();
            if parlay.is_finalized() {
                None
            } else {
                for (index, state) in resolutions {
                    let Some(state) = state else { continue };
                    parlay.record_resolution(index, state);
                    parlay.mark_exercised(index);
                }
                let exercised = parlay.legs().iter().filter(|l| l.is_exercised()).count();
                Some((exercised, parlay.leg_count() - exercised))
            }
        };
        let Some((exercised, pending)) = counts else {
            self.settle_due(parlay_id, &handle).await?;
            return Ok(ParlayExercise::AlreadySettled);
        };

        let finalized = self.try_finalize(parlay_id, &handle);
        self.settle_due(parlay_id, &handle).await?;

        match finalized {
            Some(payout) => Ok(ParlayExercise::Finalized { payout }),
            // A concurrent caller finalized between our two locks.
            None if pending == 0 => Ok(ParlayExercise::AlreadySettled),
            None => Ok(ParlayExercise::Partial { exercised, pending }),
        }
    }

    /// Per-leg payout contribution view of a parlay.
    ///
    /// # Errors
    ///
    /// `ParlayNotFound` for an unknown ID.
    pub fn leg_balances(&self, parlay_id: &ParlayId) -> Result<Vec<LegBalance>, Error> {
        let handle = self.handle(parlay_id)?;
        let parlay = handle.lock();
        Ok(parlay.leg_balances())
    }

    /// Finalize if every leg is terminal and exercised. Exactly one
    /// caller observes the transition and performs the ledger release;
    /// the payout transfer itself goes through [`Self::settle_due`].
    fn try_finalize(
        &self,
        parlay_id: &ParlayId,
        handle: &Arc<Mutex<ParlayMarket>>,
    ) -> Option<Amount> {
        let (payout, markets, exposure) = {
            let mut parlay = handle.lock();
            if !parlay.finalizable() {
                return None;
            }
            let payout = parlay.finalize(Utc::now());
            let markets: Vec<MarketId> = parlay
                .legs()
                .iter()
                .map(|l| l.leg().market_id().clone())
                .collect();
            (payout, markets, parlay.exposure())
        };

        self.state.ledger().release(&markets, exposure);
        info!(parlay_id = %parlay_id, payout = %payout, "Finalized parlay");
        Some(payout)
    }

    /// Deliver every owed-but-unpaid transfer on the ticket: cancellation
    /// refunds first, then the final payout. Claims are taken under the
    /// lock so concurrent callers cannot pay the same amount twice; a
    /// failed transfer hands its claim back before the error propagates,
    /// leaving the funds owed for the next attempt.
    async fn settle_due(
        &self,
        parlay_id: &ParlayId,
        handle: &Arc<Mutex<ParlayMarket>>,
    ) -> Result<(), Error> {
        let (buyer, refunds, payout) = {
            let mut parlay = handle.lock();
            let refunds: Vec<(usize, Amount)> = (0..parlay.leg_count())
                .filter_map(|index| parlay.try_claim_refund(index).map(|amount| (index, amount)))
                .collect();
            let payout = parlay.try_claim_payout();
            (parlay.buyer().clone(), refunds, payout)
        };

        for (claimed, &(index, amount)) in refunds.iter().enumerate() {
            if let Err(err) = self
                .treasury
                .pay(&buyer, amount, PayoutKind::CancellationRefund)
                .await
            {
                let mut parlay = handle.lock();
                for &(unpaid, _) in &refunds[claimed..] {
                    parlay.release_refund_claim(unpaid);
                }
                if payout.is_some() {
                    parlay.release_payout_claim();
                }
                return Err(err.into());
            }
            info!(parlay_id = %parlay_id, leg = index, refund = %amount, "Refunded cancelled leg");
        }

        if let Some(amount) = payout {
            if let Err(err) = self
                .treasury
                .pay(&buyer, amount, PayoutKind::FinalPayout)
                .await
            {
                handle.lock().release_payout_claim();
                return Err(err.into());
            }
            info!(parlay_id = %parlay_id, payout = %amount, "Paid final payout");
        }

        Ok(())
    }

    fn handle(&self, parlay_id: &ParlayId) -> Result<Arc<Mutex<ParlayMarket>>, SettlementError> {
        self.state
            .handle(parlay_id)
            .ok_or_else(|| SettlementError::ParlayNotFound {
                parlay_id: parlay_id.to_string(),
            })
    }

    fn leg_index(
        &self,
        parlay: &ParlayMarket,
        parlay_id: &ParlayId,
        market_id: &MarketId,
    ) -> Result<usize, SettlementError> {
        parlay
            .leg_index(market_id)
            .ok_or_else(|| SettlementError::NotALegOfThisParlay {
                parlay_id: parlay_id.to_string(),
                market_id: market_id.clone(),
            })
    }
}
