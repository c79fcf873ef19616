//! The parlay aggregate and its settlement arithmetic.
//!
//! [`ParlayMarket`] is the aggregate root: an immutable leg set with
//! locked odds, plus the write-once per-leg settlement state. All
//! arithmetic lives here so the settlement engine stays a thin,
//! lock-holding driver.
//!
//! Numeric policy: the surviving combined quote is always the
//! full-precision product of the surviving legs' locked odds; payouts are
//! one division of the net stake by that product, floored once. Rounding
//! therefore cannot compound across multiple cancellations, and the final
//! payout is a pure function of the resolution outcome set, independent
//! of exercise order.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::error::DomainError;
use super::id::{AccountId, MarketId, ParlayId};
use super::leg::{Leg, LegState};
use super::money::{floor_amount, Amount, Odds};
use super::quote::FeeBreakdown;

/// Lifecycle phase of a parlay, derived from leg state.
///
/// Transitions are monotonic: `Open` → `PartiallyExercised` →
/// `Exercised`, never reversed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No leg has been exercised yet.
    Open,
    /// At least one leg exercised, ticket not yet finalized.
    PartiallyExercised,
    /// Finalized. Terminal; the record is immutable from here on.
    Exercised,
}

/// One leg of a purchased parlay together with its settlement state.
#[derive(Debug, Clone)]
pub struct LegEntry {
    leg: Leg,
    locked_odds: Odds,
    state: LegState,
    exercised: bool,
    refunded: Amount,
    refund_paid: bool,
}

impl LegEntry {
    fn new(leg: Leg, locked_odds: Odds) -> Self {
        Self {
            leg,
            locked_odds,
            state: LegState::Pending,
            exercised: false,
            refunded: Decimal::ZERO,
            refund_paid: false,
        }
    }

    /// The immutable (market, position) pair.
    #[must_use]
    pub const fn leg(&self) -> &Leg {
        &self.leg
    }

    /// Odds captured at purchase time. Never change afterwards.
    #[must_use]
    pub const fn locked_odds(&self) -> Odds {
        self.locked_odds
    }

    /// Recorded resolution state.
    #[must_use]
    pub const fn state(&self) -> LegState {
        self.state
    }

    /// True once this leg's effect has been committed.
    #[must_use]
    pub const fn is_exercised(&self) -> bool {
        self.exercised
    }

    /// Stake share owed back to the buyer (non-zero only for exercised
    /// cancelled legs).
    #[must_use]
    pub const fn refunded(&self) -> Amount {
        self.refunded
    }

    /// True once the owed refund has been transferred.
    #[must_use]
    pub const fn refund_paid(&self) -> bool {
        self.refund_paid
    }
}

/// Read-only view of a leg's current contribution to the payout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegBalance {
    /// The leg market.
    pub market_id: MarketId,
    /// Recorded resolution state.
    pub state: LegState,
    /// Odds locked at purchase.
    pub locked_odds: Odds,
    /// Whether the leg's effect has been committed.
    pub exercised: bool,
    /// Current payout contribution: the refund for a cancelled leg, zero
    /// for a lost leg (or any leg of a voided ticket), and for a surviving
    /// leg the amplification it provides over the current potential
    /// payout.
    pub contribution: Amount,
}

/// The purchased combined-wager record. Aggregate root.
#[derive(Debug, Clone)]
pub struct ParlayMarket {
    id: ParlayId,
    buyer: AccountId,
    referrer: Option<AccountId>,
    legs: Vec<LegEntry>,
    combined_quote: Odds,
    stake_gross: Amount,
    stake_net: Amount,
    fees: FeeBreakdown,
    initial_payout: Amount,
    exposure: Amount,
    finalized: bool,
    final_payout: Option<Amount>,
    payout_paid: bool,
    created_at: DateTime<Utc>,
    finalized_at: Option<DateTime<Utc>>,
}

impl ParlayMarket {
    /// Create a new parlay with domain invariant validation.
    ///
    /// # Domain Invariants
    ///
    /// - at least 2 legs, one locked odds value per leg
    /// - no duplicate leg market
    /// - every locked odds value in `(0, 1]`
    /// - positive gross stake, fees strictly below the stake
    ///
    /// # Errors
    ///
    /// Returns `DomainError` if any invariant is violated.
    pub fn try_new(
        id: ParlayId,
        buyer: AccountId,
        referrer: Option<AccountId>,
        legs: Vec<Leg>,
        locked_odds: Vec<Odds>,
        stake_gross: Amount,
        fees: FeeBreakdown,
        created_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if legs.len() < 2 {
            return Err(DomainError::TooFewLegs { got: legs.len() });
        }
        if locked_odds.len() != legs.len() {
            return Err(DomainError::LockedOddsMismatch {
                legs: legs.len(),
                odds: locked_odds.len(),
            });
        }
        for (i, leg) in legs.iter().enumerate() {
            if legs[..i].iter().any(|l| l.market_id() == leg.market_id()) {
                return Err(DomainError::DuplicateMarket {
                    market_id: leg.market_id().clone(),
                });
            }
        }
        for (leg, odds) in legs.iter().zip(&locked_odds) {
            if *odds <= Decimal::ZERO || *odds > Decimal::ONE {
                return Err(DomainError::OddsOutOfRange {
                    market_id: leg.market_id().clone(),
                    odds: *odds,
                });
            }
        }
        if stake_gross <= Decimal::ZERO {
            return Err(DomainError::NonPositiveStake { stake: stake_gross });
        }
        let fee_total = fees.total();
        if fee_total >= stake_gross {
            return Err(DomainError::FeesExceedStake {
                stake: stake_gross,
                fees: fee_total,
            });
        }

        let stake_net = stake_gross - fee_total;
        let combined_quote: Odds = locked_odds.iter().product();
        let initial_payout = floor_amount(stake_net / combined_quote);
        let exposure = initial_payout - stake_net;

        let entries = legs
            .into_iter()
            .zip(locked_odds)
            .map(|(leg, odds)| LegEntry::new(leg, odds))
            .collect();

        Ok(Self {
            id,
            buyer,
            referrer,
            legs: entries,
            combined_quote,
            stake_gross,
            stake_net,
            fees,
            initial_payout,
            exposure,
            finalized: false,
            final_payout: None,
            payout_paid: false,
            created_at,
            finalized_at: None,
        })
    }

    /// Get the parlay ID.
    #[must_use]
    pub const fn id(&self) -> &ParlayId {
        &self.id
    }

    /// Get the buyer account.
    #[must_use]
    pub const fn buyer(&self) -> &AccountId {
        &self.buyer
    }

    /// Get the referrer, if one was supplied at purchase.
    #[must_use]
    pub const fn referrer(&self) -> Option<&AccountId> {
        self.referrer.as_ref()
    }

    /// Get all legs with their settlement state.
    #[must_use]
    pub fn legs(&self) -> &[LegEntry] {
        &self.legs
    }

    /// Number of legs.
    #[must_use]
    pub fn leg_count(&self) -> usize {
        self.legs.len()
    }

    /// Product of all locked odds at creation. Immutable.
    #[must_use]
    pub const fn combined_quote(&self) -> Odds {
        self.combined_quote
    }

    /// Gross stake paid by the buyer.
    #[must_use]
    pub const fn stake_gross(&self) -> Amount {
        self.stake_gross
    }

    /// Stake after the fee split.
    #[must_use]
    pub const fn stake_net(&self) -> Amount {
        self.stake_net
    }

    /// The fee split committed at purchase.
    #[must_use]
    pub const fn fees(&self) -> &FeeBreakdown {
        &self.fees
    }

    /// Payout locked at creation, before any cancellation rescaling.
    #[must_use]
    pub const fn initial_payout(&self) -> Amount {
        self.initial_payout
    }

    /// Exposure registered against the ledger at creation
    /// (`initial_payout - stake_net`). Released once, at finalization.
    #[must_use]
    pub const fn exposure(&self) -> Amount {
        self.exposure
    }

    /// Creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Finalization timestamp, once exercised.
    #[must_use]
    pub const fn finalized_at(&self) -> Option<DateTime<Utc>> {
        self.finalized_at
    }

    /// Final payout transferred at finalization. `None` until then.
    #[must_use]
    pub const fn final_payout(&self) -> Option<Amount> {
        self.final_payout
    }

    /// Derived lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        if self.finalized {
            Phase::Exercised
        } else if self.legs.iter().any(|l| l.exercised) {
            Phase::PartiallyExercised
        } else {
            Phase::Open
        }
    }

    /// True once the record is terminal and immutable.
    #[must_use]
    pub const fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Index of the leg for a market, if the market is part of this
    /// parlay.
    #[must_use]
    pub fn leg_index(&self, market_id: &MarketId) -> Option<usize> {
        self.legs.iter().position(|l| l.leg.market_id() == market_id)
    }

    /// Equal stake attribution per leg, floored (dust stays with the
    /// pool). This is the amount refunded when a leg's market cancels.
    #[must_use]
    pub fn stake_share(&self) -> Amount {
        floor_amount(self.stake_net / Decimal::from(self.legs.len() as u64))
    }

    /// Full-precision product of locked odds over legs not recorded as
    /// cancelled. Won and pending legs stay in the product.
    #[must_use]
    pub fn surviving_quote(&self) -> Odds {
        self.legs
            .iter()
            .filter(|l| l.state != LegState::Cancelled)
            .map(|l| l.locked_odds)
            .product()
    }

    /// True if any leg has been recorded as lost.
    #[must_use]
    pub fn any_lost(&self) -> bool {
        self.legs.iter().any(|l| l.state == LegState::Lost)
    }

    /// True once every leg has a recorded terminal state.
    #[must_use]
    pub fn all_resolved(&self) -> bool {
        self.legs.iter().all(|l| l.state.is_terminal())
    }

    /// True once every leg is terminal and its effect committed; the
    /// ticket may then finalize.
    #[must_use]
    pub fn finalizable(&self) -> bool {
        !self.finalized && self.legs.iter().all(|l| l.state.is_terminal() && l.exercised)
    }

    /// Current potential payout.
    ///
    /// Zero as soon as any leg is recorded lost; otherwise the net stake
    /// divided by the surviving quote, floored once. Only ever decreases
    /// or stays equal during settlement.
    #[must_use]
    pub fn potential_payout(&self) -> Amount {
        if self.any_lost() {
            return Decimal::ZERO;
        }
        floor_amount(self.stake_net / self.surviving_quote())
    }

    /// Record a terminal resolution for a leg. Write-once: recording the
    /// same or any other state over an existing terminal state is a
    /// no-op and reports `false`.
    ///
    /// Returns `true` when the state was newly recorded. Panics never;
    /// unknown markets are the caller's error to map (see
    /// [`Self::leg_index`]).
    pub fn record_resolution(&mut self, index: usize, state: LegState) -> bool {
        debug_assert!(state.is_terminal());
        let entry = &mut self.legs[index];
        if entry.state.is_terminal() {
            return false;
        }
        entry.state = state;
        true
    }

    /// Commit a resolved leg's effect. Monotonic: the flag is set exactly
    /// once, repeat calls report `false` and change nothing.
    ///
    /// Returns the refund owed to the buyer for this exercise (non-zero
    /// only the first time a cancelled leg is exercised).
    pub fn mark_exercised(&mut self, index: usize) -> Option<Amount> {
        let share = self.stake_share();
        let entry = &mut self.legs[index];
        if entry.exercised || !entry.state.is_terminal() {
            return None;
        }
        entry.exercised = true;
        if entry.state == LegState::Cancelled {
            entry.refunded = share;
            Some(share)
        } else {
            Some(Decimal::ZERO)
        }
    }

    /// Finalize the ticket: freeze the final payout and make the record
    /// immutable. Caller must have checked [`Self::finalizable`].
    ///
    /// Returns the amount owed to the buyer (zero for a voided ticket).
    /// The transfer itself is tracked separately through
    /// [`Self::try_claim_payout`].
    pub fn finalize(&mut self, now: DateTime<Utc>) -> Amount {
        debug_assert!(self.finalizable());
        let payout = self.potential_payout();
        self.finalized = true;
        self.final_payout = Some(payout);
        self.finalized_at = Some(now);
        payout
    }

    /// Claim a leg's owed-but-unpaid refund for transfer.
    ///
    /// Claiming marks the refund paid, so concurrent callers cannot
    /// double-pay; a caller whose transfer fails must hand the claim back
    /// with [`Self::release_refund_claim`] so a retry can deliver it.
    pub fn try_claim_refund(&mut self, index: usize) -> Option<Amount> {
        let entry = &mut self.legs[index];
        if entry.refund_paid || entry.refunded == Decimal::ZERO {
            return None;
        }
        entry.refund_paid = true;
        Some(entry.refunded)
    }

    /// Return a claimed refund to the owed state after a failed transfer.
    pub fn release_refund_claim(&mut self, index: usize) {
        self.legs[index].refund_paid = false;
    }

    /// Claim the owed-but-unpaid final payout for transfer. `None` until
    /// finalization, for a voided ticket, and once the payout is paid.
    ///
    /// Same claim discipline as [`Self::try_claim_refund`].
    pub fn try_claim_payout(&mut self) -> Option<Amount> {
        if self.payout_paid {
            return None;
        }
        match self.final_payout {
            Some(payout) if payout > Decimal::ZERO => {
                self.payout_paid = true;
                Some(payout)
            }
            _ => None,
        }
    }

    /// Return a claimed payout to the owed state after a failed transfer.
    pub fn release_payout_claim(&mut self) {
        self.payout_paid = false;
    }

    /// True once the final payout has been transferred. Stays `false` for
    /// a voided ticket, which has nothing to pay.
    #[must_use]
    pub const fn payout_paid(&self) -> bool {
        self.payout_paid
    }

    /// Per-leg current payout contribution view.
    #[must_use]
    pub fn leg_balances(&self) -> Vec<LegBalance> {
        let voided = self.any_lost();
        let payout = self.potential_payout();
        let surviving = self.surviving_quote();

        self.legs
            .iter()
            .map(|entry| {
                let contribution = match entry.state {
                    LegState::Cancelled => entry.refunded,
                    LegState::Lost => Decimal::ZERO,
                    LegState::Won | LegState::Pending => {
                        if voided {
                            Decimal::ZERO
                        } else {
                            // Payout shrink if this leg's odds left the
                            // product: contribution = payout - payout*odds.
                            let without =
                                floor_amount(self.stake_net / (surviving / entry.locked_odds));
                            payout - without
                        }
                    }
                };
                LegBalance {
                    market_id: entry.leg.market_id().clone(),
                    state: entry.state,
                    locked_odds: entry.locked_odds,
                    exercised: entry.exercised,
                    contribution,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::leg::Leg;
    use rust_decimal_macros::dec;

    fn fees_7pct(stake: Decimal) -> FeeBreakdown {
        // 5% AMM + 2% safe box, no referrer
        FeeBreakdown::new(stake * dec!(0.05), stake * dec!(0.02), Decimal::ZERO)
    }

    fn four_leg_parlay() -> ParlayMarket {
        // The reference ticket: stake 10, fees 7% -> stake_net 9.3
        ParlayMarket::try_new(
            ParlayId::from("p-1"),
            AccountId::new("buyer"),
            None,
            vec![
                Leg::new("game-1", 0),
                Leg::new("game-2", 1),
                Leg::new("game-3", 0),
                Leg::new("game-4", 2),
            ],
            vec![dec!(0.5), dec!(0.4), dec!(0.25), dec!(0.8)],
            dec!(10),
            fees_7pct(dec!(10)),
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn combined_quote_is_product_of_locked_odds() {
        let parlay = four_leg_parlay();
        assert_eq!(parlay.combined_quote(), dec!(0.04));
        assert_eq!(parlay.stake_net(), dec!(9.3));
    }

    #[test]
    fn initial_payout_is_floored_division() {
        let parlay = four_leg_parlay();
        // 9.3 / 0.04 = 232.5
        assert_eq!(parlay.initial_payout(), dec!(232.5));
        assert_eq!(parlay.exposure(), dec!(223.2));
    }

    #[test]
    fn rejects_single_leg() {
        let err = ParlayMarket::try_new(
            ParlayId::new(),
            AccountId::new("buyer"),
            None,
            vec![Leg::new("game-1", 0)],
            vec![dec!(0.5)],
            dec!(10),
            fees_7pct(dec!(10)),
            Utc::now(),
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::TooFewLegs { got: 1 }));
    }

    #[test]
    fn rejects_duplicate_market() {
        let err = ParlayMarket::try_new(
            ParlayId::new(),
            AccountId::new("buyer"),
            None,
            vec![Leg::new("game-1", 0), Leg::new("game-1", 1)],
            vec![dec!(0.5), dec!(0.5)],
            dec!(10),
            fees_7pct(dec!(10)),
            Utc::now(),
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::DuplicateMarket { .. }));
    }

    #[test]
    fn rejects_odds_above_one() {
        let err = ParlayMarket::try_new(
            ParlayId::new(),
            AccountId::new("buyer"),
            None,
            vec![Leg::new("game-1", 0), Leg::new("game-2", 0)],
            vec![dec!(0.5), dec!(1.5)],
            dec!(10),
            fees_7pct(dec!(10)),
            Utc::now(),
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::OddsOutOfRange { .. }));
    }

    #[test]
    fn phase_progresses_monotonically() {
        let mut parlay = four_leg_parlay();
        assert_eq!(parlay.phase(), Phase::Open);

        let idx = parlay.leg_index(&MarketId::new("game-1")).unwrap();
        assert!(parlay.record_resolution(idx, LegState::Won));
        assert_eq!(parlay.mark_exercised(idx), Some(Decimal::ZERO));
        assert_eq!(parlay.phase(), Phase::PartiallyExercised);

        for market in ["game-2", "game-3", "game-4"] {
            let idx = parlay.leg_index(&MarketId::new(market)).unwrap();
            parlay.record_resolution(idx, LegState::Won);
            parlay.mark_exercised(idx);
        }
        assert!(parlay.finalizable());
        let payout = parlay.finalize(Utc::now());
        assert_eq!(payout, dec!(232.5));
        assert_eq!(parlay.phase(), Phase::Exercised);
        assert_eq!(parlay.final_payout(), Some(dec!(232.5)));
    }

    #[test]
    fn resolution_is_write_once() {
        let mut parlay = four_leg_parlay();
        let idx = parlay.leg_index(&MarketId::new("game-2")).unwrap();
        assert!(parlay.record_resolution(idx, LegState::Won));
        // A second record, even a different outcome, is a no-op.
        assert!(!parlay.record_resolution(idx, LegState::Lost));
        assert_eq!(parlay.legs()[idx].state(), LegState::Won);
    }

    #[test]
    fn exercise_is_monotonic_and_idempotent() {
        let mut parlay = four_leg_parlay();
        let idx = parlay.leg_index(&MarketId::new("game-3")).unwrap();
        parlay.record_resolution(idx, LegState::Cancelled);

        let first = parlay.mark_exercised(idx);
        assert_eq!(first, Some(dec!(2.325))); // 9.3 / 4
        let second = parlay.mark_exercised(idx);
        assert_eq!(second, None);
        assert_eq!(parlay.legs()[idx].refunded(), dec!(2.325));
    }

    #[test]
    fn exercise_requires_recorded_resolution() {
        let mut parlay = four_leg_parlay();
        let idx = parlay.leg_index(&MarketId::new("game-1")).unwrap();
        assert_eq!(parlay.mark_exercised(idx), None);
        assert!(!parlay.legs()[idx].is_exercised());
    }

    #[test]
    fn cancelled_leg_rescales_payout() {
        let mut parlay = four_leg_parlay();
        let idx = parlay.leg_index(&MarketId::new("game-3")).unwrap();
        parlay.record_resolution(idx, LegState::Cancelled);

        // Surviving quote: 0.04 / 0.25 = 0.16; payout 9.3 / 0.16 = 58.125
        assert_eq!(parlay.surviving_quote(), dec!(0.16));
        assert_eq!(parlay.potential_payout(), dec!(58.125));
        assert!(parlay.potential_payout() < parlay.initial_payout());
    }

    #[test]
    fn lost_leg_voids_the_ticket() {
        let mut parlay = four_leg_parlay();
        let idx = parlay.leg_index(&MarketId::new("game-2")).unwrap();
        parlay.record_resolution(idx, LegState::Lost);
        assert_eq!(parlay.potential_payout(), Decimal::ZERO);

        // Other legs winning changes nothing.
        for market in ["game-1", "game-3", "game-4"] {
            let idx = parlay.leg_index(&MarketId::new(market)).unwrap();
            parlay.record_resolution(idx, LegState::Won);
        }
        assert_eq!(parlay.potential_payout(), Decimal::ZERO);
    }

    #[test]
    fn multi_cancellation_matches_closed_form() {
        let mut parlay = four_leg_parlay();
        for market in ["game-1", "game-4"] {
            let idx = parlay.leg_index(&MarketId::new(market)).unwrap();
            parlay.record_resolution(idx, LegState::Cancelled);
        }
        for market in ["game-2", "game-3"] {
            let idx = parlay.leg_index(&MarketId::new(market)).unwrap();
            parlay.record_resolution(idx, LegState::Won);
        }
        // floor(9.3 / (0.04 / (0.5 * 0.8))) = floor(9.3 / 0.1) = 93
        assert_eq!(parlay.potential_payout(), dec!(93));
    }

    #[test]
    fn payout_is_order_independent() {
        let orders: [[&str; 4]; 3] = [
            ["game-1", "game-2", "game-3", "game-4"],
            ["game-4", "game-3", "game-2", "game-1"],
            ["game-2", "game-4", "game-1", "game-3"],
        ];
        let outcome = |market: &str| match market {
            "game-3" => LegState::Cancelled,
            _ => LegState::Won,
        };

        let mut payouts = Vec::new();
        for order in orders {
            let mut parlay = four_leg_parlay();
            for market in order {
                let idx = parlay.leg_index(&MarketId::new(market)).unwrap();
                parlay.record_resolution(idx, outcome(market));
                parlay.mark_exercised(idx);
            }
            payouts.push(parlay.finalize(Utc::now()));
        }
        assert!(payouts.windows(2).all(|w| w[0] == w[1]));
        // floor(9.3 / (0.04 / 0.25)) = 58.125
        assert_eq!(payouts[0], dec!(58.125));
    }

    #[test]
    fn leg_balances_attribute_refunds_and_amplification() {
        let mut parlay = four_leg_parlay();
        let cancelled = parlay.leg_index(&MarketId::new("game-3")).unwrap();
        parlay.record_resolution(cancelled, LegState::Cancelled);
        parlay.mark_exercised(cancelled);

        let balances = parlay.leg_balances();
        assert_eq!(balances[cancelled].contribution, dec!(2.325));

        // A surviving leg contributes payout * (1 - odds).
        let payout = parlay.potential_payout();
        let game1 = parlay.leg_index(&MarketId::new("game-1")).unwrap();
        let expected = payout - floor_amount(dec!(9.3) / (dec!(0.16) / dec!(0.5)));
        assert_eq!(balances[game1].contribution, expected);
    }

    #[test]
    fn leg_balances_zero_when_voided() {
        let mut parlay = four_leg_parlay();
        let lost = parlay.leg_index(&MarketId::new("game-2")).unwrap();
        parlay.record_resolution(lost, LegState::Lost);

        for balance in parlay.leg_balances() {
            if balance.state != LegState::Cancelled {
                assert_eq!(balance.contribution, Decimal::ZERO);
            }
        }
    }

    #[test]
    fn refund_claim_is_exclusive_until_released() {
        let mut parlay = four_leg_parlay();
        let idx = parlay.leg_index(&MarketId::new("game-3")).unwrap();
        parlay.record_resolution(idx, LegState::Cancelled);
        parlay.mark_exercised(idx);

        assert_eq!(parlay.try_claim_refund(idx), Some(dec!(2.325)));
        // Claimed funds cannot be claimed again.
        assert_eq!(parlay.try_claim_refund(idx), None);

        // A failed transfer hands the claim back, a retry picks it up.
        parlay.release_refund_claim(idx);
        assert!(!parlay.legs()[idx].refund_paid());
        assert_eq!(parlay.try_claim_refund(idx), Some(dec!(2.325)));
    }

    #[test]
    fn won_leg_has_no_refund_to_claim() {
        let mut parlay = four_leg_parlay();
        let idx = parlay.leg_index(&MarketId::new("game-1")).unwrap();
        parlay.record_resolution(idx, LegState::Won);
        parlay.mark_exercised(idx);
        assert_eq!(parlay.try_claim_refund(idx), None);
    }

    #[test]
    fn payout_claim_is_exclusive_until_released() {
        let mut parlay = four_leg_parlay();
        // Nothing to claim before finalization.
        assert_eq!(parlay.try_claim_payout(), None);

        for market in ["game-1", "game-2", "game-3", "game-4"] {
            let idx = parlay.leg_index(&MarketId::new(market)).unwrap();
            parlay.record_resolution(idx, LegState::Won);
            parlay.mark_exercised(idx);
        }
        parlay.finalize(Utc::now());

        assert_eq!(parlay.try_claim_payout(), Some(dec!(232.5)));
        assert_eq!(parlay.try_claim_payout(), None);
        assert!(parlay.payout_paid());

        parlay.release_payout_claim();
        assert_eq!(parlay.try_claim_payout(), Some(dec!(232.5)));
    }

    #[test]
    fn voided_ticket_payout_is_never_claimable() {
        let mut parlay = four_leg_parlay();
        let lost = parlay.leg_index(&MarketId::new("game-2")).unwrap();
        parlay.record_resolution(lost, LegState::Lost);
        for market in ["game-1", "game-2", "game-3", "game-4"] {
            let idx = parlay.leg_index(&MarketId::new(market)).unwrap();
            parlay.record_resolution(idx, LegState::Won);
            parlay.mark_exercised(idx);
        }
        parlay.finalize(Utc::now());
        assert_eq!(parlay.try_claim_payout(), None);
        assert!(!parlay.payout_paid());
    }

    #[test]
    fn stake_share_floors_dust_to_pool() {
        let parlay = ParlayMarket::try_new(
            ParlayId::new(),
            AccountId::new("buyer"),
            None,
            vec![
                Leg::new("game-1", 0),
                Leg::new("game-2", 0),
                Leg::new("game-3", 0),
            ],
            vec![dec!(0.5), dec!(0.5), dec!(0.5)],
            dec!(10),
            FeeBreakdown::new(Decimal::ZERO, Decimal::ZERO, Decimal::ZERO),
            Utc::now(),
        )
        .unwrap();
        // 10 / 3 = 3.333... -> 3.333333
        assert_eq!(parlay.stake_share(), dec!(3.333333));
    }
}
