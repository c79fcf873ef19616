//! Quote value objects returned by the quote engine.

use serde::{Deserialize, Serialize};

use super::money::{Amount, Odds};

/// How a gross stake splits between the pool, the safe box and an
/// optional referrer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeBreakdown {
    amm_fee: Amount,
    safe_box_fee: Amount,
    referrer_fee: Amount,
}

impl FeeBreakdown {
    /// Create a new fee breakdown.
    #[must_use]
    pub const fn new(amm_fee: Amount, safe_box_fee: Amount, referrer_fee: Amount) -> Self {
        Self {
            amm_fee,
            safe_box_fee,
            referrer_fee,
        }
    }

    /// AMM fee amount, retained by the pool.
    #[must_use]
    pub const fn amm_fee(&self) -> Amount {
        self.amm_fee
    }

    /// Safe-box fee amount accruing to the house (after any referral
    /// carve-out).
    #[must_use]
    pub const fn safe_box_fee(&self) -> Amount {
        self.safe_box_fee
    }

    /// Referral carve-out, zero when no referrer was supplied.
    #[must_use]
    pub const fn referrer_fee(&self) -> Amount {
        self.referrer_fee
    }

    /// Total fee deducted from the gross stake.
    #[must_use]
    pub fn total(&self) -> Amount {
        self.amm_fee + self.safe_box_fee + self.referrer_fee
    }
}

/// A priced parlay: the locked combination and the payout it implies.
///
/// Produced by the quote engine. The registry re-derives an identical
/// quote at execution time rather than trusting one of these from a
/// client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParlayQuote {
    combined_quote: Odds,
    locked_odds: Vec<Odds>,
    stake_gross: Amount,
    stake_net: Amount,
    potential_payout: Amount,
    fees: FeeBreakdown,
}

impl ParlayQuote {
    /// Create a new quote.
    #[must_use]
    pub const fn new(
        combined_quote: Odds,
        locked_odds: Vec<Odds>,
        stake_gross: Amount,
        stake_net: Amount,
        potential_payout: Amount,
        fees: FeeBreakdown,
    ) -> Self {
        Self {
            combined_quote,
            locked_odds,
            stake_gross,
            stake_net,
            potential_payout,
            fees,
        }
    }

    /// Product of all legs' locked odds.
    #[must_use]
    pub const fn combined_quote(&self) -> Odds {
        self.combined_quote
    }

    /// Per-leg odds captured at quote time, in leg order.
    #[must_use]
    pub fn locked_odds(&self) -> &[Odds] {
        &self.locked_odds
    }

    /// Gross stake before fees.
    #[must_use]
    pub const fn stake_gross(&self) -> Amount {
        self.stake_gross
    }

    /// Stake remaining after the fee split.
    #[must_use]
    pub const fn stake_net(&self) -> Amount {
        self.stake_net
    }

    /// Amount payable if every leg wins (floored, dust to the pool).
    #[must_use]
    pub const fn potential_payout(&self) -> Amount {
        self.potential_payout
    }

    /// The fee split behind `stake_net`.
    #[must_use]
    pub const fn fees(&self) -> &FeeBreakdown {
        &self.fees
    }

    /// The AMM's maximum liability on this ticket.
    #[must_use]
    pub fn exposure(&self) -> Amount {
        self.potential_payout - self.stake_net
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn breakdown() -> FeeBreakdown {
        FeeBreakdown::new(dec!(0.5), dec!(0.15), dec!(0.05))
    }

    #[test]
    fn fee_breakdown_total() {
        assert_eq!(breakdown().total(), dec!(0.7));
    }

    #[test]
    fn quote_exposure_is_liability_over_stake() {
        let quote = ParlayQuote::new(
            dec!(0.25),
            vec![dec!(0.5), dec!(0.5)],
            dec!(10),
            dec!(9.3),
            dec!(37.2),
            breakdown(),
        );
        assert_eq!(quote.exposure(), dec!(27.9));
    }
}
