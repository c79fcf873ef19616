//! Risk & fee controller: pure computation of fee splits and cap checks.
//!
//! Everything here is a pure function of the configured protocol
//! parameters; the controller holds no mutable state of its own.

use rust_decimal::Decimal;

use crate::config::{FeeConfig, RiskConfig};
use crate::domain::{floor_amount, Amount, FeeBreakdown, Odds};
use crate::error::{QuoteError, RiskError};

/// Protocol fee schedule.
#[derive(Debug, Clone)]
pub struct FeeSchedule {
    amm_fee: Decimal,
    safe_box_fee: Decimal,
    referrer_share: Decimal,
}

impl FeeSchedule {
    /// Build the schedule from configured fractions.
    #[must_use]
    pub const fn new(config: &FeeConfig) -> Self {
        Self {
            amm_fee: config.amm_fee,
            safe_box_fee: config.safe_box_fee,
            referrer_share: config.referrer_share,
        }
    }

    /// Split a gross stake into its fee components.
    ///
    /// `stake_net = stake_gross * (1 - amm_fee - safe_box_fee)` in all
    /// cases; a referrer carves its share out of the safe-box cut and
    /// never changes the buyer's net stake.
    #[must_use]
    pub fn split(&self, stake_gross: Amount, referred: bool) -> FeeBreakdown {
        let amm = floor_amount(stake_gross * self.amm_fee);
        let safe_box_total = floor_amount(stake_gross * self.safe_box_fee);
        let referrer = if referred {
            floor_amount(safe_box_total * self.referrer_share)
        } else {
            Decimal::ZERO
        };
        FeeBreakdown::new(amm, safe_box_total - referrer, referrer)
    }
}

/// Reject stakes above the per-parlay cap.
pub fn check_stake_cap(stake: Amount, risk: &RiskConfig) -> Result<(), RiskError> {
    if stake > risk.max_stake {
        return Err(RiskError::StakeCapExceeded {
            stake,
            limit: risk.max_stake,
        });
    }
    Ok(())
}

/// Reject combinations below the protocol floor (payout multiplier above
/// the configured cap).
pub fn check_combination_floor(combined_quote: Odds, risk: &RiskConfig) -> Result<(), QuoteError> {
    if combined_quote < risk.min_combined_quote {
        return Err(QuoteError::InvalidCombination {
            combined_quote,
            floor: risk.min_combined_quote,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn schedule() -> FeeSchedule {
        FeeSchedule::new(&FeeConfig {
            amm_fee: dec!(0.05),
            safe_box_fee: dec!(0.02),
            referrer_share: dec!(0.25),
        })
    }

    #[test]
    fn split_without_referrer() {
        let fees = schedule().split(dec!(10), false);
        assert_eq!(fees.amm_fee(), dec!(0.5));
        assert_eq!(fees.safe_box_fee(), dec!(0.2));
        assert_eq!(fees.referrer_fee(), Decimal::ZERO);
        assert_eq!(fees.total(), dec!(0.7));
    }

    #[test]
    fn referrer_carves_out_of_safe_box_only() {
        let fees = schedule().split(dec!(10), true);
        assert_eq!(fees.amm_fee(), dec!(0.5));
        assert_eq!(fees.referrer_fee(), dec!(0.05));
        assert_eq!(fees.safe_box_fee(), dec!(0.15));
        // Net stake identical with or without referrer.
        assert_eq!(fees.total(), dec!(0.7));
    }

    #[test]
    fn stake_cap_enforced() {
        let risk = RiskConfig {
            max_stake: dec!(100),
            ..Default::default()
        };
        assert!(check_stake_cap(dec!(100), &risk).is_ok());
        assert!(matches!(
            check_stake_cap(dec!(100.000001), &risk),
            Err(RiskError::StakeCapExceeded { .. })
        ));
    }

    #[test]
    fn combination_floor_enforced() {
        let risk = RiskConfig {
            min_combined_quote: dec!(0.01),
            ..Default::default()
        };
        assert!(check_combination_floor(dec!(0.01), &risk).is_ok());
        let err = check_combination_floor(dec!(0.009), &risk).unwrap_err();
        assert!(matches!(err, QuoteError::InvalidCombination { .. }));
    }
}
