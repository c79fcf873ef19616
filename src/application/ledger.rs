//! AMM exposure and fee-accrual ledger.
//!
//! One mutex guards all counters so a multi-market reservation is a
//! single atomic step: either every leg market's counter and the global
//! counter move together, or none of them do. Concurrent purchases can
//! therefore never overshoot a cap between check and commit.

use std::collections::HashMap;

use parking_lot::Mutex;
use rust_decimal::Decimal;
use tracing::warn;

use crate::config::RiskConfig;
use crate::domain::{Amount, FeeBreakdown, MarketId};
use crate::error::RiskError;

#[derive(Debug, Default)]
struct LedgerInner {
    per_market: HashMap<MarketId, Decimal>,
    global: Decimal,
    amm_fees_accrued: Decimal,
    safe_box_accrued: Decimal,
    referral_accrued: Decimal,
}

/// Exposure counters keyed per leg market and globally.
///
/// Incremented when a parlay is created, decremented exactly once when it
/// reaches terminal settlement.
#[derive(Debug)]
pub struct AmmLedger {
    inner: Mutex<LedgerInner>,
    max_market_exposure: Decimal,
    max_global_exposure: Decimal,
}

impl AmmLedger {
    /// Create a ledger with the configured caps.
    #[must_use]
    pub fn new(risk: &RiskConfig) -> Self {
        Self {
            inner: Mutex::new(LedgerInner::default()),
            max_market_exposure: risk.max_market_exposure,
            max_global_exposure: risk.max_global_exposure,
        }
    }

    /// Atomically register `exposure` against every leg market and the
    /// global counter.
    ///
    /// All-or-nothing: the first cap that would be breached aborts the
    /// whole registration and leaves every counter unchanged.
    pub fn try_register(&self, markets: &[MarketId], exposure: Amount) -> Result<(), RiskError> {
        let mut inner = self.inner.lock();

        for market_id in markets {
            let current = inner
                .per_market
                .get(market_id)
                .copied()
                .unwrap_or(Decimal::ZERO);
            if current + exposure > self.max_market_exposure {
                warn!(
                    market_id = %market_id,
                    current = %current,
                    additional = %exposure,
                    limit = %self.max_market_exposure,
                    "Market exposure cap would be exceeded"
                );
                return Err(RiskError::MarketExposureCapExceeded {
                    market_id: market_id.clone(),
                    current,
                    additional: exposure,
                    limit: self.max_market_exposure,
                });
            }
        }
        if inner.global + exposure > self.max_global_exposure {
            warn!(
                current = %inner.global,
                additional = %exposure,
                limit = %self.max_global_exposure,
                "Global exposure cap would be exceeded"
            );
            return Err(RiskError::GlobalExposureCapExceeded {
                current: inner.global,
                additional: exposure,
                limit: self.max_global_exposure,
            });
        }

        for market_id in markets {
            *inner
                .per_market
                .entry(market_id.clone())
                .or_insert(Decimal::ZERO) += exposure;
        }
        inner.global += exposure;
        Ok(())
    }

    /// Release a previously registered exposure. Called exactly once per
    /// parlay, at terminal settlement, with the amount registered at
    /// creation.
    pub fn release(&self, markets: &[MarketId], exposure: Amount) {
        let mut inner = self.inner.lock();
        for market_id in markets {
            if let Some(counter) = inner.per_market.get_mut(market_id) {
                *counter -= exposure;
                if *counter < Decimal::ZERO {
                    *counter = Decimal::ZERO;
                }
            }
        }
        inner.global -= exposure;
        if inner.global < Decimal::ZERO {
            inner.global = Decimal::ZERO;
        }
    }

    /// Accrue the fee split committed at purchase.
    pub fn record_fees(&self, fees: &FeeBreakdown) {
        let mut inner = self.inner.lock();
        inner.amm_fees_accrued += fees.amm_fee();
        inner.safe_box_accrued += fees.safe_box_fee();
        inner.referral_accrued += fees.referrer_fee();
    }

    /// Current exposure registered against a market.
    #[must_use]
    pub fn exposure_for(&self, market_id: &MarketId) -> Amount {
        self.inner
            .lock()
            .per_market
            .get(market_id)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Current global exposure.
    #[must_use]
    pub fn global_exposure(&self) -> Amount {
        self.inner.lock().global
    }

    /// AMM fees accrued to the pool since construction.
    #[must_use]
    pub fn amm_fees_accrued(&self) -> Amount {
        self.inner.lock().amm_fees_accrued
    }

    /// Safe-box fees accrued to the house.
    #[must_use]
    pub fn safe_box_accrued(&self) -> Amount {
        self.inner.lock().safe_box_accrued
    }

    /// Referral fees accrued.
    #[must_use]
    pub fn referral_accrued(&self) -> Amount {
        self.inner.lock().referral_accrued
    }
}
