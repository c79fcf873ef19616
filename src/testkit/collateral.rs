//! Collateral adapter mocks.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::Amount;
use crate::error::CollateralError;
use crate::port::outbound::collateral::{CollateralAdapter, CollateralSpec};

/// Converts any token at a fixed rate, quote and execution identical.
#[derive(Debug, Clone)]
pub struct FixedRateConverter {
    rate: Decimal,
}

impl FixedRateConverter {
    pub fn new(rate: Decimal) -> Self {
        Self { rate }
    }
}

#[async_trait]
impl CollateralAdapter for FixedRateConverter {
    async fn quote_convert(&self, spec: &CollateralSpec) -> Result<Amount, CollateralError> {
        Ok(spec.amount * self.rate)
    }

    async fn convert(&self, spec: &CollateralSpec) -> Result<Amount, CollateralError> {
        Ok(spec.amount * self.rate)
    }
}

/// Quotes successfully but fails the real conversion.
///
/// For exercising the purchase rollback path: the exposure reservation
/// made on the strength of the quote must be released when the
/// conversion falls through.
#[derive(Debug, Clone)]
pub struct FailingConverter {
    quoted: Amount,
}

impl FailingConverter {
    /// Quote `quoted` settlement tokens, then fail the conversion.
    pub fn quote_ok(quoted: Amount) -> Self {
        Self { quoted }
    }
}

#[async_trait]
impl CollateralAdapter for FailingConverter {
    async fn quote_convert(&self, _spec: &CollateralSpec) -> Result<Amount, CollateralError> {
        Ok(self.quoted)
    }

    async fn convert(&self, spec: &CollateralSpec) -> Result<Amount, CollateralError> {
        Err(CollateralError::ConversionFailed {
            token: spec.token.clone(),
            amount: spec.amount,
            reason: "scripted conversion failure".into(),
        })
    }
}
