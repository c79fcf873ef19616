//! Collateral adapter port.
//!
//! Converts an alternate stablecoin into the settlement token. The
//! registry quotes the conversion first for risk checks, then performs
//! the single real conversion after every other check has passed, inside
//! the same logical purchase transaction.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::Amount;
use crate::error::CollateralError;

/// An alternate-token stake offered at purchase time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollateralSpec {
    /// Token symbol of the offered collateral.
    pub token: String,
    /// Amount offered, denominated in that token.
    pub amount: Amount,
}

impl CollateralSpec {
    /// Create a new collateral spec.
    pub fn new(token: impl Into<String>, amount: Amount) -> Self {
        Self {
            token: token.into(),
            amount,
        }
    }
}

/// Converts alternate stablecoins into the settlement token.
#[async_trait]
pub trait CollateralAdapter: Send + Sync {
    /// Price a conversion without moving funds.
    async fn quote_convert(&self, spec: &CollateralSpec) -> Result<Amount, CollateralError>;

    /// Perform the conversion. Invoked at most once per purchase, after
    /// all other checks pass and before the create commit.
    async fn convert(&self, spec: &CollateralSpec) -> Result<Amount, CollateralError>;
}
