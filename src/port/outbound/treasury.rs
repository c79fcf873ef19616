//! Treasury port: outbound funds movements.
//!
//! The settlement engine guarantees at-most-once invocation per leg
//! refund and per final payout through the aggregate's monotonic flags;
//! the treasury itself only needs to move money.

use async_trait::async_trait;

use crate::domain::{AccountId, Amount};
use crate::error::TreasuryError;

/// Why a payment is being made. Carried for bookkeeping and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayoutKind {
    /// Stake share returned for a cancelled leg.
    CancellationRefund,
    /// Final payout at parlay finalization.
    FinalPayout,
}

/// Moves settlement tokens to an account.
#[async_trait]
pub trait Treasury: Send + Sync {
    /// Pay `amount` to `account`.
    async fn pay(
        &self,
        account: &AccountId,
        amount: Amount,
        kind: PayoutKind,
    ) -> Result<(), TreasuryError>;
}
