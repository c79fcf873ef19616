//! Recording treasury mock.

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::{AccountId, Amount};
use crate::error::TreasuryError;
use crate::port::outbound::treasury::{PayoutKind, Treasury};

/// One recorded payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payment {
    pub account: AccountId,
    pub amount: Amount,
    pub kind: PayoutKind,
}

/// A [`Treasury`] that records payments instead of moving funds.
///
/// Can be scripted to fail, for exercising payment retry semantics: a
/// failed transfer leaves the amount owed on the ticket, and a later
/// call must deliver it exactly once.
#[derive(Debug, Default)]
pub struct RecordingTreasury {
    payments: Mutex<Vec<Payment>>,
    fail_next: Mutex<Option<String>>,
}

impl RecordingTreasury {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `pay` call fail with the given reason.
    pub fn fail_next(&self, reason: impl Into<String>) {
        *self.fail_next.lock() = Some(reason.into());
    }

    /// All payments recorded so far, in call order.
    pub fn payments(&self) -> Vec<Payment> {
        self.payments.lock().clone()
    }

    /// Sum of recorded payment amounts.
    pub fn total_paid(&self) -> Amount {
        self.payments.lock().iter().map(|p| p.amount).sum()
    }
}

#[async_trait]
impl Treasury for RecordingTreasury {
    async fn pay(
        &self,
        account: &AccountId,
        amount: Amount,
        kind: PayoutKind,
    ) -> Result<(), TreasuryError> {
        if let Some(reason) = self.fail_next.lock().take() {
            return Err(TreasuryError::PaymentFailed {
                account: account.to_string(),
                amount,
                reason,
            });
        }
        self.payments.lock().push(Payment {
            account: account.clone(),
            amount,
            kind,
        });
        Ok(())
    }
}
