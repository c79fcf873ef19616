//! Shared engine state.
//!
//! Each parlay record sits behind its own mutex inside a concurrent map,
//! so mutations to one parlay are serialized while operations on
//! disjoint parlays proceed concurrently. The record plus its per-leg
//! exercised bitmap is a self-contained unit of mutation; nothing else
//! needs a wider lock.

use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;

use crate::config::RiskConfig;
use crate::domain::{ParlayId, ParlayMarket};

use super::ledger::AmmLedger;

/// Shared state accessible by all services: the parlay store and the
/// exposure ledger.
#[derive(Debug)]
pub struct EngineState {
    parlays: DashMap<ParlayId, Arc<Mutex<ParlayMarket>>>,
    ledger: AmmLedger,
}

impl EngineState {
    /// Create state with the configured risk caps.
    #[must_use]
    pub fn new(risk: &RiskConfig) -> Self {
        Self {
            parlays: DashMap::new(),
            ledger: AmmLedger::new(risk),
        }
    }

    /// The exposure and fee ledger.
    #[must_use]
    pub fn ledger(&self) -> &AmmLedger {
        &self.ledger
    }

    /// Commit a newly created parlay. The record becomes observable only
    /// here, fully initialized.
    pub fn insert(&self, parlay: ParlayMarket) {
        self.parlays
            .insert(parlay.id().clone(), Arc::new(Mutex::new(parlay)));
    }

    /// Get the mutation handle for a parlay.
    #[must_use]
    pub fn handle(&self, parlay_id: &ParlayId) -> Option<Arc<Mutex<ParlayMarket>>> {
        self.parlays.get(parlay_id).map(|entry| entry.value().clone())
    }

    /// Clone a read-only snapshot of a parlay.
    #[must_use]
    pub fn snapshot(&self, parlay_id: &ParlayId) -> Option<ParlayMarket> {
        self.handle(parlay_id).map(|handle| handle.lock().clone())
    }

    /// Number of stored parlays (all phases).
    #[must_use]
    pub fn parlay_count(&self) -> usize {
        self.parlays.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AccountId, FeeBreakdown, Leg};
    use chrono::Utc;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn sample_parlay(id: &str) -> ParlayMarket {
        ParlayMarket::try_new(
            ParlayId::from(id),
            AccountId::new("buyer"),
            None,
            vec![Leg::new("m1", 0), Leg::new("m2", 1)],
            vec![dec!(0.5), dec!(0.5)],
            dec!(10),
            FeeBreakdown::new(Decimal::ZERO, Decimal::ZERO, Decimal::ZERO),
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn insert_then_snapshot() {
        let state = EngineState::new(&RiskConfig::default());
        state.insert(sample_parlay("p-1"));

        let snapshot = state.snapshot(&ParlayId::from("p-1")).unwrap();
        assert_eq!(snapshot.leg_count(), 2);
        assert_eq!(state.parlay_count(), 1);
    }

    #[test]
    fn unknown_parlay_has_no_handle() {
        let state = EngineState::new(&RiskConfig::default());
        assert!(state.handle(&ParlayId::from("missing")).is_none());
        assert!(state.snapshot(&ParlayId::from("missing")).is_none());
    }

    #[test]
    fn handles_share_the_same_record() {
        let state = EngineState::new(&RiskConfig::default());
        state.insert(sample_parlay("p-1"));

        let id = ParlayId::from("p-1");
        let a = state.handle(&id).unwrap();
        let b = state.handle(&id).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
