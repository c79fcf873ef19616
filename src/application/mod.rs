//! Application services over shared engine state.

mod engine;
mod fees;
mod ledger;
mod quote;
mod registry;
mod settlement;
mod state;

pub use engine::ParlayEngine;
pub use fees::FeeSchedule;
pub use ledger::AmmLedger;
pub use quote::QuoteEngine;
pub use registry::{CreateParlay, Funding, ParlayRegistry};
pub use settlement::{ExerciseOutcome, ParlayExercise, ResolveOutcome, SettlementEngine};
pub use state::EngineState;
