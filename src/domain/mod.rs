//! Pure parlay domain logic.
//!
//! Everything in this module is pure: the aggregate and value types own
//! the settlement arithmetic and the per-leg state machine, and never
//! perform I/O.

pub mod error;
mod id;
mod leg;
mod money;
mod parlay;
mod quote;

pub use id::{AccountId, MarketId, ParlayId};
pub use leg::{Leg, LegState, MarketResolution};
pub use money::{floor_amount, Amount, Odds, PAYOUT_SCALE};
pub use parlay::{LegBalance, LegEntry, ParlayMarket, Phase};
pub use quote::{FeeBreakdown, ParlayQuote};
