//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`oracle`] — [`ScriptedOracle`](oracle::ScriptedOracle), a settable
//!   in-memory [`MarketOracle`](crate::port::outbound::oracle::MarketOracle).
//! - [`treasury`] — [`RecordingTreasury`](treasury::RecordingTreasury),
//!   which logs payments instead of moving funds.
//! - [`collateral`] — Fixed-rate and failing
//!   [`CollateralAdapter`](crate::port::outbound::collateral::CollateralAdapter)
//!   mocks.
//! - [`domain`] — Builders for domain primitives: legs, fee breakdowns,
//!   the reference four-leg parlay.

pub mod collateral;
pub mod domain;
pub mod oracle;
pub mod treasury;
