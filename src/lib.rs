//! Legwork - Settlement core for multi-leg parlay wagers.
//!
//! This crate combines per-leg prediction-market odds into one locked
//! price at purchase time, tracks funds and exposure bookkeeping while the
//! underlying markets resolve asynchronously (out of order, possibly with
//! cancellations), and pays out exactly once per leg and exactly once
//! overall.
//!
//! # Architecture
//!
//! The crate is layered the same way on every path through it:
//!
//! - **`domain`** - Pure aggregate and value types. [`domain::ParlayMarket`]
//!   owns the per-leg state machine and all settlement arithmetic; it never
//!   performs I/O.
//! - **`application`** - Services over shared state:
//!   - [`application::QuoteEngine`] - validates a leg set and combines odds
//!     into one locked quote
//!   - [`application::ParlayRegistry`] - atomic purchase commit with fee
//!     split and exposure registration
//!   - [`application::SettlementEngine`] - idempotent per-leg resolution
//!     and exercise, finalization and payout
//!   - [`application::ParlayEngine`] - facade wiring the three together
//! - **`port`** - Trait seams for the external collaborators: the leg
//!   market oracle, the collateral converter, and the treasury that moves
//!   funds.
//!
//! # Modules
//!
//! - [`config`] - Engine configuration loaded from TOML files
//! - [`domain`] - Parlay aggregate, legs, odds, identifiers
//! - [`application`] - Quote engine, registry, settlement engine, ledger
//! - [`port`] - Outbound trait definitions consumed by the engine
//! - [`error`] - Error types for the crate
//!
//! # Example
//!
//! ```no_run
//! use legwork::config::EngineConfig;
//!
//! let config = EngineConfig::default();
//! assert!(config.validate().is_ok());
//! ```

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
