//! Outbound ports: capabilities the engine consumes.

pub mod collateral;
pub mod oracle;
pub mod treasury;

pub use collateral::{CollateralAdapter, CollateralSpec};
pub use oracle::MarketOracle;
pub use treasury::{PayoutKind, Treasury};
