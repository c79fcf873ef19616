//! Engine configuration loaded from TOML files.
//!
//! Deployment-time parameters (fee fractions, risk caps, leg limits) are
//! an explicit per-environment struct handed to the engine at
//! construction, never global mutable state.

use std::path::Path;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;

use crate::error::ConfigError;

/// Protocol fee fractions.
#[derive(Debug, Clone, Deserialize)]
pub struct FeeConfig {
    /// AMM fee as a fraction of gross stake (e.g. 0.05 = 5%).
    pub amm_fee: Decimal,
    /// Safe-box fee as a fraction of gross stake (e.g. 0.02 = 2%).
    pub safe_box_fee: Decimal,
    /// Fraction of the safe-box fee carved out for a referrer, when one
    /// is present (e.g. 0.25 = a quarter of the safe-box cut).
    pub referrer_share: Decimal,
}

impl Default for FeeConfig {
    fn default() -> Self {
        Self {
            amm_fee: dec!(0.05),
            safe_box_fee: dec!(0.02),
            referrer_share: dec!(0.25),
        }
    }
}

/// Risk caps enforced at purchase time.
#[derive(Debug, Clone, Deserialize)]
pub struct RiskConfig {
    /// Maximum gross stake accepted on a single parlay.
    pub max_stake: Decimal,
    /// Minimum combined quote. Caps the payout multiplier and thereby the
    /// AMM's maximum liability per ticket (0.01 = at most 100x).
    pub min_combined_quote: Decimal,
    /// Maximum exposure the AMM accepts against a single leg market.
    pub max_market_exposure: Decimal,
    /// Maximum exposure the AMM accepts across all open parlays.
    pub max_global_exposure: Decimal,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            max_stake: dec!(1000),
            min_combined_quote: dec!(0.01),
            max_market_exposure: dec!(10000),
            max_global_exposure: dec!(100000),
        }
    }
}

/// Structural limits on the parlay itself.
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// Maximum number of legs per parlay (minimum is always 2).
    pub max_legs: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self { max_legs: 8 }
    }
}

/// Complete engine configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub fees: FeeConfig,
    #[serde(default)]
    pub risk: RiskConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
}

impl EngineConfig {
    /// Load configuration from a TOML file and validate it.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        let config: EngineConfig = toml::from_str(&content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate cross-field invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let unit = |v: Decimal| v >= Decimal::ZERO && v < Decimal::ONE;

        if !unit(self.fees.amm_fee) {
            return Err(ConfigError::InvalidValue {
                field: "fees.amm_fee",
                reason: "must be a fraction in [0, 1)".into(),
            });
        }
        if !unit(self.fees.safe_box_fee) {
            return Err(ConfigError::InvalidValue {
                field: "fees.safe_box_fee",
                reason: "must be a fraction in [0, 1)".into(),
            });
        }
        if self.fees.amm_fee + self.fees.safe_box_fee >= Decimal::ONE {
            return Err(ConfigError::InvalidValue {
                field: "fees",
                reason: "amm_fee + safe_box_fee must be below 1".into(),
            });
        }
        if self.fees.referrer_share < Decimal::ZERO || self.fees.referrer_share > Decimal::ONE {
            return Err(ConfigError::InvalidValue {
                field: "fees.referrer_share",
                reason: "must be a fraction in [0, 1]".into(),
            });
        }
        if self.risk.max_stake <= Decimal::ZERO {
            return Err(ConfigError::InvalidValue {
                field: "risk.max_stake",
                reason: "must be greater than 0".into(),
            });
        }
        if self.risk.min_combined_quote <= Decimal::ZERO
            || self.risk.min_combined_quote >= Decimal::ONE
        {
            return Err(ConfigError::InvalidValue {
                field: "risk.min_combined_quote",
                reason: "must be strictly between 0 and 1".into(),
            });
        }
        if self.risk.max_market_exposure <= Decimal::ZERO {
            return Err(ConfigError::InvalidValue {
                field: "risk.max_market_exposure",
                reason: "must be greater than 0".into(),
            });
        }
        if self.risk.max_global_exposure < self.risk.max_market_exposure {
            return Err(ConfigError::InvalidValue {
                field: "risk.max_global_exposure",
                reason: "must be at least max_market_exposure".into(),
            });
        }
        if self.limits.max_legs < 2 {
            return Err(ConfigError::InvalidValue {
                field: "limits.max_legs",
                reason: "must be at least 2".into(),
            });
        }
        Ok(())
    }
}
