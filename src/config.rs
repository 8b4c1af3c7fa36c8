//! Run configuration: iteration limits, recommendation tuning and display currency

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use thiserror::Error;

/// Hard ceiling for iterative period resolution
pub const DEFAULT_MAX_PERIODS: u32 = 1000;

/// Loan capital at or below this amount counts as repaid
pub const DEFAULT_SETTLE_EPSILON: f64 = 0.01;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed config file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Limits applied by the resolver and solver
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum number of periods an iterative resolution may try
    pub max_periods: u32,

    /// Remaining capital considered fully amortized
    pub settle_epsilon: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_periods: DEFAULT_MAX_PERIODS,
            settle_epsilon: DEFAULT_SETTLE_EPSILON,
        }
    }
}

/// Perturbations used by the recommendation engine
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationConfig {
    /// Fractional payment increase proposed for loans (0.10 = +10%)
    pub loan_payment_increase: f64,

    /// Fractional deposit increase proposed for savings (0.20 = +20%)
    pub savings_deposit_increase: f64,

    /// Growth rate (annual %) proposed when a loan uses a constant annuity
    pub loan_suggested_growth: f64,

    /// Growth rate (annual %) proposed when savings use a constant annuity
    pub savings_suggested_growth: f64,

    /// Duration multiplier for the shorter-loan proposal
    pub loan_duration_factor: f64,

    /// Duration multiplier for the longer-savings proposal
    pub savings_duration_factor: f64,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            loan_payment_increase: 0.10,
            savings_deposit_increase: 0.20,
            loan_suggested_growth: 2.0,
            savings_suggested_growth: 3.0,
            loan_duration_factor: 0.8,
            savings_duration_factor: 1.5,
        }
    }
}

/// Top-level configuration
///
/// Every field has a default, so a JSON file only needs the values it overrides:
///
/// ```json
/// { "currency": "EUR", "engine": { "max_periods": 600 } }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub engine: EngineConfig,
    pub recommendations: RecommendationConfig,

    /// Label appended to formatted amounts
    pub currency: String,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            recommendations: RecommendationConfig::default(),
            currency: "DH".to_string(),
        }
    }
}

impl SimulationConfig {
    /// Load configuration from a JSON file
    pub fn from_json_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        let config = serde_json::from_reader(BufReader::new(file))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: SimulationConfig =
            serde_json::from_str(r#"{ "currency": "EUR", "engine": { "max_periods": 600 } }"#).unwrap();

        assert_eq!(config.currency, "EUR");
        assert_eq!(config.engine.max_periods, 600);
        assert_eq!(config.engine.settle_epsilon, DEFAULT_SETTLE_EPSILON);
        assert_eq!(config.recommendations.savings_suggested_growth, 3.0);
    }
}
