//! Recommendation engine
//!
//! Re-runs a completed simulation with one parameter changed at a time and
//! describes the difference. Each recommendation is computed independently:
//! when a perturbed run fails, that field gets a fixed fallback text and the
//! other fields are still produced.

use crate::annuity::{AnnuityEngine, SimulationResult};
use crate::config::{RecommendationConfig, SimulationConfig};
use crate::error::SimResult;
use crate::params::{OperationType, SimulationParameters, TerminationMode};
use crate::report::{format_amount, format_years};
use serde::{Deserialize, Serialize};

pub const LOAN_PAYMENT_FALLBACK: &str =
    "Cannot estimate the effect of a higher payment with the current parameters.";
pub const SAVINGS_PAYMENT_FALLBACK: &str =
    "Cannot estimate the effect of a higher deposit with the current parameters.";
pub const GROWTH_FALLBACK: &str = "Cannot compare annuity types with the current parameters.";
pub const LOAN_DURATION_FALLBACK: &str =
    "Cannot estimate the effect of a shorter duration with the current parameters.";
pub const SAVINGS_DURATION_FALLBACK: &str =
    "Cannot estimate the effect of a longer duration with the current parameters.";

/// Human-readable suggestions for one simulation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Effect of a larger payment or deposit
    pub payment: Option<String>,

    /// Effect of switching between constant and geometric annuities
    pub growth: Option<String>,

    /// Effect of a different duration; only for duration-driven runs
    pub duration: Option<String>,
}

/// Figures of a run that recommendations are measured against
struct Baseline {
    years: f64,
    first_cash_flow: f64,
    total_interest: f64,
    final_balance: f64,
}

impl Baseline {
    fn of(result: &SimulationResult) -> Self {
        let summary = result.summary();
        Self {
            years: summary.years,
            first_cash_flow: summary.first_cash_flow,
            total_interest: summary.total_interest,
            final_balance: summary.final_balance,
        }
    }
}

pub struct RecommendationEngine {
    engine: AnnuityEngine,
    config: RecommendationConfig,
    currency: String,
}

impl RecommendationEngine {
    pub fn new(engine: AnnuityEngine, config: RecommendationConfig, currency: impl Into<String>) -> Self {
        Self {
            engine,
            config,
            currency: currency.into(),
        }
    }

    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::new(
            AnnuityEngine::new(config.engine.clone()),
            config.recommendations.clone(),
            config.currency.clone(),
        )
    }

    /// Build all recommendations for a completed simulation
    pub fn recommend(&self, result: &SimulationResult) -> Recommendation {
        let baseline = Baseline::of(result);
        let params = &result.params;

        match params.operation_type() {
            OperationType::Loan => Recommendation {
                payment: Some(absorb(self.loan_payment(params, &baseline), LOAN_PAYMENT_FALLBACK)),
                growth: Some(absorb(self.loan_growth(params, &baseline), GROWTH_FALLBACK)),
                duration: params
                    .duration_years()
                    .map(|years| absorb(self.loan_duration(params, &baseline, years), LOAN_DURATION_FALLBACK)),
            },
            OperationType::Savings => Recommendation {
                payment: Some(absorb(self.savings_deposit(params, &baseline), SAVINGS_PAYMENT_FALLBACK)),
                growth: Some(absorb(self.savings_growth(params, &baseline), GROWTH_FALLBACK)),
                duration: params.duration_years().map(|years| {
                    absorb(self.savings_duration(params, &baseline, years), SAVINGS_DURATION_FALLBACK)
                }),
            },
        }
    }

    fn amount(&self, value: f64) -> String {
        format_amount(value, &self.currency)
    }

    fn loan_payment(&self, params: &SimulationParameters, base: &Baseline) -> SimResult<String> {
        let current = params.payment_amount().unwrap_or(base.first_cash_flow);
        let increase = current * self.config.loan_payment_increase;
        let increased = current + increase;

        let alt = self
            .engine
            .run(&params.clone().with_termination(TerminationMode::ByPayment(increased)))?;
        let alt = alt.summary();

        Ok(format!(
            "Raising your payment by {} ({} instead of {}) would save {} in interest and repay the loan {:.1} years earlier.",
            self.amount(increase),
            self.amount(increased),
            self.amount(current),
            self.amount(base.total_interest - alt.total_interest),
            base.years - alt.years,
        ))
    }

    fn loan_growth(&self, params: &SimulationParameters, base: &Baseline) -> SimResult<String> {
        if params.is_geometric() {
            let alt = self.engine.run(&params.clone().constant())?.summary();
            let diff = base.total_interest - alt.total_interest;
            if diff > 0.0 {
                Ok(format!(
                    "A constant annuity would save {} in interest compared with your geometric annuity growing {}% per period.",
                    self.amount(diff),
                    params.growth_rate,
                ))
            } else {
                Ok(format!(
                    "Your geometric annuity growing {}% per period saves {} in interest compared with a constant annuity.",
                    params.growth_rate,
                    self.amount(diff.abs()),
                ))
            }
        } else {
            let suggested = self.config.loan_suggested_growth;
            let alt = self.engine.run(&params.clone().geometric(suggested))?.summary();
            let diff = base.total_interest - alt.total_interest;
            if diff > 0.0 {
                Ok(format!(
                    "A geometric annuity growing {}% per period would save {} in interest compared with your constant annuity.",
                    suggested,
                    self.amount(diff),
                ))
            } else {
                Ok(format!(
                    "Your constant annuity saves {} in interest compared with a geometric annuity growing {}% per period.",
                    self.amount(diff.abs()),
                    suggested,
                ))
            }
        }
    }

    fn loan_duration(&self, params: &SimulationParameters, base: &Baseline, years: f64) -> SimResult<String> {
        let shorter = years * self.config.loan_duration_factor;
        let alt = self
            .engine
            .run(&params.clone().with_termination(TerminationMode::ByDuration(shorter)))?
            .summary();

        Ok(format!(
            "Shortening the loan from {} to {} years ({} years less) would raise your first payment by {} but save {} in interest.",
            format_years(years),
            format_years(shorter),
            format_years(years - shorter),
            self.amount(alt.first_cash_flow - base.first_cash_flow),
            self.amount(base.total_interest - alt.total_interest),
        ))
    }

    fn savings_deposit(&self, params: &SimulationParameters, base: &Baseline) -> SimResult<String> {
        let current = params.periodic_deposit();
        let increase = current * self.config.savings_deposit_increase;
        let increased = current + increase;

        let alt = self
            .engine
            .run(&params.clone().with_periodic_deposit(increased))?
            .summary();

        Ok(format!(
            "Raising your periodic deposit by {} ({} instead of {}) would add {} to your final balance, for a total of {}.",
            self.amount(increase),
            self.amount(increased),
            self.amount(current),
            self.amount(alt.final_balance - base.final_balance),
            self.amount(alt.final_balance),
        ))
    }

    fn savings_growth(&self, params: &SimulationParameters, base: &Baseline) -> SimResult<String> {
        if params.is_geometric() {
            let alt = self.engine.run(&params.clone().constant())?.summary();
            let diff = base.final_balance - alt.final_balance;
            if diff > 0.0 {
                Ok(format!(
                    "Your geometric annuity growing {}% per period yields {} more than a constant annuity.",
                    params.growth_rate,
                    self.amount(diff),
                ))
            } else {
                Ok(format!(
                    "A constant annuity would yield {} more than your geometric annuity growing {}% per period.",
                    self.amount(diff.abs()),
                    params.growth_rate,
                ))
            }
        } else {
            let suggested = self.config.savings_suggested_growth;
            let alt = self.engine.run(&params.clone().geometric(suggested))?.summary();
            let diff = alt.final_balance - base.final_balance;
            if diff > 0.0 {
                Ok(format!(
                    "A geometric annuity with deposits growing {}% per period could yield {} more than your constant annuity.",
                    suggested,
                    self.amount(diff),
                ))
            } else {
                Ok(format!(
                    "Your constant annuity yields {} more than a geometric annuity growing {}% per period.",
                    self.amount(diff.abs()),
                    suggested,
                ))
            }
        }
    }

    fn savings_duration(&self, params: &SimulationParameters, base: &Baseline, years: f64) -> SimResult<String> {
        let longer = years * self.config.savings_duration_factor;
        let alt = self
            .engine
            .run(&params.clone().with_termination(TerminationMode::ByDuration(longer)))?
            .summary();

        Ok(format!(
            "Extending your savings plan from {} to {} years ({} more years) would add {} to your final balance, of which {} is interest.",
            format_years(years),
            format_years(longer),
            format_years(longer - years),
            self.amount(alt.final_balance - base.final_balance),
            self.amount(alt.total_interest - base.total_interest),
        ))
    }
}

impl Default for RecommendationEngine {
    fn default() -> Self {
        Self::from_config(&SimulationConfig::default())
    }
}

fn absorb(outcome: SimResult<String>, fallback: &str) -> String {
    outcome.unwrap_or_else(|err| {
        log::warn!("Recommendation skipped: {}", err);
        fallback.to_string()
    })
}
