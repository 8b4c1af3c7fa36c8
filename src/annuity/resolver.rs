//! Period-count resolution
//!
//! Turns a duration, a savings target or a loan payment into the number of
//! periods to simulate. Closed forms are used where they exist; the remaining
//! cases step the schedule forward until the goal is met, bounded by
//! `EngineConfig::max_periods`.

use crate::error::{SimResult, SimulationError};
use crate::params::{AnnuityType, Operation, SimulationParameters, TerminationMode};
use super::solver::AnnuityEngine;
use super::state::AnnuityState;

impl AnnuityEngine {
    /// Number of periods the schedule for `params` should cover
    pub fn resolve_periods(&self, params: &SimulationParameters) -> SimResult<u32> {
        params.validate()?;

        let periods = match (params.operation, params.termination) {
            (_, TerminationMode::ByDuration(years)) => {
                (years * params.payment_frequency as f64).floor() as u32
            }
            (Operation::Savings { initial_deposit, periodic_deposit }, TerminationMode::ByTarget(target)) => {
                self.resolve_savings_target(params, initial_deposit, periodic_deposit, target)?
            }
            (Operation::Loan { loan_amount }, TerminationMode::ByPayment(payment)) => {
                self.resolve_loan_payment(params, loan_amount, payment)?
            }
            _ => {
                return Err(SimulationError::invalid(
                    "termination mode does not match the operation type",
                ))
            }
        };

        log::debug!("Resolved {} periods for {:?}", periods, params.termination);
        Ok(periods)
    }

    fn resolve_savings_target(
        &self,
        params: &SimulationParameters,
        initial_deposit: f64,
        periodic_deposit: f64,
        target: f64,
    ) -> SimResult<u32> {
        let rate = params.periodic_rate();

        if params.annuity_type == AnnuityType::Constant && periodic_deposit == 0.0 && initial_deposit > 0.0 {
            log::debug!("Savings target: closed form, compound growth of the initial deposit");
            if rate <= 0.0 {
                return Err(SimulationError::UnreachableTarget {
                    max_periods: self.config().max_periods,
                });
            }
            let periods = ((target / initial_deposit).ln() / (1.0 + rate).ln()).ceil();
            return periods_from_f64(periods, self.config().max_periods);
        }

        log::debug!("Savings target: iterative search");
        let growth = params.periodic_growth_rate();
        let mut state = AnnuityState::savings(initial_deposit, periodic_deposit);

        while state.balance < target && state.period < self.config().max_periods {
            state.accrue(rate);
            state.grow(growth);
        }

        if state.balance < target {
            return Err(SimulationError::UnreachableTarget {
                max_periods: self.config().max_periods,
            });
        }
        Ok(state.period)
    }

    fn resolve_loan_payment(&self, params: &SimulationParameters, loan_amount: f64, payment: f64) -> SimResult<u32> {
        let rate = params.periodic_rate();

        if params.annuity_type == AnnuityType::Constant {
            let interest_due = loan_amount * rate;
            if payment <= interest_due {
                return Err(SimulationError::InsufficientPayment {
                    period: 1,
                    payment,
                    interest_due,
                });
            }

            log::debug!("Loan payment: closed form");
            let periods = if rate == 0.0 {
                (loan_amount / payment).ceil()
            } else {
                ((payment / (payment - interest_due)).ln() / (1.0 + rate).ln()).ceil()
            };
            return periods_from_f64(periods, self.config().max_periods);
        }

        log::debug!("Loan payment: iterative search");
        let growth = params.periodic_growth_rate();
        let mut state = AnnuityState::loan(loan_amount, payment);

        while state.balance > self.config().settle_epsilon && state.period < self.config().max_periods {
            state.amortize(rate)?;
            state.grow(growth);
        }

        if state.balance > self.config().settle_epsilon {
            return Err(SimulationError::UnreachableTarget {
                max_periods: self.config().max_periods,
            });
        }
        Ok(state.period)
    }
}

/// Closed-form results are not capped, but they must be a usable period count
fn periods_from_f64(periods: f64, max_periods: u32) -> SimResult<u32> {
    if !periods.is_finite() || periods > u32::MAX as f64 {
        return Err(SimulationError::UnreachableTarget { max_periods });
    }
    Ok(periods.max(1.0) as u32)
}

/// Resolve the period count with the default engine limits
pub fn resolve_periods(params: &SimulationParameters) -> SimResult<u32> {
    AnnuityEngine::default().resolve_periods(params)
}
