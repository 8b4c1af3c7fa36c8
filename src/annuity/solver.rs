//! Core annuity engine: builds savings and loan schedules period by period

use crate::config::EngineConfig;
use crate::error::{SimResult, SimulationError};
use crate::params::{Operation, SimulationParameters, TerminationMode};
use super::records::{PeriodRecord, SimulationResult};
use super::state::{AnnuityState, Shortfall};

impl From<Shortfall> for SimulationError {
    fn from(s: Shortfall) -> Self {
        SimulationError::InsufficientPayment {
            period: s.period,
            payment: s.payment,
            interest_due: s.interest_due,
        }
    }
}

/// Main simulation engine
///
/// Stateless apart from its limits, so one engine can serve any number of
/// independent parameter sets (including from several threads).
#[derive(Debug, Clone, Default)]
pub struct AnnuityEngine {
    config: EngineConfig,
}

impl AnnuityEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Resolve the period count and build the full schedule
    pub fn run(&self, params: &SimulationParameters) -> SimResult<SimulationResult> {
        let total_periods = self.resolve_periods(params)?;
        let records = self.simulate(params, total_periods)?;
        Ok(SimulationResult::new(params.clone(), records))
    }

    /// Build the schedule for at most `total_periods` periods
    pub fn simulate(&self, params: &SimulationParameters, total_periods: u32) -> SimResult<Vec<PeriodRecord>> {
        params.validate()?;

        log::debug!(
            "Simulating {} {} annuity over at most {} periods",
            params.annuity_type,
            params.operation_type(),
            total_periods
        );

        let records = match params.operation {
            Operation::Savings { initial_deposit, periodic_deposit } => {
                self.simulate_savings(params, initial_deposit, periodic_deposit, total_periods)
            }
            Operation::Loan { loan_amount } => {
                self.simulate_loan(params, loan_amount, total_periods)?
            }
        };

        log::debug!("Schedule stopped after {} periods", records.len());
        Ok(records)
    }

    fn simulate_savings(
        &self,
        params: &SimulationParameters,
        initial_deposit: f64,
        periodic_deposit: f64,
        total_periods: u32,
    ) -> Vec<PeriodRecord> {
        let rate = params.periodic_rate();
        let growth = params.periodic_growth_rate();
        let target = params.target_amount();

        let mut state = AnnuityState::savings(initial_deposit, periodic_deposit);
        let mut records = Vec::with_capacity(total_periods.min(self.config.max_periods) as usize);

        for _ in 0..total_periods {
            records.push(state.accrue(rate));

            // Period 1 uses the base deposit; growth applies from period 2 on
            state.grow(growth);

            if target.is_some_and(|t| state.balance >= t) {
                break;
            }
        }

        records
    }

    fn simulate_loan(
        &self,
        params: &SimulationParameters,
        loan_amount: f64,
        total_periods: u32,
    ) -> SimResult<Vec<PeriodRecord>> {
        let rate = params.periodic_rate();
        let growth = params.periodic_growth_rate();
        let first_payment = self.first_payment(params, total_periods)?;

        let mut state = AnnuityState::loan(loan_amount, first_payment);
        let mut records = Vec::with_capacity(total_periods.min(self.config.max_periods) as usize);

        for _ in 0..total_periods {
            records.push(state.amortize(rate)?);
            state.grow(growth);

            if state.balance <= self.config.settle_epsilon {
                break;
            }
        }

        Ok(records)
    }

    /// First loan payment for a schedule of `total_periods` periods.
    ///
    /// Geometric loans given a duration use a linear correction of the constant
    /// payment, `constant / (1 + g * (n - 1) / 2)`. This is an approximation: the
    /// resulting schedule is not guaranteed to amortize exactly in `n` periods.
    pub fn first_payment(&self, params: &SimulationParameters, total_periods: u32) -> SimResult<f64> {
        match params.termination {
            TerminationMode::ByPayment(payment) => Ok(payment),
            TerminationMode::ByDuration(_) => {
                if total_periods == 0 {
                    return Err(SimulationError::invalid("loan schedule needs at least one period"));
                }
                let constant = constant_payment(params.loan_amount(), params.periodic_rate(), total_periods);
                let growth = params.periodic_growth_rate();
                Ok(constant / (1.0 + growth * (total_periods as f64 - 1.0) / 2.0))
            }
            TerminationMode::ByTarget(_) => Err(SimulationError::invalid(
                "loan runs take a duration or a payment amount, not a target",
            )),
        }
    }
}

/// Level payment amortizing `principal` over `periods` at `rate` per period
pub fn constant_payment(principal: f64, rate: f64, periods: u32) -> f64 {
    if rate == 0.0 {
        return principal / periods as f64;
    }
    // r / (1 - (1+r)^-n), same as r(1+r)^n / ((1+r)^n - 1) but finite for any u32 count
    let discount = (1.0 + rate).powf(-(periods as f64));
    principal * rate / (1.0 - discount)
}

/// Build a schedule with the default engine limits
pub fn simulate(params: &SimulationParameters, total_periods: u32) -> SimResult<Vec<PeriodRecord>> {
    AnnuityEngine::default().simulate(params, total_periods)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn reference_loan() -> SimulationParameters {
        SimulationParameters::loan(100_000.0, 6.0, 12, TerminationMode::ByDuration(10.0))
    }

    #[test]
    fn test_constant_loan_reference_schedule() {
        let engine = AnnuityEngine::default();
        let result = engine.run(&reference_loan()).unwrap();

        assert_eq!(result.len(), 120);

        let first = result.first().unwrap();
        assert_abs_diff_eq!(first.cash_flow, 1110.205, epsilon = 0.001);
        assert_abs_diff_eq!(first.interest, 500.0, epsilon = 1e-9);
        assert_abs_diff_eq!(first.principal, 610.205, epsilon = 0.001);

        let last = result.last().unwrap();
        assert!(last.balance.abs() <= 0.01, "final capital {}", last.balance);
        assert_abs_diff_eq!(last.total_principal, 100_000.0, epsilon = 0.01);
    }

    #[test]
    fn test_loan_capital_never_increases() {
        let result = AnnuityEngine::default().run(&reference_loan().geometric(0.5)).unwrap();

        let mut previous = 100_000.0;
        for row in &result.records {
            assert!(row.balance <= previous);
            previous = row.balance;
        }
    }

    #[test]
    fn test_zero_rate_loan_splits_capital_evenly() {
        let params = SimulationParameters::loan(12_000.0, 0.0, 12, TerminationMode::ByDuration(1.0));
        let result = AnnuityEngine::default().run(&params).unwrap();

        assert_eq!(result.len(), 12);
        assert_abs_diff_eq!(result.records[0].cash_flow, 1000.0, epsilon = 1e-9);
        assert_eq!(result.last().unwrap().total_interest, 0.0);
    }

    #[test]
    fn test_savings_balance_identity() {
        let params = SimulationParameters::savings(2_500.0, 300.0, 4.0, 12, TerminationMode::ByDuration(15.0))
            .geometric(0.2);
        let records = simulate(&params, 180).unwrap();

        let mut interest_sum = 0.0;
        for row in &records {
            interest_sum += row.interest;
            assert_abs_diff_eq!(row.total_interest, interest_sum, epsilon = 1e-6);
            assert_abs_diff_eq!(row.balance, row.total_principal + row.total_interest, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_geometric_deposit_starts_at_base() {
        let params = SimulationParameters::savings(0.0, 100.0, 0.0, 12, TerminationMode::ByDuration(1.0))
            .geometric(10.0);
        let records = simulate(&params, 3).unwrap();

        assert_abs_diff_eq!(records[0].cash_flow, 100.0, epsilon = 1e-12);
        assert_abs_diff_eq!(records[1].cash_flow, 110.0, epsilon = 1e-9);
        assert_abs_diff_eq!(records[2].cash_flow, 121.0, epsilon = 1e-9);
    }

    #[test]
    fn test_zero_growth_matches_constant() {
        let savings = SimulationParameters::savings(1_000.0, 250.0, 3.5, 4, TerminationMode::ByDuration(8.0));
        assert_eq!(
            simulate(&savings, 32).unwrap(),
            simulate(&savings.clone().geometric(0.0), 32).unwrap()
        );

        let loan = SimulationParameters::loan(50_000.0, 5.0, 12, TerminationMode::ByPayment(900.0));
        assert_eq!(
            simulate(&loan, 200).unwrap(),
            simulate(&loan.clone().geometric(0.0), 200).unwrap()
        );
    }

    #[test]
    fn test_geometric_loan_first_payment_correction() {
        let engine = AnnuityEngine::default();
        let params = reference_loan().geometric(2.0);

        let constant = constant_payment(100_000.0, 0.005, 120);
        let expected = constant / (1.0 + 0.02 * 119.0 / 2.0);
        assert_abs_diff_eq!(engine.first_payment(&params, 120).unwrap(), expected, epsilon = 1e-9);
    }

    #[test]
    fn test_geometric_loan_fails_when_payment_falls_below_interest() {
        // Shrinking payments eventually stop covering interest
        let params = SimulationParameters::loan(100_000.0, 6.0, 12, TerminationMode::ByPayment(600.0))
            .geometric(-1.0);
        let err = simulate(&params, 500).unwrap_err();

        assert!(matches!(err, SimulationError::InsufficientPayment { .. }));
    }

    #[test]
    fn test_period_limit_is_not_preallocated() {
        // Only about 46 periods are needed; the limit is an upper bound
        let params = SimulationParameters::savings(0.0, 1000.0, 3.0, 12, TerminationMode::ByTarget(50_000.0));
        let records = simulate(&params, u32::MAX).unwrap();

        assert!(records.len() < 60);
        assert!(records.last().unwrap().balance >= 50_000.0);
    }

    #[test]
    fn test_constant_payment_for_very_long_schedules() {
        // Beyond i32::MAX periods the payment tends to interest only
        let payment = constant_payment(100_000.0, 0.005, 3_000_000_000);
        assert!(payment.is_finite());
        assert_abs_diff_eq!(payment, 500.0, epsilon = 1e-6);
    }

    #[test]
    fn test_savings_target_stops_early() {
        let params = SimulationParameters::savings(0.0, 1000.0, 3.0, 12, TerminationMode::ByTarget(10_000.0));
        let records = simulate(&params, 1000).unwrap();

        let last = records.last().unwrap();
        assert!(last.balance >= 10_000.0);
        assert!(records[records.len() - 2].balance < 10_000.0);
    }
}
