//! Period-by-period output structures

use crate::params::{OperationType, SimulationParameters};
use serde::{Deserialize, Serialize};

/// One computed period
///
/// For savings, `principal` is the deposit credited this period and `balance` the
/// accumulated balance. For loans, `principal` is the capital repaid and `balance`
/// the capital still outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeriodRecord {
    /// 1-based period index
    pub period: u32,

    /// Deposit or payment made this period
    pub cash_flow: f64,

    /// Interest on the opening balance
    pub interest: f64,

    /// Deposit (savings) or amortized capital (loans)
    pub principal: f64,

    /// Closing balance (savings) or remaining capital (loans)
    pub balance: f64,

    /// Running deposits including the initial one (savings) or principal repaid (loans)
    pub total_principal: f64,

    /// Running interest
    pub total_interest: f64,
}

/// Complete simulation output together with the inputs that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub params: SimulationParameters,
    pub records: Vec<PeriodRecord>,
}

impl SimulationResult {
    pub fn new(params: SimulationParameters, records: Vec<PeriodRecord>) -> Self {
        Self { params, records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn first(&self) -> Option<&PeriodRecord> {
        self.records.first()
    }

    pub fn last(&self) -> Option<&PeriodRecord> {
        self.records.last()
    }

    /// Simulated length in years (actual period count, not the requested duration)
    pub fn years(&self) -> f64 {
        periods_to_years(self.records.len(), self.params.payment_frequency)
    }

    /// Get summary statistics
    pub fn summary(&self) -> SimulationSummary {
        SimulationSummary::from_records(&self.params, &self.records)
    }
}

pub(crate) fn periods_to_years(periods: usize, payment_frequency: u32) -> f64 {
    if payment_frequency == 0 {
        0.0
    } else {
        periods as f64 / payment_frequency as f64
    }
}

/// Headline figures of a simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub operation_type: OperationType,
    pub periods: u32,
    pub years: f64,
    pub first_cash_flow: f64,
    pub last_cash_flow: f64,
    pub total_interest: f64,

    /// Total deposits (savings) or principal repaid (loans)
    pub total_principal: f64,

    /// Closing balance (savings) or remaining capital (loans)
    pub final_balance: f64,

    /// Loan amount plus interest (loans) or total deposits (savings)
    pub total_cost: f64,

    /// Interest earned per unit deposited, savings only
    pub yield_ratio: Option<f64>,
}

impl SimulationSummary {
    pub fn from_records(params: &SimulationParameters, records: &[PeriodRecord]) -> Self {
        let first_cash_flow = records.first().map(|r| r.cash_flow).unwrap_or(0.0);
        let last_cash_flow = records.last().map(|r| r.cash_flow).unwrap_or(0.0);
        let total_interest = records.last().map(|r| r.total_interest).unwrap_or(0.0);

        let operation_type = params.operation_type();
        let (total_principal, final_balance) = match records.last() {
            Some(r) => (r.total_principal, r.balance),
            None => match operation_type {
                OperationType::Savings => (params.initial_deposit(), params.initial_deposit()),
                OperationType::Loan => (0.0, params.loan_amount()),
            },
        };

        let (total_cost, yield_ratio) = match operation_type {
            OperationType::Loan => (params.loan_amount() + total_interest, None),
            OperationType::Savings => {
                let ratio = if total_principal > 0.0 {
                    total_interest / total_principal
                } else {
                    0.0
                };
                (total_principal, Some(ratio))
            }
        };

        Self {
            operation_type,
            periods: records.len() as u32,
            years: periods_to_years(records.len(), params.payment_frequency),
            first_cash_flow,
            last_cash_flow,
            total_interest,
            total_principal,
            final_balance,
            total_cost,
            yield_ratio,
        }
    }
}
