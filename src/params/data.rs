//! Simulation parameter structures

use crate::error::{SimResult, SimulationError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether the run accumulates savings or amortizes a loan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationType {
    Savings,
    Loan,
}

impl OperationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationType::Savings => "Savings",
            OperationType::Loan => "Loan",
        }
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shape of the periodic cash flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnuityType {
    /// Same amount every period
    Constant,
    /// Amount grows by `growth_rate` % after each period
    Geometric,
}

impl fmt::Display for AnnuityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnnuityType::Constant => f.write_str("constant"),
            AnnuityType::Geometric => f.write_str("geometric"),
        }
    }
}

/// Mode-specific amounts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Operation {
    Savings {
        /// Balance at period 0
        #[serde(default)]
        initial_deposit: f64,
        /// Deposit made at the end of period 1 (base amount for geometric runs)
        periodic_deposit: f64,
    },
    Loan {
        /// Borrowed capital
        loan_amount: f64,
    },
}

/// How the number of periods is determined
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "value", rename_all = "snake_case")]
pub enum TerminationMode {
    /// Explicit duration in years
    ByDuration(f64),
    /// Savings only: stop once the balance reaches this amount
    ByTarget(f64),
    /// Loans only: fixed (first) payment, periods solved from it
    ByPayment(f64),
}

/// Full input of one simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationParameters {
    pub operation: Operation,
    pub annuity_type: AnnuityType,

    /// Annual interest rate in percent
    pub interest_rate: f64,

    /// Payment periods per year (1, 4 or 12 conventionally)
    pub payment_frequency: u32,

    /// Annual growth rate in percent, geometric runs only
    #[serde(default)]
    pub growth_rate: f64,

    pub termination: TerminationMode,
}

impl SimulationParameters {
    /// Savings run with a constant deposit
    pub fn savings(
        initial_deposit: f64,
        periodic_deposit: f64,
        interest_rate: f64,
        payment_frequency: u32,
        termination: TerminationMode,
    ) -> Self {
        Self {
            operation: Operation::Savings {
                initial_deposit,
                periodic_deposit,
            },
            annuity_type: AnnuityType::Constant,
            interest_rate,
            payment_frequency,
            growth_rate: 0.0,
            termination,
        }
    }

    /// Loan run with a constant payment
    pub fn loan(
        loan_amount: f64,
        interest_rate: f64,
        payment_frequency: u32,
        termination: TerminationMode,
    ) -> Self {
        Self {
            operation: Operation::Loan { loan_amount },
            annuity_type: AnnuityType::Constant,
            interest_rate,
            payment_frequency,
            growth_rate: 0.0,
            termination,
        }
    }

    /// Switch to a geometric annuity growing `growth_rate` % per period
    pub fn geometric(mut self, growth_rate: f64) -> Self {
        self.annuity_type = AnnuityType::Geometric;
        self.growth_rate = growth_rate;
        self
    }

    /// Switch to a constant annuity (growth rate reset to 0)
    pub fn constant(mut self) -> Self {
        self.annuity_type = AnnuityType::Constant;
        self.growth_rate = 0.0;
        self
    }

    pub fn with_termination(mut self, termination: TerminationMode) -> Self {
        self.termination = termination;
        self
    }

    /// Replace the periodic deposit of a savings run; loans are returned unchanged
    pub fn with_periodic_deposit(mut self, deposit: f64) -> Self {
        if let Operation::Savings { periodic_deposit, .. } = &mut self.operation {
            *periodic_deposit = deposit;
        }
        self
    }

    pub fn operation_type(&self) -> OperationType {
        match self.operation {
            Operation::Savings { .. } => OperationType::Savings,
            Operation::Loan { .. } => OperationType::Loan,
        }
    }

    pub fn is_geometric(&self) -> bool {
        matches!(self.annuity_type, AnnuityType::Geometric)
    }

    /// Interest rate for one payment period
    pub fn periodic_rate(&self) -> f64 {
        self.interest_rate / 100.0 / self.payment_frequency as f64
    }

    /// Growth applied to the cash flow after each period.
    ///
    /// The annual rate is applied per period as-is (no frequency conversion),
    /// and is zero for constant annuities.
    pub fn periodic_growth_rate(&self) -> f64 {
        if self.is_geometric() {
            self.growth_rate / 100.0
        } else {
            0.0
        }
    }

    /// Duration in years when the run is duration-driven
    pub fn duration_years(&self) -> Option<f64> {
        match self.termination {
            TerminationMode::ByDuration(years) => Some(years),
            _ => None,
        }
    }

    /// Savings target, if any
    pub fn target_amount(&self) -> Option<f64> {
        match self.termination {
            TerminationMode::ByTarget(target) => Some(target),
            _ => None,
        }
    }

    /// Fixed loan payment, if any
    pub fn payment_amount(&self) -> Option<f64> {
        match self.termination {
            TerminationMode::ByPayment(payment) => Some(payment),
            _ => None,
        }
    }

    pub fn initial_deposit(&self) -> f64 {
        match self.operation {
            Operation::Savings { initial_deposit, .. } => initial_deposit,
            Operation::Loan { .. } => 0.0,
        }
    }

    pub fn periodic_deposit(&self) -> f64 {
        match self.operation {
            Operation::Savings { periodic_deposit, .. } => periodic_deposit,
            Operation::Loan { .. } => 0.0,
        }
    }

    pub fn loan_amount(&self) -> f64 {
        match self.operation {
            Operation::Loan { loan_amount } => loan_amount,
            Operation::Savings { .. } => 0.0,
        }
    }

    /// Check the parameter set before any period is computed
    pub fn validate(&self) -> SimResult<()> {
        if self.payment_frequency == 0 {
            return Err(SimulationError::invalid("payment frequency must be positive"));
        }
        if !self.interest_rate.is_finite() || self.interest_rate < 0.0 {
            return Err(SimulationError::invalid("interest rate must be a non-negative number"));
        }
        if !self.growth_rate.is_finite() {
            return Err(SimulationError::invalid("growth rate must be a number"));
        }

        match (self.operation, self.termination) {
            (Operation::Savings { initial_deposit, periodic_deposit }, termination) => {
                if !initial_deposit.is_finite() || initial_deposit < 0.0 {
                    return Err(SimulationError::invalid("initial deposit must be non-negative"));
                }
                if !periodic_deposit.is_finite() || periodic_deposit < 0.0 {
                    return Err(SimulationError::invalid("periodic deposit must be non-negative"));
                }
                match termination {
                    TerminationMode::ByDuration(years) => self.validate_duration(years)?,
                    TerminationMode::ByTarget(target) => {
                        if !target.is_finite() || target <= initial_deposit {
                            return Err(SimulationError::invalid(
                                "target amount must exceed the initial deposit",
                            ));
                        }
                    }
                    TerminationMode::ByPayment(_) => {
                        return Err(SimulationError::invalid(
                            "savings runs take a duration or a target amount, not a payment",
                        ));
                    }
                }
            }
            (Operation::Loan { loan_amount }, termination) => {
                if !loan_amount.is_finite() || loan_amount <= 0.0 {
                    return Err(SimulationError::invalid("loan amount must be positive"));
                }
                match termination {
                    TerminationMode::ByDuration(years) => self.validate_duration(years)?,
                    TerminationMode::ByPayment(payment) => {
                        if !payment.is_finite() || payment <= 0.0 {
                            return Err(SimulationError::invalid("payment amount must be positive"));
                        }
                    }
                    TerminationMode::ByTarget(_) => {
                        return Err(SimulationError::invalid(
                            "loan runs take a duration or a payment amount, not a target",
                        ));
                    }
                }
            }
        }

        Ok(())
    }

    fn validate_duration(&self, years: f64) -> SimResult<()> {
        if !years.is_finite() || years <= 0.0 {
            return Err(SimulationError::invalid("duration must be positive"));
        }
        if (years * self.payment_frequency as f64).floor() < 1.0 {
            return Err(SimulationError::invalid(
                "duration is shorter than one payment period",
            ));
        }
        if years * self.payment_frequency as f64 > u32::MAX as f64 {
            return Err(SimulationError::invalid(
                "duration covers more periods than a schedule can hold",
            ));
        }
        Ok(())
    }
}
