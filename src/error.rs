//! Error types for simulation runs

use thiserror::Error;

/// Failure of a single resolve/simulate call
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
    /// Rejected before any period is computed
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    /// Iterative resolution hit the period ceiling without reaching the goal
    #[error("Target not reachable within {max_periods} periods")]
    UnreachableTarget { max_periods: u32 },

    /// Payment does not cover the interest due for a period
    #[error("Payment of {payment:.2} does not cover interest of {interest_due:.2} in period {period}")]
    InsufficientPayment {
        period: u32,
        payment: f64,
        interest_due: f64,
    },
}

pub type SimResult<T> = Result<T, SimulationError>;

impl SimulationError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        SimulationError::InvalidParameters(msg.into())
    }
}
