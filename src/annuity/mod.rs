//! Annuity engine for savings accumulation and loan amortization schedules

mod state;
mod solver;
mod resolver;
mod records;

pub use state::{AnnuityState, Shortfall};
pub use solver::{AnnuityEngine, constant_payment, simulate};
pub use resolver::resolve_periods;
pub use records::{PeriodRecord, SimulationResult, SimulationSummary};

pub(crate) use records::periods_to_years;
