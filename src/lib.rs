//! Annuity Simulator - Savings accumulation and loan amortization schedules
//!
//! This library provides:
//! - Period-by-period schedules for constant and geometric annuities
//! - Period-count resolution from a savings target or a loan payment
//! - What-if recommendations built from perturbed re-runs
//! - Saved scenarios and side-by-side comparison
//! - Parallel batch runs over parameter files

pub mod annuity;
pub mod compare;
pub mod config;
pub mod error;
pub mod params;
pub mod recommend;
pub mod report;
pub mod scenario;

// Re-export commonly used types
pub use annuity::{AnnuityEngine, PeriodRecord, SimulationResult, SimulationSummary};
pub use compare::{compare_scenarios, compare_stored, ComparisonRow};
pub use config::SimulationConfig;
pub use error::{SimResult, SimulationError};
pub use params::{AnnuityType, Operation, OperationType, SimulationParameters, TerminationMode};
pub use recommend::{Recommendation, RecommendationEngine};
pub use scenario::{JsonFileStore, MemoryStore, Scenario, ScenarioRunner, ScenarioStore};
