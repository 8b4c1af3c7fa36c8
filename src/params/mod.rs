//! Simulation parameters and CSV loading

mod data;
pub mod loader;

pub use data::{AnnuityType, Operation, OperationType, SimulationParameters, TerminationMode};
pub use loader::{load_parameters, load_parameters_from_reader, LoadError, NamedParameters};
