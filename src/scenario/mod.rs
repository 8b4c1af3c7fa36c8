//! Named, persisted simulation snapshots
//!
//! A [`Scenario`] is created from a finished [`SimulationResult`] and never
//! modified afterwards. Storage goes through the [`ScenarioStore`] trait so the
//! engine itself never touches persistence.

mod runner;
mod store;

pub use runner::ScenarioRunner;
pub use store::{JsonFileStore, MemoryStore, ScenarioStore, StoreError};

use crate::annuity::{PeriodRecord, SimulationResult, SimulationSummary};
use crate::params::{OperationType, SimulationParameters};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub id: String,
    pub name: String,
    pub timestamp: DateTime<Utc>,
    pub params: SimulationParameters,
    pub data: Vec<PeriodRecord>,
}

impl Scenario {
    /// Snapshot a result; without a name, one is derived from the operation and date
    pub fn new(name: Option<String>, result: SimulationResult) -> Self {
        let timestamp = Utc::now();
        let name = name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| default_name(result.params.operation_type(), &timestamp));

        Self {
            id: format!("scenario_{}", Uuid::new_v4().simple()),
            name,
            timestamp,
            params: result.params,
            data: result.records,
        }
    }

    pub fn operation_type(&self) -> OperationType {
        self.params.operation_type()
    }

    /// Simulated length in years
    pub fn years(&self) -> f64 {
        crate::annuity::periods_to_years(self.data.len(), self.params.payment_frequency)
    }

    pub fn summary(&self) -> SimulationSummary {
        SimulationSummary::from_records(&self.params, &self.data)
    }

    /// Rebuild the simulation result this scenario was saved from
    pub fn to_result(&self) -> SimulationResult {
        SimulationResult::new(self.params.clone(), self.data.clone())
    }
}

fn default_name(operation: OperationType, timestamp: &DateTime<Utc>) -> String {
    format!("{} - {}", operation, timestamp.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annuity::AnnuityEngine;
    use crate::params::TerminationMode;

    fn loan_result() -> SimulationResult {
        let params = SimulationParameters::loan(10_000.0, 5.0, 12, TerminationMode::ByDuration(2.0));
        AnnuityEngine::default().run(&params).unwrap()
    }

    #[test]
    fn test_default_name_and_id() {
        let scenario = Scenario::new(None, loan_result());

        assert!(scenario.name.starts_with("Loan - "));
        assert!(scenario.id.starts_with("scenario_"));
        assert_eq!(scenario.data.len(), 24);
        assert_eq!(scenario.years(), 2.0);
    }

    #[test]
    fn test_ids_are_unique() {
        let a = Scenario::new(Some("a".to_string()), loan_result());
        let b = Scenario::new(Some("a".to_string()), loan_result());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_blank_name_falls_back_to_default() {
        let scenario = Scenario::new(Some("   ".to_string()), loan_result());
        assert!(scenario.name.starts_with("Loan - "));
    }

    #[test]
    fn test_round_trips_through_json() {
        let scenario = Scenario::new(Some("house".to_string()), loan_result());
        let json = serde_json::to_string(&scenario).unwrap();
        let back: Scenario = serde_json::from_str(&json).unwrap();

        assert_eq!(back, scenario);
        assert_eq!(back.to_result(), loan_result());
    }
}
