//! Scenario runner for batch simulations
//!
//! Holds one configured engine and fans parameter sets out over it.

use crate::annuity::{AnnuityEngine, SimulationResult};
use crate::config::EngineConfig;
use crate::error::SimResult;
use crate::params::SimulationParameters;
use rayon::prelude::*;

/// Runs many simulations against the same engine limits
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new();
///
/// // Same loan at several rates
/// let variants: Vec<_> = [3.0, 4.0, 5.0]
///     .iter()
///     .map(|&rate| SimulationParameters::loan(100_000.0, rate, 12, TerminationMode::ByDuration(20.0)))
///     .collect();
/// let results = runner.run_batch(&variants);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    engine: AnnuityEngine,
}

impl ScenarioRunner {
    /// Runner with default engine limits
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            engine: AnnuityEngine::new(config),
        }
    }

    pub fn engine(&self) -> &AnnuityEngine {
        &self.engine
    }

    /// Run a single simulation
    pub fn run(&self, params: &SimulationParameters) -> SimResult<SimulationResult> {
        self.engine.run(params)
    }

    /// Run independent parameter sets in parallel, results in input order
    pub fn run_batch(&self, batch: &[SimulationParameters]) -> Vec<SimResult<SimulationResult>> {
        batch.par_iter().map(|params| self.engine.run(params)).collect()
    }

    /// Run variants of one base parameter set, e.g. a sweep over rates
    pub fn run_scenarios<F>(&self, base: &SimulationParameters, variants: &[f64], apply: F) -> Vec<SimResult<SimulationResult>>
    where
        F: Fn(SimulationParameters, f64) -> SimulationParameters + Sync,
    {
        variants
            .par_iter()
            .map(|&value| self.engine.run(&apply(base.clone(), value)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimulationError;
    use crate::params::TerminationMode;

    fn loan(rate: f64) -> SimulationParameters {
        SimulationParameters::loan(100_000.0, rate, 12, TerminationMode::ByDuration(10.0))
    }

    #[test]
    fn test_run_batch_keeps_order_and_errors() {
        let runner = ScenarioRunner::new();
        let batch = vec![
            loan(3.0),
            SimulationParameters::loan(1_000.0, 5.0, 12, TerminationMode::ByPayment(1.0)),
            loan(6.0),
        ];

        let results = runner.run_batch(&batch);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().params, batch[0]);
        assert!(matches!(results[1], Err(SimulationError::InsufficientPayment { .. })));
        assert_eq!(results[2].as_ref().unwrap().len(), 120);
    }

    #[test]
    fn test_rate_sweep() {
        let runner = ScenarioRunner::new();
        let results = runner.run_scenarios(&loan(3.0), &[3.0, 4.0, 5.0], |mut p, rate| {
            p.interest_rate = rate;
            p
        });

        let interest: Vec<f64> = results
            .into_iter()
            .map(|r| r.unwrap().summary().total_interest)
            .collect();

        // Higher rate costs more interest
        assert!(interest[0] < interest[1]);
        assert!(interest[1] < interest[2]);
    }

    #[test]
    fn test_runner_respects_period_cap() {
        let runner = ScenarioRunner::with_config(EngineConfig {
            max_periods: 10,
            ..EngineConfig::default()
        });
        let params = SimulationParameters::savings(0.0, 100.0, 2.0, 12, TerminationMode::ByTarget(5_000.0));

        assert!(matches!(
            runner.run(&params),
            Err(SimulationError::UnreachableTarget { max_periods: 10 })
        ));
    }
}
