//! Side-by-side comparison of two saved scenarios

use crate::params::OperationType;
use crate::report::{format_amount, format_percent, format_years};
use crate::scenario::{Scenario, ScenarioStore, StoreError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ComparisonError {
    #[error("Cannot compare a scenario with itself")]
    SameScenario,

    #[error("Scenario '{0}' not found")]
    NotFound(String),

    #[error("Cannot compare a {0} scenario with a {1} scenario")]
    OperationMismatch(OperationType, OperationType),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// How a row's values are displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    Currency,
    Percent,
    Years,
}

/// One compared metric; `difference` is always `value1 - value2`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub criterion: String,
    pub value1: f64,
    pub value2: f64,
    pub difference: f64,
    pub unit: Unit,
}

impl ComparisonRow {
    fn new(criterion: &str, value1: f64, value2: f64, unit: Unit) -> Self {
        Self {
            criterion: criterion.to_string(),
            value1,
            value2,
            difference: value1 - value2,
            unit,
        }
    }

    /// Formatted `(value1, value2, difference)`
    pub fn display(&self, currency: &str) -> (String, String, String) {
        let fmt = |v: f64| match self.unit {
            Unit::Currency => format_amount(v, currency),
            Unit::Percent => format_percent(v),
            Unit::Years => format_years(v),
        };
        (fmt(self.value1), fmt(self.value2), fmt(self.difference))
    }
}

/// Compare two scenarios of the same operation type.
///
/// The row set follows the first scenario's operation type; passing scenarios
/// of different types gives meaningless rows rather than an error. Durations
/// are the simulated lengths, not the requested ones.
pub fn compare_scenarios(first: &Scenario, second: &Scenario) -> Vec<ComparisonRow> {
    let s1 = first.summary();
    let s2 = second.summary();
    let p1 = &first.params;
    let p2 = &second.params;
    let both_geometric = p1.is_geometric() && p2.is_geometric();

    let mut rows = Vec::with_capacity(9);

    match first.operation_type() {
        OperationType::Loan => {
            rows.push(ComparisonRow::new("Loan amount", p1.loan_amount(), p2.loan_amount(), Unit::Currency));
            rows.push(ComparisonRow::new("Interest rate", p1.interest_rate, p2.interest_rate, Unit::Percent));
            rows.push(ComparisonRow::new("Duration (years)", first.years(), second.years(), Unit::Years));
            if both_geometric {
                rows.push(ComparisonRow::new("Growth rate", p1.growth_rate, p2.growth_rate, Unit::Percent));
            }
            rows.push(ComparisonRow::new("First payment", s1.first_cash_flow, s2.first_cash_flow, Unit::Currency));
            if first.data.len() > 1 && second.data.len() > 1 {
                rows.push(ComparisonRow::new("Last payment", s1.last_cash_flow, s2.last_cash_flow, Unit::Currency));
            }
            rows.push(ComparisonRow::new("Total interest", s1.total_interest, s2.total_interest, Unit::Currency));
            rows.push(ComparisonRow::new(
                "Total principal repaid",
                s1.total_principal,
                s2.total_principal,
                Unit::Currency,
            ));
            rows.push(ComparisonRow::new("Total cost of credit", s1.total_cost, s2.total_cost, Unit::Currency));
        }
        OperationType::Savings => {
            rows.push(ComparisonRow::new(
                "Initial deposit",
                p1.initial_deposit(),
                p2.initial_deposit(),
                Unit::Currency,
            ));
            rows.push(ComparisonRow::new(
                "Periodic deposit",
                p1.periodic_deposit(),
                p2.periodic_deposit(),
                Unit::Currency,
            ));
            rows.push(ComparisonRow::new("Interest rate", p1.interest_rate, p2.interest_rate, Unit::Percent));
            rows.push(ComparisonRow::new("Duration (years)", first.years(), second.years(), Unit::Years));
            if both_geometric {
                rows.push(ComparisonRow::new("Growth rate", p1.growth_rate, p2.growth_rate, Unit::Percent));
            }
            rows.push(ComparisonRow::new("Total deposits", s1.total_principal, s2.total_principal, Unit::Currency));
            rows.push(ComparisonRow::new("Total interest", s1.total_interest, s2.total_interest, Unit::Currency));
            rows.push(ComparisonRow::new("Final balance", s1.final_balance, s2.final_balance, Unit::Currency));
            rows.push(ComparisonRow::new(
                "Yield (interest/deposits)",
                s1.yield_ratio.unwrap_or(0.0) * 100.0,
                s2.yield_ratio.unwrap_or(0.0) * 100.0,
                Unit::Percent,
            ));
        }
    }

    rows
}

/// Load two scenarios from a store and compare them
pub fn compare_stored<S: ScenarioStore + ?Sized>(
    store: &S,
    id1: &str,
    id2: &str,
) -> Result<Vec<ComparisonRow>, ComparisonError> {
    if id1 == id2 {
        return Err(ComparisonError::SameScenario);
    }

    let first = store.get(id1)?.ok_or_else(|| ComparisonError::NotFound(id1.to_string()))?;
    let second = store.get(id2)?.ok_or_else(|| ComparisonError::NotFound(id2.to_string()))?;

    if first.operation_type() != second.operation_type() {
        return Err(ComparisonError::OperationMismatch(
            first.operation_type(),
            second.operation_type(),
        ));
    }

    Ok(compare_scenarios(&first, &second))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annuity::AnnuityEngine;
    use crate::params::{SimulationParameters, TerminationMode};
    use crate::scenario::MemoryStore;
    use approx::assert_relative_eq;

    fn scenario(params: SimulationParameters) -> Scenario {
        Scenario::new(None, AnnuityEngine::default().run(&params).unwrap())
    }

    fn savings(deposit: f64) -> SimulationParameters {
        SimulationParameters::savings(0.0, deposit, 4.0, 12, TerminationMode::ByDuration(5.0))
    }

    fn criteria(rows: &[ComparisonRow]) -> Vec<&str> {
        rows.iter().map(|r| r.criterion.as_str()).collect()
    }

    #[test]
    fn test_periodic_deposit_difference() {
        let rows = compare_scenarios(&scenario(savings(1000.0)), &scenario(savings(1200.0)));

        let row = rows.iter().find(|r| r.criterion == "Periodic deposit").unwrap();
        assert_eq!(row.value1, 1000.0);
        assert_eq!(row.value2, 1200.0);
        assert_relative_eq!(row.difference, -200.0);

        assert_eq!(
            criteria(&rows),
            vec![
                "Initial deposit",
                "Periodic deposit",
                "Interest rate",
                "Duration (years)",
                "Total deposits",
                "Total interest",
                "Final balance",
                "Yield (interest/deposits)",
            ]
        );
    }

    #[test]
    fn test_duration_uses_simulated_length() {
        // 12 deposits of 1000 plus interest pass 12000
        let by_target = SimulationParameters::savings(0.0, 1000.0, 4.0, 12, TerminationMode::ByTarget(12_000.0));
        let rows = compare_scenarios(&scenario(savings(1000.0)), &scenario(by_target));

        let duration = rows.iter().find(|r| r.criterion == "Duration (years)").unwrap();
        assert_eq!(duration.value1, 5.0);
        assert_eq!(duration.value2, 1.0);
        assert_relative_eq!(duration.difference, 4.0);
    }

    #[test]
    fn test_growth_row_only_when_both_geometric() {
        let geometric = scenario(savings(1000.0).geometric(1.0));
        let constant = scenario(savings(1000.0));

        let mixed = compare_scenarios(&geometric, &constant);
        assert!(!criteria(&mixed).contains(&"Growth rate"));

        let both = compare_scenarios(&geometric, &scenario(savings(1000.0).geometric(2.0)));
        let growth = both.iter().find(|r| r.criterion == "Growth rate").unwrap();
        assert_relative_eq!(growth.difference, -1.0);
    }

    #[test]
    fn test_loan_last_payment_needs_two_periods() {
        let yearly = |years: f64| SimulationParameters::loan(10_000.0, 5.0, 1, TerminationMode::ByDuration(years));

        let single = compare_scenarios(&scenario(yearly(1.0)), &scenario(yearly(3.0)));
        assert!(!criteria(&single).contains(&"Last payment"));

        let rows = compare_scenarios(&scenario(yearly(2.0)), &scenario(yearly(3.0)));
        assert_eq!(
            criteria(&rows),
            vec![
                "Loan amount",
                "Interest rate",
                "Duration (years)",
                "First payment",
                "Last payment",
                "Total interest",
                "Total principal repaid",
                "Total cost of credit",
            ]
        );

        let cost = rows.last().unwrap();
        assert!(cost.difference < 0.0, "shorter loan costs less");
    }

    #[test]
    fn test_compare_stored_errors() {
        let mut store = MemoryStore::new();
        let savings_id = store.save(scenario(savings(100.0))).unwrap();
        let loan_id = store
            .save(scenario(SimulationParameters::loan(5_000.0, 5.0, 12, TerminationMode::ByDuration(1.0))))
            .unwrap();

        assert!(matches!(
            compare_stored(&store, &savings_id, &savings_id),
            Err(ComparisonError::SameScenario)
        ));
        assert!(matches!(
            compare_stored(&store, &savings_id, "nope"),
            Err(ComparisonError::NotFound(id)) if id == "nope"
        ));
        assert!(matches!(
            compare_stored(&store, &savings_id, &loan_id),
            Err(ComparisonError::OperationMismatch(OperationType::Savings, OperationType::Loan))
        ));

        let other = store.save(scenario(savings(150.0))).unwrap();
        assert_eq!(compare_stored(&store, &savings_id, &other).unwrap().len(), 8);
    }

    #[test]
    fn test_row_display() {
        let row = ComparisonRow::new("Interest rate", 6.0, 4.5, Unit::Percent);
        let (v1, v2, diff) = row.display("DH");
        assert_eq!(v1, "6.00 %");
        assert_eq!(v2, "4.50 %");
        assert_eq!(diff, "1.50 %");
    }
}
