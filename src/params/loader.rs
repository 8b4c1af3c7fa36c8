//! Load parameter sets from a CSV file
//!
//! Expected header:
//! `Name,Operation,Annuity,InterestRate,Frequency,GrowthRate,Duration,Target,Payment,InitialDeposit,PeriodicDeposit,LoanAmount`
//!
//! Exactly one of `Duration`, `Target` (savings) or `Payment` (loans) must be filled per row.

use super::{AnnuityType, Operation, SimulationParameters, TerminationMode};
use csv::Reader;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Row {row}: {message}")]
    Row { row: usize, message: String },
}

/// A parameter set with the label it was given in the input file
#[derive(Debug, Clone, PartialEq)]
pub struct NamedParameters {
    pub name: String,
    pub params: SimulationParameters,
}

/// Raw CSV row
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Operation")]
    operation: String,
    #[serde(rename = "Annuity")]
    annuity: String,
    #[serde(rename = "InterestRate")]
    interest_rate: f64,
    #[serde(rename = "Frequency")]
    frequency: u32,
    #[serde(rename = "GrowthRate", default)]
    growth_rate: Option<f64>,
    #[serde(rename = "Duration", default)]
    duration: Option<f64>,
    #[serde(rename = "Target", default)]
    target: Option<f64>,
    #[serde(rename = "Payment", default)]
    payment: Option<f64>,
    #[serde(rename = "InitialDeposit", default)]
    initial_deposit: Option<f64>,
    #[serde(rename = "PeriodicDeposit", default)]
    periodic_deposit: Option<f64>,
    #[serde(rename = "LoanAmount", default)]
    loan_amount: Option<f64>,
}

impl CsvRow {
    fn to_parameters(self) -> Result<NamedParameters, String> {
        let annuity_type = match self.annuity.trim().to_ascii_lowercase().as_str() {
            "constant" => AnnuityType::Constant,
            "geometric" => AnnuityType::Geometric,
            other => return Err(format!("Unknown Annuity: {}", other)),
        };

        let (operation, termination) = match self.operation.trim().to_ascii_lowercase().as_str() {
            "savings" => {
                let termination = match (self.duration, self.target, self.payment) {
                    (Some(years), None, None) => TerminationMode::ByDuration(years),
                    (None, Some(target), None) => TerminationMode::ByTarget(target),
                    (_, _, Some(_)) => return Err("Payment is not used by savings rows".to_string()),
                    _ => return Err("Set either Duration or Target".to_string()),
                };
                let periodic_deposit = self
                    .periodic_deposit
                    .ok_or_else(|| "PeriodicDeposit is required for savings".to_string())?;
                let operation = Operation::Savings {
                    initial_deposit: self.initial_deposit.unwrap_or(0.0),
                    periodic_deposit,
                };
                (operation, termination)
            }
            "loan" => {
                let termination = match (self.duration, self.payment, self.target) {
                    (Some(years), None, None) => TerminationMode::ByDuration(years),
                    (None, Some(payment), None) => TerminationMode::ByPayment(payment),
                    (_, _, Some(_)) => return Err("Target is not used by loan rows".to_string()),
                    _ => return Err("Set either Duration or Payment".to_string()),
                };
                let loan_amount = self
                    .loan_amount
                    .ok_or_else(|| "LoanAmount is required for loans".to_string())?;
                (Operation::Loan { loan_amount }, termination)
            }
            other => return Err(format!("Unknown Operation: {}", other)),
        };

        let growth_rate = match annuity_type {
            AnnuityType::Geometric => self.growth_rate.unwrap_or(0.0),
            AnnuityType::Constant => 0.0,
        };

        Ok(NamedParameters {
            name: self.name,
            params: SimulationParameters {
                operation,
                annuity_type,
                interest_rate: self.interest_rate,
                payment_frequency: self.frequency,
                growth_rate,
                termination,
            },
        })
    }
}

/// Load all parameter sets from a CSV file
pub fn load_parameters<P: AsRef<Path>>(path: P) -> Result<Vec<NamedParameters>, LoadError> {
    read_rows(Reader::from_path(path)?)
}

/// Load parameter sets from any reader (e.g., string buffer, stdin)
pub fn load_parameters_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<NamedParameters>, LoadError> {
    read_rows(Reader::from_reader(reader))
}

fn read_rows<R: std::io::Read>(mut reader: Reader<R>) -> Result<Vec<NamedParameters>, LoadError> {
    let mut sets = Vec::new();

    for (index, result) in reader.deserialize().enumerate() {
        let row: CsvRow = result?;
        // Header is line 1
        let named = row
            .to_parameters()
            .map_err(|message| LoadError::Row { row: index + 2, message })?;
        sets.push(named);
    }

    Ok(sets)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str =
        "Name,Operation,Annuity,InterestRate,Frequency,GrowthRate,Duration,Target,Payment,InitialDeposit,PeriodicDeposit,LoanAmount\n";

    #[test]
    fn test_load_mixed_rows() {
        let data = format!(
            "{HEADER}\
             house,loan,constant,6,12,,10,,,,,100000\n\
             car,Loan,Geometric,4.5,12,1,,,450,,,20000\n\
             pension,savings,constant,3,12,,,50000,,0,1000,\n"
        );

        let sets = load_parameters_from_reader(data.as_bytes()).unwrap();
        assert_eq!(sets.len(), 3);

        assert_eq!(sets[0].name, "house");
        assert_eq!(sets[0].params.termination, TerminationMode::ByDuration(10.0));
        assert_eq!(sets[0].params.loan_amount(), 100_000.0);

        assert!(sets[1].params.is_geometric());
        assert_eq!(sets[1].params.growth_rate, 1.0);
        assert_eq!(sets[1].params.payment_amount(), Some(450.0));

        assert_eq!(sets[2].params.target_amount(), Some(50_000.0));
        assert_eq!(sets[2].params.periodic_deposit(), 1000.0);
    }

    #[test]
    fn test_rejects_both_terminations() {
        let data = format!("{HEADER}bad,loan,constant,6,12,,10,,900,,,100000\n");

        match load_parameters_from_reader(data.as_bytes()) {
            Err(LoadError::Row { row, .. }) => assert_eq!(row, 2),
            other => panic!("expected row error, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_missing_termination() {
        let data = format!("{HEADER}bad,savings,constant,3,12,,,,,0,100,\n");
        assert!(load_parameters_from_reader(data.as_bytes()).is_err());
    }
}
