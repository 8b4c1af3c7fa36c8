//! Run every parameter set in a CSV file and write one summary row per set
//!
//! Usage: run_batch <parameters.csv> [output.csv]

use annuity_sim::params::load_parameters;
use annuity_sim::{ScenarioRunner, SimulationConfig};
use anyhow::{Context, Result};
use serde::Serialize;
use std::env;
use std::fs::File;
use std::time::Instant;

/// Output row; failed runs keep their name and carry the error text
#[derive(Debug, Serialize)]
struct SummaryRow {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Operation")]
    operation: String,
    #[serde(rename = "Periods")]
    periods: Option<u32>,
    #[serde(rename = "Years")]
    years: Option<f64>,
    #[serde(rename = "FirstCashFlow")]
    first_cash_flow: Option<f64>,
    #[serde(rename = "LastCashFlow")]
    last_cash_flow: Option<f64>,
    #[serde(rename = "TotalInterest")]
    total_interest: Option<f64>,
    #[serde(rename = "FinalBalance")]
    final_balance: Option<f64>,
    #[serde(rename = "TotalCost")]
    total_cost: Option<f64>,
    #[serde(rename = "Error")]
    error: Option<String>,
}

fn main() -> Result<()> {
    env_logger::init();

    let mut args = env::args().skip(1);
    let input = args.next().context("Usage: run_batch <parameters.csv> [output.csv]")?;
    let output = args.next().unwrap_or_else(|| "batch_summary.csv".to_string());

    let config = match env::var("ANNUITY_SIM_CONFIG") {
        Ok(path) => SimulationConfig::from_json_path(&path)
            .with_context(|| format!("Failed to load config {}", path))?,
        Err(_) => SimulationConfig::default(),
    };

    let start = Instant::now();
    println!("Loading parameter sets from {}...", input);

    let named = load_parameters(&input).with_context(|| format!("Failed to load {}", input))?;
    println!("Loaded {} parameter sets in {:?}", named.len(), start.elapsed());

    println!("Running simulations...");
    let run_start = Instant::now();

    let runner = ScenarioRunner::with_config(config.engine);
    let batch: Vec<_> = named.iter().map(|n| n.params.clone()).collect();
    let results = runner.run_batch(&batch);

    println!("Simulations complete in {:?}", run_start.elapsed());
    log::info!("Ran {} parameter sets in {:?}", results.len(), run_start.elapsed());

    let mut writer = csv::Writer::from_writer(
        File::create(&output).with_context(|| format!("Failed to create {}", output))?,
    );
    let mut failures = 0;

    for (entry, result) in named.iter().zip(&results) {
        let row = match result {
            Ok(result) => {
                let summary = result.summary();
                SummaryRow {
                    name: entry.name.clone(),
                    operation: summary.operation_type.to_string(),
                    periods: Some(summary.periods),
                    years: Some(summary.years),
                    first_cash_flow: Some(summary.first_cash_flow),
                    last_cash_flow: Some(summary.last_cash_flow),
                    total_interest: Some(summary.total_interest),
                    final_balance: Some(summary.final_balance),
                    total_cost: Some(summary.total_cost),
                    error: None,
                }
            }
            Err(err) => {
                failures += 1;
                log::warn!("{}: {}", entry.name, err);
                SummaryRow {
                    name: entry.name.clone(),
                    operation: entry.params.operation_type().to_string(),
                    periods: None,
                    years: None,
                    first_cash_flow: None,
                    last_cash_flow: None,
                    total_interest: None,
                    final_balance: None,
                    total_cost: None,
                    error: Some(err.to_string()),
                }
            }
        };
        writer.serialize(row)?;
    }
    writer.flush()?;

    println!("Output written to {}", output);
    println!(
        "\nBatch Summary: {} succeeded, {} failed",
        results.len() - failures,
        failures
    );
    println!("Total time: {:?}", start.elapsed());
    Ok(())
}
