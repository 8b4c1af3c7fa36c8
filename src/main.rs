//! Annuity Simulator CLI
//!
//! Command-line interface for running, saving and comparing simulations

use annuity_sim::{
    compare_stored,
    report::{format_amount, format_percent, format_years, schedule_table, write_schedule_csv},
    AnnuityEngine, JsonFileStore, RecommendationEngine, Scenario, ScenarioStore, SimulationConfig,
    SimulationParameters, SimulationResult, TerminationMode,
};
use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "annuity-sim", version, about = "Savings and loan annuity simulator")]
struct Cli {
    /// JSON configuration file (engine limits, recommendation factors, currency)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Scenario store file
    #[arg(long, global = true, default_value = "scenarios.json")]
    store: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Simulate a savings plan
    Savings(SavingsArgs),
    /// Simulate a loan
    Loan(LoanArgs),
    /// List saved scenarios
    List,
    /// Show a saved scenario with its schedule and recommendations
    Show { id: String },
    /// Delete a saved scenario
    Delete { id: String },
    /// Compare two saved scenarios of the same type
    Compare { id1: String, id2: String },
}

/// Options shared by both simulation commands
#[derive(Args, Debug)]
struct RunArgs {
    /// Annual interest rate in percent
    #[arg(long)]
    rate: f64,

    /// Payments per year
    #[arg(long, default_value_t = 12)]
    frequency: u32,

    /// Geometric annuity growing by this percentage each period
    #[arg(long)]
    growth: Option<f64>,

    /// Duration in years
    #[arg(long)]
    years: Option<f64>,

    /// Write the schedule to this CSV file
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Save the result as a scenario
    #[arg(long)]
    save: bool,

    /// Scenario name used with --save
    #[arg(long)]
    name: Option<String>,
}

#[derive(Args, Debug)]
struct SavingsArgs {
    /// Deposit at the end of each period
    #[arg(long)]
    deposit: f64,

    /// Balance already saved at the start
    #[arg(long, default_value_t = 0.0)]
    initial: f64,

    /// Stop once the balance reaches this amount
    #[arg(long, conflicts_with = "years")]
    target: Option<f64>,

    #[command(flatten)]
    run: RunArgs,
}

#[derive(Args, Debug)]
struct LoanArgs {
    /// Borrowed capital
    #[arg(long)]
    amount: f64,

    /// Fixed (first) payment; the duration is solved from it
    #[arg(long, conflicts_with = "years")]
    payment: Option<f64>,

    #[command(flatten)]
    run: RunArgs,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => SimulationConfig::from_json_path(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => SimulationConfig::default(),
    };
    let mut store = JsonFileStore::new(&cli.store);

    match cli.command {
        Command::Savings(args) => {
            let termination = termination(args.run.years, args.target, TerminationMode::ByTarget, "--years or --target")?;
            let params = SimulationParameters::savings(
                args.initial,
                args.deposit,
                args.run.rate,
                args.run.frequency,
                termination,
            );
            simulate(&config, &mut store, with_growth(params, args.run.growth), &args.run)
        }
        Command::Loan(args) => {
            let termination = termination(args.run.years, args.payment, TerminationMode::ByPayment, "--years or --payment")?;
            let params = SimulationParameters::loan(args.amount, args.run.rate, args.run.frequency, termination);
            simulate(&config, &mut store, with_growth(params, args.run.growth), &args.run)
        }
        Command::List => list(&store, &config.currency),
        Command::Show { id } => {
            let scenario = store
                .get(&id)
                .context("Failed to read scenario store")?
                .with_context(|| format!("No scenario with id {}", id))?;
            println!("{} ({})\n", scenario.name, scenario.timestamp.format("%Y-%m-%d %H:%M"));
            print_report(&config, &scenario.to_result());
            Ok(())
        }
        Command::Delete { id } => {
            if store.delete(&id).context("Failed to update scenario store")? {
                println!("Deleted {}", id);
                Ok(())
            } else {
                bail!("No scenario with id {}", id)
            }
        }
        Command::Compare { id1, id2 } => {
            let rows = compare_stored(&store, &id1, &id2)?;
            println!("{:<28} {:>18} {:>18} {:>18}", "Criterion", short_id(&id1), short_id(&id2), "Difference");
            println!("{}", "-".repeat(85));
            for row in &rows {
                let (v1, v2, diff) = row.display(&config.currency);
                println!("{:<28} {:>18} {:>18} {:>18}", row.criterion, v1, v2, diff);
            }
            Ok(())
        }
    }
}

/// Pick the termination mode from the two mutually exclusive flags
fn termination(
    years: Option<f64>,
    other: Option<f64>,
    mode: fn(f64) -> TerminationMode,
    flags: &str,
) -> Result<TerminationMode> {
    match (years, other) {
        (Some(years), None) => Ok(TerminationMode::ByDuration(years)),
        (None, Some(value)) => Ok(mode(value)),
        _ => bail!("Exactly one of {} is required", flags),
    }
}

fn with_growth(params: SimulationParameters, growth: Option<f64>) -> SimulationParameters {
    match growth {
        Some(g) => params.geometric(g),
        None => params,
    }
}

fn simulate(
    config: &SimulationConfig,
    store: &mut JsonFileStore,
    params: SimulationParameters,
    args: &RunArgs,
) -> Result<()> {
    let engine = AnnuityEngine::new(config.engine.clone());
    let result = engine.run(&params).context("Simulation failed")?;
    print_report(config, &result);

    if let Some(path) = &args.csv {
        let file = File::create(path).with_context(|| format!("Unable to create {}", path.display()))?;
        write_schedule_csv(&result.records, BufWriter::new(file))?;
        println!("\nSchedule written to {}", path.display());
    }

    if args.save {
        let id = store
            .save(Scenario::new(args.name.clone(), result))
            .context("Failed to save scenario")?;
        println!("\nSaved scenario {}", id);
    }

    Ok(())
}

/// Summary, schedule and recommendations for one result
fn print_report(config: &SimulationConfig, result: &SimulationResult) {
    print_summary(result, &config.currency);
    println!();
    print!("{}", schedule_table(result, &config.currency));

    let recommendation = RecommendationEngine::from_config(config).recommend(result);
    println!("\nRecommendations:");
    for text in [&recommendation.payment, &recommendation.growth, &recommendation.duration]
        .into_iter()
        .flatten()
    {
        println!("  - {}", text);
    }
}

fn print_summary(result: &SimulationResult, currency: &str) {
    let summary = result.summary();
    let params = &result.params;

    println!("{} ({} annuity)", summary.operation_type, params.annuity_type);
    println!("  Periods:        {} ({} years)", summary.periods, format_years(summary.years));
    println!("  Interest rate:  {}", format_percent(params.interest_rate));
    if params.is_geometric() {
        println!("  Growth rate:    {}", format_percent(params.growth_rate));
    }
    println!("  First payment:  {}", format_amount(summary.first_cash_flow, currency));
    println!("  Last payment:   {}", format_amount(summary.last_cash_flow, currency));
    println!("  Total interest: {}", format_amount(summary.total_interest, currency));
    match summary.yield_ratio {
        Some(ratio) => {
            println!("  Total deposits: {}", format_amount(summary.total_principal, currency));
            println!("  Final balance:  {}", format_amount(summary.final_balance, currency));
            println!("  Yield:          {}", format_percent(ratio * 100.0));
        }
        None => {
            println!("  Total cost:     {}", format_amount(summary.total_cost, currency));
        }
    }
}

fn list(store: &JsonFileStore, currency: &str) -> Result<()> {
    let scenarios = store.list().context("Failed to read scenario store")?;
    if scenarios.is_empty() {
        println!("No saved scenarios in {}", store.path().display());
        return Ok(());
    }

    println!("{:<42} {:<28} {:<8} {:>8} {:>18}", "Id", "Name", "Type", "Years", "Final");
    for scenario in &scenarios {
        let summary = scenario.summary();
        let headline = match summary.yield_ratio {
            Some(_) => summary.final_balance,
            None => summary.total_cost,
        };
        println!(
            "{:<42} {:<28} {:<8} {:>8} {:>18}",
            scenario.id,
            scenario.name,
            scenario.operation_type().as_str(),
            format_years(scenario.years()),
            format_amount(headline, currency),
        );
    }
    Ok(())
}

/// Trim long scenario ids for table headers
fn short_id(id: &str) -> &str {
    id.get(..18).unwrap_or(id)
}
