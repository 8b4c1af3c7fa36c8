//! Display helpers: amounts, schedule tables and CSV export

use crate::annuity::{PeriodRecord, SimulationResult};
use crate::params::OperationType;
use std::fmt::Write as _;
use std::io::Write;

/// Amount with two decimals and a currency label, e.g. `1234.56 DH`
pub fn format_amount(value: f64, currency: &str) -> String {
    format!("{:.2} {}", value, currency)
}

/// Percentage with two decimals, e.g. `6.00 %`
pub fn format_percent(value: f64) -> String {
    format!("{:.2} %", value)
}

/// Year count without trailing zeros: `8`, `22.5`, `5.6`
pub fn format_years(years: f64) -> String {
    let rounded = format!("{:.2}", years);
    rounded.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Write the schedule as CSV (one row per period, header from field names)
pub fn write_schedule_csv<W: Write>(records: &[PeriodRecord], writer: W) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for record in records {
        csv_writer.serialize(record)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Fixed-width schedule: deposits for savings, amortization for loans
pub fn schedule_table(result: &SimulationResult, currency: &str) -> String {
    let mut out = String::new();
    let amount = |v: f64| format_amount(v, currency);

    match result.params.operation_type() {
        OperationType::Savings => {
            let _ = writeln!(
                out,
                "{:>6} {:>16} {:>16} {:>18} {:>18}",
                "Period", "Deposit", "Interest", "Deposit+Interest", "Balance"
            );
            let _ = writeln!(out, "{}", "-".repeat(78));
            for row in &result.records {
                let _ = writeln!(
                    out,
                    "{:>6} {:>16} {:>16} {:>18} {:>18}",
                    row.period,
                    amount(row.cash_flow),
                    amount(row.interest),
                    amount(row.cash_flow + row.interest),
                    amount(row.balance),
                );
            }
        }
        OperationType::Loan => {
            let _ = writeln!(
                out,
                "{:>6} {:>16} {:>16} {:>16} {:>18}",
                "Period", "Payment", "Interest", "Principal", "Remaining"
            );
            let _ = writeln!(out, "{}", "-".repeat(76));
            for row in &result.records {
                let _ = writeln!(
                    out,
                    "{:>6} {:>16} {:>16} {:>16} {:>18}",
                    row.period,
                    amount(row.cash_flow),
                    amount(row.interest),
                    amount(row.principal),
                    amount(row.balance),
                );
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annuity::AnnuityEngine;
    use crate::params::{SimulationParameters, TerminationMode};

    #[test]
    fn test_formatting() {
        assert_eq!(format_amount(1234.5, "DH"), "1234.50 DH");
        assert_eq!(format_amount(-200.0, "EUR"), "-200.00 EUR");
        assert_eq!(format_percent(6.0), "6.00 %");
        assert_eq!(format_years(8.0), "8");
        assert_eq!(format_years(22.5), "22.5");
        assert_eq!(format_years(7.0 * 0.8), "5.6");
    }

    #[test]
    fn test_schedule_csv_has_one_row_per_period() {
        let params = SimulationParameters::loan(12_000.0, 5.0, 12, TerminationMode::ByDuration(1.0));
        let result = AnnuityEngine::default().run(&params).unwrap();

        let mut buffer = Vec::new();
        write_schedule_csv(&result.records, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("period,cash_flow,interest,principal,balance,total_principal,total_interest")
        );
        assert_eq!(lines.count(), 12);
    }

    #[test]
    fn test_savings_table_columns() {
        let params = SimulationParameters::savings(0.0, 100.0, 0.0, 12, TerminationMode::ByDuration(0.25));
        let result = AnnuityEngine::default().run(&params).unwrap();
        let table = schedule_table(&result, "DH");

        assert!(table.lines().next().unwrap().contains("Deposit+Interest"));
        // header, rule, three periods
        assert_eq!(table.lines().count(), 5);
        assert!(table.contains("300.00 DH"));
    }
}
