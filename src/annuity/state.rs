//! Running state of a schedule between periods

use super::records::PeriodRecord;

/// State carried from one period to the next
#[derive(Debug, Clone)]
pub struct AnnuityState {
    /// Last completed period (0 before the first one)
    pub period: u32,

    /// Savings balance or outstanding loan capital
    pub balance: f64,

    /// Deposit or payment scheduled for the next period
    pub cash_flow: f64,

    /// Running deposits (savings) or principal repaid (loans)
    pub total_principal: f64,

    /// Running interest
    pub total_interest: f64,
}

/// Why a loan period could not be amortized
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shortfall {
    pub period: u32,
    pub payment: f64,
    pub interest_due: f64,
}

impl AnnuityState {
    /// Savings start: the initial deposit is both the balance and the first contribution
    pub fn savings(initial_deposit: f64, periodic_deposit: f64) -> Self {
        Self {
            period: 0,
            balance: initial_deposit,
            cash_flow: periodic_deposit,
            total_principal: initial_deposit,
            total_interest: 0.0,
        }
    }

    /// Loan start: full capital outstanding, nothing repaid
    pub fn loan(loan_amount: f64, first_payment: f64) -> Self {
        Self {
            period: 0,
            balance: loan_amount,
            cash_flow: first_payment,
            total_principal: 0.0,
            total_interest: 0.0,
        }
    }

    /// Credit one savings period: interest on the opening balance, then the deposit
    pub fn accrue(&mut self, periodic_rate: f64) -> PeriodRecord {
        self.period += 1;

        let interest = self.balance * periodic_rate;
        self.balance = self.balance + interest + self.cash_flow;
        self.total_principal += self.cash_flow;
        self.total_interest += interest;

        PeriodRecord {
            period: self.period,
            cash_flow: self.cash_flow,
            interest,
            principal: self.cash_flow,
            balance: self.balance,
            total_principal: self.total_principal,
            total_interest: self.total_interest,
        }
    }

    /// Amortize one loan period.
    ///
    /// The final period is clamped to the outstanding capital and its payment
    /// reduced to match; the scheduled payment itself is left untouched.
    pub fn amortize(&mut self, periodic_rate: f64) -> Result<PeriodRecord, Shortfall> {
        let period = self.period + 1;
        let interest = self.balance * periodic_rate;
        let mut principal = self.cash_flow - interest;

        if principal <= 0.0 {
            return Err(Shortfall {
                period,
                payment: self.cash_flow,
                interest_due: interest,
            });
        }

        let mut payment = self.cash_flow;
        if principal > self.balance {
            principal = self.balance;
            payment = principal + interest;
        }

        self.period = period;
        self.balance -= principal;
        self.total_principal += principal;
        self.total_interest += interest;

        Ok(PeriodRecord {
            period,
            cash_flow: payment,
            interest,
            principal,
            balance: self.balance,
            total_principal: self.total_principal,
            total_interest: self.total_interest,
        })
    }

    /// Compound the scheduled cash flow for the next period
    pub fn grow(&mut self, periodic_growth_rate: f64) {
        self.cash_flow *= 1.0 + periodic_growth_rate;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accrue_uses_opening_balance() {
        let mut state = AnnuityState::savings(1000.0, 100.0);
        let row = state.accrue(0.01);

        assert_eq!(row.period, 1);
        assert!((row.interest - 10.0).abs() < 1e-12);
        assert!((row.balance - 1110.0).abs() < 1e-12);
        assert!((row.total_principal - 1100.0).abs() < 1e-12);
    }

    #[test]
    fn test_amortize_clamps_final_period() {
        let mut state = AnnuityState::loan(50.0, 100.0);
        let row = state.amortize(0.01).unwrap();

        assert!((row.principal - 50.0).abs() < 1e-12);
        assert!((row.cash_flow - 50.5).abs() < 1e-12);
        assert_eq!(row.balance, 0.0);
        // Scheduled payment is not rewritten by the clamp
        assert_eq!(state.cash_flow, 100.0);
    }

    #[test]
    fn test_amortize_rejects_payment_below_interest() {
        let mut state = AnnuityState::loan(10_000.0, 45.0);
        let shortfall = state.amortize(0.005).unwrap_err();

        assert_eq!(shortfall.period, 1);
        assert!((shortfall.interest_due - 50.0).abs() < 1e-12);
        // Failed period leaves the state untouched
        assert_eq!(state.period, 0);
    }
}
