// ⏰ Time Simulation - passtime
// "Time must be explicit": nothing here reads the wall clock.
//
// One passtime step, for every account independently:
// 1. Closure: a zero balance closes the account, nothing else applies
// 2. Low-balance fee (not for CDs), clamped at zero
// 3. Interest: monthly rate apr/100/12, compounded once per month
//    (CDs: `cd_compounding_per_month` times per month) and CD clock advance
// 4. Savings withdrawal counter reset, once per step
//
// Accounts are updated in place; ids to close are collected during the pass
// and removed afterwards.

use crate::entities::{Account, AccountType, Bank};
use crate::error::{BankError, BankResult};
use crate::rules::BankPolicy;
use serde::{Deserialize, Serialize};

// ============================================================================
// SIMULATION CLOCK
// ============================================================================

/// Logical month counter, advanced only by passtime
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationClock {
    months_elapsed: u32,
}

impl SimulationClock {
    pub fn new() -> Self {
        SimulationClock { months_elapsed: 0 }
    }

    pub fn months_elapsed(&self) -> u32 {
        self.months_elapsed
    }

    fn advance(&mut self, months: u32) {
        self.months_elapsed = self.months_elapsed.saturating_add(months);
    }
}

// ============================================================================
// REPORT
// ============================================================================

/// What one passtime step did to one account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountTimeReport {
    pub id: String,
    pub account_type: AccountType,

    /// Balance before the step
    pub opening_balance: f64,

    pub fee_applied: bool,

    /// Amount actually charged (less than the fee if the balance ran out)
    pub fee: f64,

    pub interest: f64,

    /// Balance after the step (0 for closed accounts)
    pub balance: f64,

    pub closed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassTimeReport {
    /// Months advanced by this step
    pub months: u32,

    /// Simulation clock after this step
    pub clock_months: u32,

    /// One entry per account present before the step, ordered by id
    pub accounts: Vec<AccountTimeReport>,
}

impl PassTimeReport {
    pub fn closed_ids(&self) -> Vec<&str> {
        self.accounts
            .iter()
            .filter(|a| a.closed)
            .map(|a| a.id.as_str())
            .collect()
    }

    pub fn account(&self, id: &str) -> Option<&AccountTimeReport> {
        self.accounts.iter().find(|a| a.id == id)
    }

    pub fn fees_collected(&self) -> f64 {
        self.accounts.iter().map(|a| a.fee).sum()
    }

    pub fn total_interest(&self) -> f64 {
        self.accounts.iter().map(|a| a.interest).sum()
    }

    pub fn summary(&self) -> String {
        format!(
            "Passed {} month(s) (clock at {}): {} accounts processed, {} closed, fees ${:.2}, interest ${:.2}",
            self.months,
            self.clock_months,
            self.accounts.len(),
            self.closed_ids().len(),
            self.fees_collected(),
            self.total_interest()
        )
    }
}

// ============================================================================
// TIME SIMULATOR
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct TimeSimulator {
    policy: BankPolicy,
    clock: SimulationClock,
}

impl TimeSimulator {
    pub fn new(policy: BankPolicy) -> Self {
        TimeSimulator {
            policy,
            clock: SimulationClock::new(),
        }
    }

    pub fn clock(&self) -> SimulationClock {
        self.clock
    }

    /// Advance the simulation by `months` (at least 1)
    pub fn pass_time(&mut self, bank: &mut Bank, months: u32) -> BankResult<PassTimeReport> {
        if months == 0 {
            return Err(BankError::InvalidMonths(months));
        }

        let policy = &self.policy;
        let accounts: Vec<AccountTimeReport> = bank
            .accounts_mut()
            .map(|account| step_account(policy, account, months))
            .collect();

        for report in accounts.iter().filter(|a| a.closed) {
            bank.remove(&report.id);
        }

        self.clock.advance(months);

        Ok(PassTimeReport {
            months,
            clock_months: self.clock.months_elapsed(),
            accounts,
        })
    }
}

fn step_account(policy: &BankPolicy, account: &mut Account, months: u32) -> AccountTimeReport {
    let account_type = account.account_type();
    let opening_balance = account.balance();

    let mut report = AccountTimeReport {
        id: account.id().to_string(),
        account_type,
        opening_balance,
        fee_applied: false,
        fee: 0.0,
        interest: 0.0,
        balance: opening_balance,
        closed: false,
    };

    if account.is_empty() {
        report.closed = true;
        return report;
    }

    if policy.pays_low_balance_fee(account_type) && opening_balance < policy.low_balance_threshold {
        report.fee_applied = true;
        report.fee = account.debit(policy.low_balance_fee);
    }

    account.advance_months(months);
    let monthly_rate = account.apr() / 100.0 / 12.0;
    let periods = months.saturating_mul(policy.compounding_periods(account_type));
    report.interest = account.compound(monthly_rate, periods);

    account.reset_withdrawals();

    report.balance = account.balance();
    report.closed = account.is_empty();
    report
}

// ============================================================================
// TESTS
// ============================================================================
