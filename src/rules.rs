// 🏷️ Bank Policy - Rules as Data
// Every per-kind limit, fee and lock period lives here, not in the engine.
//
// The defaults are the canonical retail policy. A JSON file can override any
// subset of fields; missing fields keep their default.

use crate::entities::AccountType;
use anyhow::{bail, Context as AnyhowContext, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

// ============================================================================
// TRANSFER SHORTFALL POLICY
// ============================================================================

/// What a transfer does when the source holds less than the requested amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShortfallPolicy {
    /// Fail with InsufficientFunds, nothing moves
    #[default]
    Reject,

    /// Move whatever the source holds
    ClipToBalance,
}

// ============================================================================
// BANK POLICY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BankPolicy {
    /// Largest single deposit into a Checking account
    pub checking_deposit_limit: f64,

    /// Largest single deposit into a Savings account
    pub savings_deposit_limit: f64,

    /// Largest single withdrawal from a Checking account
    pub checking_withdraw_limit: f64,

    /// Largest single withdrawal from a Savings account
    pub savings_withdraw_limit: f64,

    /// Savings withdrawals allowed between two passtime steps
    pub savings_monthly_withdrawals: u32,

    /// Simulated months before a CD permits withdrawal
    pub cd_lock_months: u32,

    /// CD opening balance bounds (inclusive)
    pub cd_min_balance: f64,
    pub cd_max_balance: f64,

    /// Balances strictly below this (and above zero) pay the fee
    pub low_balance_threshold: f64,
    pub low_balance_fee: f64,

    /// How many times the monthly rate is applied per elapsed month for a CD
    pub cd_compounding_per_month: u32,

    /// Upper bound accepted by the passtime command syntax
    pub max_passtime_months: u32,

    pub transfer_shortfall: ShortfallPolicy,
}

impl Default for BankPolicy {
    fn default() -> Self {
        BankPolicy {
            checking_deposit_limit: 1000.0,
            savings_deposit_limit: 2500.0,
            checking_withdraw_limit: 400.0,
            savings_withdraw_limit: 1000.0,
            savings_monthly_withdrawals: 3,
            cd_lock_months: 12,
            cd_min_balance: 1000.0,
            cd_max_balance: 10000.0,
            low_balance_threshold: 100.0,
            low_balance_fee: 25.0,
            cd_compounding_per_month: 4,
            max_passtime_months: 60,
            transfer_shortfall: ShortfallPolicy::Reject,
        }
    }
}

impl BankPolicy {
    /// Load policy from JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read policy file: {:?}", path.as_ref()))?;

        Self::from_json(&content)
    }

    /// Parse policy from a JSON document
    pub fn from_json(content: &str) -> Result<Self> {
        let policy: BankPolicy =
            serde_json::from_str(content).context("Failed to parse policy JSON")?;
        policy.validate()?;
        Ok(policy)
    }

    /// Reject self-contradictory policies
    pub fn validate(&self) -> Result<()> {
        let limits = [
            ("checking_deposit_limit", self.checking_deposit_limit),
            ("savings_deposit_limit", self.savings_deposit_limit),
            ("checking_withdraw_limit", self.checking_withdraw_limit),
            ("savings_withdraw_limit", self.savings_withdraw_limit),
            ("cd_min_balance", self.cd_min_balance),
            ("low_balance_threshold", self.low_balance_threshold),
            ("low_balance_fee", self.low_balance_fee),
        ];
        for (name, value) in limits {
            if !value.is_finite() || value < 0.0 {
                bail!("{} must be a non-negative number, got {}", name, value);
            }
        }

        if self.cd_min_balance > self.cd_max_balance {
            bail!(
                "cd_min_balance ({}) exceeds cd_max_balance ({})",
                self.cd_min_balance,
                self.cd_max_balance
            );
        }
        if self.max_passtime_months == 0 {
            bail!("max_passtime_months must be at least 1");
        }

        Ok(())
    }

    // ========================================================================
    // PER-KIND CAPABILITIES
    // ========================================================================

    /// Largest single deposit, or None when the kind never accepts deposits
    pub fn deposit_limit(&self, kind: AccountType) -> Option<f64> {
        match kind {
            AccountType::Checking => Some(self.checking_deposit_limit),
            AccountType::Savings => Some(self.savings_deposit_limit),
            AccountType::CertificateOfDeposit => None,
        }
    }

    /// Largest single withdrawal, or None when the kind has no per-request cap
    pub fn withdraw_limit(&self, kind: AccountType) -> Option<f64> {
        match kind {
            AccountType::Checking => Some(self.checking_withdraw_limit),
            AccountType::Savings => Some(self.savings_withdraw_limit),
            AccountType::CertificateOfDeposit => None,
        }
    }

    /// Times the monthly rate is applied per elapsed month
    pub fn compounding_periods(&self, kind: AccountType) -> u32 {
        match kind {
            AccountType::CertificateOfDeposit => self.cd_compounding_per_month,
            AccountType::Checking | AccountType::Savings => 1,
        }
    }

    pub fn is_transferable(&self, kind: AccountType) -> bool {
        !matches!(kind, AccountType::CertificateOfDeposit)
    }

    pub fn pays_low_balance_fee(&self, kind: AccountType) -> bool {
        !matches!(kind, AccountType::CertificateOfDeposit)
    }
}

// ============================================================================
// TESTS
// ============================================================================
