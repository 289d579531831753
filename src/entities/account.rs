// 💳 Account Entity - Identity + per-kind state
//
// "The id is IDENTITY (never changes), balance and APR are VALUES"
//
// Invariants enforced here, on every mutation:
// - 0.0 <= apr <= 10.0 (out-of-range assignments are clamped, not rejected)
// - balance >= 0.0 (debits past zero are clamped to exactly zero)

use crate::error::BankError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const MIN_APR: f64 = 0.0;
pub const MAX_APR: f64 = 10.0;
pub const ACCOUNT_ID_LENGTH: usize = 8;

/// True for exactly eight ASCII digits
pub fn is_valid_account_id(id: &str) -> bool {
    id.len() == ACCOUNT_ID_LENGTH && id.bytes().all(|b| b.is_ascii_digit())
}

/// Clamp an APR into [MIN_APR, MAX_APR]; NaN becomes MIN_APR
pub fn clamp_apr(apr: f64) -> f64 {
    if apr.is_nan() {
        MIN_APR
    } else {
        apr.clamp(MIN_APR, MAX_APR)
    }
}

// ============================================================================
// ACCOUNT TYPE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountType {
    /// Everyday account, small caps, no withdrawal count
    Checking,

    /// Interest-bearing, limited withdrawals per period
    Savings,

    /// Locked deposit, full-balance withdrawal only
    CertificateOfDeposit,
}

impl AccountType {
    /// Short label used in reports
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Checking => "Checking",
            AccountType::Savings => "Savings",
            AccountType::CertificateOfDeposit => "Cd",
        }
    }

    /// Human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            AccountType::Checking => "Checking",
            AccountType::Savings => "Savings",
            AccountType::CertificateOfDeposit => "Certificate of Deposit",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountType {
    type Err = String;

    /// Case-insensitive command token
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "checking" => Ok(AccountType::Checking),
            "savings" => Ok(AccountType::Savings),
            "cd" => Ok(AccountType::CertificateOfDeposit),
            other => Err(format!("unknown account type: {}", other)),
        }
    }
}

// ============================================================================
// ACCOUNT KIND (variant state)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AccountKind {
    Checking,

    Savings {
        /// Withdrawals since the last passtime step
        monthly_withdrawals: u32,
    },

    CertificateOfDeposit {
        /// Logical clock, advanced only by passtime
        months_elapsed: u32,
    },
}

impl AccountKind {
    pub fn account_type(&self) -> AccountType {
        match self {
            AccountKind::Checking => AccountType::Checking,
            AccountKind::Savings { .. } => AccountType::Savings,
            AccountKind::CertificateOfDeposit { .. } => AccountType::CertificateOfDeposit,
        }
    }
}

// ============================================================================
// ACCOUNT ENTITY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "AccountRecord")]
pub struct Account {
    id: String,
    apr: f64,
    balance: f64,
    kind: AccountKind,
}

/// Unchecked serialized shape; loading goes through the same clamps as construction
#[derive(Deserialize)]
struct AccountRecord {
    id: String,
    apr: f64,
    balance: f64,
    kind: AccountKind,
}

impl TryFrom<AccountRecord> for Account {
    type Error = BankError;

    fn try_from(record: AccountRecord) -> Result<Self, Self::Error> {
        if !is_valid_account_id(&record.id) {
            return Err(BankError::InvalidAccountId(record.id));
        }
        Ok(Account::with_kind(
            record.id,
            record.apr,
            record.balance,
            record.kind,
        ))
    }
}

impl Account {
    /// New Checking account, balance 0
    pub fn checking(id: impl Into<String>, apr: f64) -> Self {
        Account::with_kind(id.into(), apr, 0.0, AccountKind::Checking)
    }

    /// New Savings account, balance 0, no withdrawals yet
    pub fn savings(id: impl Into<String>, apr: f64) -> Self {
        Account::with_kind(
            id.into(),
            apr,
            0.0,
            AccountKind::Savings {
                monthly_withdrawals: 0,
            },
        )
    }

    /// New CD with its opening balance; bounds are the engine's concern
    pub fn certificate_of_deposit(id: impl Into<String>, apr: f64, balance: f64) -> Self {
        Account::with_kind(
            id.into(),
            apr,
            balance,
            AccountKind::CertificateOfDeposit { months_elapsed: 0 },
        )
    }

    fn with_kind(id: String, apr: f64, balance: f64, kind: AccountKind) -> Self {
        Account {
            id,
            apr: clamp_apr(apr),
            balance: if balance > 0.0 { balance } else { 0.0 },
            kind,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn apr(&self) -> f64 {
        self.apr
    }

    pub fn balance(&self) -> f64 {
        self.balance
    }

    pub fn kind(&self) -> &AccountKind {
        &self.kind
    }

    pub fn account_type(&self) -> AccountType {
        self.kind.account_type()
    }

    /// Zero balance means the next passtime closes the account
    pub fn is_empty(&self) -> bool {
        self.balance == 0.0
    }

    /// Savings withdrawals this period (None for other kinds)
    pub fn monthly_withdrawals(&self) -> Option<u32> {
        match self.kind {
            AccountKind::Savings { monthly_withdrawals } => Some(monthly_withdrawals),
            _ => None,
        }
    }

    /// CD months since opening (None for other kinds)
    pub fn months_elapsed(&self) -> Option<u32> {
        match self.kind {
            AccountKind::CertificateOfDeposit { months_elapsed } => Some(months_elapsed),
            _ => None,
        }
    }

    // ========================================================================
    // MUTATIONS (invariant-preserving)
    // ========================================================================

    /// Store APR, clamped into [0, 10]
    pub fn set_apr(&mut self, apr: f64) {
        self.apr = clamp_apr(apr);
    }

    pub(crate) fn credit(&mut self, amount: f64) {
        self.balance += amount;
    }

    /// Debit up to the available balance; returns what was actually taken
    pub(crate) fn debit(&mut self, amount: f64) -> f64 {
        let taken = amount.min(self.balance);
        self.balance = (self.balance - taken).max(0.0);
        taken
    }

    /// Apply the monthly rate `periods` times; returns the interest earned
    pub(crate) fn compound(&mut self, monthly_rate: f64, periods: u32) -> f64 {
        let before = self.balance;
        for _ in 0..periods {
            self.balance *= 1.0 + monthly_rate;
        }
        self.balance - before
    }

    pub(crate) fn record_withdrawal(&mut self) {
        if let AccountKind::Savings {
            monthly_withdrawals,
        } = &mut self.kind
        {
            *monthly_withdrawals += 1;
        }
    }

    pub(crate) fn reset_withdrawals(&mut self) {
        if let AccountKind::Savings {
            monthly_withdrawals,
        } = &mut self.kind
        {
            *monthly_withdrawals = 0;
        }
    }

    pub(crate) fn advance_months(&mut self, months: u32) {
        if let AccountKind::CertificateOfDeposit { months_elapsed } = &mut self.kind {
            *months_elapsed = months_elapsed.saturating_add(months);
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_checking_creation() {
        let account = Account::checking("12345678", 3.5);

        assert_eq!(account.id(), "12345678");
        assert_eq!(account.apr(), 3.5);
        assert_eq!(account.balance(), 0.0);
        assert_eq!(account.account_type(), AccountType::Checking);
        assert!(account.is_empty());
        assert_eq!(account.monthly_withdrawals(), None);
        assert_eq!(account.months_elapsed(), None);
    }

    #[test]
    fn test_savings_creation() {
        let account = Account::savings("87654321", 2.5);

        assert_eq!(account.account_type(), AccountType::Savings);
        assert_eq!(account.balance(), 0.0);
        assert_eq!(account.monthly_withdrawals(), Some(0));
    }

    #[test]
    fn test_cd_creation() {
        let account = Account::certificate_of_deposit("11223344", 2.1, 2000.0);

        assert_eq!(account.account_type(), AccountType::CertificateOfDeposit);
        assert_eq!(account.balance(), 2000.0);
        assert_eq!(account.months_elapsed(), Some(0));
    }

    #[rstest]
    #[case(-5.0, 0.0)]
    #[case(-0.01, 0.0)]
    #[case(0.0, 0.0)]
    #[case(3.5, 3.5)]
    #[case(10.0, 10.0)]
    #[case(10.1, 10.0)]
    #[case(250.0, 10.0)]
    #[case(f64::NAN, 0.0)]
    fn test_apr_is_clamped(#[case] given: f64, #[case] stored: f64) {
        let mut account = Account::checking("12345678", given);
        assert_eq!(account.apr(), stored);

        account.set_apr(5.0);
        account.set_apr(given);
        assert_eq!(account.apr(), stored);
    }

    #[test]
    fn test_debit_clamps_to_zero() {
        let mut account = Account::checking("12345678", 1.0);
        account.credit(200.0);

        let taken = account.debit(300.0);
        assert_eq!(taken, 200.0);
        assert_eq!(account.balance(), 0.0);
        assert!(account.is_empty());
    }

    #[test]
    fn test_partial_debit() {
        let mut account = Account::checking("12345678", 1.0);
        account.credit(500.0);

        assert_eq!(account.debit(200.0), 200.0);
        assert_eq!(account.balance(), 300.0);
    }

    #[test]
    fn test_compound() {
        let mut account = Account::checking("12345678", 3.0);
        account.credit(1000.0);

        let interest = account.compound(0.03 / 12.0, 1);
        assert!((account.balance() - 1002.5).abs() < 1e-9);
        assert!((interest - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_withdrawal_counter_only_for_savings() {
        let mut savings = Account::savings("87654321", 1.0);
        savings.record_withdrawal();
        savings.record_withdrawal();
        assert_eq!(savings.monthly_withdrawals(), Some(2));
        savings.reset_withdrawals();
        assert_eq!(savings.monthly_withdrawals(), Some(0));

        let mut checking = Account::checking("12345678", 1.0);
        checking.record_withdrawal();
        assert_eq!(checking.monthly_withdrawals(), None);
    }

    #[test]
    fn test_cd_months_advance() {
        let mut cd = Account::certificate_of_deposit("11223344", 1.0, 1000.0);
        cd.advance_months(5);
        cd.advance_months(7);
        assert_eq!(cd.months_elapsed(), Some(12));
    }

    #[test]
    fn test_account_id_format() {
        assert!(is_valid_account_id("12345678"));
        assert!(!is_valid_account_id("1234567"));
        assert!(!is_valid_account_id("123456789"));
        assert!(!is_valid_account_id("abcdefgh"));
        assert!(!is_valid_account_id(""));
    }

    #[test]
    fn test_account_type_from_token() {
        assert_eq!("checking".parse(), Ok(AccountType::Checking));
        assert_eq!("SAVINGS".parse(), Ok(AccountType::Savings));
        assert_eq!("Cd".parse(), Ok(AccountType::CertificateOfDeposit));
        assert!("saving".parse::<AccountType>().is_err());
    }

    #[test]
    fn test_account_serializes_with_kind_tag() {
        let account = Account::certificate_of_deposit("11223344", 1.5, 1000.0);
        let json = serde_json::to_value(&account).unwrap();

        assert_eq!(json["kind"]["type"], "certificate_of_deposit");
        assert_eq!(json["kind"]["months_elapsed"], 0);
    }

    #[test]
    fn test_deserialize_clamps_apr_and_balance() {
        let account: Account = serde_json::from_str(
            r#"{"id":"12345678","apr":50.0,"balance":-100.0,"kind":{"type":"checking"}}"#,
        )
        .unwrap();

        assert_eq!(account.apr(), MAX_APR);
        assert_eq!(account.balance(), 0.0);

        let account: Account = serde_json::from_str(
            r#"{"id":"87654321","apr":-1.0,"balance":250.0,"kind":{"type":"savings","monthly_withdrawals":2}}"#,
        )
        .unwrap();

        assert_eq!(account.apr(), MIN_APR);
        assert_eq!(account.balance(), 250.0);
        assert_eq!(account.monthly_withdrawals(), Some(2));
    }

    #[test]
    fn test_deserialize_rejects_malformed_id() {
        let result = serde_json::from_str::<Account>(
            r#"{"id":"1234","apr":1.0,"balance":0.0,"kind":{"type":"checking"}}"#,
        );

        let err = result.unwrap_err();
        assert!(err.to_string().contains("1234"));
    }

    #[test]
    fn test_serde_round_trip_keeps_state() {
        let mut account = Account::certificate_of_deposit("11223344", 2.1, 2000.0);
        account.advance_months(7);

        let json = serde_json::to_string(&account).unwrap();
        let loaded: Account = serde_json::from_str(&json).unwrap();

        assert_eq!(loaded, account);
    }
}
