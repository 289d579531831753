// ⚠️ Error Taxonomy - Policy violations are values, not aborts
//
// Every engine operation returns Result<T, BankError>. A failed operation
// never leaves the Bank partially mutated.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BankError {
    #[error("Account {0} does not exist")]
    AccountNotFound(String),

    #[error("Account {0} already exists")]
    DuplicateAccount(String),

    #[error("Account id must be exactly 8 digits, got {0:?}")]
    InvalidAccountId(String),

    #[error("Account stored under key {key} has id {id}")]
    AccountKeyMismatch { key: String, id: String },

    #[error("Amount must be greater than zero, got {0}")]
    InvalidAmount(f64),

    #[error("CD initial balance must be between {min} and {max}, got {given:?}")]
    InvalidInitialBalance {
        given: Option<f64>,
        min: f64,
        max: f64,
    },

    #[error("{account_type} {operation} of {amount} exceeds the limit of {limit}")]
    LimitExceeded {
        account_type: &'static str,
        operation: &'static str,
        amount: f64,
        limit: f64,
    },

    #[error("Savings account {id} reached its limit of {limit} withdrawals this period")]
    MonthlyLimitReached { id: String, limit: u32 },

    #[error("CD {id} is locked: {months_elapsed} of {lock_months} months elapsed")]
    LockPeriodActive {
        id: String,
        months_elapsed: u32,
        lock_months: u32,
    },

    #[error("CD {id} only allows a full withdrawal of {balance}, requested {amount}")]
    PartialWithdrawalNotAllowed { id: String, amount: f64, balance: f64 },

    #[error("Deposits are not allowed for CD {0}")]
    DepositNotAllowed(String),

    #[error("CD accounts cannot be part of a transfer")]
    CdTransferNotAllowed,

    #[error("Insufficient funds in {id}: balance {balance}, requested {amount}")]
    InsufficientFunds { id: String, balance: f64, amount: f64 },

    #[error("Months to pass must be at least 1, got {0}")]
    InvalidMonths(u32),
}

impl BankError {
    /// Stable kind name, independent of the message payload
    pub fn kind(&self) -> &'static str {
        match self {
            BankError::AccountNotFound(_) => "AccountNotFoundError",
            BankError::DuplicateAccount(_) => "DuplicateAccountError",
            BankError::InvalidAccountId(_) => "InvalidAccountIdError",
            BankError::AccountKeyMismatch { .. } => "AccountKeyMismatchError",
            BankError::InvalidAmount(_) => "InvalidAmountError",
            BankError::InvalidInitialBalance { .. } => "InvalidInitialBalanceError",
            BankError::LimitExceeded { .. } => "LimitExceededError",
            BankError::MonthlyLimitReached { .. } => "MonthlyLimitReachedError",
            BankError::LockPeriodActive { .. } => "LockPeriodActiveError",
            BankError::PartialWithdrawalNotAllowed { .. } => "PartialWithdrawalNotAllowedError",
            BankError::DepositNotAllowed(_) => "DepositNotAllowedError",
            BankError::CdTransferNotAllowed => "CDTransferNotAllowedError",
            BankError::InsufficientFunds { .. } => "InsufficientFundsError",
            BankError::InvalidMonths(_) => "InvalidMonthsError",
        }
    }
}

pub type BankResult<T> = Result<T, BankError>;
