// Bank Simulator - Core Library
// Account model, transaction engine and month-stepped time simulation,
// plus the command layer used by the CLI and tests

pub mod entities;
pub mod error;
pub mod rules;
pub mod transactions;
pub mod temporal;
pub mod parser;
pub mod history;
pub mod processor;
pub mod output;

// Re-export commonly used types
pub use entities::{
    clamp_apr, is_valid_account_id, Account, AccountKind, AccountType, Bank, MAX_APR, MIN_APR,
};
pub use error::{BankError, BankResult};
pub use rules::{BankPolicy, ShortfallPolicy};
pub use transactions::{TransactionEngine, TransactionOutcome};
pub use temporal::{AccountTimeReport, PassTimeReport, SimulationClock, TimeSimulator};
pub use parser::{Command, CommandError, CommandParser};
pub use history::{CommandHistory, HistoryEntry};
pub use processor::{CommandProcessor, ProcessError, ProcessOutcome};
pub use output::{export_accounts_csv, format_account_state, render, write_accounts_csv};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
