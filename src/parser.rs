// 🏗️ Command Parser - text line → typed Command
//
// Syntax-level checks only: arity, action, account type, id format, numbers,
// APR and months ranges. Anything that needs the Bank (existence, duplicates,
// limits) is the engine's job.

use crate::entities::{is_valid_account_id, AccountType, MAX_APR, MIN_APR};
use crate::rules::BankPolicy;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// CORE TYPES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Command {
    Create {
        account_type: AccountType,
        id: String,
        apr: f64,
        initial_balance: Option<f64>,
    },
    Deposit {
        id: String,
        amount: f64,
    },
    Withdraw {
        id: String,
        amount: f64,
    },
    Transfer {
        from: String,
        to: String,
        amount: f64,
    },
    PassTime {
        months: u32,
    },
}

impl Command {
    pub fn action(&self) -> &'static str {
        match self {
            Command::Create { .. } => "create",
            Command::Deposit { .. } => "deposit",
            Command::Withdraw { .. } => "withdraw",
            Command::Transfer { .. } => "transfer",
            Command::PassTime { .. } => "passtime",
        }
    }

    /// Account ids the command refers to (none for passtime)
    pub fn account_ids(&self) -> Vec<&str> {
        match self {
            Command::Create { id, .. } | Command::Deposit { id, .. } | Command::Withdraw { id, .. } => {
                vec![id.as_str()]
            }
            Command::Transfer { from, to, .. } => vec![from.as_str(), to.as_str()],
            Command::PassTime { .. } => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommandError {
    #[error("empty command")]
    Empty,

    #[error("unknown action: {0}")]
    UnknownAction(String),

    #[error("{action} expects {expected} argument(s), got {given}")]
    Arity {
        action: &'static str,
        expected: &'static str,
        given: usize,
    },

    #[error("unknown account type: {0}")]
    UnknownAccountType(String),

    #[error("account id must be exactly 8 digits: {0}")]
    MalformedId(String),

    #[error("{field} is not a valid number: {value}")]
    MalformedNumber { field: &'static str, value: String },

    #[error("APR must be between 0 and 10, got {0}")]
    AprOutOfRange(f64),

    #[error("months must be between 1 and {max}, got {value}")]
    MonthsOutOfRange { value: i64, max: u32 },

    #[error("CD creation requires an initial balance")]
    MissingInitialBalance,
}

// ============================================================================
// PARSER
// ============================================================================

#[derive(Debug, Clone)]
pub struct CommandParser {
    max_passtime_months: u32,
}

impl Default for CommandParser {
    fn default() -> Self {
        CommandParser::new(&BankPolicy::default())
    }
}

impl CommandParser {
    pub fn new(policy: &BankPolicy) -> Self {
        CommandParser {
            max_passtime_months: policy.max_passtime_months,
        }
    }

    /// Parse one command line; whitespace runs are separators, case is ignored
    pub fn parse(&self, line: &str) -> Result<Command, CommandError> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let (action, args) = match parts.split_first() {
            Some((action, args)) => (action.to_ascii_lowercase(), args),
            None => return Err(CommandError::Empty),
        };

        match action.as_str() {
            "create" => parse_create(args),
            "deposit" => {
                let (id, amount) = parse_id_amount("deposit", args)?;
                Ok(Command::Deposit { id, amount })
            }
            "withdraw" => {
                let (id, amount) = parse_id_amount("withdraw", args)?;
                Ok(Command::Withdraw { id, amount })
            }
            "transfer" => parse_transfer(args),
            "passtime" => self.parse_pass_time(args),
            _ => Err(CommandError::UnknownAction(action)),
        }
    }

    fn parse_pass_time(&self, args: &[&str]) -> Result<Command, CommandError> {
        let [months] = args else {
            return Err(CommandError::Arity {
                action: "passtime",
                expected: "1",
                given: args.len(),
            });
        };

        let value: i64 = months.parse().map_err(|_| CommandError::MalformedNumber {
            field: "months",
            value: months.to_string(),
        })?;

        let max = self.max_passtime_months;
        match u32::try_from(value) {
            Ok(months) if months >= 1 && months <= max => Ok(Command::PassTime { months }),
            _ => Err(CommandError::MonthsOutOfRange { value, max }),
        }
    }
}

fn parse_create(args: &[&str]) -> Result<Command, CommandError> {
    if args.len() < 3 || args.len() > 4 {
        return Err(CommandError::Arity {
            action: "create",
            expected: "3 or 4",
            given: args.len(),
        });
    }

    let account_type: AccountType = args[0]
        .parse()
        .map_err(|_| CommandError::UnknownAccountType(args[0].to_string()))?;
    let id = parse_id(args[1])?;

    let apr = parse_number("apr", args[2])?;
    if !(MIN_APR..=MAX_APR).contains(&apr) {
        return Err(CommandError::AprOutOfRange(apr));
    }

    let initial_balance = args
        .get(3)
        .map(|value| parse_number("initial balance", value))
        .transpose()?;
    if account_type == AccountType::CertificateOfDeposit && initial_balance.is_none() {
        return Err(CommandError::MissingInitialBalance);
    }

    Ok(Command::Create {
        account_type,
        id,
        apr,
        initial_balance,
    })
}

fn parse_id_amount(action: &'static str, args: &[&str]) -> Result<(String, f64), CommandError> {
    let [id, amount] = args else {
        return Err(CommandError::Arity {
            action,
            expected: "2",
            given: args.len(),
        });
    };
    Ok((parse_id(id)?, parse_number("amount", amount)?))
}

fn parse_transfer(args: &[&str]) -> Result<Command, CommandError> {
    let [from, to, amount] = args else {
        return Err(CommandError::Arity {
            action: "transfer",
            expected: "3",
            given: args.len(),
        });
    };
    Ok(Command::Transfer {
        from: parse_id(from)?,
        to: parse_id(to)?,
        amount: parse_number("amount", amount)?,
    })
}

fn parse_id(token: &str) -> Result<String, CommandError> {
    if is_valid_account_id(token) {
        Ok(token.to_string())
    } else {
        Err(CommandError::MalformedId(token.to_string()))
    }
}

/// Finite decimal; rejects "NaN", "inf" and friends
fn parse_number(field: &'static str, token: &str) -> Result<f64, CommandError> {
    match token.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(CommandError::MalformedNumber {
            field,
            value: token.to_string(),
        }),
    }
}

// ============================================================================
// TESTS
// ============================================================================
