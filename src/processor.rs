// ⚙️ Command Processor - parse → execute → record
//
// Owns the Bank and routes each parsed command to the TransactionEngine or
// the TimeSimulator. This is the only layer that logs; the engine itself
// stays silent and reports everything through return values.

use crate::entities::Bank;
use crate::error::BankError;
use crate::history::CommandHistory;
use crate::output;
use crate::parser::{Command, CommandError, CommandParser};
use crate::rules::BankPolicy;
use crate::temporal::{PassTimeReport, SimulationClock, TimeSimulator};
use crate::transactions::{TransactionEngine, TransactionOutcome};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProcessError {
    #[error("invalid command: {0}")]
    Syntax(#[from] CommandError),

    #[error("rejected: {0}")]
    Rejected(#[from] BankError),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ProcessOutcome {
    Transaction(TransactionOutcome),
    TimePassed(PassTimeReport),
}

pub struct CommandProcessor {
    bank: Bank,
    parser: CommandParser,
    engine: TransactionEngine,
    simulator: TimeSimulator,
    history: CommandHistory,
}

impl Default for CommandProcessor {
    fn default() -> Self {
        CommandProcessor::new(BankPolicy::default())
    }
}

impl CommandProcessor {
    pub fn new(policy: BankPolicy) -> Self {
        CommandProcessor {
            bank: Bank::new(),
            parser: CommandParser::new(&policy),
            engine: TransactionEngine::new(policy.clone()),
            simulator: TimeSimulator::new(policy),
            history: CommandHistory::new(),
        }
    }

    pub fn bank(&self) -> &Bank {
        &self.bank
    }

    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    pub fn clock(&self) -> SimulationClock {
        self.simulator.clock()
    }

    /// Process one command line and record it in the history
    pub fn process(&mut self, line: &str) -> Result<ProcessOutcome, ProcessError> {
        log::debug!("Processing command: {:?}", line.trim());

        let command = match self.parser.parse(line) {
            Ok(command) => command,
            Err(err) => {
                log::warn!("Invalid command {:?}: {}", line.trim(), err);
                self.history.add_invalid_command(line, None, err.to_string());
                return Err(err.into());
            }
        };

        match self.execute(&command) {
            Ok(outcome) => {
                self.history.add_valid_command(line, &command);
                Ok(outcome)
            }
            Err(err) => {
                log::warn!("Rejected {:?} ({}): {}", line.trim(), err.kind(), err);
                self.history
                    .add_invalid_command(line, Some(&command), err.to_string());
                Err(err.into())
            }
        }
    }

    /// Run a batch of lines; blank lines are skipped. Returns the rendered output.
    pub fn run<I, S>(&mut self, lines: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut processed = 0usize;
        let mut rejected = 0usize;

        for line in lines {
            let line = line.as_ref();
            if line.trim().is_empty() {
                continue;
            }
            processed += 1;
            if self.process(line).is_err() {
                rejected += 1;
            }
        }

        log::info!(
            "Processed {} command(s), {} rejected, {} account(s) open",
            processed,
            rejected,
            self.bank.count()
        );
        self.output()
    }

    /// Account states with their valid commands, then invalid commands
    pub fn output(&self) -> Vec<String> {
        output::render(&self.bank, &self.history)
    }

    fn execute(&mut self, command: &Command) -> Result<ProcessOutcome, BankError> {
        let bank = &mut self.bank;
        let engine = &self.engine;

        let outcome = match command {
            Command::Create {
                account_type,
                id,
                apr,
                initial_balance,
            } => engine.create_account(bank, *account_type, id, *apr, *initial_balance)?,
            Command::Deposit { id, amount } => engine.deposit(bank, id, *amount)?,
            Command::Withdraw { id, amount } => engine.withdraw(bank, id, *amount)?,
            Command::Transfer { from, to, amount } => engine.transfer(bank, from, to, *amount)?,
            Command::PassTime { months } => {
                let report = self.simulator.pass_time(bank, *months)?;
                for entry in &report.accounts {
                    if entry.fee_applied {
                        log::debug!("Charged {:.2} low-balance fee to {}", entry.fee, entry.id);
                    }
                    if entry.closed {
                        log::info!("Closed account {} due to zero balance", entry.id);
                    }
                }
                log::info!(
                    "{}; bank holds ${:.2}",
                    report.summary(),
                    bank.total_balance()
                );
                return Ok(ProcessOutcome::TimePassed(report));
            }
        };

        if let TransactionOutcome::Withdrew { id, requested, withdrawn, .. } = &outcome {
            if withdrawn < requested {
                log::info!(
                    "Withdrawal from {} clamped: requested {:.2}, withdrew {:.2}",
                    id,
                    requested,
                    withdrawn
                );
            }
        }
        log::debug!("{}", outcome.summary());

        Ok(ProcessOutcome::Transaction(outcome))
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::AccountType;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 0.005,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_process_records_valid_and_invalid() {
        let mut processor = CommandProcessor::default();

        assert!(processor.process("create checking 12345678 3.5").is_ok());
        assert!(processor.process("deposit 12345678 1500").is_err());
        assert!(processor.process("depositt 12345678 15").is_err());
        assert!(processor.process("deposit 12345678 500").is_ok());

        let history = processor.history();
        assert_eq!(history.valid_commands().len(), 2);
        assert_eq!(history.invalid_commands().len(), 2);
        assert_eq!(processor.bank().account("12345678").unwrap().balance(), 500.0);
    }

    #[test]
    fn test_errors_are_typed() {
        let mut processor = CommandProcessor::default();

        let err = processor.process("passtime 0").unwrap_err();
        assert!(matches!(err, ProcessError::Syntax(CommandError::MonthsOutOfRange { .. })));

        let err = processor.process("withdraw 12345678 10").unwrap_err();
        assert_eq!(
            err,
            ProcessError::Rejected(BankError::AccountNotFound("12345678".to_string()))
        );
    }

    #[test]
    fn test_duplicate_create_keeps_original() {
        let mut processor = CommandProcessor::default();

        processor.process("create checking 12345678 3.5").unwrap();
        let err = processor.process("create savings 12345678 1.0").unwrap_err();

        assert_eq!(
            err,
            ProcessError::Rejected(BankError::DuplicateAccount("12345678".to_string()))
        );
        assert_eq!(
            processor.bank().account_type("12345678"),
            Some(AccountType::Checking)
        );
    }

    #[test]
    fn test_passtime_outcome() {
        let mut processor = CommandProcessor::default();
        processor.process("create checking 12345678 3").unwrap();
        processor.process("deposit 12345678 1000").unwrap();
        processor.process("create savings 87654321 1").unwrap();

        let outcome = processor.process("passtime 1").unwrap();

        let ProcessOutcome::TimePassed(report) = outcome else {
            panic!("expected a passtime report");
        };
        assert_eq!(report.closed_ids(), vec!["87654321"]);
        assert_close(processor.bank().account("12345678").unwrap().balance(), 1002.5);
        assert_eq!(processor.clock().months_elapsed(), 1);
    }

    #[test]
    fn test_savings_cycle_through_commands() {
        let mut processor = CommandProcessor::default();
        processor.process("create savings 87654321 0").unwrap();
        processor.process("deposit 87654321 2500").unwrap();

        for _ in 0..3 {
            processor.process("withdraw 87654321 100").unwrap();
        }
        let err = processor.process("withdraw 87654321 100").unwrap_err();
        assert_eq!(
            err,
            ProcessError::Rejected(BankError::MonthlyLimitReached {
                id: "87654321".to_string(),
                limit: 3
            })
        );

        processor.process("passtime 1").unwrap();
        assert!(processor.process("withdraw 87654321 100").is_ok());
        assert_eq!(processor.bank().account("87654321").unwrap().balance(), 2100.0);
    }

    #[test]
    fn test_cd_lifecycle() {
        let mut processor = CommandProcessor::default();
        processor.process("create cd 11223344 0 1500").unwrap();

        assert!(processor.process("withdraw 11223344 1500").is_err());
        assert!(processor.process("deposit 11223344 100").is_err());
        assert!(processor.process("transfer 11223344 12345678 10").is_err());

        processor.process("passtime 12").unwrap();
        assert!(processor.process("withdraw 11223344 1000").is_err());
        processor.process("withdraw 11223344 1500").unwrap();

        processor.process("passtime 1").unwrap();
        assert!(!processor.bank().account_exists("11223344"));
    }

    #[test]
    fn test_run_skips_blank_lines_and_renders() {
        let mut processor = CommandProcessor::default();
        let output = processor.run(vec![
            "create checking 12345678 1.0",
            "",
            "deposit 12345678 700",
            "   ",
            "withdraw 12345678 500",
            "withdraw 12345678 300",
        ]);

        assert_eq!(processor.history().len(), 4);
        assert_eq!(
            output,
            vec![
                "Checking 12345678 400.00 1.00",
                "deposit 12345678 700",
                "withdraw 12345678 300",
                "withdraw 12345678 500",
            ]
        );
    }

    #[test]
    fn test_outcome_serializes() {
        let mut processor = CommandProcessor::default();
        let outcome = processor.process("create checking 12345678 3.5").unwrap();

        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["operation"], "created");
        assert_eq!(json["id"], "12345678");
    }
}
