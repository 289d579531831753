// 🖨️ Output - final account state as text lines or CSV
//
// Text layout, one block per open account (ordered by id):
//   <Type> <id> <balance> <apr>
//   <every valid command that touched the account, except its create>
// followed by every invalid command in submission order.
// Money and APR are truncated (never rounded up) to two decimals.

use crate::entities::{Account, Bank};
use crate::history::CommandHistory;
use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// Relative slack for binary representation error, e.g. 0.29 * 100
const CENTS_TOLERANCE: f64 = 1e-12;

/// Truncate toward zero at two decimals
///
/// The slack scales with the value, so it only absorbs float noise and never
/// lifts a balance into the next cent.
pub fn truncate_cents(value: f64) -> f64 {
    let cents = value * 100.0;
    (cents + cents.abs() * CENTS_TOLERANCE).floor() / 100.0
}

/// `Checking 12345678 1002.50 3.00`
pub fn format_account_state(account: &Account) -> String {
    format!(
        "{} {} {:.2} {:.2}",
        account.account_type().as_str(),
        account.id(),
        truncate_cents(account.balance()),
        truncate_cents(account.apr())
    )
}

pub fn render(bank: &Bank, history: &CommandHistory) -> Vec<String> {
    let mut lines = Vec::new();

    for account in bank.accounts() {
        lines.push(format_account_state(account));
        lines.extend(
            history
                .valid_commands_for(account.id())
                .into_iter()
                .filter(|entry| !entry.is_action("create"))
                .map(|entry| entry.command.clone()),
        );
    }

    lines.extend(
        history
            .invalid_commands()
            .into_iter()
            .map(|entry| entry.command.clone()),
    );

    lines
}

// ============================================================================
// CSV EXPORT
// ============================================================================

#[derive(Debug, Serialize)]
struct AccountRecord<'a> {
    id: &'a str,
    account_type: &'static str,
    balance: f64,
    apr: f64,
    monthly_withdrawals: Option<u32>,
    months_elapsed: Option<u32>,
}

impl<'a> From<&'a Account> for AccountRecord<'a> {
    fn from(account: &'a Account) -> Self {
        AccountRecord {
            id: account.id(),
            account_type: account.account_type().as_str(),
            balance: truncate_cents(account.balance()),
            apr: account.apr(),
            monthly_withdrawals: account.monthly_withdrawals(),
            months_elapsed: account.months_elapsed(),
        }
    }
}

/// Write one CSV row per open account (with header)
pub fn write_accounts_csv<W: Write>(bank: &Bank, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for account in bank.accounts() {
        wtr.serialize(AccountRecord::from(account))
            .with_context(|| format!("Failed to write CSV row for account {}", account.id()))?;
    }
    wtr.flush().context("Failed to flush CSV output")?;
    Ok(())
}

pub fn export_accounts_csv(bank: &Bank, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create CSV file: {:?}", path))?;
    write_accounts_csv(bank, file)
}

// ============================================================================
// TESTS
// ============================================================================
