// 💸 Transaction Engine - create / deposit / withdraw / transfer
//
// Every operation resolves accounts by id at the start, runs its checks in a
// fixed order (existence → amount → per-kind cap → eligibility) and only
// mutates once every check has passed. Failures leave the Bank untouched.

use crate::entities::{is_valid_account_id, Account, AccountType, Bank};
use crate::error::{BankError, BankResult};
use crate::rules::{BankPolicy, ShortfallPolicy};
use serde::{Deserialize, Serialize};

// ============================================================================
// OUTCOME
// ============================================================================

/// Successful result of an engine operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum TransactionOutcome {
    Created {
        id: String,
        account_type: AccountType,
        apr: f64,
        balance: f64,
    },

    Deposited {
        id: String,
        amount: f64,
        balance: f64,
    },

    /// `withdrawn` may be less than `requested` when the balance ran out
    Withdrew {
        id: String,
        requested: f64,
        withdrawn: f64,
        balance: f64,
    },

    Transferred {
        from: String,
        to: String,
        requested: f64,
        transferred: f64,
        from_balance: f64,
        to_balance: f64,
    },
}

impl TransactionOutcome {
    pub fn summary(&self) -> String {
        match self {
            TransactionOutcome::Created {
                id,
                account_type,
                apr,
                balance,
            } => format!(
                "Created {} {} (apr {:.2}, balance {:.2})",
                account_type.name(),
                id,
                apr,
                balance
            ),
            TransactionOutcome::Deposited { id, amount, balance } => {
                format!("Deposited {:.2} to {} (balance {:.2})", amount, id, balance)
            }
            TransactionOutcome::Withdrew {
                id,
                withdrawn,
                balance,
                ..
            } => format!("Withdrew {:.2} from {} (balance {:.2})", withdrawn, id, balance),
            TransactionOutcome::Transferred {
                from,
                to,
                transferred,
                ..
            } => format!("Transferred {:.2} from {} to {}", transferred, from, to),
        }
    }
}

fn require_positive(amount: f64) -> BankResult<f64> {
    if amount.is_finite() && amount > 0.0 {
        Ok(amount)
    } else {
        Err(BankError::InvalidAmount(amount))
    }
}

// ============================================================================
// TRANSACTION ENGINE
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct TransactionEngine {
    policy: BankPolicy,
}

impl TransactionEngine {
    pub fn new(policy: BankPolicy) -> Self {
        TransactionEngine { policy }
    }

    pub fn policy(&self) -> &BankPolicy {
        &self.policy
    }

    /// Open a new account and insert it into the bank
    ///
    /// Checking and Savings always open at 0 and ignore `initial_balance`.
    /// A CD requires an opening balance within the policy bounds.
    pub fn create_account(
        &self,
        bank: &mut Bank,
        account_type: AccountType,
        id: &str,
        apr: f64,
        initial_balance: Option<f64>,
    ) -> BankResult<TransactionOutcome> {
        if !is_valid_account_id(id) {
            return Err(BankError::InvalidAccountId(id.to_string()));
        }
        if bank.account_exists(id) {
            return Err(BankError::DuplicateAccount(id.to_string()));
        }

        let account = match account_type {
            AccountType::Checking => Account::checking(id, apr),
            AccountType::Savings => Account::savings(id, apr),
            AccountType::CertificateOfDeposit => {
                let (min, max) = (self.policy.cd_min_balance, self.policy.cd_max_balance);
                match initial_balance {
                    Some(balance) if balance >= min && balance <= max => {
                        Account::certificate_of_deposit(id, apr, balance)
                    }
                    given => return Err(BankError::InvalidInitialBalance { given, min, max }),
                }
            }
        };

        let outcome = TransactionOutcome::Created {
            id: id.to_string(),
            account_type,
            apr: account.apr(),
            balance: account.balance(),
        };
        bank.add_account(account)?;
        Ok(outcome)
    }

    pub fn deposit(&self, bank: &mut Bank, id: &str, amount: f64) -> BankResult<TransactionOutcome> {
        let account = bank.account(id)?;
        let amount = require_positive(amount)?;
        let kind = account.account_type();

        match self.policy.deposit_limit(kind) {
            None => return Err(BankError::DepositNotAllowed(id.to_string())),
            Some(limit) if amount > limit => {
                return Err(BankError::LimitExceeded {
                    account_type: kind.name(),
                    operation: "deposit",
                    amount,
                    limit,
                })
            }
            Some(_) => {}
        }

        let account = bank.account_mut(id)?;
        account.credit(amount);

        Ok(TransactionOutcome::Deposited {
            id: id.to_string(),
            amount,
            balance: account.balance(),
        })
    }

    /// Withdraw from an account
    ///
    /// Checking and Savings clamp at zero instead of failing, so `withdrawn`
    /// in the outcome can be smaller than requested. A CD only releases its
    /// full balance, and only once the lock period has elapsed.
    pub fn withdraw(&self, bank: &mut Bank, id: &str, amount: f64) -> BankResult<TransactionOutcome> {
        let account = bank.account(id)?;
        let amount = require_positive(amount)?;
        let kind = account.account_type();

        if let Some(limit) = self.policy.withdraw_limit(kind) {
            if amount > limit {
                return Err(BankError::LimitExceeded {
                    account_type: kind.name(),
                    operation: "withdrawal",
                    amount,
                    limit,
                });
            }
        }

        if let Some(count) = account.monthly_withdrawals() {
            let limit = self.policy.savings_monthly_withdrawals;
            if count >= limit {
                return Err(BankError::MonthlyLimitReached {
                    id: id.to_string(),
                    limit,
                });
            }
        }

        if let Some(months_elapsed) = account.months_elapsed() {
            let lock_months = self.policy.cd_lock_months;
            if months_elapsed < lock_months {
                return Err(BankError::LockPeriodActive {
                    id: id.to_string(),
                    months_elapsed,
                    lock_months,
                });
            }
            if amount < account.balance() {
                return Err(BankError::PartialWithdrawalNotAllowed {
                    id: id.to_string(),
                    amount,
                    balance: account.balance(),
                });
            }
        }

        let account = bank.account_mut(id)?;
        let withdrawn = account.debit(amount);
        account.record_withdrawal();

        Ok(TransactionOutcome::Withdrew {
            id: id.to_string(),
            requested: amount,
            withdrawn,
            balance: account.balance(),
        })
    }

    /// Move funds between two non-CD accounts
    ///
    /// Deposit and withdrawal caps do not apply here. A shortfall is either
    /// rejected or clipped to the source balance, per `transfer_shortfall`.
    pub fn transfer(
        &self,
        bank: &mut Bank,
        from: &str,
        to: &str,
        amount: f64,
    ) -> BankResult<TransactionOutcome> {
        let source = bank.account(from)?;
        let target = bank.account(to)?;

        if !self.policy.is_transferable(source.account_type())
            || !self.policy.is_transferable(target.account_type())
        {
            return Err(BankError::CdTransferNotAllowed);
        }

        let requested = require_positive(amount)?;
        let available = source.balance();

        // An empty source has nothing to clip to, so it fails under either policy
        let transferred = if available < requested {
            match self.policy.transfer_shortfall {
                ShortfallPolicy::ClipToBalance if available > 0.0 => available,
                ShortfallPolicy::ClipToBalance | ShortfallPolicy::Reject => {
                    return Err(BankError::InsufficientFunds {
                        id: from.to_string(),
                        balance: available,
                        amount: requested,
                    })
                }
            }
        } else {
            requested
        };

        if from != to {
            let taken = bank.account_mut(from)?.debit(transferred);
            bank.account_mut(to)?.credit(taken);
        }

        Ok(TransactionOutcome::Transferred {
            from: from.to_string(),
            to: to.to_string(),
            requested,
            transferred,
            from_balance: bank.account(from)?.balance(),
            to_balance: bank.account(to)?.balance(),
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================
