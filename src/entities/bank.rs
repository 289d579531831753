// 🏦 Bank Registry - Sole owner of every Account
//
// Accounts are keyed by their 8-digit id. Entries are added only by an
// explicit create and removed only by the passtime closure step; callers
// never keep references across operations, they look accounts up by id.

use super::account::{Account, AccountType};
use crate::error::{BankError, BankResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "BankRecord")]
pub struct Bank {
    accounts: BTreeMap<String, Account>,
}

#[derive(Deserialize)]
struct BankRecord {
    accounts: BTreeMap<String, Account>,
}

impl TryFrom<BankRecord> for Bank {
    type Error = BankError;

    /// Every map key must be the id of the account stored under it
    fn try_from(record: BankRecord) -> Result<Self, Self::Error> {
        if let Some((key, account)) = record
            .accounts
            .iter()
            .find(|(key, account)| key.as_str() != account.id())
        {
            return Err(BankError::AccountKeyMismatch {
                key: key.clone(),
                id: account.id().to_string(),
            });
        }
        Ok(Bank {
            accounts: record.accounts,
        })
    }
}

impl Bank {
    /// Create new empty bank
    pub fn new() -> Self {
        Bank {
            accounts: BTreeMap::new(),
        }
    }

    /// Insert a new account; ids are unique
    pub fn add_account(&mut self, account: Account) -> BankResult<()> {
        if self.accounts.contains_key(account.id()) {
            return Err(BankError::DuplicateAccount(account.id().to_string()));
        }
        self.accounts.insert(account.id().to_string(), account);
        Ok(())
    }

    pub fn account_exists(&self, id: &str) -> bool {
        self.accounts.contains_key(id)
    }

    /// Lookup that fails with AccountNotFound
    pub fn account(&self, id: &str) -> BankResult<&Account> {
        self.accounts
            .get(id)
            .ok_or_else(|| BankError::AccountNotFound(id.to_string()))
    }

    pub(crate) fn account_mut(&mut self, id: &str) -> BankResult<&mut Account> {
        self.accounts
            .get_mut(id)
            .ok_or_else(|| BankError::AccountNotFound(id.to_string()))
    }

    pub(crate) fn remove(&mut self, id: &str) -> Option<Account> {
        self.accounts.remove(id)
    }

    pub fn account_type(&self, id: &str) -> Option<AccountType> {
        self.accounts.get(id).map(Account::account_type)
    }

    /// All accounts, ordered by id
    pub fn accounts(&self) -> impl Iterator<Item = &Account> {
        self.accounts.values()
    }

    pub(crate) fn accounts_mut(&mut self) -> impl Iterator<Item = &mut Account> {
        self.accounts.values_mut()
    }

    pub fn count(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Sum of every balance held by the bank
    pub fn total_balance(&self) -> f64 {
        self.accounts.values().map(Account::balance).sum()
    }
}

// ============================================================================
// TESTS
// ============================================================================
