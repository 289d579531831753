// Entity Models
//
// - Account: stable 8-digit identity, per-kind variant state
// - Bank: registry that exclusively owns every Account

pub mod account;
pub mod bank;

pub use account::{
    clamp_apr, is_valid_account_id, Account, AccountKind, AccountType, MAX_APR, MIN_APR,
};
pub use bank::Bank;
