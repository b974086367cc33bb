use thiserror::Error;

use crate::domain::{AccountId, Cents};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    #[error("Phone number already registered: {0}")]
    DuplicatePhone(String),

    #[error("Invalid phone number: {0} (expected 10 digits starting with 6-9)")]
    InvalidPhone(String),

    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    #[error("Initial balance must be positive, got {0}")]
    InvalidInitialBalance(Cents),

    #[error("Amount must be positive, got {0}")]
    InvalidAmount(Cents),

    #[error("Insufficient funds in account {account}: balance {balance}, requested {requested}")]
    InsufficientFunds {
        account: AccountId,
        balance: Cents,
        requested: Cents,
    },

    #[error("Store error: {0}")]
    Store(#[from] anyhow::Error),
}
